//! Rudecat - a rude Telegram group bot.
//!
//! Karma, leaderboards, tickets, welcome challenges and cats. Inbound
//! updates are normalized into transport-free events and resolved through
//! a ranked trigger table; replies clean themselves up after a delay.

pub mod bot;
pub mod cache;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod handlers;
pub mod leaderboard;
pub mod permissions;
pub mod services;
pub mod telegram;
pub mod texts;
pub mod triggers;
pub mod utils;
