//! Ranked chat statistics.
//!
//! The aggregator snapshots every stats record of a chat and derives the
//! five leaderboard views. Rendering is rate-limited through a [`RenderGate`]:
//! whoever fails to take the gate within its patience window gets
//! "suppressed" and is expected to do nothing but clean up after itself.
//! The production gate is process-wide, one render at a time across all
//! chats. That scope is inherited behavior; swapping in a per-chat gate only
//! takes another `RenderGate` implementation.

mod gate;

use anyhow::Result;
use std::sync::Arc;

use crate::database::{Storage, UserChatStats};

pub use gate::{ProcessGate, RenderGate, RenderPermit};

/// One row of a leaderboard view.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub name: String,
    pub karma: i64,
    pub karma_percent: f32,
    pub messages: u64,
    pub bad_words: u64,
    pub bad_words_percent: f32,
    pub warns: u32,
}

impl RankedEntry {
    fn new(name: String, stats: &UserChatStats) -> Self {
        Self {
            name,
            karma: stats.karma,
            karma_percent: percent(stats.karma, stats.total_messages),
            messages: stats.total_messages,
            bad_words: stats.total_bad_words,
            bad_words_percent: percent(stats.total_bad_words as i64, stats.total_messages),
            warns: stats.warns,
        }
    }
}

/// The computed leaderboard views for one chat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingReport {
    /// Accounts the chat has stats for.
    pub accounts: usize,
    /// Top 5 by karma.
    pub top_karma: Vec<RankedEntry>,
    /// Up to 3 holders of negative karma, worst one last.
    pub negative_karma: Vec<RankedEntry>,
    /// Top 5 by message count.
    pub most_active: Vec<RankedEntry>,
    /// Top 5 by flagged words.
    pub most_profane: Vec<RankedEntry>,
    /// Up to 5 warned users, most warned first. Empty when nobody is warned.
    pub most_warned: Vec<RankedEntry>,
}

/// `count * 100 / total`, pinned to [0, 100]. Zero messages means zero
/// percent, never a division by zero.
pub fn percent(count: i64, total: u64) -> f32 {
    if count <= 0 || total == 0 {
        return 0.0;
    }
    (count as f32 * 100.0 / total as f32).min(100.0)
}

/// Derive the report from a name-resolved snapshot. Pure; the aggregator
/// only adds I/O around this.
pub fn build_report(snapshot: &[(String, UserChatStats)]) -> RankingReport {
    let mut by_karma: Vec<_> = snapshot.iter().collect();
    by_karma.sort_by_key(|(_, s)| std::cmp::Reverse(s.karma));
    let top_karma = by_karma
        .into_iter()
        .take(5)
        .map(|(name, s)| RankedEntry::new(name.clone(), s))
        .collect();

    // Worst three, ordered so the most negative lands at the bottom of the
    // rendered list.
    let mut negative: Vec<_> = snapshot.iter().filter(|(_, s)| s.karma < 0).collect();
    negative.sort_by_key(|(_, s)| s.karma);
    negative.truncate(3);
    negative.sort_by_key(|(_, s)| std::cmp::Reverse(s.karma));
    let negative_karma = negative
        .into_iter()
        .map(|(name, s)| RankedEntry::new(name.clone(), s))
        .collect();

    let mut by_messages: Vec<_> = snapshot.iter().collect();
    by_messages.sort_by_key(|(_, s)| std::cmp::Reverse(s.total_messages));
    let most_active = by_messages
        .into_iter()
        .take(5)
        .map(|(name, s)| RankedEntry::new(name.clone(), s))
        .collect();

    let mut by_bad_words: Vec<_> = snapshot.iter().collect();
    by_bad_words.sort_by_key(|(_, s)| std::cmp::Reverse(s.total_bad_words));
    let most_profane = by_bad_words
        .into_iter()
        .take(5)
        .map(|(name, s)| RankedEntry::new(name.clone(), s))
        .collect();

    let mut warned: Vec<_> = snapshot.iter().filter(|(_, s)| s.warns > 0).collect();
    warned.sort_by_key(|(_, s)| std::cmp::Reverse(s.warns));
    warned.truncate(5);
    let most_warned = warned
        .into_iter()
        .map(|(name, s)| RankedEntry::new(name.clone(), s))
        .collect();

    RankingReport {
        accounts: snapshot.len(),
        top_karma,
        negative_karma,
        most_active,
        most_profane,
        most_warned,
    }
}

/// Gated leaderboard computation over the stats store.
pub struct LeaderboardAggregator {
    storage: Storage,
    gate: Arc<dyn RenderGate>,
}

impl LeaderboardAggregator {
    pub fn new(storage: Storage, gate: Arc<dyn RenderGate>) -> Self {
        Self { storage, gate }
    }

    /// Compute the ranking for a chat, or `None` when another render holds
    /// the gate ("suppressed"). On success the caller receives the permit
    /// and decides how long the render stays exclusive by holding it.
    pub async fn compute_ranking(
        &self,
        chat_id: i64,
    ) -> Result<Option<(RankingReport, RenderPermit)>> {
        let Some(permit) = self.gate.acquire().await else {
            return Ok(None);
        };

        let stats = self.storage.stats.list_chat(chat_id).await?;

        let mut snapshot = Vec::with_capacity(stats.len());
        for record in stats {
            let name = match self.storage.users.get(record.user_id).await? {
                Some(user) => user.user_name,
                None => format!("id{}", record.user_id),
            };
            snapshot.push((name, record));
        }

        Ok(Some((build_report(&snapshot), permit)))
    }
}
