//! Concrete bot behaviors and their trigger table.

pub mod advices;
pub mod ask;
pub mod cat;
pub mod karma;
pub mod moderation;
pub mod onboarding;
pub mod reactions;
pub mod start;
pub mod tickets;
pub mod top;

use std::sync::Arc;

use teloxide::types::UserId;

use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::{EventKind, InboundEvent};
use crate::dispatch::HandlerContext;
use crate::telegram::SendOptions;
use crate::texts;
use crate::triggers::{Trigger, TriggerRegistry};

/// The full trigger table, ranks ascending. Lower ranks win overlaps, so
/// exact-word triggers sit below the reaction patterns and the advice
/// catch-all closes the table.
pub fn build_registry(bot_user_id: UserId) -> anyhow::Result<TriggerRegistry> {
    let thanks_pattern = format!("(?i)({})", texts::THANKS_WORDS.join("|"));

    let triggers = vec![
        Trigger::text(10, "start", "(^/start|^/help)", Arc::new(start::Start))?,
        Trigger::text(20, "tickets", "^/tickets$", Arc::new(tickets::ListTickets))?,
        Trigger::text(21, "addticket", "^/addticket", Arc::new(tickets::AddTicket))?,
        Trigger::text(22, "removeticket", "^/removeticket", Arc::new(tickets::RemoveTicket))?,
        Trigger::text(30, "warn", "^/warn$", Arc::new(moderation::AdjustWarns { delta: 1 }))?,
        Trigger::text(31, "unwarn", "^/unwarn$", Arc::new(moderation::AdjustWarns { delta: -1 }))?,
        Trigger::text(32, "scan", "^/scan$", Arc::new(moderation::Scan))?,
        Trigger::text(33, "give", "^/give", Arc::new(moderation::GiveCoins))?,
        Trigger::text(34, "language_watch", "^/language_watch", Arc::new(moderation::LanguageWatch))?,
        Trigger::text(40, "karma", "(^карма$|^karma$)", Arc::new(karma::KarmaCard))?,
        Trigger::text(41, "top", "(^топ$|^top$)", Arc::new(top::Top))?,
        Trigger::text(50, "thanks", &thanks_pattern, Arc::new(karma::AdjustKarma { delta: 1 }))?,
        Trigger::text(51, "minus", "^-$", Arc::new(karma::AdjustKarma { delta: -1 }))?,
        Trigger::text(60, "ask", "^[Кк]іт ", Arc::new(ask::Ask))?,
        Trigger::text(61, "cat", "(^/cat$|^cat$|^кіт$|^кицька$)", Arc::new(cat::Cat))?,
        Trigger::text(70, "ticker", "tesl|тесл", Arc::new(reactions::Tesla))?,
        Trigger::text(71, "dotru", r"[\w\-]+\.ru", Arc::new(reactions::DotRu))?,
        Trigger::text(72, "samsung", "samsung|самсунг|сасунг", Arc::new(reactions::Samsung))?,
        Trigger::text(73, "cockman", "шарий|шарій", Arc::new(reactions::Cockman))?,
        Trigger::text(74, "language", "ё|ъ|ы|э", Arc::new(reactions::LanguagePatrol))?,
        Trigger::kind(90, "new_member", EventKind::NewChatMembers, Arc::new(onboarding::NewMember)),
        Trigger::callback_prefix(91, "confirm", "new_user", Arc::new(onboarding::Confirm)),
        Trigger::callback_prefix(92, "cat_name", "print", Arc::new(cat::CatName)),
        Trigger::kind(99, "advices", EventKind::Message, Arc::new(advices::Advices { bot_user_id })),
    ];

    Ok(TriggerRegistry::new(triggers))
}

/// Admin gate shared by the moderation and ticket commands.
///
/// Returns false after sending the denial reply, which cleans itself and
/// the command away after the usual delay.
async fn require_admin(ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<bool> {
    let Some(from) = &event.from else {
        return Ok(false);
    };

    if ctx.roles.is_admin(event.chat_id, from.id).await? {
        return Ok(true);
    }

    ctx.send_ephemeral(
        event.chat_id,
        texts::ONLY_ADMINS_ARE_ALLOWED,
        SendOptions::reply_to(event.message_id),
        EPHEMERAL_DELAY,
        &[event.message_id],
    )
    .await?;

    Ok(false)
}

/// Strip a leading `/command` (with optional `@botname` suffix) and return
/// the trimmed argument tail.
fn command_tail<'a>(text: &'a str, command: &str) -> &'a str {
    let rest = text.strip_prefix(command).unwrap_or(text);
    let rest = match rest.strip_prefix('@') {
        Some(after_at) => after_at
            .split_once(char::is_whitespace)
            .map(|(_, tail)| tail)
            .unwrap_or(""),
        None => rest,
    };
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tail() {
        assert_eq!(command_tail("/addticket fix bug", "/addticket"), "fix bug");
        assert_eq!(command_tail("/addticket", "/addticket"), "");
        assert_eq!(command_tail("/addticket@rudecat_bot fix", "/addticket"), "fix");
        assert_eq!(command_tail("/give  25 ", "/give"), "25");
    }

    #[test]
    fn test_registry_builds() {
        let registry = build_registry(UserId(1)).unwrap();
        assert_eq!(registry.len(), 24);
    }
}
