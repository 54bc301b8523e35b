//! Karma card and reply-based karma adjustment.

use async_trait::async_trait;

use crate::database::{StatDelta, UserChatStats};
use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::leaderboard::percent;
use crate::telegram::SendOptions;
use crate::texts;

/// Fill the stats card template for one user.
///
/// The size and orientation lines are deterministic jokes derived from the
/// user id, so a user always gets the same ones.
pub fn stats_card(name: &str, stats: &UserChatStats) -> String {
    let size = (stats.user_id + 6) % 15 + 7;

    let orientation_types = ["Латентний", "Гендерфлюід", ""];
    let orientation_names = ["Android", "Apple"];
    let orientation_type = orientation_types[(stats.user_id % 3) as usize];
    let orientation_name = orientation_names[(stats.user_id % 5 % 2) as usize];
    let orientation = if orientation_type.is_empty() {
        orientation_name.to_string()
    } else {
        format!("{orientation_type} {orientation_name}")
    };

    texts::STATS_CARD
        .replace("{name}", name)
        .replace("{karma}", &stats.karma.to_string())
        .replace(
            "{karma_percent}",
            &format!("{:.0}", percent(stats.karma, stats.total_messages)),
        )
        .replace("{warns}", &stats.warns.to_string())
        .replace("{messages}", &stats.total_messages.to_string())
        .replace("{bad_words}", &stats.total_bad_words.to_string())
        .replace(
            "{bad_words_percent}",
            &format!(
                "{:.0}",
                percent(stats.total_bad_words as i64, stats.total_messages)
            ),
        )
        .replace("{rude_coins}", &stats.rude_coins.to_string())
        .replace("{size}", &size.to_string())
        .replace("{orientation}", &orientation)
}

/// Shows the sender their own stats card.
pub struct KarmaCard;

#[async_trait]
impl EventHandler for KarmaCard {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let Some(from) = &event.from else {
            return Ok(());
        };

        let stats = ctx
            .storage
            .stats
            .get_or_create(from.id.0, event.chat_id.0)
            .await?;
        let card = stats_card(&from.display_name(), &stats);

        ctx.send_ephemeral(
            event.chat_id,
            &card,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[event.message_id],
        )
        .await?;

        Ok(())
    }
}

/// Applies ±1 karma to the author of the replied-to message.
pub struct AdjustKarma {
    pub delta: i64,
}

#[async_trait]
impl EventHandler for AdjustKarma {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        // Forwards carry someone else's words; they never move karma.
        if event.is_forward {
            return Ok(());
        }

        let Some(from) = &event.from else {
            return Ok(());
        };
        let Some(reply) = &event.reply_to else {
            return Ok(());
        };
        let Some(target) = &reply.from else {
            return Ok(());
        };

        // Only replies to other, human users count.
        if target.id == from.id || target.is_bot {
            return Ok(());
        }

        let stats = ctx
            .storage
            .stats
            .apply(target.id.0, event.chat_id.0, StatDelta::karma(self.delta))
            .await?;

        let mention = match ctx.storage.users.get(target.id.0).await? {
            Some(user) => user.user_mention,
            None => target.mention(),
        };

        let template = if self.delta > 0 {
            texts::KARMA_INCREASE
        } else {
            texts::KARMA_DECREASE
        };
        let text = template
            .replace("{mention}", &mention)
            .replace("{karma}", &stats.karma.to_string());

        ctx.send_ephemeral(
            event.chat_id,
            &text,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[],
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_card_fills_every_hole() {
        let mut stats = UserChatStats::new(42, -100);
        stats.karma = 3;
        stats.total_messages = 10;
        stats.total_bad_words = 2;
        stats.rude_coins = 5;

        let card = stats_card("@someone", &stats);
        assert!(card.contains("@someone"));
        assert!(card.contains("<code>3 (30%)</code>"));
        assert!(card.contains("<code>2 (20%)</code>"));
        assert!(!card.contains('{'), "unfilled placeholder in: {card}");
    }

    #[test]
    fn test_stats_card_is_deterministic_per_user() {
        let stats = UserChatStats::new(42, -100);
        assert_eq!(stats_card("a", &stats), stats_card("a", &stats));
    }
}
