//! Leaderboard rendering.

use async_trait::async_trait;

use crate::dispatch::cleanup::EPHEMERAL_DELAY;
use crate::dispatch::event::InboundEvent;
use crate::dispatch::{EventHandler, HandlerContext};
use crate::leaderboard::{RankedEntry, RankingReport};
use crate::telegram::SendOptions;
use crate::texts;

/// Renders the chat leaderboard, one render at a time.
pub struct Top;

fn push_rows(out: &mut String, header: &str, rows: &[RankedEntry], line: impl Fn(&RankedEntry) -> String) {
    if rows.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(header);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
}

/// Build the outgoing leaderboard text.
pub fn render_report(report: &RankingReport) -> String {
    let mut out = format!("<b>{} {}</b>\n", texts::ACCOUNTS_IN_CHAT, report.accounts);

    let karma_line = |row: &RankedEntry| {
        format!(
            "<code>{}</code> - {} <code>{} ({:.0}%)</code>",
            row.name,
            texts::KARMA_LABEL,
            row.karma,
            row.karma_percent
        )
    };

    push_rows(&mut out, texts::TOP_CHAT_KARMA, &report.top_karma, karma_line);
    push_rows(&mut out, texts::TOP_CHAT_NEGATIVE_KARMA, &report.negative_karma, karma_line);
    push_rows(&mut out, texts::TOP_CHAT_ACTIVE, &report.most_active, |row| {
        format!(
            "<code>{}</code> - {} <code>{}</code>",
            row.name,
            texts::MESSAGES_LABEL,
            row.messages
        )
    });
    push_rows(&mut out, texts::TOP_CHAT_EMOTIONALS, &report.most_profane, |row| {
        format!(
            "<code>{}</code> - {} <code>{} ({:.0}%)</code>",
            row.name,
            texts::BAD_WORDS_LABEL,
            row.bad_words,
            row.bad_words_percent
        )
    });
    push_rows(&mut out, texts::TOP_CHAT_WARNS, &report.most_warned, |row| {
        format!(
            "<code>{}</code> - {} <code>{}</code>",
            row.name,
            texts::WARNS_LABEL,
            row.warns
        )
    });

    out
}

#[async_trait]
impl EventHandler for Top {
    async fn handle(&self, ctx: &HandlerContext, event: &InboundEvent) -> anyhow::Result<()> {
        let Some((report, permit)) = ctx.leaderboard.compute_ranking(event.chat_id.0).await? else {
            // A render is already on screen somewhere; just drop the
            // triggering message.
            ctx.delete_now(event.chat_id, event.message_id).await;
            return Ok(());
        };

        let text = render_report(&report);
        ctx.send_ephemeral(
            event.chat_id,
            &text,
            SendOptions::reply_to(event.message_id),
            EPHEMERAL_DELAY,
            &[event.message_id],
        )
        .await?;

        // The render stays exclusive for as long as it is on screen, so
        // repeated "топ" spam across the process collapses into this one.
        // Anchor the deadline now so the window matches the on-screen time.
        let deadline = tokio::time::Instant::now() + EPHEMERAL_DELAY;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            drop(permit);
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::build_report;
    use crate::database::UserChatStats;

    #[test]
    fn test_render_skips_empty_sections() {
        let mut stats = UserChatStats::new(1, -100);
        stats.karma = 2;
        stats.total_messages = 4;
        let report = build_report(&[("@one".to_string(), stats)]);

        let text = render_report(&report);
        assert!(text.contains(texts::TOP_CHAT_KARMA));
        assert!(text.contains("<code>2 (50%)</code>"));
        assert!(!text.contains(texts::TOP_CHAT_NEGATIVE_KARMA));
        assert!(!text.contains(texts::TOP_CHAT_WARNS));
    }
}
