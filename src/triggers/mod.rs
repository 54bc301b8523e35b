//! Ranked trigger registry.
//!
//! Every reaction the bot has is declared as a [`Trigger`]: a rank, a name
//! for logs, a match condition and the handler to run. The registry resolves
//! an incoming event to at most one trigger by walking the table in rank
//! order, so overlapping patterns never fire twice and the catch-all always
//! loses to specific matches.

use std::sync::Arc;

use regex::Regex;

use crate::dispatch::event::{EventKind, InboundEvent};
use crate::dispatch::EventHandler;

/// Predicate deciding whether a trigger applies to an event.
pub enum TriggerCondition {
    /// Message text matches the regex (substring semantics, the pattern
    /// anchors itself where needed).
    Text(Regex),
    /// Structural match on the event kind.
    Kind(EventKind),
    /// Callback query whose payload starts with `prefix` + `|`.
    CallbackPrefix(&'static str),
}

/// One registered reaction.
pub struct Trigger {
    /// Match priority, lower fires first. Ties resolve in registration order.
    pub rank: u32,
    /// Stable name used in logs.
    pub name: &'static str,
    pub condition: TriggerCondition,
    pub handler: Arc<dyn EventHandler>,
}

impl Trigger {
    /// Text trigger. Compiles the pattern up front so a bad pattern fails
    /// the registry build instead of silently never matching.
    pub fn text(
        rank: u32,
        name: &'static str,
        pattern: &str,
        handler: Arc<dyn EventHandler>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            rank,
            name,
            condition: TriggerCondition::Text(Regex::new(pattern)?),
            handler,
        })
    }

    pub fn kind(rank: u32, name: &'static str, kind: EventKind, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            rank,
            name,
            condition: TriggerCondition::Kind(kind),
            handler,
        }
    }

    pub fn callback_prefix(
        rank: u32,
        name: &'static str,
        prefix: &'static str,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            rank,
            name,
            condition: TriggerCondition::CallbackPrefix(prefix),
            handler,
        }
    }

    /// Whether this trigger applies to the event. A condition that cannot
    /// apply to the event kind is a non-match, never an error.
    fn matches(&self, event: &InboundEvent) -> bool {
        match &self.condition {
            TriggerCondition::Text(re) => {
                event.kind == EventKind::Message
                    && event.text.as_deref().is_some_and(|t| re.is_match(t))
            }
            TriggerCondition::Kind(kind) => event.kind == *kind,
            TriggerCondition::CallbackPrefix(prefix) => {
                event.kind == EventKind::CallbackQuery
                    && event
                        .callback_data()
                        .and_then(|d| d.strip_prefix(prefix))
                        .is_some_and(|rest| rest.starts_with('|'))
            }
        }
    }
}

/// Ordered trigger table.
pub struct TriggerRegistry {
    triggers: Vec<Trigger>,
}

impl TriggerRegistry {
    /// Build the registry. The table is sorted by rank once; the sort is
    /// stable so equal ranks keep their registration order.
    pub fn new(mut triggers: Vec<Trigger>) -> Self {
        triggers.sort_by_key(|t| t.rank);
        Self { triggers }
    }

    /// Resolve an event to the first matching trigger, if any.
    pub fn match_event(&self, event: &InboundEvent) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.matches(event))
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use teloxide::types::{ChatId, MessageId};

    use super::*;
    use crate::dispatch::event::EventUser;
    use crate::dispatch::HandlerContext;

    struct Noop;

    #[async_trait]
    impl EventHandler for Noop {
        async fn handle(&self, _ctx: &HandlerContext, _event: &InboundEvent) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn noop() -> Arc<dyn EventHandler> {
        Arc::new(Noop)
    }

    fn msg(text: &str) -> InboundEvent {
        InboundEvent::message(ChatId(-1), MessageId(1), EventUser::new(7, "user"), text)
    }

    fn registry() -> TriggerRegistry {
        TriggerRegistry::new(vec![
            Trigger::kind(99, "catch_all", EventKind::Message, noop()),
            Trigger::text(40, "karma", "(^карма$|^karma$)", noop()).unwrap(),
            Trigger::text(41, "top", "(^топ$|^top$)", noop()).unwrap(),
            Trigger::callback_prefix(91, "confirm", "new_user", noop()),
        ])
    }

    #[test]
    fn test_specific_trigger_beats_catch_all() {
        let reg = registry();
        assert_eq!(reg.match_event(&msg("карма")).unwrap().name, "karma");
        assert_eq!(reg.match_event(&msg("top")).unwrap().name, "top");
    }

    #[test]
    fn test_catch_all_takes_the_rest() {
        let reg = registry();
        assert_eq!(reg.match_event(&msg("просто текст")).unwrap().name, "catch_all");
        // Anchored pattern does not fire on a substring
        assert_eq!(reg.match_event(&msg("моя карма погана")).unwrap().name, "catch_all");
    }

    #[test]
    fn test_equal_rank_keeps_registration_order() {
        let reg = TriggerRegistry::new(vec![
            Trigger::text(10, "first", "a", noop()).unwrap(),
            Trigger::text(10, "second", "a", noop()).unwrap(),
        ]);
        assert_eq!(reg.match_event(&msg("banana")).unwrap().name, "first");
    }

    #[test]
    fn test_text_condition_ignores_other_kinds() {
        let reg = registry();
        let join = InboundEvent::member_join(ChatId(-1), MessageId(2), vec![EventUser::new(8, "n")]);
        assert!(reg.match_event(&join).is_none());
    }

    #[test]
    fn test_callback_prefix_requires_separator() {
        let reg = registry();
        let cb = |data: &str| {
            InboundEvent::callback(
                ChatId(-1),
                MessageId(3),
                EventUser::new(7, "user"),
                "q1",
                Some(data.to_string()),
            )
        };
        assert_eq!(reg.match_event(&cb("new_user|42")).unwrap().name, "confirm");
        assert!(reg.match_event(&cb("new_userx|42")).is_none());
        assert!(reg.match_event(&cb("new_user")).is_none());
    }

    #[test]
    fn test_bad_pattern_fails_build() {
        assert!(Trigger::text(1, "broken", "(unclosed", noop()).is_err());
    }
}
