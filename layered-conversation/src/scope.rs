//! Incremental processing boundary.
//!
//! A conversation is analysed repeatedly as messages arrive. The hosting
//! pipeline records the last message covered by a previous pass in
//! `meta.last_message_analyzed`; collectors then only look at newer messages
//! while tokens of older messages are carried over unchanged.

use crate::{Analysis, Conversation, Message, Origin, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementalScope {
    last_analyzed: i32,
    message_count: usize,
}

impl IncrementalScope {
    pub fn new(last_analyzed: i32, message_count: usize) -> Self {
        Self {
            last_analyzed,
            message_count,
        }
    }

    pub fn of(conversation: &Conversation) -> Self {
        Self::new(
            conversation.meta.last_message_analyzed,
            conversation.messages.len(),
        )
    }

    /// A scope covering every message.
    pub fn everything(conversation: &Conversation) -> Self {
        Self::new(-1, conversation.messages.len())
    }

    pub fn last_analyzed(&self) -> i32 {
        self.last_analyzed
    }

    /// Returns true if the message at `idx` has not been analysed yet.
    pub fn is_new_message(&self, idx: usize) -> bool {
        i64::try_from(idx).map_or(false, |idx| idx > i64::from(self.last_analyzed))
            && idx < self.message_count
    }

    /// Returns true if collectors should process the message at `idx`.
    ///
    /// Only new messages written by the user are collected.
    pub fn collects(&self, idx: usize, message: &Message) -> bool {
        self.is_new_message(idx) && message.origin == Origin::User
    }

    /// Returns true if a token of a previous pass is kept as-is.
    ///
    /// Tokens of already analysed messages are kept; agent tokens are kept
    /// because no collector re-creates them. Tokens of newer messages are
    /// dropped and re-emitted by the current pass.
    pub fn carries_over(&self, token: &Token) -> bool {
        token.is_agent_token() || token.message_idx <= self.last_analyzed
    }

    /// Returns true if a builder updating an existing template may bind `token`.
    ///
    /// Agent tokens are always reconsidered.
    pub fn reconsiders(&self, token: &Token) -> bool {
        token.is_agent_token() || token.message_idx > self.last_analyzed
    }

    /// Start a pass from the result of a previous one.
    ///
    /// Slots bound to dropped tokens are removed along with them, since the
    /// tokens are bound again when re-emitted. Slots that were unbound
    /// before stay.
    pub fn carry_over(&self, previous: Analysis) -> Analysis {
        let mut analysis = previous;
        let Analysis {
            tokens, templates, ..
        } = &mut analysis;
        for template in templates.iter_mut() {
            template.slots.retain(|slot| {
                slot.token_index
                    .and_then(|idx| tokens.get(idx))
                    .map_or(true, |token| self.carries_over(token))
            });
        }
        analysis.retain_tokens(|t| self.carries_over(t));
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Slot, Template, TokenType};

    fn conversation() -> Conversation {
        let mut conversation = Conversation::new(vec![
            Message::user("a"),
            Message::agent("b"),
            Message::user("c"),
        ]);
        conversation.meta.last_message_analyzed = 1;
        conversation
    }

    #[test]
    fn test_collects_only_new_user_messages() {
        let conversation = conversation();
        let scope = IncrementalScope::of(&conversation);
        let collected: Vec<usize> = conversation
            .messages
            .iter()
            .enumerate()
            .filter(|(idx, m)| scope.collects(*idx, m))
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(collected, vec![2]);

        let everything = IncrementalScope::everything(&conversation);
        assert!(everything.collects(0, &conversation.messages[0]));
        assert!(!everything.collects(1, &conversation.messages[1]));
        assert!(!everything.is_new_message(3));
    }

    #[test]
    fn test_token_scope() {
        let scope = IncrementalScope::of(&conversation());
        let old = Token::new(0, 0, 1, TokenType::Place);
        let new = Token::new(2, 0, 1, TokenType::Place);
        let agent = Token::new(-1, 0, 1, TokenType::Place);

        assert!(scope.carries_over(&old));
        assert!(!scope.carries_over(&new));
        assert!(scope.carries_over(&agent));

        assert!(!scope.reconsiders(&old));
        assert!(scope.reconsiders(&new));
        assert!(scope.reconsiders(&agent));
    }

    #[test]
    fn test_carry_over_drops_slots_of_dropped_tokens() {
        let scope = IncrementalScope::of(&conversation());
        let mut analysis = Analysis::default();
        analysis.tokens = vec![
            Token::new(0, 0, 1, TokenType::Place).with_value("a"),
            Token::new(2, 0, 1, TokenType::Place).with_value("c"),
        ];
        let mut template = Template::new("ir_latch");
        template.slots.push(Slot::new("location", Some(TokenType::Place)).bound_to(0));
        template.slots.push(Slot::new("location", Some(TokenType::Place)).bound_to(1));
        template.slots.push(Slot::required("to", Some(TokenType::Place)));
        analysis.templates.push(template);

        let analysis = scope.carry_over(analysis);
        assert_eq!(analysis.tokens.len(), 1);
        let slots: Vec<(&str, Option<usize>)> = analysis.templates[0]
            .slots
            .iter()
            .map(|s| (s.role.as_str(), s.token_index))
            .collect();
        assert_eq!(slots, vec![("location", Some(0)), ("to", None)]);
    }
}
