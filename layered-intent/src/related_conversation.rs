//! Finding earlier conversations about the same subject.

use std::collections::BTreeSet;

use layered_conversation::{Conversation, Slot, Template, Token, TokenType};

use crate::builder::{Candidates, TemplateBuilder};
use crate::definition::{unknown_role, TemplateDefinition};

#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedConversationDefinition;

impl RelatedConversationDefinition {
    pub const TYPE: &'static str = "related.conversation";
    pub const KEYWORD: &'static str = "Keyword";
    pub const TERM: &'static str = "Term";
}

impl TemplateDefinition for RelatedConversationDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        match role {
            Self::KEYWORD => Some(Slot::new(Self::KEYWORD, Some(TokenType::Keyword))),
            Self::TERM => Some(Slot::new(Self::TERM, None)),
            _ => unknown_role(Self::TYPE, role),
        }
    }

    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool {
        slots.iter().any(|s| self.validate_token(tokens, s))
    }
}

/// Binds keywords, and every other token except topics as a term.
///
/// No deduplication: repeated mentions weigh into the similarity search.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedConversationTemplateBuilder {
    definition: RelatedConversationDefinition,
}

impl TemplateBuilder for RelatedConversationTemplateBuilder {
    fn definition(&self) -> &dyn TemplateDefinition {
        &self.definition
    }

    fn update(
        &self,
        template: &mut Template,
        _conversation: &Conversation,
        tokens: &[Token],
        candidates: Candidates,
    ) -> Option<BTreeSet<usize>> {
        if !template.is_updatable() {
            return None;
        }
        let used: BTreeSet<usize> = template.bound_token_indices().collect();
        let mut added = BTreeSet::new();
        for (idx, token) in tokens.iter().enumerate() {
            if used.contains(&idx) || !candidates.admits(token) {
                continue;
            }
            let role = match token.token_type {
                TokenType::Keyword => RelatedConversationDefinition::KEYWORD,
                TokenType::Topic => continue,
                _ => RelatedConversationDefinition::TERM,
            };
            if let Some(slot) = self.definition.create_slot(role) {
                template.slots.push(slot.bound_to(idx));
                added.insert(idx);
            }
        }
        Some(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_conversation::{Analysis, IncrementalScope, Message};

    #[test]
    fn test_binds_all_but_topics() {
        let conversation = Conversation::new(vec![Message::user("Fahrrad im ICE nach Köln")]);
        let mut analysis = Analysis::default();
        analysis.tokens = vec![
            Token::new(0, 0, 7, TokenType::Keyword).with_value("Fahrrad"),
            Token::new(0, 11, 14, TokenType::Train).with_value("ICE"),
            Token::new(0, 20, 24, TokenType::Topic).with_value("Reise"),
            Token::new(0, 20, 25, TokenType::Place).with_value("Köln"),
        ];

        let builder = RelatedConversationTemplateBuilder::default();
        builder.update_templates(&conversation, &mut analysis, &IncrementalScope::of(&conversation));

        let template = &analysis.templates[0];
        let bindings: Vec<(&str, Option<usize>)> = template
            .slots
            .iter()
            .map(|s| (s.role.as_str(), s.token_index))
            .collect();
        assert_eq!(
            bindings,
            vec![("Keyword", Some(0)), ("Term", Some(1)), ("Term", Some(3))]
        );
        assert!(builder.definition().is_valid(template, &analysis.tokens));
    }

    #[test]
    fn test_empty_template_is_kept_but_invalid() {
        let conversation = Conversation::new(vec![Message::user("Hallo")]);
        let mut analysis = Analysis::default();
        let builder = RelatedConversationTemplateBuilder::default();
        builder.update_templates(&conversation, &mut analysis, &IncrementalScope::of(&conversation));

        assert_eq!(analysis.templates.len(), 1);
        assert!(!builder.definition().is_valid(&analysis.templates[0], &analysis.tokens));
    }
}
