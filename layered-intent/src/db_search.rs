//! Full text search over a document database.

use std::collections::BTreeSet;

use layered_conversation::{Conversation, Slot, Template, Token, TokenType};

use crate::builder::{bind_deduplicated, Candidates, TemplateBuilder};
use crate::definition::{unknown_role, TemplateDefinition};

#[derive(Debug, Clone, Copy, Default)]
pub struct DbSearchDefinition;

impl DbSearchDefinition {
    pub const TYPE: &'static str = "dbsearch";
    pub const TERM: &'static str = "Term";
    pub const ENTITY: &'static str = "Entity";
    pub const KEYWORD: &'static str = "Keyword";
    pub const TOPIC: &'static str = "Topic";
}

impl TemplateDefinition for DbSearchDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        let slot = match role {
            Self::TERM => Slot::new(Self::TERM, None),
            Self::KEYWORD => Slot::new(Self::KEYWORD, Some(TokenType::Keyword)),
            Self::ENTITY => Slot::new(Self::ENTITY, None),
            Self::TOPIC => Slot::new(Self::TOPIC, Some(TokenType::Topic)),
            _ => return unknown_role(Self::TYPE, role),
        };
        Some(slot)
    }

    /// Valid once a search term is bound.
    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool {
        slots
            .iter()
            .any(|s| s.role == Self::TERM && self.validate_token(tokens, s))
    }
}

fn db_search_role(token_type: TokenType) -> Option<&'static str> {
    match token_type {
        TokenType::Keyword => Some(DbSearchDefinition::TERM),
        TokenType::Topic => Some(DbSearchDefinition::TOPIC),
        TokenType::Entity
        | TokenType::Place
        | TokenType::Person
        | TokenType::Organization
        | TokenType::Product => Some(DbSearchDefinition::ENTITY),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DbSearchTemplateBuilder {
    definition: DbSearchDefinition,
}

impl TemplateBuilder for DbSearchTemplateBuilder {
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
        Some(bind_deduplicated(
            &self.definition,
            template,
            tokens,
            candidates,
            db_search_role,
        ))
    }
}
