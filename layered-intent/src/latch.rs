//! Generic information retrieval intent after the LATCH scheme
//! (location, alphabet, time, category, hierarchy).

use std::collections::BTreeSet;

use layered_conversation::{Conversation, Slot, Template, Token, TokenType};

use crate::builder::{bind_deduplicated, Candidates, TemplateBuilder};
use crate::definition::{unknown_role, TemplateDefinition};

#[derive(Debug, Clone, Copy, Default)]
pub struct IrLatchDefinition;

impl IrLatchDefinition {
    pub const TYPE: &'static str = "ir_latch";
    pub const LOCATION: &'static str = "location";
    pub const ALPHABET: &'static str = "alphabet";
    pub const TIME: &'static str = "time";
    pub const CATEGORY: &'static str = "category";
    /// Ranges such as prices or ratings.
    pub const HIERARCHY: &'static str = "hierarchy";
}

impl TemplateDefinition for IrLatchDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        let slot = match role {
            Self::LOCATION => Slot::new(Self::LOCATION, Some(TokenType::Place)),
            Self::ALPHABET => Slot::new(Self::ALPHABET, None),
            Self::TIME => Slot::new(Self::TIME, Some(TokenType::Date)),
            Self::CATEGORY => Slot::new(Self::CATEGORY, Some(TokenType::Topic)),
            Self::HIERARCHY => Slot::new(Self::HIERARCHY, None),
            _ => return unknown_role(Self::TYPE, role),
        };
        Some(slot)
    }

    /// Always valid, so queries are built even without any evidence.
    fn validate(&self, _slots: &[Slot], _tokens: &[Token]) -> bool {
        true
    }
}

fn latch_role(token_type: TokenType) -> Option<&'static str> {
    match token_type {
        TokenType::Place => Some(IrLatchDefinition::LOCATION),
        TokenType::Date => Some(IrLatchDefinition::TIME),
        TokenType::Topic => Some(IrLatchDefinition::CATEGORY),
        TokenType::Entity
        | TokenType::Other
        | TokenType::Person
        | TokenType::Product
        | TokenType::Organization
        | TokenType::Keyword => Some(IrLatchDefinition::ALPHABET),
        TokenType::Attribute | TokenType::Train | TokenType::Unknown => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LatchTemplateBuilder {
    definition: IrLatchDefinition,
}

impl TemplateBuilder for LatchTemplateBuilder {
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
            latch_role,
        ))
    }
}
