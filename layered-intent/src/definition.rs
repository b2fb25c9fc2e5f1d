//! Intent schemas: named roles, slot constraints and a validity predicate.

use std::collections::{BTreeMap, BTreeSet};

use layered_conversation::{Slot, Template, Token, TokenState, TokenType};

/// Role resolved by every definition.
pub const TOPIC: &str = "topic";

/// An intent schema, one per template type.
///
/// Implementors provide the role table and the validity rule; the remaining
/// methods are shared helpers built on those two.
pub trait TemplateDefinition: Send + Sync {
    /// Type string stored in [`Template::template_type`].
    fn template_type(&self) -> &'static str;

    /// Slot for a definition specific role, `None` if the role is unknown.
    fn create_slot_for_role(&self, role: &str) -> Option<Slot>;

    /// Decide whether the slots describe a complete intent.
    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool;

    /// Slot for `role` with `required` and `token_type` set by this definition.
    fn create_slot(&self, role: &str) -> Option<Slot> {
        if role == TOPIC {
            Some(Slot::required(TOPIC, Some(TokenType::Topic)))
        } else {
            self.create_slot_for_role(role)
        }
    }

    fn is_valid(&self, template: &Template, tokens: &[Token]) -> bool {
        self.validate(&template.slots, tokens)
    }

    /// Returns true if the slot is bound to an existing, non rejected token
    /// of the slot's type.
    fn validate_token(&self, tokens: &[Token], slot: &Slot) -> bool {
        match slot.token_index.and_then(|idx| tokens.get(idx)) {
            Some(token) => {
                slot.token_type.map_or(true, |t| t == token.token_type)
                    && token.state != TokenState::Rejected
            }
            None => false,
        }
    }

    /// Returns true if the slot's type matches the type this definition
    /// assigns to its role. Slots of unknown roles pass.
    fn validate_slot(&self, slot: &Slot) -> bool {
        match self.create_slot(&slot.role) {
            Some(expected) => expected.token_type == slot.token_type,
            None => true,
        }
    }

    /// Roles having at least one valid slot bound to a valid token.
    fn present_and_valid_roles(&self, slots: &[Slot], tokens: &[Token]) -> BTreeSet<String> {
        slots
            .iter()
            .filter(|slot| self.validate_slot(slot) && self.validate_token(tokens, slot))
            .map(|slot| slot.role.clone())
            .collect()
    }

    /// Any slot of `template` with this role and the role's type.
    fn slot<'t>(&self, role: &str, template: &'t Template) -> Option<&'t Slot> {
        self.slots(role, template).into_iter().next()
    }

    /// All slots of `template` with this role and the role's type.
    fn slots<'t>(&self, role: &str, template: &'t Template) -> Vec<&'t Slot> {
        let expected = self.create_slot(role);
        template
            .slots
            .iter()
            .filter(|s| s.role == role)
            .filter(|s| expected.as_ref().map_or(true, |e| e.token_type == s.token_type))
            .collect()
    }
}

/// Shared fallback for [`TemplateDefinition::create_slot_for_role`].
pub(crate) fn unknown_role(template_type: &str, role: &str) -> Option<Slot> {
    tracing::warn!("Unknown slot role '{}' requested for {}", role, template_type);
    None
}

/// Definitions keyed by their template type.
#[derive(Default)]
pub struct TemplateRegistry {
    definitions: BTreeMap<&'static str, Box<dyn TemplateDefinition>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every definition of this crate.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(crate::TravelDefinition);
        registry.register(crate::TrainInfoDefinition);
        registry.register(crate::PerimeterDefinition);
        registry.register(crate::ProductDefinition);
        registry.register(crate::OtherDefinition);
        registry.register(crate::IrLatchDefinition);
        registry.register(crate::DbSearchDefinition);
        registry.register(crate::RelatedConversationDefinition);
        registry
    }

    /// Register a definition, replacing one of the same type.
    pub fn register(&mut self, definition: impl TemplateDefinition + 'static) -> &mut Self {
        let template_type = definition.template_type();
        if self.definitions.insert(template_type, Box::new(definition)).is_some() {
            tracing::debug!(template_type, "replaced template definition");
        }
        self
    }

    pub fn get(&self, template_type: &str) -> Option<&dyn TemplateDefinition> {
        self.definitions.get(template_type).map(|d| d.as_ref())
    }

    pub fn types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.keys().copied()
    }

    /// Returns true if the template is not rejected and its definition
    /// validates it. Templates of unregistered types are invalid.
    pub fn is_valid(&self, template: &Template, tokens: &[Token]) -> bool {
        if template.state == layered_conversation::TemplateState::Rejected {
            return false;
        }
        match self.get(&template.template_type) {
            Some(definition) => definition.is_valid(template, tokens),
            None => {
                tracing::warn!(template_type = %template.template_type, "no definition registered");
                false
            }
        }
    }
}
