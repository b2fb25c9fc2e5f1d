//! Filling templates from the tokens of an [`Analysis`].

use std::collections::{BTreeSet, HashMap};

use layered_conversation::{
    Analysis, Conversation, IncrementalScope, Template, Token, TokenType,
};

use crate::TemplateDefinition;

/// Tokens a builder may bind during one update.
#[derive(Debug, Clone, Copy)]
pub enum Candidates {
    /// Every token; used for a freshly created template.
    All,
    /// Only tokens the scope reconsiders; used when updating an existing template.
    Reconsidered(IncrementalScope),
}

impl Candidates {
    pub fn admits(&self, token: &Token) -> bool {
        match self {
            Candidates::All => true,
            Candidates::Reconsidered(scope) => scope.reconsiders(token),
        }
    }
}

/// Creates and updates the templates of one definition.
pub trait TemplateBuilder {
    fn definition(&self) -> &dyn TemplateDefinition;

    /// Prepare a freshly created template before its first update.
    fn initialize_template(&self, _template: &mut Template) {}

    /// Bind candidate tokens to slots of `template`.
    ///
    /// Returns the indices of the newly bound tokens, or `None` if the
    /// template must not be updated.
    fn update(
        &self,
        template: &mut Template,
        conversation: &Conversation,
        tokens: &[Token],
        candidates: Candidates,
    ) -> Option<BTreeSet<usize>>;

    /// Update the templates of this builder's type in `analysis`.
    ///
    /// Existing updatable templates are offered the new tokens first; the
    /// first one accepting the update absorbs them. A new template is only
    /// created when none does, and only kept if its own update is accepted.
    fn update_templates(
        &self,
        conversation: &Conversation,
        analysis: &mut Analysis,
        scope: &IncrementalScope,
    ) {
        let template_type = self.definition().template_type();
        let Analysis {
            tokens, templates, ..
        } = analysis;

        for template in templates
            .iter_mut()
            .filter(|t| t.template_type == template_type && t.is_updatable())
        {
            if let Some(added) =
                self.update(template, conversation, tokens, Candidates::Reconsidered(*scope))
            {
                tracing::trace!(template_type, added = added.len(), "updated existing template");
                debug_template(template, tokens);
                return;
            }
        }

        let mut template = Template::new(template_type);
        self.initialize_template(&mut template);
        if let Some(added) = self.update(&mut template, conversation, tokens, Candidates::All) {
            tracing::trace!(template_type, added = added.len(), "created template");
            debug_template(&template, tokens);
            templates.push(template);
        }
    }
}

/// Log the slots of a built template.
pub fn debug_template(template: &Template, tokens: &[Token]) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    tracing::debug!("Built template for {}", template.template_type);
    for slot in &template.slots {
        match slot.token_index.and_then(|idx| tokens.get(idx)) {
            Some(token) => tracing::debug!(" - {}: {:?}", slot.role, token),
            None => tracing::debug!(
                " - {}: unbound <{:?}> {}",
                slot.role,
                slot.token_type,
                if slot.required { "required" } else { "optional" }
            ),
        }
    }
}

/// Outcome of offering a token to a [`ValueDedup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    /// First token with this role and value.
    New,
    /// More confident than the kept token at this index, which it replaces.
    Replaces(usize),
    Rejected,
}

/// Keeps one slot per `(role, token value)`, preferring the more confident token.
#[derive(Debug, Default)]
pub(crate) struct ValueDedup {
    kept: HashMap<(String, String), usize>,
}

impl ValueDedup {
    /// Seeded with the bound slots of `template`.
    pub(crate) fn of(template: &Template, tokens: &[Token]) -> Self {
        let mut dedup = Self::default();
        for slot in &template.slots {
            if let Some(idx) = slot.token_index.filter(|idx| *idx < tokens.len()) {
                dedup.admit(&slot.role, idx, tokens);
            }
        }
        dedup
    }

    pub(crate) fn admit(&mut self, role: &str, token_index: usize, tokens: &[Token]) -> Admission {
        let Some(value) = tokens[token_index].value_text() else {
            return Admission::Rejected;
        };
        let key = (role.to_string(), value);
        match self.kept.get(&key).copied() {
            None => {
                self.kept.insert(key, token_index);
                Admission::New
            }
            Some(kept) if tokens[kept].confidence() < tokens[token_index].confidence() => {
                self.kept.insert(key, token_index);
                Admission::Replaces(kept)
            }
            Some(_) => Admission::Rejected,
        }
    }
}

/// Bind every unused candidate token to the slot `role_of` assigns to its
/// type, deduplicating by `(role, value)`.
pub(crate) fn bind_deduplicated(
    definition: &dyn TemplateDefinition,
    template: &mut Template,
    tokens: &[Token],
    candidates: Candidates,
    role_of: impl Fn(TokenType) -> Option<&'static str>,
) -> BTreeSet<usize> {
    let mut dedup = ValueDedup::of(template, tokens);
    let used: BTreeSet<usize> = template.bound_token_indices().collect();
    let mut added = BTreeSet::new();

    for (idx, token) in tokens.iter().enumerate() {
        if used.contains(&idx) || !candidates.admits(token) {
            continue;
        }
        let Some(slot) = role_of(token.token_type).and_then(|role| definition.create_slot(role))
        else {
            continue;
        };
        match dedup.admit(&slot.role, idx, tokens) {
            Admission::New => {}
            Admission::Replaces(previous) => {
                template
                    .slots
                    .retain(|s| !(s.role == slot.role && s.token_index == Some(previous)));
                added.remove(&previous);
            }
            Admission::Rejected => continue,
        }
        template.slots.push(slot.bound_to(idx));
        added.insert(idx);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IrLatchDefinition, LatchTemplateBuilder};
    use layered_conversation::Message;

    fn keyword(idx: i32, value: &str, confidence: f32) -> Token {
        Token::new(idx, 0, value.len(), TokenType::Keyword)
            .with_value(value)
            .with_confidence(confidence)
    }

    #[test]
    fn test_dedup_prefers_confident_token() {
        let tokens = vec![
            keyword(0, "Fahrrad", 0.4),
            keyword(1, "Fahrrad", 0.3),
            keyword(2, "Fahrrad", 0.9),
        ];
        let mut dedup = ValueDedup::default();
        assert_eq!(dedup.admit("alphabet", 0, &tokens), Admission::New);
        assert_eq!(dedup.admit("alphabet", 1, &tokens), Admission::Rejected);
        assert_eq!(dedup.admit("alphabet", 2, &tokens), Admission::Replaces(0));
        assert_eq!(dedup.admit("category", 1, &tokens), Admission::New);

        let valueless = vec![Token::new(0, 0, 3, TokenType::Keyword)];
        assert_eq!(dedup.admit("alphabet", 0, &valueless), Admission::Rejected);
    }

    #[test]
    fn test_existing_template_absorbs_new_tokens() {
        let mut conversation = Conversation::new(vec![Message::user("a"), Message::user("b")]);
        let mut analysis = Analysis::default();
        analysis.tokens.push(keyword(0, "Fahrrad", 0.5));

        let scope = IncrementalScope::of(&conversation);
        LatchTemplateBuilder::default().update_templates(&conversation, &mut analysis, &scope);
        assert_eq!(analysis.templates.len(), 1);

        conversation.meta.last_message_analyzed = 0;
        analysis.tokens.push(keyword(1, "Helm", 0.5));
        let scope = IncrementalScope::of(&conversation);
        LatchTemplateBuilder::default().update_templates(&conversation, &mut analysis, &scope);

        assert_eq!(analysis.templates.len(), 1);
        let roles: Vec<Option<usize>> = IrLatchDefinition
            .slots(IrLatchDefinition::ALPHABET, &analysis.templates[0])
            .into_iter()
            .map(|s| s.token_index)
            .collect();
        assert_eq!(roles, vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_confirmed_template_is_left_alone() {
        let conversation = Conversation::new(vec![Message::user("a")]);
        let mut analysis = Analysis::default();
        analysis.tokens.push(keyword(0, "Fahrrad", 0.5));
        let mut confirmed = Template::new(IrLatchDefinition::TYPE);
        confirmed.state = layered_conversation::TemplateState::Confirmed;
        analysis.templates.push(confirmed);

        let scope = IncrementalScope::of(&conversation);
        LatchTemplateBuilder::default().update_templates(&conversation, &mut analysis, &scope);

        assert_eq!(analysis.templates.len(), 2);
        assert!(analysis.templates[0].slots.is_empty());
        assert_eq!(analysis.templates[1].slots.len(), 1);
    }
}
