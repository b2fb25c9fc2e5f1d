//! The result of analysing a conversation.

use serde::{Deserialize, Serialize};

use crate::{Template, Token};

/// Which messages went into the analysed text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContext {
    /// First message index included.
    pub start: usize,
    /// One past the last message index included.
    pub end: usize,
    /// Messages skipped because of their `skipAnalysis` flag.
    pub skipped: usize,
}

/// Tokens and templates extracted from one conversation.
///
/// Slots reference tokens by index, so every operation that reorders or
/// drops tokens remaps the slots of all templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub conversation_id: Option<String>,
    pub client_id: Option<String>,
    pub tokens: Vec<Token>,
    pub templates: Vec<Template>,
    #[serde(default)]
    pub context: Option<AnalysisContext>,
}

impl Analysis {
    pub fn new(conversation_id: Option<String>, client_id: Option<String>) -> Self {
        Self {
            conversation_id,
            client_id,
            ..Self::default()
        }
    }

    pub fn add_tokens(&mut self, tokens: impl IntoIterator<Item = Token>) {
        self.tokens.extend(tokens);
    }

    /// Stable sort of the tokens by message index, start and end.
    pub fn sort_tokens(&mut self) {
        let mut order: Vec<usize> = (0..self.tokens.len()).collect();
        order.sort_by(|a, b| self.tokens[*a].position_cmp(&self.tokens[*b]));
        self.reorder(order);
    }

    /// Keep only tokens for which `keep` returns true.
    ///
    /// Slots bound to a dropped token become unbound.
    pub fn retain_tokens(&mut self, mut keep: impl FnMut(&Token) -> bool) {
        let order: Vec<usize> = (0..self.tokens.len())
            .filter(|idx| keep(&self.tokens[*idx]))
            .collect();
        self.reorder(order);
    }

    /// Rebuild the token list from `order` (old indices) and remap all slots.
    fn reorder(&mut self, order: Vec<usize>) {
        let mut new_index = vec![None; self.tokens.len()];
        for (new_idx, old_idx) in order.iter().enumerate() {
            new_index[*old_idx] = Some(new_idx);
        }
        let mut old_tokens: Vec<Option<Token>> = self.tokens.drain(..).map(Some).collect();
        self.tokens = order
            .iter()
            .filter_map(|old_idx| old_tokens[*old_idx].take())
            .collect();
        for template in self.templates.iter_mut() {
            for slot in template.slots.iter_mut() {
                slot.token_index = slot
                    .token_index
                    .and_then(|idx| new_index.get(idx).copied().flatten());
            }
        }
    }

    /// Templates of the given type.
    pub fn templates_of<'a>(&'a self, template_type: &'a str) -> impl Iterator<Item = &'a Template> + 'a {
        self.templates
            .iter()
            .filter(move |t| t.template_type == template_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Slot, TokenType};

    fn analysis() -> Analysis {
        let mut analysis = Analysis::default();
        analysis.tokens = vec![
            Token::new(1, 0, 4, TokenType::Place).with_value("b"),
            Token::new(0, 5, 9, TokenType::Place).with_value("a"),
            Token::new(1, 0, 2, TokenType::Date).with_value("c"),
        ];
        let mut template = Template::new("test");
        template.slots.push(Slot::new("first", None).bound_to(0));
        template.slots.push(Slot::new("second", None).bound_to(1));
        template.slots.push(Slot::new("third", None).bound_to(2));
        analysis.templates.push(template);
        analysis
    }

    fn bound_values(analysis: &Analysis) -> Vec<Option<String>> {
        analysis.templates[0]
            .slots
            .iter()
            .map(|s| s.token_index.and_then(|i| analysis.tokens[i].value_text()))
            .collect()
    }

    #[test]
    fn test_sort_remaps_slots() {
        let mut analysis = analysis();
        analysis.sort_tokens();
        let order: Vec<String> = analysis.tokens.iter().filter_map(Token::value_text).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
        assert_eq!(
            bound_values(&analysis),
            vec![Some("b".to_string()), Some("a".to_string()), Some("c".to_string())]
        );
    }

    #[test]
    fn test_retain_unbinds_dropped() {
        let mut analysis = analysis();
        analysis.retain_tokens(|t| t.message_idx == 1);
        assert_eq!(analysis.tokens.len(), 2);
        assert_eq!(
            bound_values(&analysis),
            vec![Some("b".to_string()), None, Some("c".to_string())]
        );
    }
}
