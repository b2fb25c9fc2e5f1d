//! Building the [`AnalyzedText`] of a conversation.
//!
//! Each analysed message becomes one Section annotated with its message
//! index. Sections are separated by newlines that belong to no section, so
//! section-relative offsets are message-relative offsets.

use layered_text::{AnalyzedText, AnnotationKey, SpanId, SpanResult};

use crate::{AnalysisContext, Conversation, Message};

/// Index of the message a Section was built from.
pub const MESSAGE_IDX: AnnotationKey<usize> = AnnotationKey::new("conversation.message_idx");

/// Rewrites message content before it is analysed (e.g. strips markup).
pub trait MessageContentProcessor {
    fn process_content(&self, conversation: &Conversation, message: &Message) -> String;
}

/// The analysed text of a conversation together with its context.
#[derive(Debug)]
pub struct ConversationText {
    pub text: AnalyzedText,
    pub context: AnalysisContext,
}

impl ConversationText {
    /// Sections with their message index, in message order.
    pub fn message_sections(&self) -> Vec<(SpanId, usize)> {
        message_sections(&self.text)
    }
}

/// Sections of `text` carrying a message index.
///
/// Sections without one are logged and skipped.
pub fn message_sections(text: &AnalyzedText) -> Vec<(SpanId, usize)> {
    text.sections()
        .into_iter()
        .filter_map(|section| match text.span(section).annotation(&MESSAGE_IDX) {
            Some(idx) => Some((section, *idx)),
            None => {
                let span = text.span(section);
                tracing::warn!(
                    start = span.start(),
                    end = span.end(),
                    "section without message index annotation"
                );
                None
            }
        })
        .collect()
}

/// Builder for [`ConversationText`].
#[derive(Default)]
pub struct ConversationTextBuilder<'a> {
    context_size: i32,
    content_processor: Option<&'a dyn MessageContentProcessor>,
}

impl<'a> ConversationTextBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the last `context_size` messages are analysed; `<= 0` means all.
    pub fn context_size(mut self, context_size: i32) -> Self {
        self.context_size = context_size;
        self
    }

    pub fn content_processor(mut self, processor: &'a dyn MessageContentProcessor) -> Self {
        self.content_processor = Some(processor);
        self
    }

    pub fn build(&self, conversation: &Conversation) -> SpanResult<ConversationText> {
        let num_messages = conversation.messages.len();
        let start = match usize::try_from(self.context_size) {
            Ok(size) if size > 0 => num_messages.saturating_sub(size),
            _ => 0,
        };
        tracing::trace!(start, end = num_messages, context_size = self.context_size, "analysis context");

        let mut buffer = String::new();
        let mut sections: Vec<(usize, usize, usize)> = Vec::new();
        let mut skipped = 0;
        for (idx, message) in conversation.messages.iter().enumerate().skip(start) {
            if message.skip_analysis() {
                skipped += 1;
                continue;
            }
            let content = match self.content_processor {
                Some(processor) => processor.process_content(conversation, message),
                None => message.content.clone(),
            };
            if content.trim().is_empty() {
                continue;
            }
            if !sections.is_empty() {
                buffer.push('\n');
            }
            let section_start = buffer.len();
            buffer.push_str(&content);
            sections.push((idx, section_start, buffer.len()));
            buffer.push('\n');
        }

        let mut text = AnalyzedText::new(buffer);
        for (idx, section_start, section_end) in sections {
            let section = text.add_section(section_start, section_end)?;
            text.span_mut(section).set_annotation(&MESSAGE_IDX, idx);
        }

        Ok(ConversationText {
            text,
            context: AnalysisContext {
                start,
                end: num_messages,
                skipped,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SKIP_ANALYSIS;

    fn conversation() -> Conversation {
        Conversation::new(vec![
            Message::user("Hallo"),
            Message::agent("   "),
            Message::user("intern").with_metadata(SKIP_ANALYSIS, serde_json::Value::Bool(true)),
            Message::agent("Wohin?"),
            Message::user("Nach Ilmenau"),
        ])
    }

    #[test]
    fn test_sections_per_message() {
        let built = ConversationTextBuilder::new().build(&conversation()).unwrap();
        assert_eq!(built.text.text(), "Hallo\n\nWohin?\n\nNach Ilmenau\n");

        let sections: Vec<(String, usize)> = built
            .message_sections()
            .into_iter()
            .map(|(id, idx)| (built.text.span_text(id).to_string(), idx))
            .collect();
        assert_eq!(
            sections,
            vec![
                ("Hallo".to_string(), 0),
                ("Wohin?".to_string(), 3),
                ("Nach Ilmenau".to_string(), 4),
            ]
        );
        assert_eq!(built.context, AnalysisContext { start: 0, end: 5, skipped: 1 });
    }

    #[test]
    fn test_context_size() {
        let built = ConversationTextBuilder::new()
            .context_size(2)
            .build(&conversation())
            .unwrap();
        assert_eq!(built.text.text(), "Wohin?\n\nNach Ilmenau\n");
        assert_eq!(built.context, AnalysisContext { start: 3, end: 5, skipped: 0 });
    }

    struct Upper;

    impl MessageContentProcessor for Upper {
        fn process_content(&self, _: &Conversation, message: &Message) -> String {
            message.content.to_uppercase()
        }
    }

    #[test]
    fn test_content_processor() {
        let conversation = Conversation::new(vec![Message::user("hallo")]);
        let built = ConversationTextBuilder::new()
            .content_processor(&Upper)
            .build(&conversation)
            .unwrap();
        assert_eq!(built.text.text(), "HALLO\n");
    }
}
