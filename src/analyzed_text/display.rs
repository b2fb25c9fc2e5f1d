use std::fmt::Write;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::{AnalyzedText, AnnotationKey, AnnotationValue, SpanId, SpanKinds};

/// Internal representation of an included span for display.
struct IncludedSpan {
    start: usize,
    end: usize,
    label: String,
}

/// Renders a span's text with markers under selected enclosed spans.
///
/// ```text
/// Oberbayerisches München
/// ╰─────────────╯Token
///                 ╰─────╯Value(NerTag { tag: "LOC", ner_type: "loc" }, p: 0.90)
/// ```
pub struct AnalyzedTextDisplay<'a> {
    text: &'a AnalyzedText,
    parent: SpanId,
    included: Vec<IncludedSpan>,
}

impl<'a> std::fmt::Display for AnalyzedTextDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parent = self.text.span(self.parent);
        let line = self.text.span_text(self.parent).replace('\n', " ");
        f.write_str(&line)?;

        for span in self.included.iter() {
            f.write_char('\n')?;

            let rel_start = span.start - parent.start();
            let rel_end = span.end - parent.start();
            let start_col = display_width(&line, rel_start);
            let end_col = display_width(&line, rel_end);

            for _ in 0..start_col {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            let char_len = end_col - start_col;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if char_len > 1 {
                f.write_char('╯')?;
            }

            f.write_str(&span.label)?;
        }

        Ok(())
    }
}

/// Display width of the first `byte_len` bytes of `line`.
fn display_width(line: &str, byte_len: usize) -> usize {
    line.grapheme_indices(true)
        .take_while(|(idx, _)| *idx < byte_len)
        .map(|(_, g)| UnicodeWidthStr::width(g))
        .sum()
}

impl<'a> AnalyzedTextDisplay<'a> {
    pub fn new(text: &'a AnalyzedText, parent: SpanId) -> Self {
        AnalyzedTextDisplay {
            text,
            parent,
            included: Vec::new(),
        }
    }

    /// Include every enclosed span of `kinds`, labelled with its kind.
    pub fn include_kinds(&mut self, kinds: SpanKinds) {
        for id in self.text.enclosed_ids(self.parent, kinds) {
            let span = self.text.span(id);
            self.included.push(IncludedSpan {
                start: span.start(),
                end: span.end(),
                label: format!("{:?}", span.kind()),
            });
        }
    }

    /// Include one line per value of `key` on enclosed spans of `kinds`.
    pub fn include<T: AnnotationValue>(&mut self, kinds: SpanKinds, key: &AnnotationKey<T>) {
        for id in self.text.enclosed_ids(self.parent, kinds) {
            let span = self.text.span(id);
            for value in span.values(key) {
                self.included.push(IncludedSpan {
                    start: span.start(),
                    end: span.end(),
                    label: format!("{:?}", value),
                });
            }
        }
    }

    /// Takes self
    pub fn with_kinds(mut self, kinds: SpanKinds) -> Self {
        self.include_kinds(kinds);
        self
    }

    /// Takes self
    pub fn with<T: AnnotationValue>(mut self, kinds: SpanKinds, key: &AnnotationKey<T>) -> Self {
        self.include(kinds, key);
        self
    }
}
