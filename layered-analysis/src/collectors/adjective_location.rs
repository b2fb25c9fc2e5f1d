//! Fuses an attributive adjective with the location chunk it precedes,
//! e.g. "Oberbayerisches München" or "Berliner Hauptbahnhof".

use layered_text::tags::{ner_type, NerSet, NerTag, Pos, PosSet};
use layered_text::{
    combine_confidence, keys, nlp, AnalyzedText, SpanId, SpanKind, SpanKinds, Value,
};
use once_cell::sync::Lazy;

use crate::{NerConfig, Phase, ProcessError, ProcessResult, ProcessingContext, Processor};

const STAGE: &str = "ner.adjectivelocation";

static ATTRIBUTIVE_ADJECTIVES: Lazy<PosSet> =
    Lazy::new(|| PosSet::of_pos(&[Pos::AttributiveAdjective]));

pub struct AdjectiveLocationProcessor {
    locations: NerSet,
}

impl Default for AdjectiveLocationProcessor {
    fn default() -> Self {
        Self::new(&NerConfig::default())
    }
}

impl AdjectiveLocationProcessor {
    pub fn new(config: &NerConfig) -> Self {
        Self {
            locations: config.adjective_location_set(),
        }
    }

    fn fuse(&self, text: &mut AnalyzedText, section: SpanId) -> ProcessResult<()> {
        let mut adjective: Option<SpanId> = None;
        let mut location_end = 0;

        let mut cursor = text.enclosed(section, SpanKinds::CHUNK_AND_TOKEN);
        while let Some(id) = cursor.next(text) {
            let span = text.span(id);
            match span.kind() {
                SpanKind::Token => {
                    adjective = if location_end < span.end()
                        && nlp::is_of_pos(span, &ATTRIBUTIVE_ADJECTIVES, None)
                    {
                        Some(id)
                    } else {
                        None
                    };
                }
                SpanKind::Chunk => {
                    if location_end >= span.end() || !nlp::is_of_ner(span, &self.locations, None) {
                        continue;
                    }
                    location_end = span.end();
                    if let Some(adjective) = adjective.take() {
                        self.add_fused_chunk(text, adjective, id)?;
                    }
                }
                kind @ (SpanKind::Text | SpanKind::Section | SpanKind::Sentence) => {
                    return Err(ProcessError::invariant(
                        STAGE,
                        format!("unexpected {:?} span enclosed in a section", kind),
                    ));
                }
            }
        }
        Ok(())
    }

    fn add_fused_chunk(
        &self,
        text: &mut AnalyzedText,
        adjective: SpanId,
        location: SpanId,
    ) -> ProcessResult<()> {
        let (adj, loc) = (text.span(adjective), text.span(location));
        let tag = loc
            .value(&keys::NER)
            .map(|v| v.value.tag.clone())
            .unwrap_or_else(|| ner_type::LOCATION.to_string());
        let probability = combine_confidence(
            nlp::pos_probability(adj, &ATTRIBUTIVE_ADJECTIVES),
            nlp::ner_probability(loc, &self.locations),
        );
        let (adj_lemma, loc_lemma) = (nlp::lemma(adj), nlp::lemma(loc));
        let lemma = if adj_lemma.is_some() || loc_lemma.is_some() {
            Some(format!(
                "{}{}{}",
                adj_lemma.unwrap_or(text.span_text(adjective)),
                text.slice(adj.end(), loc.start()),
                loc_lemma.unwrap_or(text.span_text(location)),
            ))
        } else {
            None
        };
        let (start, end) = (adj.start(), loc.end());

        let fused = text.add_chunk(text.root(), start, end)?;
        let value = Value::new(NerTag::location(tag), probability);
        tracing::debug!(start, end, chunk = text.span_text(fused), ?value, ?lemma, "add location");
        let span = text.span_mut(fused);
        span.add_value(&keys::NER, value);
        if let Some(lemma) = lemma {
            span.set_annotation(&keys::LEMMA, lemma);
        }
        Ok(())
    }
}

impl Processor for AdjectiveLocationProcessor {
    fn name(&self) -> &str {
        STAGE
    }

    fn phase(&self) -> Phase {
        Phase::Extraction
    }

    /// Before the collectors of the extraction phase.
    fn weight_offset(&self) -> i32 {
        -10
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        for (section, _) in ctx.collected_sections() {
            self.fuse(ctx.text, section)?;
        }
        Ok(())
    }
}
