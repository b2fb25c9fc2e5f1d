//! Annotation keys written by upstream NLP annotators.

use crate::tags::{MorphoFeatures, NerTag, PhraseTag, PosTag};
use crate::AnnotationKey;

/// Part-of-speech tags of a Token.
pub const POS: AnnotationKey<PosTag> = AnnotationKey::new("nlp.pos");
/// Named entity tags of a Chunk.
pub const NER: AnnotationKey<NerTag> = AnnotationKey::new("nlp.ner");
/// Phrase categories of a Chunk.
pub const PHRASE: AnnotationKey<PhraseTag> = AnnotationKey::new("nlp.phrase");
pub const LEMMA: AnnotationKey<String> = AnnotationKey::new("nlp.lemma");
pub const STEM: AnnotationKey<String> = AnnotationKey::new("nlp.stem");
pub const STOPWORD: AnnotationKey<bool> = AnnotationKey::new("nlp.stopword");
/// Marks a Chunk (or Token) as negated.
pub const NEGATION: AnnotationKey<bool> = AnnotationKey::new("nlp.negation");
pub const LANGUAGE: AnnotationKey<String> = AnnotationKey::new("nlp.language");
pub const MORPHO: AnnotationKey<MorphoFeatures> = AnnotationKey::new("nlp.morpho");
