use crate::tags::{NerTag, Pos, PosTag};
use crate::{keys, AnalyzedText, AnalyzedTextDisplay, SpanKind, SpanKinds, Value};

/// Two messages, tokenized, with a chunk over "München Hauptbahnhof".
fn two_sections() -> AnalyzedText {
    let mut at = AnalyzedText::new("Hallo\nZug ab München Hauptbahnhof\n");
    let first = at.add_section(0, 5).unwrap();
    at.tokenize(first).unwrap();
    let second = at.add_section(6, 34).unwrap();
    let sentence = at.add_sentence(second, 0, 28).unwrap();
    at.tokenize(sentence).unwrap();
    at.add_chunk(sentence, 7, 28).unwrap();
    at
}

#[test]
fn enclosed_spans_stay_inside_parent() {
    let at = two_sections();
    for section in at.sections() {
        let parent = at.span(section);
        for id in at.enclosed_ids(section, SpanKinds::of(&[SpanKind::Sentence, SpanKind::Chunk, SpanKind::Token])) {
            let span = at.span(id);
            assert!(parent.start() <= span.start());
            assert!(span.start() < span.end());
            assert!(span.end() <= parent.end());
        }
    }
}

#[test]
fn enclosed_order_is_start_then_longest_first() {
    let at = two_sections();
    let section = at.sections()[1];
    let kinds = SpanKinds::of(&[SpanKind::Sentence, SpanKind::Chunk, SpanKind::Token]);
    let listed: Vec<String> = at
        .enclosed_ids(section, kinds)
        .into_iter()
        .map(|id| format!("{:?} {}", at.span(id).kind(), at.span_text(id)))
        .collect();
    assert_eq!(
        listed,
        vec![
            "Sentence Zug ab München Hauptbahnhof",
            "Token Zug",
            "Token ab",
            "Chunk München Hauptbahnhof",
            "Token München",
            "Token Hauptbahnhof",
        ]
    );
}

#[test]
fn cursor_visits_spans_added_ahead() {
    let mut at = two_sections();
    let section = at.sections()[1];
    let mut cursor = at.enclosed(section, SpanKinds::CHUNK_AND_TOKEN);
    let mut seen = Vec::new();
    while let Some(id) = cursor.next(&at) {
        let text = at.span_text(id).to_string();
        if text == "Zug" {
            // ahead of the cursor: visited
            at.add_chunk(section, 4, 6).unwrap();
            // behind the cursor: not visited
            at.add_chunk(section, 0, 6).unwrap();
        }
        seen.push(format!("{:?} {}", at.span(id).kind(), text));
    }
    assert_eq!(
        seen,
        vec![
            "Token Zug",
            "Chunk ab",
            "Token ab",
            "Chunk München Hauptbahnhof",
            "Token München",
            "Token Hauptbahnhof",
        ]
    );
}

#[test]
fn display_section() {
    let mut at = two_sections();
    let section = at.sections()[1];
    let chunk = at.enclosed_ids(section, SpanKinds::CHUNK)[0];
    at.span_mut(chunk)
        .add_value(&keys::NER, Value::new(NerTag::location("LOC"), 0.9));
    let ids = at.enclosed_ids(section, SpanKinds::TOKEN);
    at.span_mut(ids[2])
        .add_value(&keys::POS, Value::new(PosTag::of_pos("NE", Pos::ProperNoun), 0.75));

    let display = AnalyzedTextDisplay::new(&at, section)
        .with(SpanKinds::CHUNK, &keys::NER)
        .with(SpanKinds::TOKEN, &keys::POS);

    insta::assert_snapshot!(display, @r###"
    Zug ab München Hauptbahnhof
           ╰──────────────────╯Value(NerTag { tag: "LOC", ner_type: "loc" }, p: 0.90)
           ╰─────╯Value(PosTag { tag: "NE", categories: {Noun}, pos: {ProperNoun} }, p: 0.75)
    "###);
}
