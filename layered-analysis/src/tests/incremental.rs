use layered_conversation::{Analysis, Conversation, Message, Token, TokenType};
use layered_text::tags::NerTag;

use super::annotator::FixtureAnnotator;
use crate::{LazyStage, Phase, Pipeline, ProcessError};

fn stations() -> FixtureAnnotator {
    FixtureAnnotator::new()
        .nouns(&["Ilmenau", "Erfurt", "Gotha"])
        .entity("Ilmenau", NerTag::location("LOC"), 0.9)
        .entity("Erfurt", NerTag::location("LOC"), 0.9)
        .entity("Gotha", NerTag::location("LOC"), 0.9)
}

fn places(analysis: &Analysis) -> Vec<(i32, String)> {
    analysis
        .tokens
        .iter()
        .filter(|t| t.token_type == TokenType::Place)
        .map(|t| (t.message_idx, t.value_text().unwrap_or_default()))
        .collect()
}

#[test]
fn later_pass_only_collects_new_messages() {
    let pipeline = stations().pipeline();
    let mut conversation = Conversation::new(vec![
        Message::user("Zug nach Ilmenau"),
        Message::agent("Ab Erfurt?"),
        Message::user("Ja, ab Erfurt"),
    ]);
    let first = pipeline.analyze(&conversation, None).unwrap();
    assert_eq!(
        places(&first),
        vec![(0, "Ilmenau".to_string()), (2, "Erfurt".to_string())]
    );

    conversation.meta.last_message_analyzed = 2;
    conversation.messages.push(Message::user("Oder doch über Gotha"));
    let mut previous = first;
    previous.tokens.push(Token::new(-1, 0, 4, TokenType::Date).with_value("morgen"));

    let second = pipeline.analyze(&conversation, Some(previous)).unwrap();
    assert_eq!(
        places(&second),
        vec![
            (0, "Ilmenau".to_string()),
            (2, "Erfurt".to_string()),
            (3, "Gotha".to_string()),
        ]
    );
    // agent tokens are carried over and sort first
    assert_eq!(second.tokens[0].message_idx, -1);

    // a repeated pass re-collects the new message instead of duplicating it
    let third = pipeline.analyze(&conversation, Some(second.clone())).unwrap();
    assert_eq!(places(&third), places(&second));
    assert_eq!(third.tokens.len(), second.tokens.len());
}

#[test]
fn latch_template_absorbs_later_tokens() {
    let pipeline = stations().pipeline();
    let mut conversation = Conversation::new(vec![Message::user("Zug nach Ilmenau")]);
    let first = pipeline.analyze(&conversation, None).unwrap();
    assert_eq!(first.templates_of("ir_latch").count(), 1);

    conversation.meta.last_message_analyzed = 0;
    conversation.messages.push(Message::user("über Gotha"));
    let second = pipeline.analyze(&conversation, Some(first)).unwrap();

    let latch: Vec<_> = second.templates_of("ir_latch").collect();
    assert_eq!(latch.len(), 1);
    let locations: Vec<String> = latch[0]
        .slots
        .iter()
        .filter(|s| s.role == "location")
        .filter_map(|s| s.token_index)
        .filter_map(|idx| second.tokens[idx].value_text())
        .collect();
    assert_eq!(locations, vec!["Ilmenau", "Gotha"]);
}

#[test]
fn repeated_pass_keeps_template_slots() {
    let pipeline = stations().pipeline();
    let mut conversation = Conversation::new(vec![Message::user("Zug nach Ilmenau")]);
    let mut analysis = pipeline.analyze(&conversation, None).unwrap();

    conversation.meta.last_message_analyzed = 0;
    conversation.messages.push(Message::user("über Gotha"));
    let mut slot_counts = Vec::new();
    for _ in 0..4 {
        analysis = pipeline.analyze(&conversation, Some(analysis)).unwrap();
        slot_counts.push(
            analysis
                .templates
                .iter()
                .map(|t| t.slots.len())
                .collect::<Vec<_>>(),
        );
        let latch: Vec<_> = analysis.templates_of("ir_latch").collect();
        assert_eq!(latch.len(), 1);
        assert!(latch[0].slots.iter().all(|s| s.is_bound()));
    }
    assert!(slot_counts.windows(2).all(|w| w[0] == w[1]), "{:?}", slot_counts);
}

#[test]
fn context_size_limits_analysed_messages() {
    let pipeline = stations().pipeline().context_size(1);
    let conversation = Conversation::new(vec![
        Message::user("Zug nach Ilmenau"),
        Message::user("ab Erfurt"),
    ]);
    let analysis = pipeline.analyze(&conversation, None).unwrap();
    assert_eq!(places(&analysis), vec![(1, "Erfurt".to_string())]);
    assert_eq!(analysis.context.map(|c| c.start), Some(1));
}

#[test]
fn failed_lazy_stage_is_reported_once() {
    let lazy = LazyStage::spawn("ner.model", Phase::Ner, || -> Result<FixtureAnnotator, String> {
        Err("model file missing".to_string())
    });
    let pipeline = Pipeline::standard().add_stage(Box::new(lazy));
    let conversation = Conversation::new(vec![Message::user("Zug nach Ilmenau")]);

    let first = pipeline.analyze(&conversation, None);
    assert!(matches!(first, Err(ProcessError::InitFailed { .. })));

    let second = pipeline.analyze(&conversation, None).unwrap();
    assert!(second.tokens.is_empty());
}

#[test]
fn lazy_stage_runs_once_ready() {
    let lazy = LazyStage::spawn("ner.model", Phase::Ner, || Ok::<_, String>(stations()));
    let pipeline = Pipeline::standard().add_stage(Box::new(lazy));
    let conversation = Conversation::new(vec![Message::user("Zug nach Ilmenau")]);

    let analysis = pipeline.analyze(&conversation, None).unwrap();
    assert_eq!(places(&analysis), vec![(0, "Ilmenau".to_string())]);
}
