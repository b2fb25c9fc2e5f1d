//! The analysis pipeline: stages over the conversation text, then template builders.

use layered_conversation::{Analysis, Conversation, ConversationTextBuilder, IncrementalScope};
use layered_intent::{
    DbSearchTemplateBuilder,
    LatchTemplateBuilder,
    RelatedConversationTemplateBuilder,
    TemplateBuilder,
};
use layered_text::AnalyzedText;

use crate::{
    AdjectiveLocationProcessor,
    AnalysisConfig,
    InterestingPhraseCollector,
    LocationTypeAppender,
    NamedEntityCollector,
    NegationMarker,
    PosCollector,
    ProcessResult,
    ProcessingContext,
    Processor,
};

/// Ordered processing stages plus the template builders run after them.
///
/// Stages run by ascending [`Processor::weight`]; stages of equal weight run
/// in the order they were added. Upstream annotators (taggers, NER models)
/// are added as stages of the earlier phases.
pub struct Pipeline {
    context_size: i32,
    stages: Vec<Box<dyn Processor>>,
    builders: Vec<Box<dyn TemplateBuilder + Send + Sync>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// The standard collectors and builders with default configuration.
    pub fn standard() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        let stages: Vec<Box<dyn Processor>> = vec![
            Box::new(AdjectiveLocationProcessor::new(&config.ner)),
            Box::new(LocationTypeAppender::new(&config.ner)),
            Box::new(NamedEntityCollector::new(&config.ner)),
            Box::new(PosCollector::new(&config.pos)),
            Box::new(InterestingPhraseCollector::new()),
            Box::new(NegationMarker::new()),
        ];
        Self::with_stages(stages)
            .context_size(config.context_size)
            .with_builder(LatchTemplateBuilder::default())
            .with_builder(DbSearchTemplateBuilder::default())
            .with_builder(RelatedConversationTemplateBuilder::default())
    }

    /// A pipeline running exactly `stages`, without template builders.
    pub fn with_stages(stages: Vec<Box<dyn Processor>>) -> Self {
        let mut pipeline = Self {
            context_size: -1,
            stages: Vec::new(),
            builders: Vec::new(),
        };
        for stage in stages {
            pipeline = pipeline.add_stage(stage);
        }
        pipeline
    }

    pub fn add_stage(mut self, stage: Box<dyn Processor>) -> Self {
        tracing::trace!(stage = stage.name(), weight = stage.weight(), "adding stage");
        self.stages.push(stage);
        // stable: equal weights keep insertion order
        self.stages.sort_by_key(|s| s.weight());
        self
    }

    pub fn with_builder(mut self, builder: impl TemplateBuilder + Send + Sync + 'static) -> Self {
        self.builders.push(Box::new(builder));
        self
    }

    /// Only the last `context_size` messages are analysed; `<= 0` means all.
    pub fn context_size(mut self, context_size: i32) -> Self {
        self.context_size = context_size;
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Analyse `conversation`, continuing from `previous` if given.
    ///
    /// Tokens of messages up to `meta.last_message_analyzed` and agent tokens
    /// are carried over from `previous`; newer messages are collected again.
    pub fn analyze(&self, conversation: &Conversation, previous: Option<Analysis>) -> ProcessResult<Analysis> {
        let built = ConversationTextBuilder::new()
            .context_size(self.context_size)
            .build(conversation)?;
        let mut text = built.text;
        let mut analysis = previous.unwrap_or_else(|| Analysis::new(conversation.id.clone(), None));
        analysis.context = Some(built.context);
        self.process_text(conversation, &mut text, analysis)
    }

    /// Run the stages and builders over an already built conversation text.
    pub fn process_text(
        &self,
        conversation: &Conversation,
        text: &mut AnalyzedText,
        analysis: Analysis,
    ) -> ProcessResult<Analysis> {
        let scope = IncrementalScope::of(conversation);
        let mut analysis = scope.carry_over(analysis);
        tracing::debug!(
            conversation = ?conversation.id,
            last_analyzed = scope.last_analyzed(),
            carried_over = analysis.tokens.len(),
            "analysis pass"
        );

        for stage in &self.stages {
            let mut ctx = ProcessingContext {
                conversation,
                text: &mut *text,
                analysis: &mut analysis,
                scope,
            };
            tracing::trace!(stage = stage.name(), "running stage");
            stage.process(&mut ctx)?;
        }
        analysis.sort_tokens();

        for builder in &self.builders {
            builder.update_templates(conversation, &mut analysis, &scope);
        }
        tracing::debug!(
            tokens = analysis.tokens.len(),
            templates = analysis.templates.len(),
            "analysis done"
        );
        Ok(analysis)
    }
}
