//! Stages whose resources load in the background.
//!
//! Models and dictionaries can take seconds to load. A [`LazyStage`] starts
//! loading on a worker thread when the pipeline is assembled; the first pass
//! that reaches the stage blocks until loading has finished.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use once_cell::sync::OnceCell;

use crate::{Phase, ProcessError, ProcessResult, ProcessingContext, Processor};

/// Load state of a [`LazyStage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Health {
    Loading,
    Ready,
    Failed(String),
}

/// A [`Processor`] initialised on a background thread.
///
/// A failed initialisation is returned as [`ProcessError::InitFailed`] by the
/// first pass reaching the stage; later passes skip it.
pub struct LazyStage<P> {
    name: String,
    phase: Phase,
    weight_offset: i32,
    cell: Arc<OnceCell<Result<P, String>>>,
    reported: AtomicBool,
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl<P> LazyStage<P>
where
    P: Processor + 'static,
{
    /// Start initialising the stage with `init`.
    pub fn spawn<F, E>(name: impl Into<String>, phase: Phase, init: F) -> Self
    where
        F: FnOnce() -> Result<P, E> + Send + 'static,
        E: fmt::Display,
    {
        let name = name.into();
        let cell: Arc<OnceCell<Result<P, String>>> = Arc::new(OnceCell::new());
        let worker_cell = Arc::clone(&cell);
        let worker_name = name.clone();
        let spawned = thread::Builder::new()
            .name(format!("init-{}", name))
            .spawn(move || {
                let result = match panic::catch_unwind(AssertUnwindSafe(init)) {
                    Ok(Ok(stage)) => Ok(stage),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(payload) => Err(format!("panicked: {}", panic_message(payload))),
                };
                match &result {
                    Ok(_) => tracing::debug!(stage = %worker_name, "stage initialised"),
                    Err(message) => tracing::warn!(stage = %worker_name, %message, "stage initialisation failed"),
                }
                let _ = worker_cell.set(result);
            });
        if let Err(e) = spawned {
            let _ = cell.set(Err(format!("could not start init thread: {}", e)));
        }

        Self {
            name,
            phase,
            weight_offset: 0,
            cell,
            reported: AtomicBool::new(false),
        }
    }

    pub fn with_weight_offset(mut self, weight_offset: i32) -> Self {
        self.weight_offset = weight_offset;
        self
    }

    pub fn health(&self) -> Health {
        match self.cell.get() {
            None => Health::Loading,
            Some(Ok(_)) => Health::Ready,
            Some(Err(message)) => Health::Failed(message.clone()),
        }
    }

    /// Block until initialisation has finished.
    pub fn wait(&self) -> Health {
        self.cell.wait();
        self.health()
    }
}

impl<P> Processor for LazyStage<P>
where
    P: Processor + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn weight_offset(&self) -> i32 {
        self.weight_offset
    }

    fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
        match self.cell.wait() {
            Ok(stage) => stage.process(ctx),
            Err(message) => {
                if self
                    .reported
                    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    tracing::error!(stage = %self.name, %message, "stage unavailable");
                    Err(ProcessError::InitFailed {
                        stage: self.name.clone(),
                        message: message.clone(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_conversation::{Analysis, Conversation, IncrementalScope, Message, Token, TokenType};
    use layered_text::AnalyzedText;

    /// Emits one token per pass.
    struct Marker;

    impl Processor for Marker {
        fn name(&self) -> &str {
            "marker"
        }

        fn phase(&self) -> Phase {
            Phase::Extraction
        }

        fn process(&self, ctx: &mut ProcessingContext<'_>) -> ProcessResult<()> {
            ctx.analysis.tokens.push(Token::new(0, 0, 5, TokenType::Other));
            Ok(())
        }
    }

    fn run(stage: &dyn Processor, analysis: &mut Analysis) -> ProcessResult<()> {
        let conversation = Conversation::new(vec![Message::user("Hallo")]);
        let mut text = AnalyzedText::new("Hallo\n");
        let mut ctx = ProcessingContext {
            conversation: &conversation,
            text: &mut text,
            analysis,
            scope: IncrementalScope::of(&conversation),
        };
        stage.process(&mut ctx)
    }

    #[test]
    fn test_ready_stage_delegates() {
        let stage = LazyStage::spawn("marker", Phase::Extraction, || Ok::<_, String>(Marker))
            .with_weight_offset(3);
        assert_eq!(stage.weight(), 3);

        let mut analysis = Analysis::default();
        run(&stage, &mut analysis).unwrap();
        assert_eq!(stage.health(), Health::Ready);
        assert_eq!(analysis.tokens.len(), 1);
    }

    #[test]
    fn test_failure_is_reported_once() {
        let stage: LazyStage<Marker> =
            LazyStage::spawn("ner.model", Phase::Ner, || Err("model file missing"));
        assert_eq!(stage.wait(), Health::Failed("model file missing".to_string()));

        let mut analysis = Analysis::default();
        let first = run(&stage, &mut analysis);
        assert!(matches!(
            first,
            Err(ProcessError::InitFailed { ref stage, ref message })
                if stage == "ner.model" && message == "model file missing"
        ));
        assert!(run(&stage, &mut analysis).is_ok());
        assert!(analysis.tokens.is_empty());
    }

    #[test]
    fn test_panicking_init_fails() {
        let stage: LazyStage<Marker> = LazyStage::spawn("dictionary", Phase::Lemma, || -> Result<Marker, String> {
            panic!("dictionary corrupt")
        });
        assert_eq!(
            stage.wait(),
            Health::Failed("panicked: dictionary corrupt".to_string())
        );
    }
}
