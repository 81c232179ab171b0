//! Debate orchestrator — validates phase transitions, runs each round, and
//! preserves progress when a debater fails.
//!
//! Usage:
//! 1. Create with `new()` and the two debaters plus a transcript store
//! 2. Call `initialize_debate()` to get a `Debate` in `Initialized`
//! 3. Call each phase operation in order, feeding the returned `Debate`
//!    into the next: `execute_preparation`, `execute_opening_statements`,
//!    `execute_rebuttals`, `execute_cross_examination`,
//!    `execute_closing_statements`, `complete_debate`
//! 4. On `Err`, stop. A generation failure carries the failed snapshot and
//!    the location of the partial transcript written for it.
//!
//! Phase operations never modify their input; each returns a new `Debate`.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::backend::DebaterBackend;
use super::config::DebateConfig;
use super::context::{build_context, GenerationContext};
use super::executor::{RoundExecutor, TurnFailure};
use super::model::{initialize_debate, Debate, DebateError, DebateWarning};
use super::persistence::{PersistenceError, TranscriptStore};
use super::state::{DebateState, Position, RoundType, TransitionError};

/// Failure of a phase operation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Phase attempted out of order, repeated, backwards, or after completion.
    #[error(transparent)]
    InvalidStateTransition(#[from] TransitionError),

    /// A debater's generation call failed; the debate was checkpointed.
    #[error("generation failed for {model} ({position}) during {state}: {message}")]
    ModelGeneration {
        model: String,
        position: Position,
        state: DebateState,
        message: String,
        /// Debate as it stood at failure, including the logged error.
        snapshot: Box<Debate>,
        /// Where the partial transcript went, if saving succeeded.
        saved_to: Option<PathBuf>,
    },
}

impl OrchestratorError {
    /// Debate snapshot taken at failure, for generation errors.
    pub fn snapshot(&self) -> Option<&Debate> {
        match self {
            Self::ModelGeneration { snapshot, .. } => Some(snapshot),
            Self::InvalidStateTransition(_) => None,
        }
    }

    /// Partial transcript location, for generation errors that were saved.
    pub fn saved_to(&self) -> Option<&PathBuf> {
        match self {
            Self::ModelGeneration { saved_to, .. } => saved_to.as_ref(),
            Self::InvalidStateTransition(_) => None,
        }
    }
}

/// Drives a debate between two bound debaters.
pub struct DebateOrchestrator {
    affirmative: Arc<dyn DebaterBackend>,
    negative: Arc<dyn DebaterBackend>,
    store: Arc<dyn TranscriptStore>,
    cancel: CancellationToken,
}

impl DebateOrchestrator {
    pub fn new(
        affirmative: Arc<dyn DebaterBackend>,
        negative: Arc<dyn DebaterBackend>,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            affirmative,
            negative,
            store,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that cuts preparation short when cancelled.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Create a debate between this orchestrator's two debaters.
    pub fn initialize_debate(&self, topic: &str, config: DebateConfig) -> Debate {
        let debate = initialize_debate(
            topic,
            config,
            &self.affirmative.model_name(),
            &self.negative.model_name(),
        );
        info!(
            debate_id = %debate.id,
            affirmative = %debate.affirmative_model,
            negative = %debate.negative_model,
            topic = %debate.topic,
            "debate initialized"
        );
        debate
    }

    /// Context `position` would see for `round_type` right now.
    pub fn build_context(&self, debate: &Debate, position: Position, round_type: RoundType) -> GenerationContext {
        build_context(debate, position, round_type)
    }

    /// Initialized → Preparation. Both debaters research concurrently under
    /// the preparation deadline.
    pub async fn execute_preparation(&self, debate: &Debate) -> Result<Debate, OrchestratorError> {
        self.execute_phase(debate, DebateState::Preparation).await
    }

    /// Preparation → OpeningStatements.
    pub async fn execute_opening_statements(&self, debate: &Debate) -> Result<Debate, OrchestratorError> {
        self.execute_phase(debate, DebateState::OpeningStatements).await
    }

    /// OpeningStatements → Rebuttals.
    pub async fn execute_rebuttals(&self, debate: &Debate) -> Result<Debate, OrchestratorError> {
        self.execute_phase(debate, DebateState::Rebuttals).await
    }

    /// Rebuttals → CrossExamination.
    pub async fn execute_cross_examination(&self, debate: &Debate) -> Result<Debate, OrchestratorError> {
        self.execute_phase(debate, DebateState::CrossExamination).await
    }

    /// CrossExamination → ClosingStatements.
    pub async fn execute_closing_statements(&self, debate: &Debate) -> Result<Debate, OrchestratorError> {
        self.execute_phase(debate, DebateState::ClosingStatements).await
    }

    /// ClosingStatements → Completed. Adds no round; stamps `completed_at`.
    pub fn complete_debate(&self, debate: &Debate) -> Result<Debate, OrchestratorError> {
        debate.state.check_transition(DebateState::Completed)?;

        let mut next = debate.clone();
        next.state = DebateState::Completed;
        next.completed_at = Some(Utc::now());
        info!(debate_id = %next.id, rounds = next.rounds.len(), "debate completed");
        Ok(next)
    }

    /// Write a partial transcript of `debate` now.
    pub async fn save_checkpoint(&self, debate: &Debate) -> Result<PathBuf, PersistenceError> {
        self.store.save_partial_transcript(debate).await
    }

    /// Write the final transcript of a completed debate.
    pub async fn save_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError> {
        let path = self.store.save_transcript(debate).await?;
        info!(debate_id = %debate.id, path = %path.display(), "transcript saved");
        Ok(path)
    }

    async fn execute_phase(&self, debate: &Debate, target: DebateState) -> Result<Debate, OrchestratorError> {
        debate.state.check_transition(target)?;
        let Some(round_type) = target.round_type() else {
            return Err(TransitionError {
                from: debate.state,
                to: target,
            }
            .into());
        };

        let mut next = debate.clone();
        next.state = target;
        info!(debate_id = %next.id, state = %target, "phase started");

        let executor = RoundExecutor::new(self.affirmative.as_ref(), self.negative.as_ref())
            .with_cancel(self.cancel.clone());

        match executor.execute(&next, round_type).await {
            Ok(outcome) => {
                if let Some(warning) = outcome.warning {
                    warn!(debate_id = %next.id, state = %target, "{}", warning);
                    next.warnings.push(DebateWarning {
                        message: warning.to_string(),
                        state: target,
                        timestamp: Utc::now(),
                    });
                }
                next.rounds.push(outcome.round);
                info!(
                    debate_id = %next.id,
                    state = %target,
                    rounds = next.rounds.len(),
                    "phase finished"
                );
                Ok(next)
            }
            Err(failure) => Err(self.fail(next, failure).await),
        }
    }

    /// Log the failure against the debate, checkpoint it, and build the error.
    async fn fail(&self, mut debate: Debate, failure: TurnFailure) -> OrchestratorError {
        let message = failure.error.to_string();
        debate.errors.push(DebateError {
            model: failure.model.clone(),
            message: message.clone(),
            state: debate.state,
            timestamp: Utc::now(),
        });
        error!(
            debate_id = %debate.id,
            state = %debate.state,
            model = %failure.model,
            position = %failure.position,
            error = %message,
            "generation failed"
        );

        let saved_to = match self.store.save_partial_transcript(&debate).await {
            Ok(path) => {
                info!(debate_id = %debate.id, path = %path.display(), "partial transcript saved");
                Some(path)
            }
            Err(e) => {
                error!(debate_id = %debate.id, error = %e, "failed to save partial transcript");
                None
            }
        };

        OrchestratorError::ModelGeneration {
            model: failure.model,
            position: failure.position,
            state: debate.state,
            message,
            snapshot: Box::new(debate),
            saved_to,
        }
    }
}
