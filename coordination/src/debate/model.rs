//! Debate data model — statements, rounds, the error log, and the debate
//! value that phase operations advance.
//!
//! A [`Debate`] is never mutated in place by the orchestrator: every phase
//! operation clones it, appends at most one [`Round`], and returns the new
//! value. Callers keep whichever snapshot they hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::DebateConfig;
use super::state::{DebateState, Position, RoundType};
use super::word_limit::count_words;

/// One piece of generated text attributed to a model and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Model identifier of the debater that produced it.
    pub model: String,
    pub position: Position,
    pub content: String,
    pub word_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl Statement {
    /// Build a statement, counting words from `content`.
    pub fn new(model: impl Into<String>, position: Position, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            model: model.into(),
            position,
            word_count: count_words(&content),
            content,
            generated_at: Utc::now(),
        }
    }

    /// Whether the statement carries no text (e.g. preparation cut off).
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// One phase's pair of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    #[serde(rename = "type")]
    pub round_type: RoundType,
    pub affirmative_statement: Option<Statement>,
    pub negative_statement: Option<Statement>,
    pub timestamp: DateTime<Utc>,
}

impl Round {
    /// The statement delivered by `position`, if any.
    pub fn statement(&self, position: Position) -> Option<&Statement> {
        match position {
            Position::Affirmative => self.affirmative_statement.as_ref(),
            Position::Negative => self.negative_statement.as_ref(),
        }
    }

    /// Statements in affirmative-then-negative order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.affirmative_statement
            .iter()
            .chain(self.negative_statement.iter())
    }
}

/// A failed generation call, logged against the debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateError {
    /// Model whose call failed.
    pub model: String,
    /// Failure reason.
    pub message: String,
    /// Debate state at the time of failure.
    pub state: DebateState,
    pub timestamp: DateTime<Utc>,
}

/// Non-fatal condition surfaced during a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateWarning {
    pub message: String,
    pub state: DebateState,
    pub timestamp: DateTime<Utc>,
}

/// A structured debate between two models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debate {
    pub id: String,
    pub topic: String,
    pub config: DebateConfig,
    pub state: DebateState,
    pub affirmative_model: String,
    pub negative_model: String,
    /// One entry per completed phase, in phase order.
    pub rounds: Vec<Round>,
    /// Append-only generation failure log.
    pub errors: Vec<DebateError>,
    /// Append-only warning log (preparation timeouts).
    #[serde(default)]
    pub warnings: Vec<DebateWarning>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Create a fresh debate in [`DebateState::Initialized`].
pub fn initialize_debate(
    topic: &str,
    config: DebateConfig,
    affirmative_model: &str,
    negative_model: &str,
) -> Debate {
    Debate {
        id: Uuid::new_v4().to_string(),
        topic: topic.to_string(),
        config,
        state: DebateState::Initialized,
        affirmative_model: affirmative_model.to_string(),
        negative_model: negative_model.to_string(),
        rounds: Vec::new(),
        errors: Vec::new(),
        warnings: Vec::new(),
        created_at: Utc::now(),
        completed_at: None,
    }
}

impl Debate {
    /// The round of the given type, if it has been recorded.
    pub fn round(&self, round_type: RoundType) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_type == round_type)
    }

    /// Model bound to a position.
    pub fn model_for(&self, position: Position) -> &str {
        match position {
            Position::Affirmative => &self.affirmative_model,
            Position::Negative => &self.negative_model,
        }
    }

    /// Whether the debate has reached its terminal state.
    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }

    /// Compact status line.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] {} rounds | {} errors | {} vs {} | topic={}",
            self.state,
            self.rounds.len(),
            self.errors.len(),
            self.affirmative_model,
            self.negative_model,
            self.topic
        )
    }
}
