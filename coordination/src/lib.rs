//! Debate Coordination Library
//!
//! This library provides:
//! - A strict phase state machine for two-debater structured debates
//! - The turn-taking protocol for each round, with per-turn context building
//! - A deadline-bounded, concurrent preparation phase
//! - Word-limit enforcement on every generated statement
//! - Error logging and partial-transcript persistence on debater failure
//! - A per-debate citation accumulator
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use coordination::{DebateConfig, DebateOrchestrator, DebaterBackend, FileTranscriptStore};
//!
//! # async fn run(aff: Arc<dyn DebaterBackend>, neg: Arc<dyn DebaterBackend>) -> Result<(), coordination::OrchestratorError> {
//! let store = Arc::new(FileTranscriptStore::new("./transcripts"));
//! let orch = DebateOrchestrator::new(aff, neg, store);
//!
//! let debate = orch.initialize_debate("Cities should ban cars", DebateConfig::default());
//! let debate = orch.execute_preparation(&debate).await?;
//! let debate = orch.execute_opening_statements(&debate).await?;
//! let debate = orch.execute_rebuttals(&debate).await?;
//! let debate = orch.execute_cross_examination(&debate).await?;
//! let debate = orch.execute_closing_statements(&debate).await?;
//! let debate = orch.complete_debate(&debate)?;
//! assert!(debate.is_complete());
//! # Ok(())
//! # }
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod debate;

// Re-export key debate types
pub use debate::{
    build_context, initialize_debate, CitationTracker, Debate, DebateConfig, DebateError,
    DebateOrchestrator, DebateState, DebaterBackend, GenerationContext, GenerationError,
    OrchestratorError, Position, Round, RoundType, Statement, TransitionError,
};

// Re-export persistence types
pub use debate::{
    FileTranscriptStore, IntegrityStatus, MemoryTranscriptStore, PersistenceError,
    TranscriptSnapshot, TranscriptStore,
};

// Re-export pure helpers
pub use debate::{count_words, enforce_word_limit, preparation_limit, research_depth_factor};
