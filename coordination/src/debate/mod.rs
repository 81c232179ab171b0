//! Debate Orchestration — two debaters, five rounds, one fixed order.
//!
//! State machine for a structured debate between an affirmative and a
//! negative debater. Each phase operation takes a `Debate` and returns a new
//! one with exactly one more round.
//!
//! # Debate Flow
//!
//! ```text
//! Initialized → Preparation → OpeningStatements → Rebuttals
//!      │            │                 │               │
//!      │      (aff ∥ neg,        (aff → neg)     (aff → neg)
//!      │       deadline)                              │
//!      │                                              ▼
//!      │   Completed ← ClosingStatements ← CrossExamination
//!      │                    (aff → neg)    (aq → nr → nq → ar)
//!      │
//!      └─ generation failure at any phase → error logged,
//!         partial transcript saved, phase call fails
//! ```

pub mod backend;
pub mod citations;
pub mod config;
pub mod context;
pub mod executor;
pub mod model;
pub mod orchestrator;
pub mod persistence;
pub mod prompts;
pub mod state;
pub mod timeout;
pub mod word_limit;

pub use backend::{DebaterBackend, GenerationError};
pub use citations::{Citation, CitationKind, CitationTracker};
pub use config::DebateConfig;
pub use context::{build_context, GenerationContext, PriorStatement};
pub use executor::{CrossExamExchange, RoundExecutor, RoundOutcome, TurnFailure};
pub use model::{initialize_debate, Debate, DebateError, DebateWarning, Round, Statement};
pub use orchestrator::{DebateOrchestrator, OrchestratorError};
pub use persistence::{
    validate_snapshot, FileTranscriptStore, IntegrityStatus, MemoryTranscriptStore,
    PersistenceError, TranscriptSnapshot, TranscriptStore,
};
pub use prompts::{PromptBuilder, TurnKind, PROMPT_VERSION};
pub use state::{DebateState, Position, RoundType, TransitionError};
pub use timeout::{preparation_limit, research_depth_factor, Deadline, Slot, TimeoutWarning};
pub use word_limit::{count_words, enforce_word_limit};
