//! Transcript persistence — partial snapshots on failure, final transcripts
//! on completion, and integrity validation when loading them back.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::Debate;
use super::state::DebateState;

/// A serialized debate transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// Whether the debate was cut short.
    pub partial: bool,
    pub saved_at: DateTime<Utc>,
    pub debate: Debate,
}

impl TranscriptSnapshot {
    /// Current schema version.
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(debate: &Debate, partial: bool) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            partial,
            saved_at: Utc::now(),
            debate: debate.clone(),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(|e| PersistenceError::SerializeFailed {
            reason: e.to_string(),
        })
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| PersistenceError::DeserializeFailed {
                reason: e.to_string(),
            })?;

        if snapshot.version > Self::CURRENT_VERSION {
            return Err(PersistenceError::VersionMismatch {
                expected: Self::CURRENT_VERSION,
                found: snapshot.version,
            });
        }

        Ok(snapshot)
    }
}

/// Error during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Serialization failed.
    SerializeFailed { reason: String },
    /// Deserialization failed.
    DeserializeFailed { reason: String },
    /// Schema version mismatch.
    VersionMismatch { expected: u32, found: u32 },
    /// Integrity check failed on load.
    IntegrityCheckFailed { reason: String },
    /// Reading or writing storage failed.
    Io { path: PathBuf, reason: String },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SerializeFailed { reason } => write!(f, "serialize failed: {}", reason),
            Self::DeserializeFailed { reason } => write!(f, "deserialize failed: {}", reason),
            Self::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Self::IntegrityCheckFailed { reason } => {
                write!(f, "integrity check failed: {}", reason)
            }
            Self::Io { path, reason } => write!(f, "io error at {}: {}", path.display(), reason),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Integrity check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityStatus {
    /// Snapshot is consistent.
    Valid,
    /// Snapshot has minor issues but is usable.
    Recoverable { warnings: Vec<String> },
    /// Snapshot is corrupted.
    Corrupted { errors: Vec<String> },
}

impl IntegrityStatus {
    /// Whether the snapshot can be used.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Valid | Self::Recoverable { .. })
    }
}

/// Validate a snapshot's internal consistency.
pub fn validate_snapshot(snapshot: &TranscriptSnapshot) -> IntegrityStatus {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let debate = &snapshot.debate;

    if snapshot.version > TranscriptSnapshot::CURRENT_VERSION {
        errors.push(format!(
            "version {} > current {}",
            snapshot.version,
            TranscriptSnapshot::CURRENT_VERSION
        ));
    }

    // Rounds must be a prefix of the phase order. A partial snapshot may be
    // one round short: the failing phase has already entered its state.
    let expected = debate.state.completed_rounds();
    let actual = debate.rounds.len();
    let short_by_failing_phase = snapshot.partial && actual + 1 == expected;
    if actual != expected && !short_by_failing_phase {
        errors.push(format!(
            "state {} implies {} rounds, found {}",
            debate.state, expected, actual
        ));
    }

    let phase_rounds = DebateState::ORDER.iter().filter_map(|s| s.round_type());
    for (i, (round, expected_type)) in debate.rounds.iter().zip(phase_rounds).enumerate() {
        if round.round_type != expected_type {
            errors.push(format!(
                "round {} is {}, expected {}",
                i, round.round_type, expected_type
            ));
        }
    }

    if debate.state == DebateState::Completed && debate.completed_at.is_none() {
        errors.push("completed debate has no completed_at".to_string());
    }
    if debate.state != DebateState::Completed && debate.completed_at.is_some() {
        warnings.push(format!("completed_at set while in state {}", debate.state));
    }

    for err in &debate.errors {
        if err.state > debate.state {
            warnings.push(format!(
                "error from {} recorded in state {} after debate state {}",
                err.model, err.state, debate.state
            ));
        }
    }

    if snapshot.partial && debate.errors.is_empty() {
        warnings.push("partial transcript without a recorded error".to_string());
    }

    if !errors.is_empty() {
        IntegrityStatus::Corrupted { errors }
    } else if !warnings.is_empty() {
        IntegrityStatus::Recoverable { warnings }
    } else {
        IntegrityStatus::Valid
    }
}

/// Destination for transcripts.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Persist an incomplete debate, flagged `partial`.
    async fn save_partial_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError>;

    /// Persist a finished debate.
    async fn save_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError>;
}

/// Writes transcripts as pretty JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    dir: PathBuf,
}

impl FileTranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and validate a snapshot written by this store.
    pub async fn load(path: &Path) -> Result<(TranscriptSnapshot, IntegrityStatus), PersistenceError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| io_error(path, e))?;
        let snapshot = TranscriptSnapshot::from_json(&json)?;
        let status = validate_snapshot(&snapshot);

        if let IntegrityStatus::Corrupted { ref errors } = status {
            return Err(PersistenceError::IntegrityCheckFailed {
                reason: errors.join("; "),
            });
        }

        Ok((snapshot, status))
    }

    async fn write(&self, file_name: String, snapshot: TranscriptSnapshot) -> Result<PathBuf, PersistenceError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        let path = self.dir.join(file_name);
        let json = snapshot.to_json()?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), partial = snapshot.partial, "transcript written");
        Ok(path)
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn save_partial_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError> {
        let snapshot = TranscriptSnapshot::new(debate, true);
        let name = format!(
            "debate-{}-partial-{}.json",
            debate.id,
            snapshot.saved_at.timestamp_millis()
        );
        self.write(name, snapshot).await
    }

    async fn save_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError> {
        let name = format!("debate-{}.json", debate.id);
        self.write(name, TranscriptSnapshot::new(debate, false)).await
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Keeps transcripts in memory; each save returns a synthetic path.
#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    saved: Mutex<Vec<TranscriptSnapshot>>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots saved so far, oldest first.
    pub fn snapshots(&self) -> Vec<TranscriptSnapshot> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Option<TranscriptSnapshot> {
        self.snapshots().pop()
    }

    fn push(&self, snapshot: TranscriptSnapshot) -> Result<PathBuf, PersistenceError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| PersistenceError::SerializeFailed {
                reason: e.to_string(),
            })?;
        let kind = if snapshot.partial { "partial" } else { "final" };
        let path = PathBuf::from(format!(
            "memory://{}/{}/{}",
            snapshot.debate.id,
            kind,
            saved.len()
        ));
        saved.push(snapshot);
        Ok(path)
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn save_partial_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError> {
        self.push(TranscriptSnapshot::new(debate, true))
    }

    async fn save_transcript(&self, debate: &Debate) -> Result<PathBuf, PersistenceError> {
        self.push(TranscriptSnapshot::new(debate, false))
    }
}
