//! Debate state machine — phases, positions, round types, and the
//! transition table that orders them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a debate.
///
/// States advance along a single fixed line; see [`DebateState::valid_transitions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DebateState {
    /// Debate created, no phase run yet.
    Initialized,
    /// Both debaters researching the topic.
    Preparation,
    /// Opening statements delivered.
    OpeningStatements,
    /// Rebuttals delivered.
    Rebuttals,
    /// Cross-examination exchange finished.
    CrossExamination,
    /// Closing statements delivered.
    ClosingStatements,
    /// Debate finished.
    Completed,
}

impl DebateState {
    /// Every state in transition order.
    pub const ORDER: [DebateState; 7] = [
        Self::Initialized,
        Self::Preparation,
        Self::OpeningStatements,
        Self::Rebuttals,
        Self::CrossExamination,
        Self::ClosingStatements,
        Self::Completed,
    ];

    /// Whether this is a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(self) -> &'static [DebateState] {
        match self {
            Self::Initialized => &[Self::Preparation],
            Self::Preparation => &[Self::OpeningStatements],
            Self::OpeningStatements => &[Self::Rebuttals],
            Self::Rebuttals => &[Self::CrossExamination],
            Self::CrossExamination => &[Self::ClosingStatements],
            Self::ClosingStatements => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    /// The single state that may follow this one.
    pub fn next(self) -> Option<DebateState> {
        self.valid_transitions().first().copied()
    }

    /// Check that `to` may follow this state.
    pub fn check_transition(self, to: DebateState) -> Result<(), TransitionError> {
        if self.valid_transitions().contains(&to) {
            Ok(())
        } else {
            Err(TransitionError { from: self, to })
        }
    }

    /// The round a transition into this state appends, if any.
    ///
    /// `Completed` appends none; `Initialized` is never entered.
    pub fn round_type(self) -> Option<RoundType> {
        match self {
            Self::Preparation => Some(RoundType::Preparation),
            Self::OpeningStatements => Some(RoundType::Opening),
            Self::Rebuttals => Some(RoundType::Rebuttal),
            Self::CrossExamination => Some(RoundType::CrossExam),
            Self::ClosingStatements => Some(RoundType::Closing),
            Self::Initialized | Self::Completed => None,
        }
    }

    /// Number of rounds a debate in this state has recorded.
    pub fn completed_rounds(self) -> usize {
        match self {
            Self::Initialized => 0,
            Self::Preparation => 1,
            Self::OpeningStatements => 2,
            Self::Rebuttals => 3,
            Self::CrossExamination => 4,
            Self::ClosingStatements | Self::Completed => 5,
        }
    }
}

impl std::fmt::Display for DebateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized => write!(f, "initialized"),
            Self::Preparation => write!(f, "preparation"),
            Self::OpeningStatements => write!(f, "opening_statements"),
            Self::Rebuttals => write!(f, "rebuttals"),
            Self::CrossExamination => write!(f, "cross_examination"),
            Self::ClosingStatements => write!(f, "closing_statements"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Kind of round appended by a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    Preparation,
    Opening,
    Rebuttal,
    CrossExam,
    Closing,
}

impl RoundType {
    /// The state a debate is in once a round of this type has been appended.
    pub fn state(self) -> DebateState {
        match self {
            Self::Preparation => DebateState::Preparation,
            Self::Opening => DebateState::OpeningStatements,
            Self::Rebuttal => DebateState::Rebuttals,
            Self::CrossExam => DebateState::CrossExamination,
            Self::Closing => DebateState::ClosingStatements,
        }
    }

    /// Human-readable title for transcripts.
    pub fn title(self) -> &'static str {
        match self {
            Self::Preparation => "Preparation",
            Self::Opening => "Opening Statements",
            Self::Rebuttal => "Rebuttals",
            Self::CrossExam => "Cross-Examination",
            Self::Closing => "Closing Statements",
        }
    }
}

impl std::fmt::Display for RoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preparation => write!(f, "preparation"),
            Self::Opening => write!(f, "opening"),
            Self::Rebuttal => write!(f, "rebuttal"),
            Self::CrossExam => write!(f, "cross_exam"),
            Self::Closing => write!(f, "closing"),
        }
    }
}

/// Side a debater argues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Affirmative,
    Negative,
}

impl Position {
    /// The other side.
    pub fn opponent(self) -> Position {
        match self {
            Self::Affirmative => Self::Negative,
            Self::Negative => Self::Affirmative,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Affirmative => write!(f, "affirmative"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// A phase operation was attempted out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid state transition {from} → {to}")]
pub struct TransitionError {
    pub from: DebateState,
    pub to: DebateState,
}
