//! Turn prompts for each step of the debate protocol.
//!
//! Prompt versioning: bump `PROMPT_VERSION` whenever prompt wording changes
//! so transcripts can be traced back to the prompts that produced them.

use super::config::DebateConfig;
use super::state::{Position, RoundType};

/// Prompt version. Bump on any wording change.
pub const PROMPT_VERSION: &str = "1.2.0";

/// One step of a round, each with its own prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnKind<'a> {
    /// A single statement for a non-cross-exam round.
    Statement(RoundType),
    /// Cross-examination: pose questions to the opponent.
    CrossExamQuestion,
    /// Cross-examination: answer the opponent's questions.
    CrossExamResponse { question: &'a str },
}

/// Builds turn prompts for one debate.
#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    topic: &'a str,
    config: &'a DebateConfig,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(topic: &'a str, config: &'a DebateConfig) -> Self {
        Self { topic, config }
    }

    /// Full prompt for `position` taking `turn`.
    pub fn build(&self, position: Position, turn: &TurnKind<'_>) -> String {
        let mut prompt = format!(
            "DEBATE TOPIC: {}\nYOUR POSITION: {}\n\n",
            self.topic,
            stance(position)
        );
        prompt.push_str(&self.instructions(turn));

        if self.config.strict_mode {
            prompt.push_str(
                "\n\nStay strictly on the topic. Do not introduce unrelated subjects \
                 or concede your position.",
            );
        }
        if let Some(limit) = self.config.word_limit.filter(|&n| n > 0) {
            prompt.push_str(&format!(
                "\n\nYour response must not exceed {} words; anything longer will be cut off.",
                limit
            ));
        }
        prompt
    }

    fn instructions(&self, turn: &TurnKind<'_>) -> String {
        match turn {
            TurnKind::Statement(RoundType::Preparation) => "\
Prepare for the debate. Research the topic and write concise notes: the \
strongest arguments for your position, the evidence behind them (cite \
sources as URLs or (Author, Year)), and the objections you expect."
                .to_string(),
            TurnKind::Statement(RoundType::Opening) => "\
Deliver your opening statement. Define the key terms, state your thesis, \
and lay out your main arguments with supporting evidence."
                .to_string(),
            TurnKind::Statement(RoundType::Rebuttal) => "\
Deliver your rebuttal. Respond directly to your opponent's opening \
statement: identify its weakest claims and counter them with evidence."
                .to_string(),
            TurnKind::Statement(RoundType::Closing) => "\
Deliver your closing statement. Summarise the debate so far, explain why \
your arguments prevailed, and address your opponent's strongest point."
                .to_string(),
            TurnKind::Statement(RoundType::CrossExam) | TurnKind::CrossExamQuestion => format!(
                "Cross-examination: ask your opponent up to {} pointed questions that \
                 expose weaknesses in their opening statement and rebuttal. \
                 Number each question.",
                self.config.num_cross_exam_questions.max(1)
            ),
            TurnKind::CrossExamResponse { question } => format!(
                "Cross-examination: your opponent has asked you the following:\n\n\
                 {}\n\nAnswer each question directly and concisely, defending your position.",
                question
            ),
        }
    }
}

fn stance(position: Position) -> &'static str {
    match position {
        Position::Affirmative => "AFFIRMATIVE (argue in favour of the topic)",
        Position::Negative => "NEGATIVE (argue against the topic)",
    }
}
