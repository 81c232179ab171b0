//! Debate configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for one debate.
///
/// The orchestrator reads `word_limit`, `preparation_time` and the research
/// depths; the remaining fields steer prompts and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Overall time limit in seconds (presentation only).
    pub time_limit: Option<u64>,
    /// Maximum words per statement; `None` or `0` disables truncation.
    pub word_limit: Option<u32>,
    /// Ask debaters to stay strictly on the topic.
    pub strict_mode: bool,
    /// Show preparation notes in transcripts.
    pub show_preparation: bool,
    /// Questions each side may pose during cross-examination.
    pub num_cross_exam_questions: u32,
    /// Base preparation deadline in seconds; `None` waits for both debaters.
    pub preparation_time: Option<u64>,
    /// Research depth (0–10) of the affirmative debater.
    pub affirmative_research_depth: Option<u8>,
    /// Research depth (0–10) of the negative debater.
    pub negative_research_depth: Option<u8>,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            word_limit: None,
            strict_mode: false,
            show_preparation: false,
            num_cross_exam_questions: 3,
            preparation_time: None,
            affirmative_research_depth: None,
            negative_research_depth: None,
        }
    }
}

impl DebateConfig {
    /// Create config from defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `DEBATE_*` environment variables onto this config.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay `DEBATE_*` settings read through `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let parse = |key: &str| lookup(key).map(|v| v.trim().to_string());
        if let Some(n) = parse("DEBATE_WORD_LIMIT").and_then(|v| v.parse().ok()) {
            self.word_limit = Some(n);
        }
        if let Some(n) = parse("DEBATE_PREPARATION_TIME").and_then(|v| v.parse().ok()) {
            self.preparation_time = Some(n);
        }
        if let Some(n) = parse("DEBATE_TIME_LIMIT").and_then(|v| v.parse().ok()) {
            self.time_limit = Some(n);
        }
        if let Some(n) = parse("DEBATE_CROSS_EXAM_QUESTIONS").and_then(|v| v.parse().ok()) {
            self.num_cross_exam_questions = n;
        }
        if let Some(val) = parse("DEBATE_STRICT_MODE") {
            self.strict_mode = parse_flag(&val);
        }
        if let Some(val) = parse("DEBATE_SHOW_PREPARATION") {
            self.show_preparation = parse_flag(&val);
        }
    }

    /// Word limit as used by truncation (`0` = unlimited).
    pub fn effective_word_limit(&self) -> usize {
        self.word_limit.unwrap_or(0) as usize
    }

    /// Base preparation deadline before research-depth scaling.
    pub fn base_preparation_time(&self) -> Option<Duration> {
        self.preparation_time.map(Duration::from_secs)
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}
