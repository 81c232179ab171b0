//! Debate agents — LLM-backed debaters, configuration loading and the
//! full-debate runner built on the `coordination` debate engine.

pub mod backends;
pub mod config;
pub mod runner;

pub use backends::{OpenAiDebater, ScriptedDebater};
pub use config::{AppConfig, ConfigError, EndpointConfig};
pub use runner::{render_summary, run_debate, DebateOutcome};
