//! Full-debate runner: drives every phase in order and records citations.

use std::fmt::Write as _;
use std::path::PathBuf;

use coordination::{
    CitationTracker, Debate, DebateConfig, DebateOrchestrator, OrchestratorError, RoundType,
};
use tracing::{error, info};

/// A debate that ran to completion.
#[derive(Debug, Clone)]
pub struct DebateOutcome {
    pub debate: Debate,
    /// Final transcript location; `None` if saving failed.
    pub transcript: Option<PathBuf>,
}

/// Run all six phase operations, stopping at the first failure.
///
/// Citations from each finished round go into `tracker`. On success the
/// final transcript is saved through the orchestrator's store.
pub async fn run_debate(
    orchestrator: &DebateOrchestrator,
    topic: &str,
    config: DebateConfig,
    tracker: &mut CitationTracker,
) -> Result<DebateOutcome, OrchestratorError> {
    let debate = orchestrator.initialize_debate(topic, config);

    let debate = orchestrator.execute_preparation(&debate).await?;
    record(tracker, &debate);
    let debate = orchestrator.execute_opening_statements(&debate).await?;
    record(tracker, &debate);
    let debate = orchestrator.execute_rebuttals(&debate).await?;
    record(tracker, &debate);
    let debate = orchestrator.execute_cross_examination(&debate).await?;
    record(tracker, &debate);
    let debate = orchestrator.execute_closing_statements(&debate).await?;
    record(tracker, &debate);
    let debate = orchestrator.complete_debate(&debate)?;

    let transcript = match orchestrator.save_transcript(&debate).await {
        Ok(path) => Some(path),
        Err(e) => {
            error!(debate_id = %debate.id, error = %e, "failed to save final transcript");
            None
        }
    };

    Ok(DebateOutcome { debate, transcript })
}

fn record(tracker: &mut CitationTracker, debate: &Debate) {
    let added = tracker.record_latest_round(debate);
    if !added.is_empty() {
        info!(
            debate_id = %debate.id,
            state = %debate.state,
            new = added.len(),
            total = tracker.len(),
            "citations recorded"
        );
    }
}

/// Plain-text, per-round summary of a debate.
pub fn render_summary(debate: &Debate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Debate {}", debate.id);
    let _ = writeln!(out, "Motion: {}", debate.topic);
    let _ = writeln!(
        out,
        "Affirmative: {}  |  Negative: {}",
        debate.affirmative_model, debate.negative_model
    );
    let _ = writeln!(out, "Started: {}", debate.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(done) = debate.completed_at {
        let secs = (done - debate.created_at).num_milliseconds() as f64 / 1000.0;
        let _ = writeln!(out, "Finished: {} ({:.1}s)", done.format("%Y-%m-%d %H:%M:%S UTC"), secs);
    }

    for round in &debate.rounds {
        if round.round_type == RoundType::Preparation && !debate.config.show_preparation {
            continue;
        }
        let _ = writeln!(out, "\n== {} ==", round.round_type.title());
        for statement in round.statements() {
            let _ = writeln!(
                out,
                "\n[{} - {}, {} words]",
                statement.position, statement.model, statement.word_count
            );
            if statement.is_empty() {
                let _ = writeln!(out, "(no statement)");
            } else {
                let _ = writeln!(out, "{}", statement.content);
            }
        }
    }

    for warning in &debate.warnings {
        let _ = writeln!(out, "\nwarning ({}): {}", warning.state, warning.message);
    }
    for err in &debate.errors {
        let _ = writeln!(out, "\nerror ({}, {}): {}", err.state, err.model, err.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coordination::{initialize_debate, Position, Round, Statement};

    #[test]
    fn test_summary_hides_preparation_by_default() {
        let mut debate = initialize_debate("Ban cars", DebateConfig::default(), "a", "n");
        debate.rounds.push(Round {
            round_type: RoundType::Preparation,
            affirmative_statement: Some(Statement::new("a", Position::Affirmative, "secret notes")),
            negative_statement: Some(Statement::new("n", Position::Negative, "")),
            timestamp: chrono::Utc::now(),
        });
        debate.rounds.push(Round {
            round_type: RoundType::Opening,
            affirmative_statement: Some(Statement::new("a", Position::Affirmative, "Cars out.")),
            negative_statement: Some(Statement::new("n", Position::Negative, "Cars stay.")),
            timestamp: chrono::Utc::now(),
        });

        let summary = render_summary(&debate);
        assert!(summary.contains("Motion: Ban cars"));
        assert!(summary.contains("== Opening Statements =="));
        assert!(summary.contains("[affirmative - a, 2 words]"));
        assert!(!summary.contains("secret notes"));

        debate.config.show_preparation = true;
        let summary = render_summary(&debate);
        assert!(summary.contains("secret notes"));
        assert!(summary.contains("(no statement)"));
    }
}
