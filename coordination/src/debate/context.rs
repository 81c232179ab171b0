//! Generation context — which prior statements a debater sees on its turn.
//!
//! | round        | previous statements                                  |
//! |--------------|------------------------------------------------------|
//! | preparation  | none                                                 |
//! | opening      | none                                                 |
//! | rebuttal     | opponent's opening                                   |
//! | cross_exam   | opponent's opening, opponent's rebuttal              |
//! | closing      | opening, rebuttal, cross_exam; aff before neg each   |
//!
//! Rounds that have not happened yet contribute nothing.

use serde::{Deserialize, Serialize};

use super::model::Debate;
use super::state::{Position, RoundType};

/// One prior statement as shown to a debater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorStatement {
    pub position: Position,
    pub content: String,
    pub round_type: RoundType,
}

/// Input handed to a debater alongside its prompt. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    pub position: Position,
    pub round_type: RoundType,
    pub previous_statements: Vec<PriorStatement>,
}

impl GenerationContext {
    /// Context with no prior statements.
    pub fn empty(position: Position, round_type: RoundType) -> Self {
        Self {
            position,
            round_type,
            previous_statements: Vec::new(),
        }
    }
}

const CLOSING_SOURCES: [RoundType; 3] = [RoundType::Opening, RoundType::Rebuttal, RoundType::CrossExam];

/// Compute the context `position` sees when generating for `round_type`.
pub fn build_context(debate: &Debate, position: Position, round_type: RoundType) -> GenerationContext {
    let opponent = position.opponent();
    let previous_statements = match round_type {
        RoundType::Preparation | RoundType::Opening => Vec::new(),
        RoundType::Rebuttal => collect(debate, &[RoundType::Opening], &[opponent]),
        RoundType::CrossExam => collect(
            debate,
            &[RoundType::Opening, RoundType::Rebuttal],
            &[opponent],
        ),
        RoundType::Closing => collect(
            debate,
            &CLOSING_SOURCES,
            &[Position::Affirmative, Position::Negative],
        ),
    };

    GenerationContext {
        position,
        round_type,
        previous_statements,
    }
}

/// Statements from `rounds` (in the given order) by `positions` (in the given order).
fn collect(debate: &Debate, rounds: &[RoundType], positions: &[Position]) -> Vec<PriorStatement> {
    let mut out = Vec::new();
    for &round_type in rounds {
        let Some(round) = debate.round(round_type) else {
            continue;
        };
        for &position in positions {
            if let Some(statement) = round.statement(position) {
                out.push(PriorStatement {
                    position,
                    content: statement.content.clone(),
                    round_type,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::debate::config::DebateConfig;
    use crate::debate::model::{initialize_debate, Round, Statement};

    fn round(round_type: RoundType, aff: &str, neg: &str) -> Round {
        Round {
            round_type,
            affirmative_statement: Some(Statement::new("a", Position::Affirmative, aff)),
            negative_statement: Some(Statement::new("n", Position::Negative, neg)),
            timestamp: Utc::now(),
        }
    }

    fn debate_with(rounds: Vec<Round>) -> Debate {
        let mut debate = initialize_debate("X", DebateConfig::default(), "a", "n");
        debate.rounds = rounds;
        debate
    }

    fn pairs(ctx: &GenerationContext) -> Vec<(Position, &str)> {
        ctx.previous_statements
            .iter()
            .map(|s| (s.position, s.content.as_str()))
            .collect()
    }

    fn full_debate() -> Debate {
        debate_with(vec![
            round(RoundType::Preparation, "AP", "NP"),
            round(RoundType::Opening, "A1", "N1"),
            round(RoundType::Rebuttal, "A2", "N2"),
            round(RoundType::CrossExam, "A3", "N3"),
        ])
    }

    #[test]
    fn test_opening_and_preparation_are_blind() {
        let debate = full_debate();
        for rt in [RoundType::Preparation, RoundType::Opening] {
            for pos in [Position::Affirmative, Position::Negative] {
                let ctx = build_context(&debate, pos, rt);
                assert!(ctx.previous_statements.is_empty());
                assert_eq!(ctx.position, pos);
                assert_eq!(ctx.round_type, rt);
            }
        }
    }

    #[test]
    fn test_rebuttal_sees_only_opponent_opening() {
        let debate = full_debate();
        let ctx = build_context(&debate, Position::Negative, RoundType::Rebuttal);
        assert_eq!(pairs(&ctx), vec![(Position::Affirmative, "A1")]);
        let ctx = build_context(&debate, Position::Affirmative, RoundType::Rebuttal);
        assert_eq!(pairs(&ctx), vec![(Position::Negative, "N1")]);
    }

    #[test]
    fn test_cross_exam_sees_opponent_opening_then_rebuttal() {
        let debate = full_debate();
        let ctx = build_context(&debate, Position::Affirmative, RoundType::CrossExam);
        assert_eq!(
            pairs(&ctx),
            vec![(Position::Negative, "N1"), (Position::Negative, "N2")]
        );
        assert_eq!(ctx.previous_statements[0].round_type, RoundType::Opening);
        assert_eq!(ctx.previous_statements[1].round_type, RoundType::Rebuttal);
    }

    #[test]
    fn test_closing_interleaves_three_rounds() {
        let debate = full_debate();
        let ctx = build_context(&debate, Position::Negative, RoundType::Closing);
        assert_eq!(
            pairs(&ctx),
            vec![
                (Position::Affirmative, "A1"),
                (Position::Negative, "N1"),
                (Position::Affirmative, "A2"),
                (Position::Negative, "N2"),
                (Position::Affirmative, "A3"),
                (Position::Negative, "N3"),
            ]
        );
    }

    #[test]
    fn test_missing_rounds_degrade_gracefully() {
        let debate = debate_with(vec![round(RoundType::Opening, "A1", "N1")]);
        let ctx = build_context(&debate, Position::Affirmative, RoundType::CrossExam);
        assert_eq!(pairs(&ctx), vec![(Position::Negative, "N1")]);
        let ctx = build_context(&debate, Position::Affirmative, RoundType::Closing);
        assert_eq!(ctx.previous_statements.len(), 2);

        let empty = debate_with(vec![]);
        let ctx = build_context(&empty, Position::Negative, RoundType::Rebuttal);
        assert!(ctx.previous_statements.is_empty());
    }
}
