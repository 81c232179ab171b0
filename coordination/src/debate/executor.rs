//! Round executor — the turn-taking protocol for each round type.
//!
//! ```text
//! preparation     aff ─┐            (concurrent, deadline-bounded)
//!                 neg ─┘
//! opening/rebuttal/closing
//!                 aff → commit → neg → commit
//! cross_exam      aff asks → neg answers → neg asks → aff answers
//! ```
//!
//! Every statement passes through the word-limit enforcer before it is
//! committed; cross-exam fragments are joined first and limited as one
//! statement. Each step's prompt is built only after the previous step's
//! result is in hand. A failed preparation call ends the phase without
//! waiting for the other side.

use std::borrow::Cow;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::backend::{DebaterBackend, GenerationError};
use super::context::{build_context, GenerationContext};
use super::model::{Debate, Round, Statement};
use super::prompts::{PromptBuilder, TurnKind};
use super::state::{Position, RoundType};
use super::timeout::{preparation_limit, Deadline, Slot, TimeoutWarning};
use super::word_limit::{count_words, enforce_word_limit};

/// A generation call that failed mid-round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnFailure {
    pub position: Position,
    pub model: String,
    pub error: GenerationError,
}

/// A finished round plus anything worth surfacing about it.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub round: Round,
    pub warning: Option<TimeoutWarning>,
}

/// Round under construction. Statements are committed one at a time.
#[derive(Debug)]
struct RoundBuilder {
    round_type: RoundType,
    affirmative: Option<Statement>,
    negative: Option<Statement>,
}

impl RoundBuilder {
    fn new(round_type: RoundType) -> Self {
        Self {
            round_type,
            affirmative: None,
            negative: None,
        }
    }

    fn commit(&mut self, statement: Statement) {
        match statement.position {
            Position::Affirmative => self.affirmative = Some(statement),
            Position::Negative => self.negative = Some(statement),
        }
    }

    fn finish(self) -> Round {
        Round {
            round_type: self.round_type,
            affirmative_statement: self.affirmative,
            negative_statement: self.negative,
            timestamp: Utc::now(),
        }
    }
}

/// The four fragments of a cross-examination, in the order they were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossExamExchange {
    pub affirmative_question: String,
    pub negative_response: String,
    pub negative_question: String,
    pub affirmative_response: String,
}

impl CrossExamExchange {
    /// Affirmative: its question then its answer. Negative: its answer then its question.
    /// Each joined statement is held to `word_limit` (`0` = unlimited).
    pub fn into_statements(
        self,
        affirmative_model: &str,
        negative_model: &str,
        word_limit: usize,
    ) -> (Statement, Statement) {
        let affirmative = join_fragments(&self.affirmative_question, &self.affirmative_response);
        let negative = join_fragments(&self.negative_response, &self.negative_question);
        (
            Statement::new(
                affirmative_model,
                Position::Affirmative,
                enforce_word_limit(&affirmative, word_limit),
            ),
            Statement::new(
                negative_model,
                Position::Negative,
                enforce_word_limit(&negative, word_limit),
            ),
        )
    }
}

fn log_truncation(debate: &Debate, position: Position, model: &str, raw: &str, limit: usize) {
    warn!(
        debate_id = %debate.id,
        %position,
        %model,
        words = count_words(raw),
        limit,
        "statement truncated to word limit"
    );
}

fn join_fragments(first: &str, second: &str) -> String {
    format!("{}\n\n{}", first.trim_end(), second.trim_start())
}

/// Drives one round against the two bound debaters.
pub struct RoundExecutor<'a> {
    affirmative: &'a dyn DebaterBackend,
    negative: &'a dyn DebaterBackend,
    cancel: CancellationToken,
}

impl<'a> RoundExecutor<'a> {
    pub fn new(affirmative: &'a dyn DebaterBackend, negative: &'a dyn DebaterBackend) -> Self {
        Self {
            affirmative,
            negative,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that, when cancelled, ends preparation early.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn backend(&self, position: Position) -> &'a dyn DebaterBackend {
        match position {
            Position::Affirmative => self.affirmative,
            Position::Negative => self.negative,
        }
    }

    /// Run the protocol for `round_type` against the debate as it stands.
    pub async fn execute(&self, debate: &Debate, round_type: RoundType) -> Result<RoundOutcome, TurnFailure> {
        match round_type {
            RoundType::Preparation => self.run_preparation(debate).await,
            RoundType::CrossExam => self.run_cross_exam(debate).await.map(|round| RoundOutcome {
                round,
                warning: None,
            }),
            RoundType::Opening | RoundType::Rebuttal | RoundType::Closing => self
                .run_sequential(debate, round_type)
                .await
                .map(|round| RoundOutcome {
                    round,
                    warning: None,
                }),
        }
    }

    /// One generation call, truncated to the debate's word limit.
    async fn generate(
        &self,
        debate: &Debate,
        position: Position,
        turn: &TurnKind<'_>,
        context: &GenerationContext,
    ) -> Result<String, TurnFailure> {
        let raw = self.generate_raw(debate, position, turn, context).await?;
        let limit = debate.config.effective_word_limit();
        let text = enforce_word_limit(&raw, limit);
        if let Cow::Owned(_) = text {
            log_truncation(debate, position, &self.backend(position).model_name(), &raw, limit);
        }
        Ok(text.into_owned())
    }

    /// One generation call, untruncated.
    async fn generate_raw(
        &self,
        debate: &Debate,
        position: Position,
        turn: &TurnKind<'_>,
        context: &GenerationContext,
    ) -> Result<String, TurnFailure> {
        let backend = self.backend(position);
        let model = backend.model_name();
        let prompt = PromptBuilder::new(&debate.topic, &debate.config).build(position, turn);

        debug!(
            debate_id = %debate.id,
            %position,
            round = %context.round_type,
            %model,
            prior = context.previous_statements.len(),
            "generation call"
        );

        backend
            .generate_response(&prompt, context)
            .await
            .map_err(|error| TurnFailure {
                position,
                model,
                error,
            })
    }

    async fn statement(
        &self,
        debate: &Debate,
        position: Position,
        round_type: RoundType,
    ) -> Result<Statement, TurnFailure> {
        let context = build_context(debate, position, round_type);
        let content = self
            .generate(debate, position, &TurnKind::Statement(round_type), &context)
            .await?;
        Ok(Statement::new(
            self.backend(position).model_name(),
            position,
            content,
        ))
    }

    async fn run_sequential(&self, debate: &Debate, round_type: RoundType) -> Result<Round, TurnFailure> {
        let mut round = RoundBuilder::new(round_type);

        let affirmative = self.statement(debate, Position::Affirmative, round_type).await?;
        round.commit(affirmative);

        let negative = self.statement(debate, Position::Negative, round_type).await?;
        round.commit(negative);

        Ok(round.finish())
    }

    async fn run_preparation(&self, debate: &Debate) -> Result<RoundOutcome, TurnFailure> {
        let limit = preparation_limit(&debate.config);
        let deadline = Deadline::after(limit).with_cancel(self.cancel.child_token());

        let (affirmative, negative) = deadline
            .race_pair(
                self.statement(debate, Position::Affirmative, RoundType::Preparation),
                self.statement(debate, Position::Negative, RoundType::Preparation),
            )
            .await?;

        let mut round = RoundBuilder::new(RoundType::Preparation);
        let mut abandoned = Vec::new();
        for (position, slot) in [(Position::Affirmative, affirmative), (Position::Negative, negative)] {
            match slot {
                Slot::Finished(statement) => round.commit(statement),
                Slot::Abandoned => {
                    abandoned.push(position);
                    round.commit(Statement::new(
                        self.backend(position).model_name(),
                        position,
                        String::new(),
                    ));
                }
            }
        }

        let warning = (!abandoned.is_empty()).then(|| TimeoutWarning {
            limit: if self.cancel.is_cancelled() { None } else { limit },
            abandoned,
        });

        Ok(RoundOutcome {
            round: round.finish(),
            warning,
        })
    }

    async fn run_cross_exam(&self, debate: &Debate) -> Result<Round, TurnFailure> {
        let aff_ctx = build_context(debate, Position::Affirmative, RoundType::CrossExam);
        let neg_ctx = build_context(debate, Position::Negative, RoundType::CrossExam);

        let affirmative_question = self
            .generate_raw(debate, Position::Affirmative, &TurnKind::CrossExamQuestion, &aff_ctx)
            .await?;
        let negative_response = self
            .generate_raw(
                debate,
                Position::Negative,
                &TurnKind::CrossExamResponse {
                    question: &affirmative_question,
                },
                &neg_ctx,
            )
            .await?;
        let negative_question = self
            .generate_raw(debate, Position::Negative, &TurnKind::CrossExamQuestion, &neg_ctx)
            .await?;
        let affirmative_response = self
            .generate_raw(
                debate,
                Position::Affirmative,
                &TurnKind::CrossExamResponse {
                    question: &negative_question,
                },
                &aff_ctx,
            )
            .await?;

        let exchange = CrossExamExchange {
            affirmative_question,
            negative_response,
            negative_question,
            affirmative_response,
        };
        let limit = debate.config.effective_word_limit();
        let raw_words = [
            count_words(&exchange.affirmative_question) + count_words(&exchange.affirmative_response),
            count_words(&exchange.negative_response) + count_words(&exchange.negative_question),
        ];
        let (affirmative, negative) = exchange.into_statements(
            &self.affirmative.model_name(),
            &self.negative.model_name(),
            limit,
        );
        for (statement, words) in [(&affirmative, raw_words[0]), (&negative, raw_words[1])] {
            if limit > 0 && words > limit {
                warn!(
                    debate_id = %debate.id,
                    position = %statement.position,
                    model = %statement.model,
                    words,
                    limit,
                    "statement truncated to word limit"
                );
            }
        }

        let mut round = RoundBuilder::new(RoundType::CrossExam);
        round.commit(affirmative);
        round.commit(negative);
        Ok(round.finish())
    }
}
