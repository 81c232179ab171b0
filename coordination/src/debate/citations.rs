//! Citation tracking — sources cited by debaters, scoped to one debate.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::{Debate, Statement};
use super::state::{Position, RoundType};

/// How a source was cited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    Url,
    AuthorYear,
}

/// One cited source, tagged with who cited it and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub kind: CitationKind,
    /// Citation as written (URL, or `Author, Year`).
    pub source: String,
    pub model: String,
    pub position: Position,
    pub round: RoundType,
}

impl Citation {
    /// Key used for de-duplication.
    fn key(&self) -> String {
        match self.kind {
            CitationKind::Url => self.source.trim_end_matches('/').to_lowercase(),
            CitationKind::AuthorYear => self.source.to_lowercase(),
        }
    }
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>()\[\]"']+"#).expect("url pattern is valid")
    })
}

fn author_year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(([A-Z][A-Za-z'\-]+(?: (?:and|&) [A-Z][A-Za-z'\-]+| et al\.)?),? (\d{4}[a-z]?)\)")
            .expect("author-year pattern is valid")
    })
}

/// Extract citations from text, in order of appearance.
pub fn extract_citations(text: &str) -> Vec<(CitationKind, String)> {
    let mut found: Vec<(usize, CitationKind, String)> = Vec::new();

    for m in url_pattern().find_iter(text) {
        let url = m.as_str().trim_end_matches(&['.', ',', ';', ':', '!', '?'][..]);
        found.push((m.start(), CitationKind::Url, url.to_string()));
    }
    for caps in author_year_pattern().captures_iter(text) {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        found.push((
            start,
            CitationKind::AuthorYear,
            format!("{}, {}", &caps[1], &caps[2]),
        ));
    }

    found.sort_by_key(|(start, _, _)| *start);
    found.into_iter().map(|(_, kind, source)| (kind, source)).collect()
}

/// Accumulates unique citations across one debate.
#[derive(Debug, Default, Clone)]
pub struct CitationTracker {
    citations: Vec<Citation>,
    seen: HashSet<String>,
}

impl CitationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a statement's citations; returns the ones not seen before.
    pub fn record(&mut self, statement: &Statement, round: RoundType) -> Vec<Citation> {
        let mut added = Vec::new();
        for (kind, source) in extract_citations(&statement.content) {
            let citation = Citation {
                kind,
                source,
                model: statement.model.clone(),
                position: statement.position,
                round,
            };
            if self.seen.insert(citation.key()) {
                self.citations.push(citation.clone());
                added.push(citation);
            }
        }
        added
    }

    /// Record every statement of the debate's most recent round.
    pub fn record_latest_round(&mut self, debate: &Debate) -> Vec<Citation> {
        let Some(round) = debate.rounds.last() else {
            return Vec::new();
        };
        let round_type = round.round_type;
        round
            .statements()
            .flat_map(|s| self.record(s, round_type))
            .collect()
    }

    /// All unique citations in first-seen order.
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Citations made by one side.
    pub fn by_position(&self, position: Position) -> impl Iterator<Item = &Citation> {
        self.citations.iter().filter(move |c| c.position == position)
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    /// Numbered bibliography, one entry per line.
    pub fn bibliography(&self) -> String {
        self.citations
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!(
                    "[{}] {} - cited by {} ({}, {})",
                    i + 1,
                    c.source,
                    c.model,
                    c.position,
                    c.round
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
