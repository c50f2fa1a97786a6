use serde::{Deserialize, Serialize};

use crate::error::{FaqError, Result};

pub const DEFAULT_TOP_N: usize = 3;
pub const DEFAULT_MIN_SCORE: f64 = 45.0;
pub const MAX_TOP_N: usize = 100;

pub const FALLBACK_ANSWER: &str = "I'm sorry, I don't have an answer to that question yet.";
pub const NO_MATCH_ANSWER: &str = "Sorry, I couldn't find a close enough match.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub key: String,
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(key: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub key: String,
    pub question: String,
    pub answer: String,
    pub score: f64,
}

/// Result of [`crate::Matcher::ask`]. `NoMatch` is returned when nothing reached `min_score`.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    Matched(Vec<MatchResult>),
    NoMatch,
}

impl AskOutcome {
    pub fn suggestions(&self) -> &[MatchResult] {
        match self {
            AskOutcome::Matched(matches) => matches,
            AskOutcome::NoMatch => &[],
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, AskOutcome::Matched(_))
    }
}

/// One ranked entry as returned to callers; the key stays internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub question: String,
    pub answer: String,
    pub score: f64,
}

/// Response body for a free-text question. `answer` is only present, with
/// [`NO_MATCH_ANSWER`], when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub your_question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub suggestions: Vec<Suggestion>,
}

impl AskResponse {
    pub fn from_outcome(question: impl Into<String>, outcome: &AskOutcome) -> Self {
        let suggestions = outcome
            .suggestions()
            .iter()
            .map(|m| Suggestion {
                question: m.question.clone(),
                answer: m.answer.clone(),
                score: m.score,
            })
            .collect();
        let answer = match outcome {
            AskOutcome::Matched(_) => None,
            AskOutcome::NoMatch => Some(NO_MATCH_ANSWER.to_string()),
        };

        Self {
            your_question: question.into(),
            answer,
            suggestions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AskParams {
    pub top_n: usize,
    pub min_score: f64,
}

impl AskParams {
    /// Validates raw request values. `top_n` is signed so that zero and negative
    /// inputs from the wire are rejected here rather than wrapping.
    pub fn new(top_n: i64, min_score: f64) -> Result<Self> {
        if top_n < 1 || top_n > MAX_TOP_N as i64 {
            return Err(FaqError::InvalidTopN(top_n));
        }
        if !min_score.is_finite() || !(0.0..=100.0).contains(&min_score) {
            return Err(FaqError::InvalidMinScore(min_score));
        }

        Ok(Self {
            top_n: top_n as usize,
            min_score,
        })
    }
}

impl Default for AskParams {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}
