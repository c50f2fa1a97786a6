use std::sync::Arc;

use chrono::Local;
use tracing::{debug, warn};

use crate::error::{FaqError, Result};
use crate::knowledge::KnowledgeBase;
use crate::model::{AskOutcome, AskParams, MatchResult};
use crate::similarity::{round_score, token_set_ratio};
use crate::unmatched::UnmatchedLog;

/// Ranks knowledge base entries against free-form questions.
///
/// Cheap to share: the knowledge base is read-only and the log sink handles
/// its own synchronisation, so one `Matcher` serves all request workers.
#[derive(Clone)]
pub struct Matcher {
    kb: Arc<KnowledgeBase>,
    unmatched: Arc<dyn UnmatchedLog>,
}

impl Matcher {
    pub fn new(kb: Arc<KnowledgeBase>, unmatched: Arc<dyn UnmatchedLog>) -> Self {
        Self { kb, unmatched }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Scores every entry against `text`, highest first. Equal scores keep
    /// knowledge base order. No threshold is applied and nothing is logged.
    pub fn rank(&self, text: &str) -> Vec<MatchResult> {
        let mut scored: Vec<MatchResult> = self
            .kb
            .list_all()
            .iter()
            .map(|entry| MatchResult {
                key: entry.key.clone(),
                question: entry.question.clone(),
                answer: entry.answer.clone(),
                score: round_score(token_set_ratio(text, &entry.question)),
            })
            .collect();

        // sort_by is stable, which is what keeps ties in declaration order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Like [`Matcher::ask`] but never writes to the unmatched log.
    pub fn suggest(&self, text: &str, params: AskParams) -> Result<AskOutcome> {
        if text.trim().is_empty() {
            return Err(FaqError::EmptyQuestion);
        }

        let top: Vec<MatchResult> = self
            .rank(text)
            .into_iter()
            .filter(|m| m.score >= params.min_score)
            .take(params.top_n)
            .collect();

        if top.is_empty() {
            Ok(AskOutcome::NoMatch)
        } else {
            Ok(AskOutcome::Matched(top))
        }
    }

    /// Returns up to `top_n` entries scoring at least `min_score`. When none
    /// qualify the question is appended to the unmatched log; a failing log
    /// is reported via `tracing` and does not affect the returned outcome.
    pub fn ask(&self, text: &str, params: AskParams) -> Result<AskOutcome> {
        let outcome = self.suggest(text, params)?;

        match &outcome {
            AskOutcome::Matched(matches) => {
                debug!(
                    question = text,
                    suggestions = matches.len(),
                    top_score = matches[0].score,
                    "faq match"
                );
            }
            AskOutcome::NoMatch => {
                debug!(question = text, min_score = params.min_score, "no faq match");
                if let Err(err) = self.unmatched.record(text, Local::now()) {
                    warn!(error = %err, "failed to record unmatched question");
                }
            }
        }

        Ok(outcome)
    }
}
