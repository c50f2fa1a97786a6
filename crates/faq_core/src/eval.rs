use crate::error::Result;
use crate::matcher::Matcher;
use crate::model::{AskOutcome, AskParams};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_REQUIRED_PASS_RATE: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Miss,
}

/// A labelled question. `expected_key` is only checked for hits and names the
/// entry expected as the top suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    pub expected_decision: Decision,
    #[serde(default)]
    pub expected_key: Option<String>,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_decision: Decision,
    pub actual_key: Option<String>,
    pub score: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f64) -> bool {
        self.total > 0 && self.pass_rate >= required_pass_rate
    }
}

fn case_passed(case: &EvalCase, decision: Decision, key: Option<&str>, score: f64) -> bool {
    if case.expected_decision != decision {
        return false;
    }

    if decision == Decision::Hit {
        if let Some(expected) = case.expected_key.as_deref() {
            if key != Some(expected) {
                return false;
            }
        }
    }

    if let Some(min) = case.min_score {
        if score < min {
            return false;
        }
    }

    true
}

/// Runs every case through the matcher without touching the unmatched log.
pub fn evaluate_cases(
    matcher: &Matcher,
    cases: &[EvalCase],
    params: AskParams,
) -> Result<EvalSummary> {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let outcome = matcher.suggest(&case.question, params)?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (decision, key, score) = match &outcome {
            AskOutcome::Matched(matches) => {
                (Decision::Hit, Some(matches[0].key.clone()), matches[0].score)
            }
            AskOutcome::NoMatch => {
                let best = matcher.rank(&case.question).first().map_or(0.0, |m| m.score);
                (Decision::Miss, None, best)
            }
        };

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed: case_passed(case, decision, key.as_deref(), score),
            actual_decision: decision,
            actual_key: key,
            score,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    Ok(EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    })
}
