use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use faq_core::{
    AskParams, AskResponse, FaqEntry, DEFAULT_MIN_SCORE, DEFAULT_TOP_N, FALLBACK_ANSWER,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FaqBody {
    pub question: String,
    pub answer: String,
}

impl From<&FaqEntry> for FaqBody {
    fn from(entry: &FaqEntry) -> Self {
        Self {
            question: entry.question.clone(),
            answer: entry.answer.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AskQuery {
    pub question: String,
    #[serde(default = "default_top_n")]
    pub top_n: i64,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

fn default_top_n() -> i64 {
    DEFAULT_TOP_N as i64
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub entries: usize,
}

/// Unknown keys are not an error: they get a 200 with the fallback answer.
pub async fn faq_handler(State(state): State<AppState>, Path(key): Path<String>) -> Json<FaqBody> {
    match state.matcher.knowledge_base().get(&key) {
        Ok(entry) => Json(FaqBody::from(entry)),
        Err(err) => {
            debug!(error = %err, "faq lookup fell back");
            Json(FaqBody {
                question: key,
                answer: FALLBACK_ANSWER.to_string(),
            })
        }
    }
}

pub async fn faqs_handler(State(state): State<AppState>) -> Json<Vec<FaqBody>> {
    Json(
        state
            .matcher
            .knowledge_base()
            .list_all()
            .iter()
            .map(FaqBody::from)
            .collect(),
    )
}

pub async fn ask_handler(
    State(state): State<AppState>,
    query: Result<Query<AskQuery>, QueryRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
    let params = AskParams::new(query.top_n, query.min_score)?;

    let matcher = state.matcher.clone();
    let question = query.question.clone();
    // the unmatched sink does blocking file I/O
    let outcome = tokio::task::spawn_blocking(move || matcher.ask(&question, params))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    if !outcome.is_match() {
        info!(question = %query.question, "no confident faq match");
    }

    Ok(Json(AskResponse::from_outcome(query.question, &outcome)))
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        entries: state.matcher.knowledge_base().len(),
    })
}
