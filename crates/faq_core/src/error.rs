use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("no faq entry with key '{0}'")]
    NotFound(String),

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("top_n must be between 1 and {max}, got {0}", max = crate::model::MAX_TOP_N)]
    InvalidTopN(i64),

    #[error("min_score must be between 0 and 100, got {0}")]
    InvalidMinScore(f64),

    #[error("duplicate faq key '{0}'")]
    DuplicateKey(String),

    #[error("invalid faq entry: {0}")]
    InvalidEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FaqError>;
