pub mod error;
pub mod eval;
pub mod knowledge;
pub mod matcher;
pub mod model;
pub mod similarity;
pub mod storage;
pub mod unmatched;

pub use error::FaqError;
pub use eval::{
    evaluate_cases, Decision, EvalCase, EvalOutcome, EvalSummary, DEFAULT_REQUIRED_PASS_RATE,
};
pub use knowledge::KnowledgeBase;
pub use matcher::Matcher;
pub use model::{
    AskOutcome, AskParams, AskResponse, FaqEntry, MatchResult, Suggestion, DEFAULT_MIN_SCORE,
    DEFAULT_TOP_N, FALLBACK_ANSWER, MAX_TOP_N, NO_MATCH_ANSWER,
};
pub use similarity::{default_process, token_set_ratio};
pub use storage::{load_entries_jsonl, save_entries_jsonl};
pub use unmatched::{FileUnmatchedLog, MemoryUnmatchedLog, NullUnmatchedLog, UnmatchedLog};
