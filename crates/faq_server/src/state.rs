use std::sync::Arc;

use anyhow::{Context, Result};
use faq_core::{load_entries_jsonl, FileUnmatchedLog, KnowledgeBase, Matcher};
use tracing::{info, warn};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
}

impl AppState {
    pub fn new(matcher: Matcher) -> Self {
        Self { matcher }
    }

    /// Loads the knowledge base and sets up the unmatched log. Called once at startup.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let kb = match &config.knowledge_base {
            Some(path) => {
                let entries = load_entries_jsonl(path)?;
                KnowledgeBase::new(entries)
                    .with_context(|| format!("invalid knowledge base {}", path.display()))?
            }
            None => KnowledgeBase::builtin(),
        };
        info!(entries = kb.len(), "knowledge base loaded");

        // a broken log must not keep the FAQ answers offline
        let unmatched = match FileUnmatchedLog::open(&config.unmatched_log) {
            Ok(log) => {
                info!(path = %log.path().display(), "unmatched questions log opened");
                log
            }
            Err(err) => {
                warn!(
                    path = %config.unmatched_log.display(),
                    error = %err,
                    "unmatched questions log is not writable, records will be dropped"
                );
                FileUnmatchedLog::new(&config.unmatched_log)
            }
        };

        Ok(Self::new(Matcher::new(Arc::new(kb), Arc::new(unmatched))))
    }
}
