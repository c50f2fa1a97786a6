use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "faq-server", version, about = "SustainGo FAQ matching service")]
pub struct ServerConfig {
    #[arg(long, env = "FAQ_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Questions that match nothing are appended here.
    #[arg(long, env = "FAQ_UNMATCHED_LOG", default_value = "unmatched_questions.log")]
    pub unmatched_log: PathBuf,

    /// JSONL knowledge base to serve instead of the built-in entries.
    #[arg(long, env = "FAQ_KNOWLEDGE_BASE")]
    pub knowledge_base: Option<PathBuf>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.unmatched_log.as_os_str().is_empty() {
            return Err("unmatched-log must not be empty".to_string());
        }

        Ok(())
    }
}
