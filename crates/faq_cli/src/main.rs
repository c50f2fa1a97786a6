use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use faq_core::{
    evaluate_cases, load_entries_jsonl, save_entries_jsonl, AskParams, AskResponse, EvalCase,
    FileUnmatchedLog, KnowledgeBase, Matcher, NullUnmatchedLog, UnmatchedLog,
    DEFAULT_MIN_SCORE, DEFAULT_REQUIRED_PASS_RATE, DEFAULT_TOP_N, FALLBACK_ANSWER,
};
use serde_json::{json, Value};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "faq")]
#[command(about = "SustainGo FAQ matcher CLI")]
struct Cli {
    /// JSONL knowledge base to use instead of the built-in entries.
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every entry as a JSON array.
    List,
    /// Look up one entry by key.
    Get { key: String },
    /// Fuzzy-match a question.
    Ask {
        #[arg(long)]
        question: String,
        #[arg(long, default_value_t = DEFAULT_TOP_N as i64, allow_negative_numbers = true)]
        top_n: i64,
        #[arg(long, default_value_t = DEFAULT_MIN_SCORE, allow_negative_numbers = true)]
        min_score: f64,
        /// Append unmatched questions to this file.
        #[arg(long)]
        unmatched_log: Option<PathBuf>,
    },
    /// Write the active knowledge base as JSONL.
    Export {
        #[arg(long)]
        output: PathBuf,
    },
    /// Score labelled cases against the knowledge base.
    Eval {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = DEFAULT_TOP_N as i64)]
        top_n: i64,
        #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
        min_score: f64,
        #[arg(long, default_value_t = DEFAULT_REQUIRED_PASS_RATE)]
        min_pass_rate: f64,
    },
}

fn load_knowledge_base(path: Option<&Path>) -> Result<KnowledgeBase> {
    match path {
        Some(path) => {
            let entries = load_entries_jsonl(path)?;
            KnowledgeBase::new(entries)
                .with_context(|| format!("invalid knowledge base {}", path.display()))
        }
        None => Ok(KnowledgeBase::builtin()),
    }
}

fn read_eval_cases_json(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let cases: Vec<EvalCase> = serde_json::from_reader(file).context("parse eval cases json")?;
    Ok(cases)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let kb = load_knowledge_base(cli.knowledge_base.as_deref())?;

    match &cli.command {
        Commands::List => {
            let items: Vec<Value> = kb
                .list_all()
                .iter()
                .map(|e| json!({ "question": e.question, "answer": e.answer }))
                .collect();
            print_json(&Value::Array(items))?;
        }
        Commands::Get { key } => {
            let body = match kb.get(key) {
                Ok(entry) => json!({ "question": entry.question, "answer": entry.answer }),
                Err(_) => json!({ "question": key, "answer": FALLBACK_ANSWER }),
            };
            print_json(&body)?;
        }
        Commands::Ask {
            question,
            top_n,
            min_score,
            unmatched_log,
        } => {
            let params = AskParams::new(*top_n, *min_score)?;
            let sink: Arc<dyn UnmatchedLog> = match unmatched_log {
                Some(path) => Arc::new(
                    FileUnmatchedLog::open(path)
                        .with_context(|| format!("open unmatched log {}", path.display()))?,
                ),
                None => Arc::new(NullUnmatchedLog),
            };
            let matcher = Matcher::new(Arc::new(kb), sink);
            let outcome = matcher.ask(question, params)?;
            if !outcome.is_match() {
                info!(question = %question, "no confident faq match");
            }
            let body = serde_json::to_value(AskResponse::from_outcome(question.as_str(), &outcome))
                .context("serialize ask response")?;
            print_json(&body)?;
        }
        Commands::Export { output } => {
            save_entries_jsonl(output, kb.list_all())?;
            println!("exported_entries={} output={}", kb.len(), output.display());
        }
        Commands::Eval {
            cases,
            top_n,
            min_score,
            min_pass_rate,
        } => {
            let params = AskParams::new(*top_n, *min_score)?;
            let cases = read_eval_cases_json(cases)?;
            let matcher = Matcher::new(Arc::new(kb), Arc::new(NullUnmatchedLog));
            let summary = evaluate_cases(&matcher, &cases, params)?;

            println!(
                "total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
                summary.total,
                summary.passed,
                summary.failed,
                summary.pass_rate,
                min_pass_rate,
                summary.meets(*min_pass_rate)
            );
            for o in &summary.outcomes {
                println!(
                    "case={} passed={} decision={:?} key={} score={:.2} latency={:.3}ms",
                    o.case_id,
                    o.passed,
                    o.actual_decision,
                    o.actual_key.as_deref().unwrap_or("null"),
                    o.score,
                    o.latency_ms
                );
            }

            if !summary.meets(*min_pass_rate) {
                anyhow::bail!(
                    "pass rate {:.4} below required {:.4}",
                    summary.pass_rate,
                    min_pass_rate
                );
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
