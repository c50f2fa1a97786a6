use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use faq_core::{FileUnmatchedLog, KnowledgeBase, Matcher, FALLBACK_ANSWER, NO_MATCH_ANSWER};
use faq_server::{config::ServerConfig, serve, AppState};
use serde_json::Value;
use tokio::net::TcpListener;

struct TestServer {
    addr: SocketAddr,
    log_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn unmatched_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log_path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("unmatched_questions.log");
    let log = FileUnmatchedLog::open(&log_path).expect("open log");
    let state = AppState::new(Matcher::new(
        Arc::new(KnowledgeBase::builtin()),
        Arc::new(log),
    ));

    spawn_server(state, dir, log_path).await
}

async fn spawn_server(state: AppState, dir: tempfile::TempDir, log_path: PathBuf) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            eprintln!("test server error: {e}");
        }
    });

    TestServer {
        addr,
        log_path,
        _dir: dir,
    }
}

async fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
    let resp = reqwest::get(url).await.expect("request");
    let status = resp.status();
    let body = resp.json::<Value>().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn known_key_returns_entry() {
    let server = start_server().await;
    let kb = KnowledgeBase::builtin();

    for entry in kb.list_all() {
        let (status, body) = get_json(&server.url(&format!("/faq/{}", entry.key))).await;
        assert_eq!(status, 200);
        assert_eq!(body["question"], entry.question.as_str());
        assert_eq!(body["answer"], entry.answer.as_str());
    }
}

#[tokio::test]
async fn unknown_key_falls_back_with_200() {
    let server = start_server().await;
    let (status, body) = get_json(&server.url("/faq/where_is_the_moon")).await;

    assert_eq!(status, 200);
    assert_eq!(body["question"], "where_is_the_moon");
    assert_eq!(body["answer"], FALLBACK_ANSWER);
}

#[tokio::test]
async fn faqs_lists_every_entry_without_keys() {
    let server = start_server().await;
    let (status, body) = get_json(&server.url("/faqs")).await;

    assert_eq!(status, 200);
    let items = body.as_array().expect("array");
    let kb = KnowledgeBase::builtin();
    assert_eq!(items.len(), kb.len());

    let mut questions: Vec<&str> = items
        .iter()
        .map(|item| item["question"].as_str().expect("question"))
        .collect();
    assert_eq!(questions[0], "How long does delivery take?");
    assert!(items.iter().all(|item| item.get("key").is_none()));

    questions.sort_unstable();
    questions.dedup();
    assert_eq!(questions.len(), kb.len());
}

#[tokio::test]
async fn ask_returns_exact_match_first() {
    let server = start_server().await;
    let (status, body) = get_json(
        &server.url("/ask?question=how%20long%20does%20delivery%20take&top_n=1&min_score=45"),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["your_question"], "how long does delivery take");
    assert!(body.get("answer").is_none());
    let suggestions = body["suggestions"].as_array().expect("suggestions");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["question"], "How long does delivery take?");
    assert_eq!(suggestions[0]["answer"], "Delivery typically takes 30–45 minutes.");
    assert_eq!(suggestions[0]["score"], 100.0);
    assert!(server.unmatched_lines().is_empty());
}

#[tokio::test]
async fn ask_defaults_to_three_sorted_suggestions() {
    let server = start_server().await;
    let (status, body) = get_json(&server.url("/ask?question=track%20my%20order")).await;

    assert_eq!(status, 200);
    let suggestions = body["suggestions"].as_array().expect("suggestions");
    let questions: Vec<&str> = suggestions
        .iter()
        .map(|s| s["question"].as_str().expect("question"))
        .collect();
    assert_eq!(
        questions,
        vec![
            "How can I track my order?",
            "When will my order arrive?",
            "Where is my order?"
        ]
    );
    let scores: Vec<f64> = suggestions
        .iter()
        .map(|s| s["score"].as_f64().expect("score"))
        .collect();
    assert_eq!(scores, vec![100.0, 72.73, 72.73]);
}

#[tokio::test]
async fn ask_without_match_logs_question() {
    let server = start_server().await;
    let (status, body) =
        get_json(&server.url("/ask?question=asdkjasdkj%20nonsense%20gibberish")).await;

    assert_eq!(status, 200);
    assert_eq!(body["your_question"], "asdkjasdkj nonsense gibberish");
    assert_eq!(body["answer"], NO_MATCH_ANSWER);
    assert_eq!(body["suggestions"], Value::Array(Vec::new()));

    let lines = server.unmatched_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("] asdkjasdkj nonsense gibberish"), "{}", lines[0]);
}

#[tokio::test]
async fn ask_rejects_bad_params() {
    let server = start_server().await;

    for path in [
        "/ask?question=refund&top_n=0",
        "/ask?question=refund&top_n=-1",
        "/ask?question=refund&top_n=abc",
        "/ask?question=refund&min_score=101",
        "/ask?question=%20%20",
        "/ask",
    ] {
        let (status, body) = get_json(&server.url(path)).await;
        assert_eq!(status, 400, "{path}");
        assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()), "{path}");
    }
    assert!(server.unmatched_lines().is_empty());
}

#[tokio::test]
async fn concurrent_unmatched_questions_each_get_one_line() {
    let server = start_server().await;

    let requests = (0..20).map(|i| {
        let url = server.url(&format!("/ask?question=qqqzzz{i}%20xxyyww"));
        tokio::spawn(async move { reqwest::get(url).await.expect("request").status() })
    });
    for handle in requests.collect::<Vec<_>>() {
        assert_eq!(handle.await.expect("join"), 200);
    }

    let lines = server.unmatched_lines();
    assert_eq!(lines.len(), 20);
    assert!(lines.iter().all(|l| l.contains("] qqqzzz") && l.ends_with(" xxyyww")));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .get(server.url("/faqs"))
        .header("Origin", "https://example.org")
        .send()
        .await
        .expect("request");

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn health_reports_entry_count() {
    let server = start_server().await;
    let (status, body) = get_json(&server.url("/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["entries"], 27);
}

#[tokio::test]
async fn unwritable_unmatched_log_still_answers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").expect("write blocker file");
    let log_path = blocker.join("unmatched_questions.log");

    let config = ServerConfig {
        bind: "127.0.0.1:0".parse().expect("addr"),
        unmatched_log: log_path.clone(),
        knowledge_base: None,
    };
    let state = AppState::from_config(&config).expect("state builds despite broken log");
    let server = spawn_server(state, dir, log_path).await;

    let (status, body) =
        get_json(&server.url("/ask?question=asdkjasdkj%20nonsense%20gibberish")).await;
    assert_eq!(status, 200);
    assert_eq!(body["answer"], NO_MATCH_ANSWER);
    assert!(server.unmatched_lines().is_empty());

    let (status, body) = get_json(&server.url("/ask?question=refund")).await;
    assert_eq!(status, 200);
    assert_eq!(body["suggestions"][0]["question"], "Can I get a refund?");
}
