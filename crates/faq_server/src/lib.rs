//! HTTP front end for the FAQ matcher.
//!
//! Routes:
//! - `GET /faq/{question_key}`: exact lookup, falls back to a stock answer
//! - `GET /faqs`: every entry in knowledge base order
//! - `GET /ask?question=..&top_n=..&min_score=..`: fuzzy match
//! - `GET /health`
//!
//! The API is public and read-only, so CORS is open to any origin.

use std::future::Future;

use axum::{routing::get, Router};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use routes::{ask_handler, faq_handler, faqs_handler, health_handler};
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/faq/{question_key}", get(faq_handler))
        .route("/faqs", get(faqs_handler))
        .route("/ask", get(ask_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("FAQ server running on {addr}");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
