//! Test utilities for linkslug integration tests
//!
//! A local page server standing in for arbitrary websites, plus fake
//! completion and conversion capabilities that record how they were called.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use linkslug::llm::{
    ChatMessage, CompletionCapability, CompletionResponse, ConversionResult, MarkdownConverter,
    NamedBlob,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Markdown body longer than the excerpt limit (multi-byte to catch byte slicing)
pub fn long_markdown() -> String {
    let mut body = String::from("# Über Sink\n\n");
    while body.chars().count() < 5000 {
        body.push_str("Ünïcödé link shortener. ");
    }
    body
}

/// Local HTTP server serving one route per content scenario
pub struct PageServer {
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl PageServer {
    pub async fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));

        let app = Router::new()
            .route(
                "/markdown",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
                        "# Sink\n\nA simple link shortener.",
                    )
                }),
            )
            .route(
                "/markdown/long",
                get(|| async { ([(header::CONTENT_TYPE, "text/markdown")], long_markdown()) }),
            )
            .route(
                "/markdown/empty",
                get(|| async { ([(header::CONTENT_TYPE, "text/markdown")], "") }),
            )
            .route(
                "/html",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                        "<html><body><h1>Sink</h1></body></html>",
                    )
                }),
            )
            .route(
                "/json",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "application/json")],
                        "{\"title\": \"Sink\"}",
                    )
                }),
            )
            .route(
                "/error",
                get(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        [(header::CONTENT_TYPE, "text/markdown")],
                        "# Oops",
                    )
                }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(8)).await;
                    ([(header::CONTENT_TYPE, "text/markdown")], "# Too late")
                }),
            )
            .route(
                "/echo-headers",
                get(|headers: HeaderMap| async move {
                    let get = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("-")
                            .to_string()
                    };
                    let body = format!(
                        "accept={}\nuser-agent={}\nx-forwarded-for={}",
                        get("accept"),
                        get("user-agent"),
                        get("x-forwarded-for")
                    );
                    ([(header::CONTENT_TYPE, "text/markdown")], body)
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                hits.clone(),
                count_hits,
            ))
            .with_state(hits.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            hits,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Number of requests the server has received
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn count_hits(
    State(hits): State<Arc<AtomicUsize>>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

/// Completion capability returning a canned response
pub struct FakeCompletion {
    reply: Result<CompletionResponse, String>,
    calls: AtomicUsize,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl FakeCompletion {
    pub fn replying(reply: CompletionResponse) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::replying(CompletionResponse::from_text(text))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionCapability for FakeCompletion {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn run(&self, _model: &str, messages: &[ChatMessage]) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        self.reply.clone().map_err(|e| anyhow!(e))
    }
}

/// Markdown converter returning a canned result
pub struct FakeConverter {
    result: Result<ConversionResult, String>,
    calls: AtomicUsize,
    last_blob: Mutex<Option<NamedBlob>>,
}

impl FakeConverter {
    pub fn returning(result: ConversionResult) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(result),
            calls: AtomicUsize::new(0),
            last_blob: Mutex::new(None),
        })
    }

    pub fn markdown(data: &str) -> Arc<Self> {
        Self::returning(ConversionResult::markdown(data))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_blob: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_blob(&self) -> Option<NamedBlob> {
        self.last_blob.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarkdownConverter for FakeConverter {
    async fn to_markdown(&self, blob: NamedBlob) -> Result<ConversionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_blob.lock().unwrap() = Some(blob);
        self.result.clone().map_err(|e| anyhow!(e))
    }
}
