//! Test utilities for ledgerly-core
//!
//! Provides a mock Gemini server speaking the generateContent wire format,
//! for integration tests and development without an API key.

use axum::{extract::Json, routing::post, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start a mock server that classifies by keyword, on an available port
    pub async fn start() -> Self {
        Self::start_with_reply(None).await
    }

    /// Start a mock server that answers every request with a fixed reply
    pub async fn start_fixed(reply: &str) -> Self {
        Self::start_with_reply(Some(reply.to_string())).await
    }

    async fn start_with_reply(reply: Option<String>) -> Self {
        let reply = Arc::new(reply);
        let app = Router::new().route(
            // One segment covers "{model}:generateContent"; the mock answers
            // for any model name.
            "/v1beta/models/:model_call",
            post(move |req: Json<Value>| handle_generate_content(req, reply.clone())),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// generateContent endpoint: echo a category for the merchant in the prompt
async fn handle_generate_content(
    Json(request): Json<Value>,
    reply: Arc<Option<String>>,
) -> Json<Value> {
    let text = match reply.as_ref() {
        Some(fixed) => fixed.clone(),
        None => {
            let prompt = request["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or("")
                .to_lowercase();
            classify_prompt_mock(&prompt).to_string()
        }
    };

    Json(json!({
        "candidates": [
            {"content": {"parts": [{"text": text}], "role": "model"}}
        ]
    }))
}

/// Keyword classification over the quoted merchant in the prompt
fn classify_prompt_mock(prompt: &str) -> &'static str {
    if prompt.contains("swiggy") || prompt.contains("zomato") {
        "Food"
    } else if prompt.contains("uber") || prompt.contains("irctc") {
        "Transport"
    } else if prompt.contains("netflix") || prompt.contains("hotstar") {
        "Entertainment"
    } else if prompt.contains("pathlabs") || prompt.contains("pharmacy") {
        "Healthcare"
    } else {
        "Others"
    }
}
