//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path as UrlPath, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use notify_hub::config::loader::save_config;
use notify_hub::lifecycle::{self, Shutdown};
use notify_hub::{AppConfig, AppState, HttpServer};

/// One recorded Bot API call.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub body: Value,
}

/// How the mock Bot API behaves.
pub struct MockOptions {
    /// Thread id handed to the first created topic; later ones count up.
    pub first_thread_id: i64,
    /// `result` of `getUpdates`.
    pub updates: Value,
    /// Answer every `sendMessage` with an API error.
    pub fail_sends: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            first_thread_id: 42,
            updates: json!([]),
            fail_sends: false,
        }
    }
}

struct MockState {
    calls: Mutex<Vec<Call>>,
    next_thread_id: AtomicI64,
    updates: Value,
    fail_sends: bool,
}

/// A Bot API stand-in that records every call.
pub struct MockTelegram {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockTelegram {
    pub async fn start() -> Self {
        Self::start_with(MockOptions::default()).await
    }

    pub async fn start_with(options: MockOptions) -> Self {
        let state = Arc::new(MockState {
            calls: Mutex::new(Vec::new()),
            next_thread_id: AtomicI64::new(options.first_thread_id),
            updates: options.updates,
            fail_sends: options.fail_sends,
        });

        let router = Router::new()
            .route("/{bot}/{method}", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn calls(&self, method: &str) -> Vec<Call> {
        self.state
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Bodies of every `sendMessage` call, in order.
    pub fn sent(&self) -> Vec<Value> {
        self.calls("sendMessage").into_iter().map(|c| c.body).collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    UrlPath((_bot, method)): UrlPath<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.calls.lock().unwrap().push(Call {
        method: method.clone(),
        body: body.clone(),
    });

    let reply = match method.as_str() {
        "getMe" => json!({ "ok": true, "result": { "id": 1, "is_bot": true, "username": "hub_bot" } }),
        "createForumTopic" => {
            let id = state.next_thread_id.fetch_add(1, Ordering::SeqCst);
            json!({ "ok": true, "result": { "message_thread_id": id, "name": body["name"] } })
        }
        "sendMessage" if state.fail_sends => {
            json!({ "ok": false, "error_code": 400, "description": "Bad Request: chat not found" })
        }
        "sendMessage" => json!({ "ok": true, "result": { "message_id": 1 } }),
        "getUpdates" => json!({ "ok": true, "result": state.updates }),
        _ => json!({ "ok": false, "error_code": 404, "description": "Not Found" }),
    };
    Json(reply)
}

/// A configuration pointing at `api`, with scratch paths under `dir`.
pub fn hub_config(api: &MockTelegram, dir: &Path) -> AppConfig {
    AppConfig {
        token: "123:abc".into(),
        chat_id: -100,
        api_base_url: api.base_url.clone(),
        api_timeout_secs: 5,
        formatters_dir: dir.join("formatters").display().to_string(),
        ..AppConfig::default()
    }
}

/// A running hub on an ephemeral port. Shuts down on drop.
pub struct TestHub {
    pub url: String,
    pub settings: PathBuf,
    pub state: AppState,
    shutdown: Shutdown,
}

impl Drop for TestHub {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Write `config` under `dir`, run the startup sequence and serve it.
pub async fn start_hub(config: &AppConfig, dir: &Path) -> TestHub {
    let settings = dir.join("settings.json");
    save_config(&settings, config).unwrap();

    let state = lifecycle::start(&settings).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(state.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestHub {
        url,
        settings,
        state,
        shutdown,
    }
}
