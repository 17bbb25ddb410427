//! Shared test fixtures: a scripted in-process transport standing in for the
//! backend.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use nexus_client::api::client::REFRESH_PATH;
use nexus_client::{ApiClient, ApiRequest, ApiResponse, Session, Transport};
use reqwest::StatusCode;

/// Scripted transport: per-path FIFO queues of canned responses, plus a log
/// of every dispatched request.
#[derive(Default)]
pub struct FakeTransport {
    scripts: Mutex<HashMap<String, VecDeque<(u16, String)>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, path: &str, status: u16, body: &str) {
        self.scripts
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back((status, body.to_string()));
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests_to(REFRESH_PATH).len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn dispatch(&self, req: &ApiRequest) -> Result<ApiResponse> {
        self.log.lock().unwrap().push(req.clone());
        let (status, body) = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&req.path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or((404, r#"{"error":"unscripted path"}"#.to_string()));
        Ok(ApiResponse {
            status: StatusCode::from_u16(status)?,
            body,
        })
    }
}

pub fn client_with(transport: Arc<FakeTransport>) -> (ApiClient, Arc<Session>) {
    init_tracing();
    let session = Arc::new(Session::new());
    let client = ApiClient::with_transport(transport, session.clone());
    (client, session)
}

/// Opt-in log output while debugging test failures (set RUST_LOG=debug).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
