#![allow(dead_code)]
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ListState {
    bodies: Mutex<HashMap<String, String>>,
    hits: AtomicUsize,
}

/// In-process HTTP server serving blocklist bodies under `/<name>`.
/// Unknown names answer 404.
pub struct MockListServer {
    addr: SocketAddr,
    state: Arc<ListState>,
    task: tokio::task::JoinHandle<()>,
}

impl MockListServer {
    pub async fn start() -> Self {
        let state = Arc::new(ListState::default());
        let app = Router::new()
            .route("/{name}", get(serve_list))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    pub fn set_list(&self, name: &str, body: &str) {
        self.state
            .bodies
            .lock()
            .unwrap()
            .insert(name.to_string(), body.to_string());
    }

    pub fn remove_list(&self, name: &str) {
        self.state.bodies.lock().unwrap().remove(name);
    }

    pub fn url(&self, name: &str) -> String {
        format!("http://{}/{}", self.addr, name)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockListServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_list(
    State(state): State<Arc<ListState>>,
    Path(name): Path<String>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.bodies.lock().unwrap().get(&name) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// TCP endpoint that accepts connections and never sends a byte back.
pub struct HangingListServer {
    addr: SocketAddr,
    task: tokio::task::JoinHandle<()>,
}

impl HangingListServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        Self { addr, task }
    }

    pub fn url(&self, name: &str) -> String {
        format!("http://{}/{}", self.addr, name)
    }
}

impl Drop for HangingListServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
