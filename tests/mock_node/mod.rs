//! In-process storage node for integration tests
//!
//! Serves `PUT /upload/{name}` and `GET /download/{name}` over a
//! `HashMap`, counting requests so tests can assert on network traffic.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use minidfs::{Coordinator, CoordinatorConfig, Node};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How a mock node answers
#[derive(Debug, Clone)]
pub struct Behavior {
    pub upload_status: StatusCode,
    pub download_status: StatusCode,
    pub upload_delay: Option<Duration>,
    /// Serve only the first half of each stored file
    pub truncate_downloads: bool,
    /// Send the first half of each stored file, then break the connection
    pub abort_downloads: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            upload_status: StatusCode::OK,
            download_status: StatusCode::OK,
            upload_delay: None,
            truncate_downloads: false,
            abort_downloads: false,
        }
    }
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    uploads: Arc<AtomicUsize>,
    downloads: Arc<AtomicUsize>,
}

pub struct MockNode {
    pub node: Node,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockNode {
    pub async fn spawn() -> Self {
        Self::spawn_with(Behavior::default()).await
    }

    pub async fn spawn_with(behavior: Behavior) -> Self {
        let state = MockState {
            behavior,
            files: Arc::new(Mutex::new(HashMap::new())),
            uploads: Arc::new(AtomicUsize::new(0)),
            downloads: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/upload/:name", put(upload))
            .route("/download/:name", get(download))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            node: Node::new("127.0.0.1", port),
            state,
            server,
        }
    }

    /// Stop accepting connections. Upload connections are never kept
    /// alive, so later requests to this node fail to connect.
    pub async fn shutdown(&self) {
        self.server.abort();
        while !self.server.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Wait until this node has received `count` upload requests
    pub async fn wait_for_uploads(&self, count: usize) {
        while self.uploads() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.state.files.lock().unwrap().get(name).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn uploads(&self) -> usize {
        self.state.uploads.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.state.downloads.load(Ordering::SeqCst)
    }
}

async fn upload(
    State(state): State<MockState>,
    Path(name): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    state.uploads.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = state.behavior.upload_delay {
        tokio::time::sleep(delay).await;
    }

    if state.behavior.upload_status == StatusCode::OK {
        state.files.lock().unwrap().insert(name, body.to_vec());
    }
    (
        state.behavior.upload_status,
        [(header::CONNECTION, "close")],
    )
}

async fn download(State(state): State<MockState>, Path(name): Path<String>) -> Response {
    state.downloads.fetch_add(1, Ordering::SeqCst);
    if state.behavior.download_status != StatusCode::OK {
        return state.behavior.download_status.into_response();
    }

    let data = state.files.lock().unwrap().get(&name).cloned();
    match data {
        Some(mut data) => {
            if state.behavior.abort_downloads {
                let half = data.len() / 2;
                let chunks: Vec<std::io::Result<Bytes>> = vec![
                    Ok(Bytes::from(data[..half].to_vec())),
                    Err(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        "node went away",
                    )),
                ];
                return (StatusCode::OK, Body::from_stream(futures_util::stream::iter(chunks)))
                    .into_response();
            }
            if state.behavior.truncate_downloads {
                data.truncate(data.len() / 2);
            }
            (StatusCode::OK, data).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Coordinator over the given mock nodes, staging into `staging_dir`
pub fn coordinator(nodes: &[&MockNode], staging_dir: &std::path::Path) -> Coordinator {
    coordinator_with(nodes, staging_dir, true)
}

pub fn coordinator_with(
    nodes: &[&MockNode],
    staging_dir: &std::path::Path,
    verify_download_size: bool,
) -> Coordinator {
    let config = CoordinatorConfig {
        nodes: nodes.iter().map(|n| n.node.clone()).collect(),
        staging_dir: Some(staging_dir.to_path_buf()),
        verify_download_size,
        ..Default::default()
    };
    Coordinator::from_config(&config).unwrap()
}

/// Number of entries in a directory
pub fn dir_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
