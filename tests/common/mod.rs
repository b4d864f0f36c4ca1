#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{ get, post },
    Json,
    Router,
};
use ollama_chat::llm::ClientConfig;
use serde_json::{ json, Value };
use std::net::SocketAddr;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::io::{ AsyncReadExt, AsyncWriteExt };
use tokio::net::TcpListener;

/// How the fake Ollama answers.
#[derive(Clone)]
pub struct Behaviour {
    pub version_status: StatusCode,
    pub version_delay: Duration,
    pub generate_status: StatusCode,
    pub generate_delay: Duration,
    pub reply: String,
    /// Answer `/api/generate` with 200 and a body lacking `response`.
    pub malformed_reply: bool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            version_status: StatusCode::OK,
            version_delay: Duration::ZERO,
            generate_status: StatusCode::OK,
            generate_delay: Duration::ZERO,
            reply: "Hi! How can I help?".to_string(),
            malformed_reply: false,
        }
    }
}

#[derive(Clone)]
struct FakeState {
    behaviour: Behaviour,
    generate_bodies: Arc<Mutex<Vec<Value>>>,
}

pub struct FakeOllama {
    pub addr: SocketAddr,
    generate_bodies: Arc<Mutex<Vec<Value>>>,
}

impl FakeOllama {
    pub async fn start(behaviour: Behaviour) -> Self {
        let generate_bodies = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            behaviour,
            generate_bodies: generate_bodies.clone(),
        };
        let app = Router::new()
            .route("/api/version", get(version_handler))
            .route("/api/generate", post(generate_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, generate_bodies }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.url()).unwrap();
        config.probe_timeout = Duration::from_millis(500);
        config.request_timeout = Duration::from_secs(5);
        config
    }

    pub fn generate_bodies(&self) -> Vec<Value> {
        self.generate_bodies.lock().unwrap().clone()
    }
}

async fn version_handler(State(state): State<FakeState>) -> impl IntoResponse {
    tokio::time::sleep(state.behaviour.version_delay).await;
    (state.behaviour.version_status, Json(json!({ "version": "0.5.7" })))
}

async fn generate_handler(
    State(state): State<FakeState>,
    Json(body): Json<Value>
) -> impl IntoResponse {
    state.generate_bodies.lock().unwrap().push(body.clone());
    tokio::time::sleep(state.behaviour.generate_delay).await;

    if !state.behaviour.generate_status.is_success() {
        return (state.behaviour.generate_status, Json(json!({ "error": "model not found" })));
    }
    if state.behaviour.malformed_reply {
        return (StatusCode::OK, Json(json!({ "nope": 1 })));
    }
    (
        StatusCode::OK,
        Json(
            json!({
                "model": body["model"],
                "response": state.behaviour.reply,
                "done": true
            })
        ),
    )
}

/// Base URL of a port with nothing listening on it.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Base URL of a raw server that answers `/api/version` with 200 and closes
/// every other connection without writing a response.
pub async fn dropping_generate_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut head: Vec<u8> = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                if head.starts_with(b"GET /api/version") {
                    let _ = stream.write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}"
                    ).await;
                    let _ = stream.shutdown().await;
                }
                // Anything else: drop the stream unanswered.
            });
        }
    });
    format!("http://{}", addr)
}
