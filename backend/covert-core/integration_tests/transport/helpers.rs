//! Test helpers for transport integration tests.
//!
//! Runs a scripted covert channel service on a loopback port:
//! - answers `config` with a small schema (optionally not the first time)
//! - acknowledges `open`, `write` and `close`
//! - echoes every written message back as a `read`
//!
//! Every frame the client sends is forwarded to the test for inspection.

use covert_core::session::SessionState;
use covert_core::transport::{SessionHandle, SessionSnapshot};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

const WAIT_LIMIT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How the scripted service reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Acknowledge everything.
    Cooperative,
    /// Never answer `open`.
    IgnoreOpen,
    /// Close the socket right after sending the schema.
    HangUpAfterSchema,
    /// Leave the first `config` request unanswered.
    IgnoreFirstConfig,
}

/// A frame received from the client.
#[derive(Debug, Clone)]
pub struct Received {
    pub binary: bool,
    pub body: Value,
}

pub struct FakeService {
    pub url: Url,
    pub received: mpsc::UnboundedReceiver<Received>,
}

impl FakeService {
    /// Next frame the client sent, waiting up to the test limit.
    pub async fn next_received(&mut self) -> Received {
        tokio::time::timeout(WAIT_LIMIT, self.received.recv())
            .await
            .expect("Timed out waiting for a client frame")
            .expect("Fake service stopped")
    }
}

pub fn schema() -> Value {
    json!({
        "Channel": {
            "tcp": {
                "addr": { "Type": "ipv4", "Value": "127.0.0.1", "Display": { "Name": "Address" } },
                "port": { "Type": "u16", "Value": 9000, "Display": { "Name": "Port" } }
            }
        },
        "Processor": {
            "Caesar": {
                "shift": { "Type": "i8", "Value": 3, "Display": { "Name": "Shift" } }
            }
        }
    })
}

/// Start the scripted service on `127.0.0.1:0`. It serves one client.
pub async fn start_fake_service(behaviour: Behaviour) -> FakeService {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has an address");
    let (tx, received) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("Failed to accept client");
        let mut ws = accept_async(stream)
            .await
            .expect("WebSocket handshake failed");

        let mut config_requests = 0;

        while let Some(Ok(msg)) = ws.next().await {
            let (binary, bytes) = match msg {
                Message::Binary(data) => (true, data.to_vec()),
                Message::Text(text) => (false, text.as_str().as_bytes().to_vec()),
                Message::Close(_) => break,
                _ => continue,
            };
            let body: Value = serde_json::from_slice(&bytes).expect("Client sends JSON");
            let op_code = body["OpCode"].as_str().unwrap_or_default().to_string();
            let message = body["Message"].clone();
            let _ = tx.send(Received { binary, body });

            if op_code == "config" {
                config_requests += 1;
            }

            let replies = match (behaviour, op_code.as_str()) {
                (Behaviour::IgnoreFirstConfig, "config") if config_requests == 1 => vec![],
                (_, "config") => vec![json!({ "OpCode": "config", "Default": schema() })],
                (Behaviour::IgnoreOpen, "open") => vec![],
                (_, "open") => vec![json!({ "OpCode": "open", "Message": "Open success" })],
                (_, "write") => vec![
                    json!({ "OpCode": "write", "Message": "Write success" }),
                    json!({ "OpCode": "read", "Message": message }),
                ],
                (_, "close") => vec![json!({ "OpCode": "close", "Message": "Close success" })],
                (_, other) => vec![json!({ "OpCode": "error", "Message": format!("Unknown op {other}") })],
            };

            for reply in replies {
                ws.send(Message::Text(reply.to_string().into()))
                    .await
                    .expect("Failed to send reply");
            }

            if behaviour == Behaviour::HangUpAfterSchema && op_code == "config" {
                let _ = ws.close(None).await;
                break;
            }
        }
    });

    FakeService {
        url: Url::parse(&format!("ws://{addr}/api/ws")).expect("Valid test URL"),
        received,
    }
}

/// Poll the handle until `done` holds for its snapshot.
pub async fn wait_until<F>(handle: &SessionHandle, what: &str, done: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    loop {
        let snapshot = handle.snapshot().await;
        if done(&snapshot) {
            return snapshot;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("Timed out waiting for {what}; last snapshot: {snapshot:?}");
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

pub async fn wait_for_state(handle: &SessionHandle, state: SessionState) -> SessionSnapshot {
    wait_until(handle, &format!("state {state}"), |s| s.state == state).await
}
