use crate::error::transport::TransportError;
use crate::protocol::OutboundMessage;

use common::ErrorLocation;

use std::panic::Location;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a session socket.
pub struct FrameSink {
    inner: SplitSink<WsStream, Message>,
}

/// Read half of a session socket.
pub struct FrameStream {
    inner: SplitStream<WsStream>,
}

/// Open the WebSocket at `url` and split it into its two halves.
///
/// # Errors
///
/// Returns [`TransportError::Connect`] if the TCP connection or the
/// WebSocket upgrade fails.
pub async fn connect(url: &Url) -> Result<(FrameSink, FrameStream), TransportError> {
    let (ws_stream, response) = connect_async(url.as_str()).await.map_err(|e| {
        TransportError::Connect {
            message: format!("Failed to connect to {url}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;

    info!("Connected to {url} (HTTP {})", response.status());

    let (write, read) = ws_stream.split();
    Ok((FrameSink { inner: write }, FrameStream { inner: read }))
}

impl FrameSink {
    /// Encode `message` and send it as a binary frame.
    pub async fn send(&mut self, message: &OutboundMessage) -> Result<(), TransportError> {
        let buf = message.encode()?;
        debug!("Sending {} frame ({} bytes)", message.op_code(), buf.len());

        self.inner
            .send(Message::Binary(buf.into()))
            .await
            .map_err(|e| TransportError::Send {
                message: format!("Failed to send {} message: {e}", message.op_code()),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Send a close frame. Errors are ignored; the peer may already be gone.
    pub async fn close(&mut self) {
        if let Err(e) = self.inner.close().await {
            debug!("Close handshake failed: {e}");
        }
    }
}

impl FrameStream {
    /// Wait for the next data frame.
    ///
    /// Text and binary frames are both accepted. Control frames are skipped.
    /// Returns `None` once the peer closes the socket.
    pub async fn next_frame(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        while let Some(msg) = self.inner.next().await {
            match msg {
                Ok(Message::Binary(data)) => return Some(Ok(data.to_vec())),
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().as_bytes().to_vec())),
                Ok(Message::Close(frame)) => {
                    debug!("Peer sent close frame: {frame:?}");
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    return Some(Err(TransportError::Read {
                        message: format!("Error reading frame: {e}"),
                        location: ErrorLocation::from(Location::caller()),
                    }));
                }
            }
        }
        None
    }
}
