// Ciphergate — TCP JSON-RPC Server
//
// Listens on a TCP socket for newline-delimited JSON-RPC 2.0 requests. Each
// connection is handled in a spawned tokio task; each request runs on the
// blocking pool because RSA and SQLite work is synchronous.
//
// Request lines are bounded. A client that sends a longer line gets one
// error response and the connection is closed.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use super::error::GatewayError;
use super::origin::SourceAddress;
use super::protocol::{Method, Params, RpcRequest, RpcResponse, INVALID_REQUEST};
use super::service::Gateway;

/// Longest accepted request line in bytes. A 4096-bit private key in PEM
/// form is about 3.3 KiB.
pub const MAX_REQUEST_LINE: usize = 64 * 1024;

/// Pause after a failed `accept` before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// TCP server exposing the gateway operations.
pub struct TcpServer {
    gateway: Gateway,
    listen_addr: SocketAddr,
    trust_forwarded: bool,
    max_line: usize,
}

impl TcpServer {
    pub fn new(gateway: Gateway, listen_addr: SocketAddr, trust_forwarded: bool) -> Self {
        Self {
            gateway,
            listen_addr,
            trust_forwarded,
            max_line: MAX_REQUEST_LINE,
        }
    }

    pub fn with_max_line_length(mut self, max_line: usize) -> Self {
        self.max_line = max_line;
        self
    }

    /// Bind the configured address and serve until the process is terminated.
    pub async fn run(&self) -> io::Result<()> {
        let listener = TcpListener::bind(self.listen_addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener. Failed accepts are
    /// logged and retried; they never stop the server.
    pub async fn serve(&self, listener: TcpListener) -> io::Result<()> {
        tracing::info!(
            addr = %listener.local_addr()?,
            trust_forwarded = self.trust_forwarded,
            "Ciphergate listening"
        );

        let listener = &listener;
        loop {
            let (stream, peer) = accept_retrying(move || listener.accept()).await;
            let conn = Connection {
                gateway: self.gateway.clone(),
                source: SourceAddress::from_peer(peer),
                trust_forwarded: self.trust_forwarded,
                max_line: self.max_line,
            };

            tokio::spawn(async move {
                let source = conn.source.clone();
                if let Err(e) = conn.handle(stream).await {
                    tracing::warn!(%source, "Connection handler error: {}", e);
                }
            });
        }
    }
}

/// Await the next successful accept, logging and backing off on failures
/// such as descriptor exhaustion or aborted handshakes.
async fn accept_retrying<T, F, Fut>(mut accept: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(conn) => return conn,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection; retrying");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

// ─── Connection ──────────────────────────────────────────────────────────────

struct Connection {
    gateway: Gateway,
    source: SourceAddress,
    trust_forwarded: bool,
    max_line: usize,
}

impl Connection {
    /// Read newline-delimited requests from one client and write one
    /// response line per request.
    async fn handle(self, stream: TcpStream) -> io::Result<()> {
        tracing::debug!(source = %self.source, "Client connected");

        let (reader, mut writer) = stream.into_split();
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(self.max_line));

        while let Some(frame) = lines.next().await {
            let line = match frame {
                Ok(line) => line,
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    tracing::warn!(
                        source = %self.source,
                        max_line = self.max_line,
                        "Request line too long; closing connection"
                    );
                    let err = GatewayError::InputMalformed(format!(
                        "request line exceeds {} bytes",
                        self.max_line
                    ));
                    let resp = RpcResponse::rejected(Value::Null, INVALID_REQUEST, err.to_string());
                    write_response(&mut writer, &resp).await?;
                    break;
                }
                Err(LinesCodecError::Io(e)) => return Err(e),
            };

            if line.trim().is_empty() {
                continue;
            }

            let gateway = self.gateway.clone();
            let source = self.source.clone();
            let trust_forwarded = self.trust_forwarded;
            let response = match tokio::task::spawn_blocking(move || {
                process_request(&line, &gateway, &source, trust_forwarded)
            })
            .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::error!("Request task failed: {}", e);
                    let err = GatewayError::Internal(e.to_string());
                    RpcResponse::failure(Value::Null, &err)
                }
            };

            write_response(&mut writer, &response).await?;
        }

        tracing::debug!(source = %self.source, "Client disconnected");
        Ok(())
    }
}

async fn write_response(writer: &mut OwnedWriteHalf, response: &RpcResponse) -> io::Result<()> {
    let mut json = serde_json::to_string(response)?;
    json.push('\n');
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Parse and dispatch a single JSON-RPC request.
pub(crate) fn process_request(
    raw: &str,
    gateway: &Gateway,
    peer_source: &SourceAddress,
    trust_forwarded: bool,
) -> RpcResponse {
    let request = match RpcRequest::parse(raw) {
        Ok(req) => req,
        Err(rejection) => return rejection,
    };

    let params = request.params();
    let source = resolve_source(params, peer_source, trust_forwarded);
    let result = request
        .method()
        .and_then(|method| dispatch(gateway, method, params, &source));

    match result {
        Ok(value) => RpcResponse::success(request.id, value),
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!(method = %request.method, "Request rejected: {}", e);
            }
            RpcResponse::failure(request.id, &e)
        }
    }
}

fn dispatch(
    gateway: &Gateway,
    method: Method,
    params: Params<'_>,
    source: &SourceAddress,
) -> Result<Value, GatewayError> {
    match method {
        Method::Encrypt => to_json(gateway.encrypt(params.str("key"), params.str("data"), source)?),
        Method::Decrypt => to_json(gateway.decrypt(params.str("key"), params.str("data"), source)?),
        Method::ListLogs => to_json(gateway.list_logs(params.int("size"), params.int("offset"))?),
        Method::ClearLogs => to_json(gateway.clear_logs()?),
        Method::Health => to_json(gateway.health()),
        Method::InspectKey => to_json(gateway.inspect_key(params.str("key"))?),
    }
}

fn resolve_source(
    params: Params<'_>,
    peer_source: &SourceAddress,
    trust_forwarded: bool,
) -> SourceAddress {
    if !trust_forwarded {
        return peer_source.clone();
    }
    params
        .str("forwarded_for")
        .and_then(SourceAddress::from_forwarded_for)
        .unwrap_or_else(|| peer_source.clone())
}

/// Encode a response body. A failure here is the server's fault.
fn to_json<T: Serialize>(value: T) -> Result<Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode response");
        GatewayError::Internal(e.to_string())
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
