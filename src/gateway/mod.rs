// Ciphergate — Gateway Module
//
// Transport-agnostic operations (`Gateway`) plus a TCP server speaking
// newline-delimited JSON-RPC 2.0. The peer IP of each connection is recorded
// as the caller's origin on audit records.

mod error;
mod origin;
mod protocol;
mod service;
mod tcp;

pub use error::GatewayError;
pub use origin::SourceAddress;
pub use service::{
    ClearResponse, DecryptResponse, EncryptResponse, Gateway, HealthResponse, LogsResponse,
};
pub use tcp::TcpServer;
