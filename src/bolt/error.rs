//! Bolt transport error types.

use std::io;

use thiserror::Error;

/// Result type for Bolt operations.
pub type BoltResult<T> = Result<T, BoltError>;

/// Classified failures reported by a transport.
///
/// The session layer only recovers from [`BoltError::Message`]; every other
/// variant means the channel itself is unusable.
#[derive(Error, Debug)]
pub enum BoltError {
    /// The INIT exchange was rejected or could not complete
    #[error("Handshake error: {0}")]
    Handshake(String),

    /// The server answered a request with FAILURE; carries the raw server message
    #[error("{0}")]
    Message(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unexpected reply shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,
}

impl BoltError {
    /// Server-reported failure from its raw message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    /// Handshake failure.
    pub fn handshake(msg: impl Into<String>) -> Self {
        Self::Handshake(msg.into())
    }
}

/// Bolt 상태 코드 분류
///
/// 상태 코드는 `Neo.<Classification>.<Category>.<Title>` 형태입니다.
pub struct BoltErrorCode;

impl BoltErrorCode {
    /// 호출자 잘못 (재시도 무의미)
    pub const CLIENT_ERROR: &'static str = "Neo.ClientError";
    /// 재시도 시 성공 가능
    pub const TRANSIENT_ERROR: &'static str = "Neo.TransientError";
    /// 서버 내부 에러
    pub const DATABASE_ERROR: &'static str = "Neo.DatabaseError";

    /// 상태 코드의 분류 부분 (`Neo.ClientError` 등)
    pub fn classification(code: &str) -> Option<&str> {
        let mut parts = code.splitn(3, '.');
        match (parts.next(), parts.next()) {
            (Some("Neo"), Some(class)) if !class.is_empty() => Some(&code[..4 + class.len()]),
            _ => None,
        }
    }
}
