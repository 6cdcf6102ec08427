//! Driver Error Types
//!
//! 드라이버 에러 정의

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::bolt::{BoltError, BoltErrorCode};

/// 메시지 끝의 `(Neo.*)` 상태 코드
static STATUS_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\((Neo\.[\s\S]*)\)$").expect("status code pattern is valid")
});

// ============================================================================
// DriverError - 드라이버 에러
// ============================================================================

/// 드라이버 에러
#[derive(Error, Debug)]
pub enum DriverError {
    /// INIT 실패. 자동 복구하지 않음
    #[error("Handshake failure: {0}")]
    Handshake(String),

    /// 서버가 보고한 쿼리 실패
    ///
    /// 호출자에게 전달되기 전에 세션은 이미 롤백 + 재초기화된 상태입니다.
    #[error("Message failure: {message}")]
    MessageFailure {
        /// `(Neo.*)` 에서 추출한 상태 코드
        status_code: Option<String>,
        /// 서버 원본 메시지
        message: String,
        /// 원인
        source: BoltError,
    },

    /// 잘못된 인자 (I/O 이전에 검출)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 세션/트랜잭션 상태 위반
    #[error("Protocol state error: {0}")]
    ProtocolState(String),

    /// 레코드 없음
    #[error("There is no record")]
    NoRecord,

    /// 연결 에러
    #[error("Connection error: {0}")]
    Connection(String),

    /// 프로토콜 에러 (잘못된 응답 형태)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 타임아웃 에러
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 타입 변환 에러
    #[error("Type conversion error: {0}")]
    TypeConversion(String),
}

impl DriverError {
    /// 서버 실패 메시지로부터 분류된 실패 생성
    pub fn message_failure(cause: BoltError) -> Self {
        let message = match &cause {
            BoltError::Message(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self::MessageFailure {
            status_code: parse_status_code(&message),
            message,
            source: cause,
        }
    }

    /// 잘못된 인자 에러 생성
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// 상태 에러 생성
    pub fn protocol_state(msg: impl Into<String>) -> Self {
        Self::ProtocolState(msg.into())
    }

    /// 연결 에러 생성
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// 프로토콜 에러 생성
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// 타임아웃 에러 생성
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// 설정 에러 생성
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 타입 변환 에러 생성
    pub fn type_conversion(msg: impl Into<String>) -> Self {
        Self::TypeConversion(msg.into())
    }

    /// 서버 상태 코드
    pub fn status_code(&self) -> Option<&str> {
        match self {
            Self::MessageFailure { status_code, .. } => status_code.as_deref(),
            _ => None,
        }
    }

    /// 서버 실패 여부
    pub fn is_message_failure(&self) -> bool {
        matches!(self, Self::MessageFailure { .. })
    }

    /// 상태 코드 분류 (`Neo.ClientError` 등)
    pub fn classification(&self) -> Option<&str> {
        self.status_code().and_then(BoltErrorCode::classification)
    }

    /// 클라이언트 에러 여부
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::MessageFailure { .. } => {
                self.classification() == Some(BoltErrorCode::CLIENT_ERROR)
            }
            Self::InvalidArgument(_)
            | Self::ProtocolState(_)
            | Self::Configuration(_)
            | Self::TypeConversion(_)
            | Self::NoRecord => true,
            _ => false,
        }
    }

    /// 일시적 에러 여부 (재시도 시 성공 가능)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::MessageFailure { .. } => {
                self.classification() == Some(BoltErrorCode::TRANSIENT_ERROR)
            }
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

/// 전송 계층 에러를 드라이버 에러로 변환
///
/// 서버 실패는 [`DriverError::MessageFailure`] 로 분류됩니다. 복구 절차는
/// 세션이 담당합니다.
impl From<BoltError> for DriverError {
    fn from(err: BoltError) -> Self {
        match err {
            BoltError::Message(_) => DriverError::message_failure(err),
            BoltError::Handshake(msg) => DriverError::Handshake(msg),
            BoltError::Io(e) => DriverError::Connection(e.to_string()),
            BoltError::Connection(msg) => DriverError::Connection(msg),
            BoltError::Protocol(msg) => DriverError::Protocol(msg),
            BoltError::Timeout => DriverError::timeout("Bolt operation timed out"),
        }
    }
}

/// 서버 메시지 끝의 `(Neo.…)` 구간에서 괄호를 뗀 상태 코드를 추출
pub fn parse_status_code(message: &str) -> Option<String> {
    STATUS_CODE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// ============================================================================
// Result Type
// ============================================================================

/// 드라이버 결과 타입
pub type DriverResult<T> = Result<T, DriverError>;

// ============================================================================
// Tests
// ============================================================================
