//! Driver
//!
//! 드라이버 인스턴스 및 설정

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::bolt::{BoltAuthToken, Connector, CLIENT_USER_AGENT};
use super::error::{DriverError, DriverResult};
use super::session::Session;

/// 기본 Bolt 포트
pub const DEFAULT_PORT: u16 = 7687;

/// 기본 연결 타임아웃
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(15);

// ============================================================================
// Credentials - 인증 정보
// ============================================================================

/// 인증 정보
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// 사용자명 (비어 있으면 인증 없음)
    pub user: String,
    /// 비밀번호
    pub password: String,
}

impl Credentials {
    /// 새 인증 정보 생성
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// 인증 없음
    pub fn none() -> Self {
        Self::default()
    }

    /// INIT 에 보낼 인증 토큰
    ///
    /// 사용자명이 비어 있으면 "none", 아니면 "basic".
    pub fn auth_token(&self) -> BoltAuthToken {
        if self.user.is_empty() {
            BoltAuthToken::none()
        } else {
            BoltAuthToken::basic(&self.user, &self.password)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

// ============================================================================
// ServerAddress - 서버 주소
// ============================================================================

/// 서버 주소
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
}

impl ServerAddress {
    /// 새 서버 주소 생성
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// URI에서 파싱
    ///
    /// `bolt://[user:pass@]host[:port][/...]`, 스킴 없는 `host[:port]`, 대괄호로
    /// 감싼 IPv6 (`[::1]:7687`) 를 받습니다. URI 의 사용자 정보는 무시하며 인증은
    /// [`Credentials`] 로 전달합니다.
    pub fn from_uri(uri: &str) -> DriverResult<Self> {
        let invalid = |what: &str| DriverError::configuration(format!("{} in '{}'", what, uri));

        let rest = uri.trim();
        let rest = rest.strip_prefix("bolt://").unwrap_or(rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

        let (host, port) = if let Some(bracketed) = host_port.strip_prefix('[') {
            let (host, after) = bracketed
                .split_once(']')
                .ok_or_else(|| invalid("Unclosed IPv6 bracket"))?;
            if after.is_empty() {
                (host, None)
            } else {
                let port = after
                    .strip_prefix(':')
                    .ok_or_else(|| invalid("Unexpected text after IPv6 address"))?;
                (host, Some(port))
            }
        } else {
            match host_port.rsplit_once(':') {
                // 대괄호 없는 IPv6 는 포트 없이 호스트 전체
                Some((host, _)) if host.contains(':') => (host_port, None),
                Some((host, port)) => (host, Some(port)),
                None => (host_port, None),
            }
        };

        let port = match port {
            Some(port) => port.parse().map_err(|_| invalid("Invalid port"))?,
            None => DEFAULT_PORT,
        };
        if host.is_empty() {
            return Err(invalid("Missing host"));
        }

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::new("localhost", DEFAULT_PORT)
    }
}

// ============================================================================
// DriverConfig - 드라이버 설정
// ============================================================================

/// 드라이버 설정. 드라이버 생성 후에는 바뀌지 않습니다.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// 서버 주소
    pub address: ServerAddress,
    /// 인증 정보
    pub credentials: Credentials,
    /// 연결 타임아웃
    pub connection_timeout: Duration,
    /// User Agent
    pub user_agent: String,
}

impl DriverConfig {
    /// 새 설정 생성
    pub fn new(uri: &str, credentials: Credentials) -> DriverResult<Self> {
        Ok(Self {
            address: ServerAddress::from_uri(uri)?,
            credentials,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            user_agent: CLIENT_USER_AGENT.to_string(),
        })
    }

    /// 빌더 시작
    pub fn builder(uri: &str, credentials: Credentials) -> DriverResult<DriverConfigBuilder> {
        let config = Self::new(uri, credentials)?;
        Ok(DriverConfigBuilder { config })
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: ServerAddress::default(),
            credentials: Credentials::none(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            user_agent: CLIENT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// DriverConfigBuilder - 설정 빌더
// ============================================================================

/// 드라이버 설정 빌더
pub struct DriverConfigBuilder {
    config: DriverConfig,
}

impl DriverConfigBuilder {
    /// 연결 타임아웃 설정
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    /// User Agent 설정
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// 인증 정보 설정
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// 빌드
    pub fn build(self) -> DriverConfig {
        self.config
    }
}

// ============================================================================
// Driver - 드라이버
// ============================================================================

/// 그래프 데이터베이스 드라이버
///
/// 연결은 [`Connector`] 가 열고, 드라이버는 연결마다 초기화된 세션을 돌려줍니다.
pub struct Driver<C: Connector> {
    /// 설정
    config: Arc<DriverConfig>,
    /// 연결 생성기
    connector: C,
    /// 열린 상태
    open: RwLock<bool>,
}

impl<C: Connector> Driver<C> {
    /// 새 드라이버 생성
    pub fn new(uri: &str, credentials: Credentials, connector: C) -> DriverResult<Self> {
        let config = DriverConfig::new(uri, credentials)?;
        Ok(Self::with_config(config, connector))
    }

    /// 설정으로 드라이버 생성
    pub fn with_config(config: DriverConfig, connector: C) -> Self {
        Self {
            config: Arc::new(config),
            connector,
            open: RwLock::new(true),
        }
    }

    /// 세션 생성
    ///
    /// 연결 타임아웃 안에 연결을 열고 INIT 까지 마친 세션을 돌려줍니다.
    pub async fn session(&self) -> DriverResult<Session<C::Transport>> {
        self.ensure_open()?;

        let address = &self.config.address;
        let timeout = self.config.connection_timeout;
        let transport = tokio::time::timeout(timeout, self.connector.connect(address))
            .await
            .map_err(|_| {
                DriverError::timeout(format!("Connection to {} timed out after {:?}", address, timeout))
            })??;

        tracing::debug!("Connected to {}", address);
        Session::open(transport, self.config.clone()).await
    }

    /// 드라이버 설정
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// User Agent
    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    /// 드라이버 종료. 이미 만든 세션에는 영향이 없습니다.
    pub fn close(&self) {
        *self.open.write() = false;
    }

    /// 열린 상태 확인
    fn ensure_open(&self) -> DriverResult<()> {
        if *self.open.read() {
            Ok(())
        } else {
            Err(DriverError::protocol_state("Driver is closed"))
        }
    }
}

impl<C: Connector> fmt::Debug for Driver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("address", &self.config.address)
            .field("open", &*self.open.read())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
