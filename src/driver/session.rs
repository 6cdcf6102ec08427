//! Session - 세션
//!
//! 하나의 Bolt 연결 위에서 초기화, 실행, 트랜잭션 바인딩, 종료를 관리합니다.
//!
//! # 상태
//!
//! ```text
//! Uninitialized ──init──▶ Ready ──close──▶ Closed
//!                           │ ▲
//!              run 실패     │ │  rollback + init
//!                           ▼ │
//!                        (복구 중)
//! ```
//!
//! 서버가 실행 실패를 보고하면 세션은 에러를 돌려주기 전에 롤백과 재초기화를
//! 마칩니다. 호출자는 성공한 결과 또는 분류된 에러만 보게 되고, 에러를 받은
//! 시점에는 세션이 다시 `Ready` 입니다.
//!
//! # 중단된 교환
//!
//! 교환 도중 future 가 drop 되면 연결에 읽지 않은 응답이 남습니다. 다음 교환은
//! RESET + INIT 으로 연결을 다시 맞춘 뒤 진행합니다. 활성 상태로 drop 된
//! 트랜잭션은 다음 교환 전에 ROLLBACK 됩니다.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use super::bolt::BoltTransport;
use super::driver::DriverConfig;
use super::error::{DriverError, DriverResult};
use super::params::{normalize, Parameters};
use super::result::QueryResult;
use super::statement::Statement;
use super::transaction::Transaction;
use crate::bolt::packstream::PackStreamValue;
use crate::bolt::BoltError;

// ============================================================================
// GraphSession - 세션 인터페이스
// ============================================================================

/// 세션 기능 인터페이스
///
/// 프로토콜 버전별 세션 구현을 같은 방식으로 다루기 위한 트레이트.
pub trait GraphSession {
    /// 이 세션이 만드는 트랜잭션 타입
    type Transaction<'s>
    where
        Self: 's;

    /// 프로토콜 버전
    fn protocol_version(&self) -> u32;

    /// 문장 실행
    fn run(
        &self,
        statement: impl Into<Statement> + Send,
        params: Option<Parameters>,
    ) -> impl Future<Output = DriverResult<QueryResult>> + Send;

    /// 새 트랜잭션 바인딩
    fn transaction(&self) -> DriverResult<Self::Transaction<'_>>;

    /// 세션 닫기
    fn close(&self) -> impl Future<Output = DriverResult<()>> + Send;
}

// ============================================================================
// SessionState - 세션 상태
// ============================================================================

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// INIT 전, 또는 재초기화 실패 후
    Uninitialized,
    /// 실행 가능
    Ready,
    /// 닫힘 (종료 상태)
    Closed,
}

/// 다음 교환 전에 처리할 정리 작업
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    /// 활성 트랜잭션이 drop 됨
    Rollback,
    /// 교환이 응답을 다 읽기 전에 중단됨
    Resync,
}

#[derive(Debug, Clone, Copy)]
enum Control {
    Begin,
    Commit,
    Rollback,
}

impl Control {
    fn name(self) -> &'static str {
        match self {
            Control::Begin => "BEGIN",
            Control::Commit => "COMMIT",
            Control::Rollback => "ROLLBACK",
        }
    }
}

// ============================================================================
// Session - 세션
// ============================================================================

/// 데이터베이스 세션
///
/// 전송 계층 하나를 소유합니다. 한 번에 하나의 요청/응답 교환만 진행되며,
/// 교환은 복구 절차까지 포함해 전송 잠금을 쥔 채로 끝납니다.
pub struct Session<T: BoltTransport> {
    /// 전송 계층
    transport: Mutex<T>,
    /// 드라이버 설정 (인증 정보, user agent)
    config: Arc<DriverConfig>,
    /// 세션 상태
    state: RwLock<SessionState>,
    /// 트랜잭션 바인딩 여부
    transaction_bound: RwLock<bool>,
    /// 정리 대기 작업
    pending: RwLock<Pending>,
}

impl<T: BoltTransport> Session<T> {
    /// 지원하는 프로토콜 버전
    pub const PROTOCOL_VERSION: u32 = 1;

    /// 새 세션 생성 (초기화 전)
    pub fn new(transport: T, config: Arc<DriverConfig>) -> Self {
        Self {
            transport: Mutex::new(transport),
            config,
            state: RwLock::new(SessionState::Uninitialized),
            transaction_bound: RwLock::new(false),
            pending: RwLock::new(Pending::Nothing),
        }
    }

    /// 세션 생성 후 초기화
    pub async fn open(transport: T, config: Arc<DriverConfig>) -> DriverResult<Self> {
        let session = Self::new(transport, config);
        session.init().await?;
        Ok(session)
    }

    /// 프로토콜 버전
    pub fn protocol_version(&self) -> u32 {
        Self::PROTOCOL_VERSION
    }

    /// 현재 상태
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// 초기화 여부
    pub fn is_initialized(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// 트랜잭션 바인딩 여부
    pub fn has_transaction(&self) -> bool {
        *self.transaction_bound.read()
    }

    /// 드라이버 설정
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// INIT 교환
    ///
    /// 사용자 이름이 비어 있으면 "none", 아니면 "basic" 인증을 사용합니다.
    /// 재초기화 실패 뒤 세션을 되살릴 때도 사용합니다.
    pub async fn init(&self) -> DriverResult<()> {
        let mut transport = self.transport.lock().await;
        if self.state() == SessionState::Closed {
            return Err(DriverError::protocol_state("Session is closed"));
        }
        if *self.pending.read() == Pending::Resync {
            if let Err(e) = transport.reset().await {
                tracing::warn!("Reset after interrupted exchange failed: {}", e);
            }
            *self.pending.write() = Pending::Nothing;
        }
        self.init_locked(&mut transport).await
    }

    async fn init_locked(&self, transport: &mut T) -> DriverResult<()> {
        let auth = self.config.credentials.auth_token();
        match transport.init(&self.config.user_agent, &auth).await {
            Ok(()) => {
                *self.state.write() = SessionState::Ready;
                tracing::info!("Session initialized ({} auth)", auth.scheme);
                Ok(())
            }
            Err(e) => {
                *self.state.write() = SessionState::Uninitialized;
                Err(match e {
                    BoltError::Handshake(msg) | BoltError::Message(msg) => DriverError::Handshake(msg),
                    other => other.into(),
                })
            }
        }
    }

    /// 문장 실행
    ///
    /// 트랜잭션이 바인딩된 동안에는 [`DriverError::ProtocolState`]. 트랜잭션 안의
    /// 실행은 [`Transaction::run`] 을 사용합니다.
    pub async fn run(
        &self,
        statement: impl Into<Statement>,
        params: Option<Parameters>,
    ) -> DriverResult<QueryResult> {
        let mut statement = statement.into();
        if let Some(p) = params {
            statement = statement.with_params(p);
        }

        if self.has_transaction() {
            return Err(DriverError::protocol_state(
                "A transaction is bound to this session; run statements through it",
            ));
        }

        self.execute(statement).await
    }

    /// 실행 (트랜잭션 검사 없음)
    pub(crate) async fn execute(&self, statement: Statement) -> DriverResult<QueryResult> {
        if statement.is_blank() {
            return Err(DriverError::invalid_argument("Statement text must not be empty"));
        }
        let parameters = normalize(&statement.parameters)?;

        let mut transport = self.transport.lock().await;
        self.ensure_ready()?;
        self.settle(&mut transport).await?;

        tracing::debug!(
            "RUN {} ({} parameters)",
            statement.text,
            parameters.len()
        );

        *self.pending.write() = Pending::Resync;
        let outcome = match Self::exchange(&mut transport, statement, parameters).await {
            Err(err) if err.is_message_failure() => Err(self.recover(&mut transport, err).await),
            Ok(result) => {
                tracing::debug!("Received {} records", result.size());
                Ok(result)
            }
            Err(err) => Err(err),
        };
        *self.pending.write() = Pending::Nothing;

        outcome
    }

    /// RUN + PULL_ALL 후 결과 조립
    async fn exchange(
        transport: &mut T,
        statement: Statement,
        parameters: Vec<(String, PackStreamValue)>,
    ) -> DriverResult<QueryResult> {
        let header = transport.run(&statement.text, parameters).await?;
        let mut pulled = transport.pull_all().await?;

        let mut result = QueryResult::new(statement);
        result.set_fields(header.fields().unwrap_or_default())?;

        // 마지막 행은 메타데이터
        match pulled.pop() {
            Some(metadata) => result.set_statistics(statistics(&metadata)),
            None => tracing::warn!("PULL_ALL returned no metadata row"),
        }

        for row in pulled {
            match row {
                PackStreamValue::List(values) => result.push_record(values)?,
                other => {
                    return Err(DriverError::protocol(format!(
                        "Expected a record row, got {}",
                        other.type_name()
                    )))
                }
            }
        }

        Ok(result)
    }

    /// 실패 후 복구: ROLLBACK (무조건), 상태 초기화, INIT
    ///
    /// 재초기화가 성공하면 원래 실패를, 실패하면 Handshake 에러를 돌려줍니다.
    async fn recover(&self, transport: &mut T, failure: DriverError) -> DriverError {
        tracing::warn!(
            "Statement failed ({}), recovering session: {}",
            failure.status_code().unwrap_or("no status code"),
            failure
        );

        if let Err(e) = transport.rollback().await {
            tracing::warn!("Rollback during recovery failed: {}", e);
        }
        *self.state.write() = SessionState::Uninitialized;

        match self.init_locked(transport).await {
            Ok(()) => failure,
            Err(e) => {
                tracing::error!("Session reinitialization failed: {}", e);
                match e {
                    DriverError::Handshake(msg) => DriverError::Handshake(msg),
                    other => DriverError::Handshake(other.to_string()),
                }
            }
        }
    }

    /// 대기 중인 정리 작업 수행
    ///
    /// 교환이 중단됐다면 RESET + INIT. 그때 트랜잭션이 바인딩돼 있으면 서버 쪽
    /// 트랜잭션은 사라졌으므로 [`DriverError::ProtocolState`].
    async fn settle(&self, transport: &mut T) -> DriverResult<()> {
        let pending = *self.pending.read();
        match pending {
            Pending::Nothing => return Ok(()),
            Pending::Rollback => {
                *self.pending.write() = Pending::Resync;
                tracing::debug!("ROLLBACK of abandoned transaction");
                if let Err(e) = transport.rollback().await {
                    tracing::warn!("Rollback of abandoned transaction failed: {}", e);
                }
            }
            Pending::Resync => {
                tracing::warn!("Previous exchange was interrupted, resetting connection");
                if let Err(e) = transport.reset().await {
                    tracing::warn!("Reset after interrupted exchange failed: {}", e);
                }
                *self.state.write() = SessionState::Uninitialized;
                *self.pending.write() = Pending::Nothing;

                if let Err(e) = self.init_locked(transport).await {
                    tracing::error!("Session reinitialization failed: {}", e);
                    return Err(e);
                }
            }
        }
        *self.pending.write() = Pending::Nothing;

        if pending == Pending::Resync && self.has_transaction() {
            return Err(DriverError::protocol_state(
                "The open transaction was discarded after an interrupted exchange",
            ));
        }
        Ok(())
    }

    /// 새 트랜잭션 바인딩
    ///
    /// 이미 바인딩된 트랜잭션이 있으면 [`DriverError::ProtocolState`].
    pub fn transaction(&self) -> DriverResult<Transaction<'_, T>> {
        if self.state() == SessionState::Closed {
            return Err(DriverError::protocol_state("Session is closed"));
        }

        let mut bound = self.transaction_bound.write();
        if *bound {
            return Err(DriverError::protocol_state(
                "A transaction is already bound to this session",
            ));
        }
        *bound = true;
        drop(bound);

        Ok(Transaction::new(self))
    }

    pub(crate) fn release_transaction(&self) {
        *self.transaction_bound.write() = false;
    }

    /// 활성 트랜잭션을 끝내지 않고 놓음. ROLLBACK 은 다음 교환 전에 보냄
    pub(crate) fn abandon_transaction(&self) {
        {
            let mut pending = self.pending.write();
            if *pending == Pending::Nothing {
                *pending = Pending::Rollback;
            }
        }
        self.release_transaction();
    }

    pub(crate) async fn begin(&self) -> DriverResult<()> {
        self.control(Control::Begin).await
    }

    pub(crate) async fn commit(&self) -> DriverResult<()> {
        self.control(Control::Commit).await
    }

    pub(crate) async fn rollback(&self) -> DriverResult<()> {
        self.control(Control::Rollback).await
    }

    async fn control(&self, op: Control) -> DriverResult<()> {
        let mut transport = self.transport.lock().await;
        self.ensure_ready()?;
        self.settle(&mut transport).await?;

        tracing::debug!("{}", op.name());
        *self.pending.write() = Pending::Resync;
        let outcome = match op {
            Control::Begin => transport.begin().await,
            Control::Commit => transport.commit().await,
            Control::Rollback => transport.rollback().await,
        };

        let outcome = match outcome.map_err(DriverError::from) {
            Err(err) if err.is_message_failure() => Err(self.recover(&mut transport, err).await),
            other => other,
        };
        *self.pending.write() = Pending::Nothing;

        outcome
    }

    /// 세션 닫기
    ///
    /// RESET 을 보내고 종료 상태로 바꿉니다. 이미 닫힌 세션은 아무것도 하지 않습니다.
    pub async fn close(&self) -> DriverResult<()> {
        let mut transport = self.transport.lock().await;
        if self.state() == SessionState::Closed {
            return Ok(());
        }

        let outcome = transport.reset().await;
        *self.state.write() = SessionState::Closed;
        *self.pending.write() = Pending::Nothing;
        tracing::info!("Session closed");

        outcome.map_err(DriverError::from)
    }

    /// 실행 가능 상태 확인
    fn ensure_ready(&self) -> DriverResult<()> {
        match self.state() {
            SessionState::Ready => Ok(()),
            SessionState::Uninitialized => {
                Err(DriverError::protocol_state("Session is not initialized"))
            }
            SessionState::Closed => Err(DriverError::protocol_state("Session is closed")),
        }
    }
}

/// 메타데이터 행의 `stats` 맵. 없거나 형태가 다르면 빈 맵.
fn statistics(metadata: &PackStreamValue) -> HashMap<String, i64> {
    metadata
        .get("stats")
        .and_then(PackStreamValue::as_map)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(k, v)| v.as_int().map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}

impl<T: BoltTransport> GraphSession for Session<T> {
    type Transaction<'s> = Transaction<'s, T> where Self: 's;

    fn protocol_version(&self) -> u32 {
        Self::PROTOCOL_VERSION
    }

    fn run(
        &self,
        statement: impl Into<Statement> + Send,
        params: Option<Parameters>,
    ) -> impl Future<Output = DriverResult<QueryResult>> + Send {
        Session::run(self, statement, params)
    }

    fn transaction(&self) -> DriverResult<Transaction<'_, T>> {
        Session::transaction(self)
    }

    fn close(&self) -> impl Future<Output = DriverResult<()>> + Send {
        Session::close(self)
    }
}

impl<T: BoltTransport> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.config.address)
            .field("state", &self.state())
            .field("transaction_bound", &self.has_transaction())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
