//! Transaction - 명시적 트랜잭션
//!
//! 세션 하나에 묶여 begin → run* → commit | rollback 순서를 강제합니다.
//! 트랜잭션은 세션을 빌려 쓸 뿐 소유하지 않습니다.

use std::fmt;

use super::bolt::BoltTransport;
use super::error::{DriverError, DriverResult};
use super::params::Parameters;
use super::result::QueryResult;
use super::session::Session;
use super::statement::Statement;

// ============================================================================
// TransactionState - 트랜잭션 상태
// ============================================================================

/// 트랜잭션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// BEGIN 전
    NotStarted,
    /// 활성 상태
    Active,
    /// 커밋됨
    Committed,
    /// 롤백됨
    RolledBack,
}

impl TransactionState {
    /// 완료 상태 여부
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::Active => "active",
            Self::Committed => "committed",
            Self::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Transaction - 트랜잭션
// ============================================================================

/// 명시적 트랜잭션
///
/// [`Session::transaction`] 으로 만들어지며, 완료 상태가 되거나 drop 될 때
/// 세션 바인딩을 해제합니다.
pub struct Transaction<'s, T: BoltTransport> {
    /// 소유 세션
    session: &'s Session<T>,
    /// 상태
    state: TransactionState,
}

impl<'s, T: BoltTransport> Transaction<'s, T> {
    pub(crate) fn new(session: &'s Session<T>) -> Self {
        Self {
            session,
            state: TransactionState::NotStarted,
        }
    }

    /// 상태
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// BEGIN
    pub async fn begin(&mut self) -> DriverResult<()> {
        if self.state != TransactionState::NotStarted {
            return Err(self.invalid("begin"));
        }

        self.session.begin().await?;
        self.state = TransactionState::Active;
        Ok(())
    }

    /// 트랜잭션 안에서 문장 실행
    ///
    /// 서버가 실패를 보고하거나 세션이 더 이상 트랜잭션을 이어갈 수 없으면
    /// 상태가 `RolledBack` 으로 바뀝니다.
    pub async fn run(
        &mut self,
        statement: impl Into<Statement>,
        params: Option<Parameters>,
    ) -> DriverResult<QueryResult> {
        if self.state != TransactionState::Active {
            return Err(self.invalid("run"));
        }

        let mut statement = statement.into();
        if let Some(p) = params {
            statement = statement.with_params(p);
        }

        match self.session.execute(statement).await {
            Err(
                e @ (DriverError::MessageFailure { .. }
                | DriverError::Handshake(_)
                | DriverError::ProtocolState(_)),
            ) => {
                self.finish(TransactionState::RolledBack);
                Err(e)
            }
            other => other,
        }
    }

    /// COMMIT
    ///
    /// 실패하면 트랜잭션은 `RolledBack` 이 됩니다.
    pub async fn commit(&mut self) -> DriverResult<()> {
        if self.state != TransactionState::Active {
            return Err(self.invalid("commit"));
        }

        match self.session.commit().await {
            Ok(()) => {
                self.finish(TransactionState::Committed);
                Ok(())
            }
            Err(e) => {
                self.finish(TransactionState::RolledBack);
                Err(e)
            }
        }
    }

    /// ROLLBACK
    pub async fn rollback(&mut self) -> DriverResult<()> {
        if self.state != TransactionState::Active {
            return Err(self.invalid("rollback"));
        }

        let outcome = self.session.rollback().await;
        self.finish(TransactionState::RolledBack);
        outcome
    }

    fn finish(&mut self, state: TransactionState) {
        self.state = state;
        self.session.release_transaction();
    }

    fn invalid(&self, op: &str) -> DriverError {
        DriverError::protocol_state(format!("Cannot {} a transaction that is {}", op, self.state))
    }
}

impl<T: BoltTransport> Drop for Transaction<'_, T> {
    fn drop(&mut self) {
        if self.state.is_terminated() {
            return;
        }
        if self.state == TransactionState::Active {
            // ROLLBACK 은 세션의 다음 교환 전에 전송
            tracing::warn!("Transaction dropped while active; it will be rolled back");
            self.session.abandon_transaction();
        } else {
            self.session.release_transaction();
        }
    }
}

impl<T: BoltTransport> fmt::Debug for Transaction<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("state", &self.state)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
