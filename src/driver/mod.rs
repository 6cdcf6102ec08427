//! Driver Module
//!
//! 세션 계층: 세션 상태 머신, 파라미터 정규화, 트랜잭션, 결과 디코딩.
//!
//! # 구성
//!
//! - [`Driver`], [`DriverConfig`]: 연결 설정과 세션 생성
//! - [`Session`]: 초기화, 실행, 실패 후 자동 복구, 종료
//! - [`Transaction`]: begin → run* → commit | rollback
//! - [`QueryResult`], [`Record`], [`ResultSummary`]: 디코딩된 결과와 통계
//! - [`Value`], [`Node`], [`Relationship`], [`UnboundRelationship`], [`Path`]: 값 타입
//!
//! # Example
//!
//! ```ignore
//! use boltkit::driver::{Credentials, Driver};
//! use boltkit::params;
//!
//! let driver = Driver::new("bolt://localhost:7687", Credentials::new("neo4j", "password"), connector)?;
//!
//! // 세션 생성 (INIT 포함)
//! let session = driver.session().await?;
//!
//! // 쿼리 실행
//! let result = session.run("RETURN $x AS x", Some(params! { "x" => vec![1i64, 2, 3] })).await?;
//! for record in &result {
//!     println!("{}", record);
//! }
//!
//! // 트랜잭션
//! let mut tx = session.transaction()?;
//! tx.begin().await?;
//! tx.run("CREATE (n:Person {name: $name})", Some(params! { "name" => "Alice" })).await?;
//! tx.commit().await?;
//!
//! // 세션 닫기
//! session.close().await?;
//! ```

pub mod bolt;
mod decode;
mod driver;
mod error;
mod params;
mod record;
mod result;
mod session;
mod statement;
mod transaction;
mod types;

// Re-exports
pub use bolt::{BoltTransport, Connector};
pub use decode::{decode_row, decode_value};
pub use driver::{
    Credentials, Driver, DriverConfig, DriverConfigBuilder, ServerAddress,
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_PORT,
};
pub use error::{parse_status_code, DriverError, DriverResult};
pub use params::{normalize, Parameter, Parameters};
pub use record::{IntoIter as RecordIntoIter, Iter as RecordIter, Record};
pub use result::{Counters, QueryResult, ResultSummary};
pub use session::{GraphSession, Session, SessionState};
pub use statement::Statement;
pub use transaction::{Transaction, TransactionState};
pub use types::{Node, Path, Relationship, UnboundRelationship, Value};

/// 파라미터 집합 생성 매크로 (삽입 순서 유지)
#[macro_export]
macro_rules! params {
    () => {
        $crate::driver::Parameters::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::driver::Parameters::new();
        $(
            params.insert($key, $value);
        )+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_macro() {
        let params = crate::params! {
            "name" => "Alice",
            "tags" => vec!["a", "b"],
            "age" => 30i64,
        };

        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["name", "tags", "age"]);
        assert_eq!(
            params.get("tags"),
            Some(&Parameter::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert!(crate::params!().is_empty());
    }
}
