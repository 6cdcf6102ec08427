//! Query Result - 결과와 요약
//!
//! 결과는 단계적으로 만들어집니다: RUN 응답 헤더에서 필드 목록을 한 번 받고,
//! PULL_ALL 의 데이터 행을 도착 순서대로 디코딩해 붙인 뒤, 마지막 메타데이터
//! 행의 통계로 요약을 채웁니다.

use std::collections::HashMap;
use std::sync::Arc;

use super::decode::decode_row;
use super::error::{DriverError, DriverResult};
use super::record::Record;
use super::statement::Statement;
use crate::bolt::packstream::PackStreamValue;

// ============================================================================
// Counters - 통계 카운터
// ============================================================================

/// 카운터
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    /// 생성된 노드 수
    pub nodes_created: i64,
    /// 삭제된 노드 수
    pub nodes_deleted: i64,
    /// 생성된 관계 수
    pub relationships_created: i64,
    /// 삭제된 관계 수
    pub relationships_deleted: i64,
    /// 설정된 속성 수
    pub properties_set: i64,
    /// 추가된 레이블 수
    pub labels_added: i64,
    /// 제거된 레이블 수
    pub labels_removed: i64,
    /// 생성된 인덱스 수
    pub indexes_added: i64,
    /// 제거된 인덱스 수
    pub indexes_removed: i64,
    /// 추가된 제약조건 수
    pub constraints_added: i64,
    /// 제거된 제약조건 수
    pub constraints_removed: i64,
}

impl Counters {
    /// 통계 맵에서 읽기. 없는 키는 0.
    pub fn from_statistics(stats: &HashMap<String, i64>) -> Self {
        let get = |key: &str| stats.get(key).copied().unwrap_or(0);
        Self {
            nodes_created: get("nodes-created"),
            nodes_deleted: get("nodes-deleted"),
            relationships_created: get("relationships-created"),
            relationships_deleted: get("relationships-deleted"),
            properties_set: get("properties-set"),
            labels_added: get("labels-added"),
            labels_removed: get("labels-removed"),
            indexes_added: get("indexes-added"),
            indexes_removed: get("indexes-removed"),
            constraints_added: get("constraints-added"),
            constraints_removed: get("constraints-removed"),
        }
    }

    /// 변경 사항 존재 여부
    pub fn contains_updates(&self) -> bool {
        self.nodes_created > 0
            || self.nodes_deleted > 0
            || self.relationships_created > 0
            || self.relationships_deleted > 0
            || self.properties_set > 0
            || self.labels_added > 0
            || self.labels_removed > 0
    }

    /// 스키마 변경 존재 여부
    pub fn contains_system_updates(&self) -> bool {
        self.indexes_added > 0
            || self.indexes_removed > 0
            || self.constraints_added > 0
            || self.constraints_removed > 0
    }
}

// ============================================================================
// ResultSummary - 결과 요약
// ============================================================================

/// 결과 요약
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    statement: Statement,
    statistics: HashMap<String, i64>,
}

impl ResultSummary {
    /// 새 요약 생성 (통계 없음)
    pub fn new(statement: Statement) -> Self {
        Self {
            statement,
            statistics: HashMap::new(),
        }
    }

    /// 실행한 문장
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// 원본 통계 (비어 있을 수 있음)
    pub fn statistics(&self) -> &HashMap<String, i64> {
        &self.statistics
    }

    /// 타입 있는 카운터
    pub fn counters(&self) -> Counters {
        Counters::from_statistics(&self.statistics)
    }
}

// ============================================================================
// QueryResult - 쿼리 결과
// ============================================================================

/// 쿼리 결과
#[derive(Debug, Clone)]
pub struct QueryResult {
    fields: Option<Arc<[String]>>,
    records: Vec<Record>,
    summary: ResultSummary,
}

impl QueryResult {
    /// 빈 결과 생성
    pub fn new(statement: Statement) -> Self {
        Self {
            fields: None,
            records: Vec::new(),
            summary: ResultSummary::new(statement),
        }
    }

    /// 필드 목록 지정 (한 번만)
    pub fn set_fields(&mut self, fields: Vec<String>) -> DriverResult<()> {
        if self.fields.is_some() {
            return Err(DriverError::protocol("Result fields already set"));
        }
        self.fields = Some(fields.into());
        Ok(())
    }

    /// 데이터 행 하나를 디코딩해 추가
    ///
    /// 행의 폭이 필드 수와 다르면 [`DriverError::Protocol`].
    pub fn push_record(&mut self, row: Vec<PackStreamValue>) -> DriverResult<()> {
        let fields = self.shared_fields();
        if row.len() != fields.len() {
            return Err(DriverError::protocol(format!(
                "Record has {} values but result has {} fields",
                row.len(),
                fields.len()
            )));
        }
        self.records.push(Record::new(fields, decode_row(row)));
        Ok(())
    }

    /// 메타데이터 행에서 읽은 통계 지정
    pub fn set_statistics(&mut self, statistics: HashMap<String, i64>) {
        self.summary.statistics = statistics;
    }

    fn shared_fields(&mut self) -> Arc<[String]> {
        self.fields
            .get_or_insert_with(|| Vec::<String>::new().into())
            .clone()
    }

    /// 필드 목록
    pub fn fields(&self) -> &[String] {
        self.fields.as_deref().unwrap_or(&[])
    }

    /// 필드 목록 (별칭)
    pub fn keys(&self) -> &[String] {
        self.fields()
    }

    /// 레코드 목록
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// 첫 번째 레코드
    pub fn first_record(&self) -> DriverResult<&Record> {
        self.records.first().ok_or(DriverError::NoRecord)
    }

    /// 단일 레코드 조회. [`first_record`](Self::first_record) 와 같음
    pub fn record(&self) -> DriverResult<&Record> {
        self.first_record()
    }

    /// 첫 번째 레코드, 없으면 기본값
    pub fn first_record_or(&self, default: Record) -> Record {
        self.records.first().cloned().unwrap_or(default)
    }

    /// 데이터 레코드 수 (메타데이터 제외)
    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// 레코드 없음 여부
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 요약
    pub fn summarize(&self) -> &ResultSummary {
        &self.summary
    }

    /// 실행한 문장
    pub fn statement(&self) -> &Statement {
        self.summary.statement()
    }

    /// 레코드 소유권 가져오기
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for QueryResult {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::types::Value;

    fn result_with_fields(fields: &[&str]) -> QueryResult {
        let mut result = QueryResult::new(Statement::new("MATCH (n) RETURN n.name, n.age"));
        result
            .set_fields(fields.iter().map(|f| f.to_string()).collect())
            .unwrap();
        result
    }

    #[test]
    fn test_counters() {
        let mut stats = HashMap::new();
        stats.insert("nodes-created".to_string(), 2);
        stats.insert("properties-set".to_string(), 3);

        let counters = Counters::from_statistics(&stats);
        assert_eq!(counters.nodes_created, 2);
        assert_eq!(counters.properties_set, 3);
        assert_eq!(counters.relationships_created, 0);
        assert!(counters.contains_updates());
        assert!(!counters.contains_system_updates());

        stats.clear();
        stats.insert("indexes-added".to_string(), 1);
        let counters = Counters::from_statistics(&stats);
        assert!(!counters.contains_updates());
        assert!(counters.contains_system_updates());
    }

    #[test]
    fn test_push_record() {
        let mut result = result_with_fields(&["name", "age"]);
        result.push_record(vec!["Alice".into(), 30i64.into()]).unwrap();
        result.push_record(vec!["Bob".into(), 25i64.into()]).unwrap();

        assert_eq!(result.size(), 2);
        assert_eq!(result.fields(), &["name", "age"]);
        assert_eq!(result.records()[1].get_string("name").unwrap(), "Bob");
        assert_eq!(result.first_record().unwrap().get_int("age").unwrap(), 30);
        assert_eq!(result.record().unwrap(), result.first_record().unwrap());
    }

    #[test]
    fn test_push_record_width_mismatch() {
        let mut result = result_with_fields(&["name", "age"]);
        let err = result.push_record(vec!["Alice".into()]).unwrap_err();
        assert!(matches!(err, DriverError::Protocol(_)));
        assert!(result.is_empty());
    }

    #[test]
    fn test_fields_set_once() {
        let mut result = result_with_fields(&["a"]);
        assert!(result.set_fields(vec!["b".into()]).is_err());
        assert_eq!(result.keys(), &["a"]);
    }

    #[test]
    fn test_first_record_empty() {
        let result = result_with_fields(&["n"]);

        let err = result.first_record().unwrap_err();
        assert!(matches!(err, DriverError::NoRecord));
        assert!(matches!(result.record(), Err(DriverError::NoRecord)));

        let default = Record::new(vec!["n".to_string()], vec![Value::Integer(-1)]);
        assert_eq!(result.first_record_or(default.clone()), default);
    }

    #[test]
    fn test_summary() {
        let mut result = result_with_fields(&[]);
        assert!(result.summarize().statistics().is_empty());

        let mut stats = HashMap::new();
        stats.insert("nodes-deleted".to_string(), 4);
        result.set_statistics(stats);

        assert_eq!(result.summarize().counters().nodes_deleted, 4);
        assert_eq!(result.statement().text, "MATCH (n) RETURN n.name, n.age");
    }

    #[test]
    fn test_records_share_fields() {
        let mut result = result_with_fields(&["n"]);
        result.push_record(vec![1i64.into()]).unwrap();
        result.push_record(vec![2i64.into()]).unwrap();

        let values: Vec<i64> = result
            .into_iter()
            .map(|r| r.get_int("n").unwrap())
            .collect();
        assert_eq!(values, vec![1, 2]);
    }
}
