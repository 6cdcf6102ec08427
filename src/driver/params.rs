//! Parameters - 쿼리 파라미터
//!
//! 호출자가 넘긴 파라미터는 경계에서 한 번 분류됩니다 ([`Parameter`]).
//! 전송 직전에 [`normalize`] 가 최상위 값만 와이어 형태로 바꿉니다:
//! 목록은 순서가 유지된 시퀀스, 맵은 삽입 순서가 유지된 키/값 구조.
//! 중첩된 값은 그대로 통과합니다.

use std::collections::HashMap;

use super::error::{DriverError, DriverResult};
use super::types::Value;
use crate::bolt::packstream::PackStreamValue;

// ============================================================================
// Parameter - 분류된 파라미터 값
// ============================================================================

/// 파라미터 값
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// 스칼라 (null, bool, 정수, 실수, 문자열, 바이트)
    Scalar(Value),
    /// 순서 있는 목록
    List(Vec<Value>),
    /// 키 맵 (삽입 순서 유지)
    Map(Vec<(String, Value)>),
    /// 그래프 값 (Node, Relationship, Path)
    Graph(Value),
}

impl Parameter {
    /// 순서가 유지되는 맵 파라미터 생성
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Parameter::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// 목록 파라미터 생성
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Parameter::List(items.into_iter().map(Into::into).collect())
    }

    /// 와이어 값으로 변환 (한 단계)
    pub fn to_wire(&self) -> PackStreamValue {
        match self {
            Parameter::Scalar(v) | Parameter::Graph(v) => v.clone().into(),
            Parameter::List(items) => {
                PackStreamValue::List(items.iter().cloned().map(Into::into).collect())
            }
            Parameter::Map(entries) => PackStreamValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone().into()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        match value {
            Value::List(items) => Parameter::List(items),
            Value::Map(map) => Parameter::Map(map.into_iter().collect()),
            v if v.is_graph() => Parameter::Graph(v),
            v => Parameter::Scalar(v),
        }
    }
}

macro_rules! impl_scalar_parameter {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Parameter {
                fn from(v: $t) -> Self {
                    Parameter::Scalar(Value::from(v))
                }
            }
        )+
    };
}

impl_scalar_parameter!(bool, i64, i32, f64, String, &str);

impl<T: Into<Value>> From<Vec<T>> for Parameter {
    fn from(items: Vec<T>) -> Self {
        Parameter::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Parameter {
    fn from(v: Option<T>) -> Self {
        Value::from(v).into()
    }
}

impl From<HashMap<String, Value>> for Parameter {
    fn from(map: HashMap<String, Value>) -> Self {
        Parameter::Map(map.into_iter().collect())
    }
}

// ============================================================================
// Parameters - 이름 붙은 파라미터 집합
// ============================================================================

/// 이름 → 값, 삽입 순서 유지
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, Parameter)>,
}

impl Parameters {
    /// 빈 파라미터 집합
    pub fn new() -> Self {
        Self::default()
    }

    /// 파라미터 추가. 같은 이름이 있으면 자리를 유지한 채 값을 바꿉니다.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Parameter>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// 이름으로 조회
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// 파라미터 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 삽입 순서대로 순회
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 다른 집합을 합침
    pub fn extend(&mut self, other: Parameters) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<Parameter>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Parameters {
    type Item = (String, Parameter);
    type IntoIter = std::vec::IntoIter<(String, Parameter)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<HashMap<String, Value>> for Parameters {
    fn from(map: HashMap<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

// ============================================================================
// normalize
// ============================================================================

/// 전송용 파라미터로 변환
///
/// 이름이 비어 있으면 [`DriverError::InvalidArgument`].
pub fn normalize(parameters: &Parameters) -> DriverResult<Vec<(String, PackStreamValue)>> {
    parameters
        .iter()
        .map(|(name, value)| {
            if name.is_empty() {
                return Err(DriverError::invalid_argument("Parameter name must not be empty"));
            }
            Ok((name.to_string(), value.to_wire()))
        })
        .collect()
}
