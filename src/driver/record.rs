//! Record - 쿼리 결과 레코드
//!
//! 디코딩된 행 하나. 필드 이름 목록은 같은 결과의 모든 레코드가 공유하며,
//! 값은 필드와 같은 위치에 놓입니다.

use std::collections::HashMap;
use std::fmt;
use std::slice;
use std::sync::Arc;
use std::vec;

use super::error::{DriverError, DriverResult};
use super::types::{Node, Path, Relationship, Value};

/// 타입별 접근자 생성
macro_rules! typed_getters {
    ($($(#[$doc:meta])* $name:ident => $ty:ty;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, key: &str) -> DriverResult<$ty> {
                self.get_as::<$ty>(key)
            }
        )+
    };
}

// ============================================================================
// Record - 단일 레코드
// ============================================================================

/// 쿼리 결과 레코드
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    keys: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// 새 레코드 생성
    ///
    /// `keys` 와 `values` 의 길이는 같아야 합니다. 결과를 조립할 때
    /// [`QueryResult`](super::QueryResult) 가 검사합니다.
    pub fn new(keys: impl Into<Arc<[String]>>, values: Vec<Value>) -> Self {
        Self {
            keys: keys.into(),
            values,
        }
    }

    /// 필드 없는 레코드
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new(), Vec::new())
    }

    /// 필드 이름
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// 값 (필드 순서)
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 필드가 없는지
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 필드 이름으로 값 조회
    pub fn get(&self, key: &str) -> Option<&Value> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.values.get(index)
    }

    /// 위치로 값 조회
    pub fn get_by_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// 필드 존재 여부
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// 값을 `T` 로 변환해 조회
    ///
    /// 없는 필드와 타입 불일치 모두 [`DriverError::TypeConversion`].
    pub fn get_as<T>(&self, key: &str) -> DriverResult<T>
    where
        T: TryFrom<Value, Error = DriverError>,
    {
        match self.get(key) {
            Some(value) => T::try_from(value.clone()),
            None => Err(DriverError::type_conversion(format!(
                "Record has no field '{}' (fields: {})",
                key,
                self.keys.join(", ")
            ))),
        }
    }

    typed_getters! {
        /// Boolean 필드
        get_bool => bool;
        /// Integer 필드
        get_int => i64;
        /// String 필드
        get_string => String;
        /// Node 필드
        get_node => Node;
        /// Relationship 필드
        get_relationship => Relationship;
        /// Path 필드
        get_path => Path;
    }

    /// `(필드, 값)` 쌍 순회
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            keys: self.keys.iter(),
            values: self.values.iter(),
        }
    }

    /// 필드 이름 → 값 맵
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// 빌린 레코드의 `(필드, 값)` 반복자
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    keys: slice::Iter<'a, String>,
    values: slice::Iter<'a, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        Some((self.keys.next()?.as_str(), self.values.next()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// 레코드를 소비하는 `(필드, 값)` 반복자
///
/// 필드 이름은 공유 목록에서 복사합니다.
#[derive(Debug)]
pub struct IntoIter {
    keys: Arc<[String]>,
    values: vec::IntoIter<Value>,
    position: usize,
}

impl Iterator for IntoIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.get(self.position)?.clone();
        let value = self.values.next()?;
        self.position += 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter {
            keys: self.keys,
            values: self.values.into_iter(),
            position: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
