//! Driver Types
//!
//! 드라이버에서 사용하는 값 타입 정의.
//! 그래프 타입(Node, Relationship, UnboundRelationship, Path)은 결과 디코딩으로만
//! 만들어지며, 호출자가 직접 조립하는 용도가 아닙니다.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{DriverError, DriverResult};
use crate::bolt::packstream::{
    PackStreamStructure, PackStreamValue, NODE_TAG, PATH_TAG, RELATIONSHIP_TAG,
    UNBOUND_RELATIONSHIP_TAG,
};

// ============================================================================
// Value - 그래프 값
// ============================================================================

/// 그래프 값 타입
///
/// 역직렬화는 변형 선언 순서대로 시도합니다. 배열은 항상 `List`, 그래프 타입의
/// 필드와 정확히 일치하는 맵은 해당 그래프 값, 나머지 맵은 `Map` 이 됩니다.
/// `Bytes` 는 정수 배열로 직렬화되며 `List` 로 읽힙니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer (i64)
    Integer(i64),
    /// Float (f64)
    Float(f64),
    /// String
    String(String),
    /// Bytes
    #[serde(skip_deserializing)]
    Bytes(Vec<u8>),
    /// List
    List(Vec<Value>),
    /// Path
    Path(Path),
    /// Relationship
    Relationship(Relationship),
    /// 경로 내부의 관계 (끝점 ID 없음)
    UnboundRelationship(UnboundRelationship),
    /// Node
    Node(Node),
    /// Map
    Map(HashMap<String, Value>),
}

impl Value {
    /// Null 여부
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Boolean으로 변환
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer로 변환
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Float로 변환
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// String으로 변환
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// List로 변환
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Map으로 변환
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Node로 변환
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Relationship으로 변환
    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Value::Relationship(r) => Some(r),
            _ => None,
        }
    }

    /// UnboundRelationship으로 변환
    pub fn as_unbound_relationship(&self) -> Option<&UnboundRelationship> {
        match self {
            Value::UnboundRelationship(r) => Some(r),
            _ => None,
        }
    }

    /// Path로 변환
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// 그래프 값 여부
    pub fn is_graph(&self) -> bool {
        matches!(
            self,
            Value::Node(_) | Value::Relationship(_) | Value::UnboundRelationship(_) | Value::Path(_)
        )
    }

    /// 타입 이름
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Node(_) => "Node",
            Value::Relationship(_) => "Relationship",
            Value::UnboundRelationship(_) => "UnboundRelationship",
            Value::Path(_) => "Path",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::List(l) => write!(f, "[{} items]", l.len()),
            Value::Map(m) => write!(f, "{{{} entries}}", m.len()),
            Value::Node(n) => write!(f, "{}", n),
            Value::Relationship(r) => write!(f, "{}", r),
            Value::UnboundRelationship(r) => write!(f, "{}", r),
            Value::Path(p) => write!(f, "{}", p),
        }
    }
}

// From implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(v: HashMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

// ============================================================================
// Node - 그래프 노드
// ============================================================================

/// 그래프 노드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    /// 노드 ID
    pub id: i64,
    /// 레이블 집합
    pub labels: BTreeSet<String>,
    /// 속성
    pub properties: HashMap<String, Value>,
}

impl Node {
    /// 새 노드 생성
    pub fn new(
        id: i64,
        labels: impl IntoIterator<Item = String>,
        properties: HashMap<String, Value>,
    ) -> Self {
        Self {
            id,
            labels: labels.into_iter().collect(),
            properties,
        }
    }

    /// 레이블 포함 여부
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// 속성 가져오기
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// 속성 가져오기 (타입 변환)
    pub fn get_as<T: TryFrom<Value, Error = DriverError>>(&self, key: &str) -> DriverResult<T> {
        self.properties
            .get(key)
            .cloned()
            .ok_or_else(|| DriverError::type_conversion(format!("Property '{}' not found", key)))
            .and_then(|v| T::try_from(v))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.id)?;
        for label in &self.labels {
            write!(f, ":{}", label)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Relationship - 그래프 관계
// ============================================================================

/// 그래프 관계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Relationship {
    /// 관계 ID
    pub id: i64,
    /// 시작 노드 ID
    pub start_node_id: i64,
    /// 끝 노드 ID
    pub end_node_id: i64,
    /// 타입
    #[serde(rename = "type")]
    pub rel_type: String,
    /// 속성
    pub properties: HashMap<String, Value>,
}

impl Relationship {
    /// 새 관계 생성
    pub fn new(
        id: i64,
        start_node_id: i64,
        end_node_id: i64,
        rel_type: impl Into<String>,
        properties: HashMap<String, Value>,
    ) -> Self {
        Self {
            id,
            start_node_id,
            end_node_id,
            rel_type: rel_type.into(),
            properties,
        }
    }

    /// 속성 가져오기
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({})-[:{}]->({})  [id: {}]",
            self.start_node_id, self.rel_type, self.end_node_id, self.id
        )
    }
}

// ============================================================================
// UnboundRelationship - 끝점 없는 관계
// ============================================================================

/// 경로 안에 들어 있는 관계. 끝점은 경로의 인덱스로만 결정됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnboundRelationship {
    /// 관계 ID
    pub id: i64,
    /// 타입
    #[serde(rename = "type")]
    pub rel_type: String,
    /// 속성
    pub properties: HashMap<String, Value>,
}

impl UnboundRelationship {
    /// 새 관계 생성
    pub fn new(id: i64, rel_type: impl Into<String>, properties: HashMap<String, Value>) -> Self {
        Self {
            id,
            rel_type: rel_type.into(),
            properties,
        }
    }

    /// 속성 가져오기
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// 끝점을 붙여 Relationship 으로 변환
    pub fn bind(&self, start_node_id: i64, end_node_id: i64) -> Relationship {
        Relationship::new(
            self.id,
            start_node_id,
            end_node_id,
            self.rel_type.clone(),
            self.properties.clone(),
        )
    }
}

impl fmt::Display for UnboundRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-[:{}]-  [id: {}]", self.rel_type, self.id)
    }
}

// ============================================================================
// Path - 그래프 경로
// ============================================================================

/// 그래프 경로
///
/// `indices` 는 서버가 보낸 순회 순서를 그대로 담습니다. 관계 인덱스는
/// 1부터 시작하며 부호가 방향을 나타냅니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Path {
    /// 노드들
    pub nodes: Vec<Node>,
    /// 관계들
    pub relationships: Vec<UnboundRelationship>,
    /// 순회 인덱스
    pub indices: Vec<i64>,
}

impl Path {
    /// 새 경로 생성
    pub fn new(nodes: Vec<Node>, relationships: Vec<UnboundRelationship>, indices: Vec<i64>) -> Self {
        Self {
            nodes,
            relationships,
            indices,
        }
    }

    /// 경로 길이 (순회한 관계 수)
    pub fn len(&self) -> usize {
        self.indices.len() / 2
    }

    /// 빈 경로 여부
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 시작 노드
    pub fn start(&self) -> Option<&Node> {
        self.nodes.first()
    }

    /// 순회 순서대로 끝점을 붙인 관계들
    ///
    /// 인덱스 쌍 `(관계, 노드)` 마다 관계 하나를 이전 노드와 다음 노드에 붙입니다.
    /// 관계 인덱스가 음수면 역방향. 인덱스가 범위를 벗어나면 `None`.
    pub fn bound_relationships(&self) -> Option<Vec<Relationship>> {
        let mut current = self.nodes.first()?;
        let mut bound = Vec::with_capacity(self.len());

        for step in self.indices.chunks_exact(2) {
            let (rel_index, node_index) = (step[0], step[1]);
            let offset = usize::try_from(rel_index.unsigned_abs()).ok()?.checked_sub(1)?;
            let rel = self.relationships.get(offset)?;
            let next = self.nodes.get(usize::try_from(node_index).ok()?)?;

            let (start, end) = if rel_index > 0 {
                (current.id, next.id)
            } else {
                (next.id, current.id)
            };
            bound.push(rel.bind(start, end));
            current = next;
        }

        Some(bound)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Path: {} nodes, {} rels>", self.nodes.len(), self.relationships.len())
    }
}

// ============================================================================
// PackStreamValue conversions
// ============================================================================

fn properties_to_wire(properties: HashMap<String, Value>) -> PackStreamValue {
    PackStreamValue::Map(properties.into_iter().map(|(k, v)| (k, v.into())).collect())
}

impl From<Value> for PackStreamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PackStreamValue::Null,
            Value::Boolean(b) => PackStreamValue::Boolean(b),
            Value::Integer(i) => PackStreamValue::Integer(i),
            Value::Float(f) => PackStreamValue::Float(f),
            Value::String(s) => PackStreamValue::String(s),
            Value::Bytes(b) => PackStreamValue::Bytes(b),
            Value::List(l) => PackStreamValue::List(l.into_iter().map(Into::into).collect()),
            Value::Map(m) => properties_to_wire(m),
            Value::Node(n) => n.into(),
            Value::Relationship(r) => r.into(),
            Value::UnboundRelationship(r) => r.into(),
            Value::Path(p) => PackStreamValue::Structure(PackStreamStructure::new(
                PATH_TAG,
                vec![
                    PackStreamValue::List(p.nodes.into_iter().map(Into::into).collect()),
                    PackStreamValue::List(p.relationships.into_iter().map(Into::into).collect()),
                    PackStreamValue::List(p.indices.into_iter().map(PackStreamValue::Integer).collect()),
                ],
            )),
        }
    }
}

impl From<Node> for PackStreamValue {
    fn from(n: Node) -> Self {
        PackStreamValue::Structure(PackStreamStructure::new(
            NODE_TAG,
            vec![
                PackStreamValue::Integer(n.id),
                PackStreamValue::List(n.labels.into_iter().map(PackStreamValue::String).collect()),
                properties_to_wire(n.properties),
            ],
        ))
    }
}

impl From<Relationship> for PackStreamValue {
    fn from(r: Relationship) -> Self {
        PackStreamValue::Structure(PackStreamStructure::new(
            RELATIONSHIP_TAG,
            vec![
                PackStreamValue::Integer(r.id),
                PackStreamValue::Integer(r.start_node_id),
                PackStreamValue::Integer(r.end_node_id),
                PackStreamValue::String(r.rel_type),
                properties_to_wire(r.properties),
            ],
        ))
    }
}

impl From<UnboundRelationship> for PackStreamValue {
    fn from(r: UnboundRelationship) -> Self {
        PackStreamValue::Structure(PackStreamStructure::new(
            UNBOUND_RELATIONSHIP_TAG,
            vec![
                PackStreamValue::Integer(r.id),
                PackStreamValue::String(r.rel_type),
                properties_to_wire(r.properties),
            ],
        ))
    }
}

// ============================================================================
// TryFrom implementations
// ============================================================================

macro_rules! impl_try_from_value {
    ($target:ty, $name:literal, $($pattern:pat => $out:expr),+) => {
        impl TryFrom<Value> for $target {
            type Error = DriverError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    $($pattern => Ok($out),)+
                    other => Err(DriverError::type_conversion(format!(
                        "Cannot convert {} to {}",
                        other.type_name(),
                        $name
                    ))),
                }
            }
        }
    };
}

impl_try_from_value!(bool, "bool", Value::Boolean(b) => b);
impl_try_from_value!(i64, "i64", Value::Integer(i) => i);
impl_try_from_value!(f64, "f64", Value::Float(f) => f, Value::Integer(i) => i as f64);
impl_try_from_value!(String, "String", Value::String(s) => s);
impl_try_from_value!(Vec<Value>, "List", Value::List(l) => l);
impl_try_from_value!(Node, "Node", Value::Node(n) => n);
impl_try_from_value!(Relationship, "Relationship", Value::Relationship(r) => r);
impl_try_from_value!(UnboundRelationship, "UnboundRelationship", Value::UnboundRelationship(r) => r);
impl_try_from_value!(Path, "Path", Value::Path(p) => p);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_int(), Some(42));
        assert_eq!(Value::Float(3.14).as_float(), Some(3.14));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::String("hello".into()).to_string(), "\"hello\"");
    }

    #[test]
    fn test_value_from() {
        let v: Value = vec![1i64, 2, 3].into();
        assert_eq!(
            v,
            Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)])
        );

        let v: Value = Option::<i64>::None.into();
        assert!(v.is_null());
    }

    #[test]
    fn test_value_try_from() {
        assert_eq!(bool::try_from(Value::Boolean(true)).unwrap(), true);
        assert_eq!(i64::try_from(Value::Integer(42)).unwrap(), 42);
        assert_eq!(f64::try_from(Value::Integer(2)).unwrap(), 2.0);
        assert_eq!(String::try_from(Value::String("hello".into())).unwrap(), "hello");

        let err = i64::try_from(Value::String("x".into())).unwrap_err();
        assert_eq!(err.to_string(), "Type conversion error: Cannot convert String to i64");
    }

    #[test]
    fn test_node() {
        let mut props = HashMap::new();
        props.insert("name".into(), Value::String("Alice".into()));

        let node = Node::new(1, vec!["Person".into(), "Admin".into()], props);

        assert_eq!(node.id, 1);
        assert!(node.has_label("Person"));
        assert!(!node.has_label("Company"));
        assert_eq!(node.get_as::<String>("name").unwrap(), "Alice");
        assert!(node.get_as::<String>("age").is_err());
        assert_eq!(node.to_string(), "(1:Admin:Person)");
    }

    #[test]
    fn test_unbound_relationship_bind() {
        let rel = UnboundRelationship::new(7, "KNOWS", HashMap::new());
        let bound = rel.bind(1, 2);
        assert_eq!(bound.id, 7);
        assert_eq!(bound.start_node_id, 1);
        assert_eq!(bound.end_node_id, 2);
        assert_eq!(bound.rel_type, "KNOWS");
    }

    #[test]
    fn test_path() {
        let node1 = Node::new(1, Vec::new(), HashMap::new());
        let node2 = Node::new(2, Vec::new(), HashMap::new());
        let rel = UnboundRelationship::new(1, "KNOWS", HashMap::new());

        let path = Path::new(vec![node1, node2], vec![rel], vec![1, 1]);

        assert_eq!(path.len(), 1);
        assert!(!path.is_empty());
        assert_eq!(path.start().unwrap().id, 1);
        assert_eq!(path.to_string(), "<Path: 2 nodes, 1 rels>");
    }

    #[test]
    fn test_path_bound_relationships() {
        let nodes = vec![
            Node::new(10, Vec::new(), HashMap::new()),
            Node::new(20, Vec::new(), HashMap::new()),
            Node::new(30, Vec::new(), HashMap::new()),
        ];
        let rels = vec![
            UnboundRelationship::new(1, "KNOWS", HashMap::new()),
            UnboundRelationship::new(2, "LIKES", HashMap::new()),
        ];

        // (10)-[:KNOWS]->(20)<-[:LIKES]-(30)
        let path = Path::new(nodes.clone(), rels.clone(), vec![1, 1, -2, 2]);
        let bound = path.bound_relationships().unwrap();
        assert_eq!(bound.len(), 2);
        assert_eq!((bound[0].start_node_id, bound[0].end_node_id), (10, 20));
        assert_eq!(bound[0].rel_type, "KNOWS");
        assert_eq!((bound[1].start_node_id, bound[1].end_node_id), (30, 20));
        assert_eq!(bound[1].rel_type, "LIKES");

        assert!(Path::new(nodes.clone(), rels.clone(), vec![3, 1]).bound_relationships().is_none());
        assert!(Path::new(nodes.clone(), rels.clone(), vec![0, 1]).bound_relationships().is_none());
        assert!(Path::new(nodes, rels, vec![1, 7]).bound_relationships().is_none());
        assert!(Path::new(Vec::new(), Vec::new(), Vec::new()).bound_relationships().is_none());
    }

    #[test]
    fn test_node_to_wire() {
        let node = Node::new(3, vec!["Person".into()], HashMap::new());
        let wire: PackStreamValue = node.into();
        let s = wire.as_structure().unwrap();
        assert_eq!(s.tag, NODE_TAG);
        assert_eq!(s.fields[0], PackStreamValue::Integer(3));
        assert_eq!(
            s.fields[1],
            PackStreamValue::List(vec![PackStreamValue::String("Person".into())])
        );
    }

    #[test]
    fn test_value_serialize() {
        let v = Value::List(vec![Value::Integer(1), Value::String("a".into()), Value::Null]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"[1,"a",null]"#);
    }

    #[test]
    fn test_value_deserialize_list() {
        let v: Value = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(v, Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]));

        let v: Value = serde_json::from_str("1.5").unwrap();
        assert_eq!(v, Value::Float(1.5));
    }

    #[test]
    fn test_value_deserialize_graph() {
        let mut props = HashMap::new();
        props.insert("name".to_string(), Value::String("Alice".into()));
        let alice = Node::new(1, vec!["Person".into()], props);
        let bob = Node::new(2, vec!["Person".into()], HashMap::new());
        let knows = UnboundRelationship::new(9, "KNOWS", HashMap::new());

        let values = vec![
            Value::Node(alice.clone()),
            Value::Relationship(Relationship::new(9, 1, 2, "KNOWS", HashMap::new())),
            Value::UnboundRelationship(knows.clone()),
            Value::Path(Path::new(vec![alice, bob], vec![knows], vec![1, 1])),
        ];

        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value, "{}", json);
        }

        let v: Value = serde_json::from_str(r#"{"id":1,"labels":["A"],"properties":{}}"#).unwrap();
        assert!(v.as_node().unwrap().has_label("A"));
    }

    #[test]
    fn test_value_deserialize_plain_map() {
        // 그래프 필드 외의 키가 있으면 맵
        let v: Value =
            serde_json::from_str(r#"{"id":1,"labels":["A"],"properties":{},"extra":true}"#).unwrap();
        assert_eq!(v.as_map().unwrap().len(), 4);

        let v: Value = serde_json::from_str(r#"{"name":"Alice","tags":[1,2]}"#).unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map["name"], Value::String("Alice".into()));
        assert_eq!(map["tags"], Value::List(vec![Value::Integer(1), Value::Integer(2)]));
    }
}
