//! Result Decoder - PackStream 값을 드라이버 값으로 변환
//!
//! 결과 행은 PackStream 트리로 도착합니다. 태그가 알려진 구조체는 그래프
//! 타입으로 바뀌고, List/Map 은 재귀적으로 내려가며, 스칼라는 그대로
//! 통과합니다. 변환은 실패하지 않습니다: 알 수 없는 태그나 형태가 맞지 않는
//! 구조체는 필드 목록(`Value::List`)으로 남깁니다.

use std::collections::HashMap;

use super::types::{Node, Path, Relationship, UnboundRelationship, Value};
use crate::bolt::packstream::{
    tag_name, PackStreamStructure, PackStreamValue, NODE_TAG, PATH_TAG, RELATIONSHIP_TAG,
    UNBOUND_RELATIONSHIP_TAG,
};

/// PackStream 값 하나를 드라이버 값으로 변환
pub fn decode_value(value: PackStreamValue) -> Value {
    match value {
        PackStreamValue::Null => Value::Null,
        PackStreamValue::Boolean(b) => Value::Boolean(b),
        PackStreamValue::Integer(i) => Value::Integer(i),
        PackStreamValue::Float(f) => Value::Float(f),
        PackStreamValue::String(s) => Value::String(s),
        PackStreamValue::Bytes(b) => Value::Bytes(b),
        PackStreamValue::List(items) => Value::List(items.into_iter().map(decode_value).collect()),
        PackStreamValue::Map(entries) => Value::Map(decode_map(entries)),
        PackStreamValue::Structure(s) => decode_structure(s),
    }
}

/// 데이터 행 하나를 값 목록으로 변환
pub fn decode_row(row: Vec<PackStreamValue>) -> Vec<Value> {
    row.into_iter().map(decode_value).collect()
}

fn decode_map(entries: Vec<(String, PackStreamValue)>) -> HashMap<String, Value> {
    entries
        .into_iter()
        .map(|(k, v)| (k, decode_value(v)))
        .collect()
}

fn decode_structure(s: PackStreamStructure) -> Value {
    let decoded = match s.tag {
        NODE_TAG => node_from_fields(&s.fields).map(Value::Node),
        RELATIONSHIP_TAG => relationship_from_fields(&s.fields).map(Value::Relationship),
        UNBOUND_RELATIONSHIP_TAG => {
            unbound_from_fields(&s.fields).map(Value::UnboundRelationship)
        }
        PATH_TAG => path_from_fields(&s.fields).map(Value::Path),
        other => {
            tracing::debug!("Unknown structure tag 0x{:02X}, keeping fields", other);
            return Value::List(s.fields.into_iter().map(decode_value).collect());
        }
    };

    match decoded {
        Some(value) => value,
        None => {
            tracing::warn!(
                "Malformed {} structure with {} fields, keeping fields",
                tag_name(s.tag),
                s.fields.len()
            );
            Value::List(s.fields.into_iter().map(decode_value).collect())
        }
    }
}

// ============================================================================
// Graph structures
// ============================================================================

fn properties(value: &PackStreamValue) -> Option<HashMap<String, Value>> {
    value.as_map().map(|entries| decode_map(entries.to_vec()))
}

fn strings(value: &PackStreamValue) -> Option<Vec<String>> {
    value
        .as_list()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// `[id, labels, properties]`
fn node_from_fields(fields: &[PackStreamValue]) -> Option<Node> {
    match fields {
        [id, labels, props] => Some(Node::new(id.as_int()?, strings(labels)?, properties(props)?)),
        _ => None,
    }
}

/// `[id, start, end, type, properties]`
fn relationship_from_fields(fields: &[PackStreamValue]) -> Option<Relationship> {
    match fields {
        [id, start, end, rel_type, props] => Some(Relationship::new(
            id.as_int()?,
            start.as_int()?,
            end.as_int()?,
            rel_type.as_str()?,
            properties(props)?,
        )),
        _ => None,
    }
}

/// `[id, type, properties]`
fn unbound_from_fields(fields: &[PackStreamValue]) -> Option<UnboundRelationship> {
    match fields {
        [id, rel_type, props] => Some(UnboundRelationship::new(
            id.as_int()?,
            rel_type.as_str()?,
            properties(props)?,
        )),
        _ => None,
    }
}

/// `[nodes, relationships, indices]`
fn path_from_fields(fields: &[PackStreamValue]) -> Option<Path> {
    let [nodes, rels, indices] = fields else {
        return None;
    };

    let nodes = nodes
        .as_list()?
        .iter()
        .map(|n| tagged(n, NODE_TAG).and_then(node_from_fields))
        .collect::<Option<Vec<_>>>()?;
    let relationships = rels
        .as_list()?
        .iter()
        .map(|r| tagged(r, UNBOUND_RELATIONSHIP_TAG).and_then(unbound_from_fields))
        .collect::<Option<Vec<_>>>()?;
    let indices = indices
        .as_list()?
        .iter()
        .map(PackStreamValue::as_int)
        .collect::<Option<Vec<_>>>()?;

    Some(Path::new(nodes, relationships, indices))
}

fn tagged(value: &PackStreamValue, tag: u8) -> Option<&[PackStreamValue]> {
    value
        .as_structure()
        .filter(|s| s.tag == tag)
        .map(|s| s.fields.as_slice())
}

impl From<PackStreamValue> for Value {
    fn from(value: PackStreamValue) -> Self {
        decode_value(value)
    }
}
