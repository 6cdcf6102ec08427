//! Statement - 쿼리 텍스트와 파라미터

use super::params::{Parameter, Parameters};

/// 실행할 문장
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// 쿼리 텍스트
    pub text: String,
    /// 파라미터
    pub parameters: Parameters,
    /// 호출자가 붙이는 상관관계 태그
    pub tag: Option<String>,
}

impl Statement {
    /// 새 문장 생성
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Parameters::new(),
            tag: None,
        }
    }

    /// 파라미터 추가
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Parameter>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// 파라미터들 추가
    pub fn with_params(mut self, params: Parameters) -> Self {
        self.parameters.extend(params);
        self
    }

    /// 태그 지정
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// 텍스트가 비어 있는지 (공백만 있는 경우 포함)
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Statement {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Statement {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::types::Value;

    #[test]
    fn test_statement() {
        let stmt = Statement::new("MATCH (n) RETURN n")
            .with_param("name", "Alice")
            .with_param("age", 30i64)
            .with_tag("lookup");

        assert_eq!(stmt.text, "MATCH (n) RETURN n");
        assert_eq!(stmt.parameters.len(), 2);
        assert_eq!(
            stmt.parameters.get("name"),
            Some(&Parameter::Scalar(Value::String("Alice".into())))
        );
        assert_eq!(stmt.tag.as_deref(), Some("lookup"));
    }

    #[test]
    fn test_statement_from() {
        let s1: Statement = "RETURN 1".into();
        assert_eq!(s1.text, "RETURN 1");
        assert!(s1.parameters.is_empty());
        assert!(s1.tag.is_none());

        let s2: Statement = String::from("RETURN 2").into();
        assert_eq!(s2.text, "RETURN 2");
    }

    #[test]
    fn test_statement_blank() {
        assert!(Statement::new("").is_blank());
        assert!(Statement::new("  \n\t").is_blank());
        assert!(!Statement::new("RETURN 1").is_blank());
    }
}
