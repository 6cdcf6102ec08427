//! Bolt message payloads exchanged with a transport.
//!
//! Only the pieces the session layer reads or builds are modelled here:
//! the INIT auth token and the metadata map of a SUCCESS reply.

use super::packstream::PackStreamValue;

/// Authentication token sent with INIT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// Authentication scheme ("none" or "basic")
    pub scheme: String,
    /// Principal (username)
    pub principal: Option<String>,
    /// Credentials (password)
    pub credentials: Option<String>,
}

impl AuthToken {
    /// Create a basic auth token.
    pub fn basic(principal: &str, credentials: &str) -> Self {
        Self {
            scheme: "basic".to_string(),
            principal: Some(principal.to_string()),
            credentials: Some(credentials.to_string()),
        }
    }

    /// Create an anonymous auth token (no auth).
    pub fn none() -> Self {
        Self {
            scheme: "none".to_string(),
            principal: None,
            credentials: None,
        }
    }

    /// Convert to a PackStream map.
    pub fn to_value(&self) -> PackStreamValue {
        let mut entries = vec![("scheme".to_string(), PackStreamValue::String(self.scheme.clone()))];
        if let Some(ref p) = self.principal {
            entries.push(("principal".to_string(), PackStreamValue::String(p.clone())));
        }
        if let Some(ref c) = self.credentials {
            entries.push(("credentials".to_string(), PackStreamValue::String(c.clone())));
        }
        PackStreamValue::Map(entries)
    }
}

/// Metadata of a SUCCESS reply (the header returned by RUN).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuccessMetadata {
    /// Metadata entries in wire order
    pub metadata: Vec<(String, PackStreamValue)>,
}

impl SuccessMetadata {
    /// Create a SUCCESS metadata block.
    pub fn new(metadata: Vec<(String, PackStreamValue)>) -> Self {
        Self { metadata }
    }

    /// Header announcing the given result fields.
    pub fn with_fields<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        let list = fields
            .into_iter()
            .map(|f| PackStreamValue::String(f.into()))
            .collect();
        Self::new(vec![("fields".to_string(), PackStreamValue::List(list))])
    }

    /// Get metadata entry.
    pub fn get(&self, key: &str) -> Option<&PackStreamValue> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get field names from RUN success.
    pub fn fields(&self) -> Option<Vec<String>> {
        self.get("fields").and_then(|v| {
            v.as_list().map(|list| {
                list.iter()
                    .filter_map(|item| item.as_str().map(|s| s.to_string()))
                    .collect()
            })
        })
    }
}
