//! Structure tags for graph values.
//!
//! The wire decoder hands structures over with their raw tag byte; these are
//! the tags the session layer knows how to turn into graph types. Anything
//! else is treated as an opaque structure.

/// Node: id, labels, properties
pub const NODE_TAG: u8 = 0x4E; // 'N'
/// Relationship: id, start id, end id, type, properties
pub const RELATIONSHIP_TAG: u8 = 0x52; // 'R'
/// Unbound relationship (inside paths): id, type, properties
pub const UNBOUND_RELATIONSHIP_TAG: u8 = 0x72; // 'r'
/// Path: nodes, unbound relationships, indices
pub const PATH_TAG: u8 = 0x50; // 'P'

/// Human readable name of a structure tag.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        NODE_TAG => "Node",
        RELATIONSHIP_TAG => "Relationship",
        UNBOUND_RELATIONSHIP_TAG => "UnboundRelationship",
        PATH_TAG => "Path",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_tags_are_ascii() {
        assert_eq!(NODE_TAG, b'N');
        assert_eq!(RELATIONSHIP_TAG, b'R');
        assert_eq!(UNBOUND_RELATIONSHIP_TAG, b'r');
        assert_eq!(PATH_TAG, b'P');
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name(NODE_TAG), "Node");
        assert_eq!(tag_name(PATH_TAG), "Path");
        assert_eq!(tag_name(0x44), "Unknown");
    }
}
