//! PackStream value tree.
//!
//! PackStream is the binary serialization format used by the Bolt protocol.
//! Byte-level encoding and decoding happen inside the transport; this module
//! only defines the generic value tree the transport produces and consumes.
//!
//! # Graph Structures
//!
//! - **Node**: id, labels, properties
//! - **Relationship**: id, start_id, end_id, type, properties
//! - **UnboundRelationship**: id, type, properties
//! - **Path**: nodes, relationships, indices

pub mod marker;
pub mod types;

pub use marker::{tag_name, NODE_TAG, PATH_TAG, RELATIONSHIP_TAG, UNBOUND_RELATIONSHIP_TAG};
pub use types::{PackStreamStructure, PackStreamValue};
