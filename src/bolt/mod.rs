//! # Bolt Protocol Types
//!
//! Wire-facing types shared between a Bolt transport and the session layer.
//!
//! ## Overview
//!
//! The Bolt protocol is a binary request/response protocol used between
//! clients and graph database servers. Socket I/O, PackStream byte encoding
//! and version negotiation live in the transport; this module defines what
//! crosses the boundary:
//!
//! - **PackStream** - The generic value tree replies are decoded into
//! - **Message** - INIT auth token and SUCCESS metadata
//! - **Error** - Classified transport failures
//!
//! ## Note
//!
//! Most users should use the high-level [`crate::driver`] module instead of
//! interacting with these types directly.

pub mod error;
pub mod message;
pub mod packstream;

pub use error::{BoltError, BoltErrorCode, BoltResult};
pub use message::{AuthToken, SuccessMetadata};
pub use packstream::{PackStreamStructure, PackStreamValue};
