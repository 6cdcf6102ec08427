//! Client-side Bolt plumbing for the driver.
//!
//! The driver never touches sockets itself. It talks to a [`BoltTransport`]
//! obtained from a [`Connector`]; both are supplied by the embedding
//! application (or by a network crate implementing them).
//!
//! ```text
//! Driver
//!   └── Connector ──connect──▶ BoltTransport
//!                                ├── init / run / pull_all
//!                                ├── begin / commit / rollback
//!                                └── reset
//! ```

pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use transport::{BoltTransport, Connector};

pub use crate::bolt::message::AuthToken as BoltAuthToken;
pub use crate::bolt::{BoltError, BoltResult, PackStreamValue, SuccessMetadata};

/// Client user agent string
pub const CLIENT_USER_AGENT: &str = concat!("BoltKit/", env!("CARGO_PKG_VERSION"));
