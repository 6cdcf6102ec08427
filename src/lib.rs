//! # BoltKit
//!
//! The session layer of a Bolt graph database client: it turns a query plus
//! parameters into a protocol exchange, decodes the reply into typed graph
//! values, and keeps the session usable after the server rejects a query.
//!
//! ## Features
//!
//! - **Session state machine** - init, run, close, with automatic rollback and
//!   re-initialization after a server-reported failure
//! - **Transactions** - explicit begin / run / commit / rollback bound to one session
//! - **Result decoding** - nodes, relationships, paths and nested containers
//! - **Async/Await** - built on Tokio; the transport is supplied through a trait
//!
//! ## Transport
//!
//! Socket I/O, PackStream byte encoding and version negotiation are not part of
//! this crate. Implement [`driver::BoltTransport`] and [`driver::Connector`] for
//! your network layer and hand the connector to [`Driver`].
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use boltkit::{params, Credentials, Driver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = Driver::new(
//!         "bolt://localhost:7687",
//!         Credentials::new("neo4j", "password"),
//!         MyConnector::default(),
//!     )?;
//!
//!     let session = driver.session().await?;
//!
//!     let result = session
//!         .run("CREATE (n:Person {name: $name}) RETURN n", Some(params! { "name" => "Alice" }))
//!         .await?;
//!
//!     let node = result.first_record()?.get_node("n")?;
//!     println!("created {} ({} nodes)", node, result.summarize().counters().nodes_created);
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A failed query comes back as [`DriverError::MessageFailure`] carrying the
//! server message and its `Neo.*` status code. By the time the caller sees it
//! the session has already been rolled back and re-initialized:
//!
//! ```rust,ignore
//! match session.run("RETURN X", None).await {
//!     Err(e) if e.is_message_failure() => eprintln!("rejected: {:?}", e.status_code()),
//!     Err(e) => return Err(e.into()),
//!     Ok(result) => println!("{} records", result.size()),
//! }
//! // the session is usable again
//! session.run("RETURN 1", None).await?;
//! ```
//!
//! ## Value Types
//!
//! ```rust
//! use boltkit::Value;
//!
//! let null = Value::Null;
//! let integer = Value::Integer(42);
//! let list: Value = vec![1i64, 2, 3].into();
//! assert_eq!(list.as_list().map(|l| l.len()), Some(3));
//! ```
//!
//! ## Modules
//!
//! - [`driver`] - Driver, session, transaction and result types
//! - [`bolt`] - Wire-facing value tree, auth token and transport errors
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bolt;
pub mod driver;

// Re-exports for convenience
pub use driver::{
    Credentials, Driver, DriverConfig, DriverConfigBuilder, DriverError, DriverResult,
    GraphSession, Node, Parameter, Parameters, Path, QueryResult, Record, Relationship,
    ResultSummary, ServerAddress, Session, Statement, Transaction, TransactionState,
    UnboundRelationship, Value,
};

pub use bolt::{BoltError, PackStreamValue};

/// Config alias for convenience
pub type Config = DriverConfig;
