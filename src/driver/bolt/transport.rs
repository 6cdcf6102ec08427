//! Transport interface consumed by sessions.
//!
//! A transport owns one Bolt connection that has already completed the
//! version handshake. It speaks the request/response exchanges of protocol
//! version 1 and hands replies back as raw PackStream trees; everything
//! above that (parameter shaping, result decoding, recovery) belongs to the
//! session layer.

use std::future::Future;

use crate::bolt::message::{AuthToken, SuccessMetadata};
use crate::bolt::packstream::PackStreamValue;
use crate::bolt::BoltResult;

use super::super::driver::ServerAddress;

/// One Bolt connection, driven strictly request by request.
///
/// Failures the server reports for a request come back as
/// [`BoltError::Message`](crate::bolt::BoltError::Message) carrying the raw
/// server message. A failed INIT comes back as
/// [`BoltError::Handshake`](crate::bolt::BoltError::Handshake).
pub trait BoltTransport: Send {
    /// INIT with the client user agent and auth token.
    fn init(
        &mut self,
        user_agent: &str,
        auth: &AuthToken,
    ) -> impl Future<Output = BoltResult<()>> + Send;

    /// RUN a statement; returns the SUCCESS header carrying `fields`.
    fn run(
        &mut self,
        statement: &str,
        parameters: Vec<(String, PackStreamValue)>,
    ) -> impl Future<Output = BoltResult<SuccessMetadata>> + Send;

    /// PULL_ALL; every entry but the last is a data row (a list of values),
    /// the last is the trailing SUCCESS metadata map.
    fn pull_all(&mut self) -> impl Future<Output = BoltResult<Vec<PackStreamValue>>> + Send;

    /// BEGIN an explicit transaction.
    fn begin(&mut self) -> impl Future<Output = BoltResult<()>> + Send;

    /// COMMIT the open transaction.
    fn commit(&mut self) -> impl Future<Output = BoltResult<()>> + Send;

    /// ROLLBACK the open transaction. Servers accept it with no transaction open.
    fn rollback(&mut self) -> impl Future<Output = BoltResult<()>> + Send;

    /// RESET the connection state.
    fn reset(&mut self) -> impl Future<Output = BoltResult<()>> + Send;
}

/// Opens transports for a driver.
pub trait Connector: Send + Sync {
    /// Transport produced by this connector
    type Transport: BoltTransport;

    /// Connect and negotiate the protocol version with `address`.
    fn connect(
        &self,
        address: &ServerAddress,
    ) -> impl Future<Output = BoltResult<Self::Transport>> + Send;
}
