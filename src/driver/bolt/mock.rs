//! Scripted in-memory transport for tests.
//!
//! Replies are queued per request kind; an empty queue answers with a
//! plain SUCCESS. Every call is recorded so tests can assert on the exact
//! exchange sequence after the transport has moved into a session.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::bolt::message::{AuthToken, SuccessMetadata};
use crate::bolt::packstream::PackStreamValue;
use crate::bolt::{BoltError, BoltResult};

use super::super::driver::ServerAddress;
use super::transport::{BoltTransport, Connector};

/// A recorded transport call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init { user_agent: String, scheme: String, principal: Option<String> },
    Run { statement: String, parameters: Vec<(String, PackStreamValue)> },
    PullAll,
    Begin,
    Commit,
    Rollback,
    Reset,
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    init: VecDeque<BoltResult<()>>,
    run: VecDeque<BoltResult<SuccessMetadata>>,
    pull: VecDeque<BoltResult<Vec<PackStreamValue>>>,
    begin: VecDeque<BoltResult<()>>,
    commit: VecDeque<BoltResult<()>>,
    rollback: VecDeque<BoltResult<()>>,
    pull_delay: Option<Duration>,
}

/// Transport that replays queued replies.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful RUN + PULL_ALL pair.
    pub fn reply(&self, fields: &[&str], rows: Vec<Vec<PackStreamValue>>, stats: Option<PackStreamValue>) {
        let mut pulled: Vec<PackStreamValue> = rows.into_iter().map(PackStreamValue::List).collect();
        let metadata = match stats {
            Some(stats) => PackStreamValue::map([("stats", stats)]),
            None => PackStreamValue::Map(Vec::new()),
        };
        pulled.push(metadata);

        let mut script = self.script.lock();
        script.run.push_back(Ok(SuccessMetadata::with_fields(fields.iter().copied())));
        script.pull.push_back(Ok(pulled));
    }

    /// Queue a raw PULL_ALL reply after a RUN announcing `fields`.
    pub fn reply_raw(&self, fields: &[&str], pulled: Vec<PackStreamValue>) {
        let mut script = self.script.lock();
        script.run.push_back(Ok(SuccessMetadata::with_fields(fields.iter().copied())));
        script.pull.push_back(Ok(pulled));
    }

    /// Queue a FAILURE for the next RUN.
    pub fn fail_run(&self, message: &str) {
        self.script.lock().run.push_back(Err(BoltError::message(message)));
    }

    /// Queue a FAILURE for the next PULL_ALL, after a successful RUN.
    pub fn fail_pull(&self, fields: &[&str], message: &str) {
        let mut script = self.script.lock();
        script.run.push_back(Ok(SuccessMetadata::with_fields(fields.iter().copied())));
        script.pull.push_back(Err(BoltError::message(message)));
    }

    /// Stall the next PULL_ALL for `delay` before answering.
    pub fn delay_pull(&self, delay: Duration) {
        self.script.lock().pull_delay = Some(delay);
    }

    pub fn push_run(&self, reply: BoltResult<SuccessMetadata>) {
        self.script.lock().run.push_back(reply);
    }

    pub fn push_init(&self, reply: BoltResult<()>) {
        self.script.lock().init.push_back(reply);
    }

    pub fn push_begin(&self, reply: BoltResult<()>) {
        self.script.lock().begin.push_back(reply);
    }

    pub fn push_commit(&self, reply: BoltResult<()>) {
        self.script.lock().commit.push_back(reply);
    }

    pub fn push_rollback(&self, reply: BoltResult<()>) {
        self.script.lock().rollback.push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.script.lock().calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.script.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.script.lock().calls.push(call);
    }
}

impl BoltTransport for ScriptedTransport {
    async fn init(&mut self, user_agent: &str, auth: &AuthToken) -> BoltResult<()> {
        self.record(Call::Init {
            user_agent: user_agent.to_string(),
            scheme: auth.scheme.clone(),
            principal: auth.principal.clone(),
        });
        self.script.lock().init.pop_front().unwrap_or(Ok(()))
    }

    async fn run(
        &mut self,
        statement: &str,
        parameters: Vec<(String, PackStreamValue)>,
    ) -> BoltResult<SuccessMetadata> {
        self.record(Call::Run {
            statement: statement.to_string(),
            parameters,
        });
        self.script
            .lock()
            .run
            .pop_front()
            .unwrap_or_else(|| Ok(SuccessMetadata::with_fields(Vec::<String>::new())))
    }

    async fn pull_all(&mut self) -> BoltResult<Vec<PackStreamValue>> {
        self.record(Call::PullAll);
        let delay = self.script.lock().pull_delay.take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .pull
            .pop_front()
            .unwrap_or_else(|| Ok(vec![PackStreamValue::Map(Vec::new())]))
    }

    async fn begin(&mut self) -> BoltResult<()> {
        self.record(Call::Begin);
        self.script.lock().begin.pop_front().unwrap_or(Ok(()))
    }

    async fn commit(&mut self) -> BoltResult<()> {
        self.record(Call::Commit);
        self.script.lock().commit.pop_front().unwrap_or(Ok(()))
    }

    async fn rollback(&mut self) -> BoltResult<()> {
        self.record(Call::Rollback);
        self.script.lock().rollback.pop_front().unwrap_or(Ok(()))
    }

    async fn reset(&mut self) -> BoltResult<()> {
        self.record(Call::Reset);
        Ok(())
    }
}

/// Connector handing out clones of one scripted transport.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    pub transport: ScriptedTransport,
    pub delay: Option<Duration>,
    pub refuse: bool,
}

impl ScriptedConnector {
    pub fn new(transport: ScriptedTransport) -> Self {
        Self {
            transport,
            delay: None,
            refuse: false,
        }
    }
}

impl Connector for ScriptedConnector {
    type Transport = ScriptedTransport;

    async fn connect(&self, address: &ServerAddress) -> BoltResult<ScriptedTransport> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.refuse {
            return Err(BoltError::Connection(format!("Failed to connect to {}", address)));
        }
        Ok(self.transport.clone())
    }
}
