//! Single-flight coordination for token refresh
//!
//! Any number of requests can hit a 401 at the same time; exactly one of
//! them (the leader) may call the refresh endpoint. Everyone else is
//! parked on a oneshot channel and resumed with the leader's outcome.
//!
//! The flag check and the enqueue happen under one lock acquisition with
//! no await point in between, so two tasks can never both observe "no
//! refresh in flight" and race to start one.

use std::sync::Mutex;
use tokio::sync::oneshot;

use super::error::ClientError;

/// Why queued callers were turned away.
#[derive(Debug, Clone)]
pub(crate) struct RefreshDenied(pub String);

type WaiterResult = Result<String, RefreshDenied>;

#[derive(Default)]
struct GateState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<WaiterResult>>,
}

/// Shared refresh state owned by the client instance.
#[derive(Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

/// Outcome of asking the gate for permission to refresh.
pub(crate) enum RefreshAttempt<'a> {
    /// This caller runs the refresh and must settle the gate.
    Leader(RefreshLeader<'a>),
    /// A refresh is already running; await its outcome.
    Follower(oneshot::Receiver<WaiterResult>),
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claim the refresh or join the queue. Single uninterrupted
    /// check-and-set.
    pub(crate) fn begin(&self) -> RefreshAttempt<'_> {
        let mut state = self.state.lock().expect("refresh gate lock poisoned");
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            RefreshAttempt::Follower(rx)
        } else {
            state.in_flight = true;
            RefreshAttempt::Leader(RefreshLeader {
                gate: self,
                settled: false,
            })
        }
    }

    /// Clear the in-flight flag and drain the queue. Runs exactly once
    /// per refresh attempt; every waiter gets the same outcome.
    fn settle(&self, outcome: Result<&str, &str>) {
        let waiters = {
            let mut state = self.state.lock().expect("refresh gate lock poisoned");
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let payload = match outcome {
                Ok(token) => Ok(token.to_string()),
                Err(reason) => Err(RefreshDenied(reason.to_string())),
            };
            let _ = waiter.send(payload);
        }
    }
}

/// Leader handle. Dropping it without [`RefreshLeader::complete`] (the
/// refresh future was cancelled) still settles the gate so queued
/// callers are never stranded.
pub(crate) struct RefreshLeader<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl RefreshLeader<'_> {
    pub(crate) fn complete(mut self, outcome: Result<&str, &ClientError>) {
        self.settled = true;
        match outcome {
            Ok(token) => self.gate.settle(Ok(token)),
            Err(err) => self.gate.settle(Err(&err.to_string())),
        }
    }
}

impl Drop for RefreshLeader<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.settle(Err("token refresh was interrupted"));
        }
    }
}
