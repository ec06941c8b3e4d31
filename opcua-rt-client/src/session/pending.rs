// OPC UA RT
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2024 OPC UA RT Contributors

//! The pending-transaction table: request-handle-keyed deadlines, completed exactly once
//! each — by a routed response, a timeout sweep, or a channel-disconnect flush.

use std::sync::mpsc::SyncSender;
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use opcua_types::{status_code::StatusCode, Error, NodeId};

/// How a transaction's caller learns its result.
pub enum Completion {
    /// `sendSync`: the caller is blocked on `SyncSender::recv` for the paired receiver.
    Sync(SyncSender<Result<Vec<u8>, Error>>),
    /// `send`: the caller supplied a callback to run when the result is known.
    Async(Box<dyn FnOnce(Result<Vec<u8>, Error>) + Send>),
}

impl Completion {
    pub fn complete(self, result: Result<Vec<u8>, Error>) {
        match self {
            Completion::Sync(tx) => {
                let _ = tx.send(result);
            }
            Completion::Async(f) => f(result),
        }
    }
}

/// One in-flight request awaiting its response.
pub struct PendingTransaction {
    pub request_handle: u32,
    /// The `typeId` the response is expected to carry.
    pub response_type_id: NodeId,
    pub deadline: Instant,
    pub completion: Completion,
}

/// Exclusive to the reactor thread: maps `requestHandle` to the transaction awaiting that
/// response, and sweeps deadlines.
#[derive(Default)]
pub struct PendingTable {
    entries: HashMap<u32, PendingTransaction>,
}

impl PendingTable {
    pub fn new() -> Self {
        PendingTable::default()
    }

    /// Register `transaction`, due by `now + timeout`.
    pub fn insert(&mut self, transaction: PendingTransaction) {
        self.entries.insert(transaction.request_handle, transaction);
    }

    pub fn deadline_for(now: Instant, timeout: Duration) -> Instant {
        now + timeout
    }

    /// Remove and return the transaction awaiting `request_handle`, if any. Returns `None`
    /// (and logs) for a stale or duplicate response — not a fatal condition.
    pub fn pop(&mut self, request_handle: u32) -> Option<PendingTransaction> {
        match self.entries.remove(&request_handle) {
            Some(tx) => Some(tx),
            None => {
                log::debug!("no pending transaction for request handle {request_handle}, discarding");
                None
            }
        }
    }

    /// Complete and remove every transaction whose deadline has passed `now`, with
    /// `BadTimeout`. Returns the handles that were swept.
    pub fn sweep_timeouts(&mut self, now: Instant) -> Vec<u32> {
        let expired: Vec<u32> = self
            .entries
            .iter()
            .filter(|(_, tx)| tx.deadline <= now)
            .map(|(handle, _)| *handle)
            .collect();
        for handle in &expired {
            if let Some(tx) = self.entries.remove(handle) {
                tx.completion.complete(Err(Error::new(StatusCode::BadTimeout, "request timed out")));
            }
        }
        expired
    }

    /// Complete and remove every pending transaction with `BadConnectionClosed`, used when
    /// the secure channel drops.
    pub fn fail_all_channel_closed(&mut self) {
        for (_, tx) in self.entries.drain() {
            tx.completion
                .complete(Err(Error::new(StatusCode::BadConnectionClosed, "secure channel closed")));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::sync_channel;

    fn tx(handle: u32, deadline: Instant) -> (PendingTransaction, std::sync::mpsc::Receiver<Result<Vec<u8>, Error>>) {
        let (sender, receiver) = sync_channel(1);
        (
            PendingTransaction {
                request_handle: handle,
                response_type_id: NodeId::new(0, 634u32),
                deadline,
                completion: Completion::Sync(sender),
            },
            receiver,
        )
    }

    #[test]
    fn pop_returns_registered_transaction() {
        let mut table = PendingTable::new();
        let (transaction, _rx) = tx(1, Instant::now() + Duration::from_secs(1));
        table.insert(transaction);
        assert!(table.pop(1).is_some());
        assert!(table.pop(1).is_none());
    }

    #[test]
    fn sweep_times_out_expired_entries() {
        let mut table = PendingTable::new();
        let (transaction, rx) = tx(1, Instant::now() - Duration::from_millis(1));
        table.insert(transaction);
        let swept = table.sweep_timeouts(Instant::now());
        assert_eq!(swept, vec![1]);
        assert!(rx.recv().unwrap().is_err());
    }

    #[test]
    fn fail_all_completes_every_pending_transaction() {
        let mut table = PendingTable::new();
        let (t1, rx1) = tx(1, Instant::now() + Duration::from_secs(5));
        let (t2, rx2) = tx(2, Instant::now() + Duration::from_secs(5));
        table.insert(t1);
        table.insert(t2);
        table.fail_all_channel_closed();
        assert!(rx1.recv().unwrap().is_err());
        assert!(rx2.recv().unwrap().is_err());
        assert!(table.is_empty());
    }
}
