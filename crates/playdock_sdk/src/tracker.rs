//! Correlation of caller-supplied request ids to pending operations.

use crate::queue::EventQueue;
use crate::session::SessionState;
use parking_lot::Mutex;
use playdock_protocol::{OperationKind, OperationResponse};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Why a submission was refused admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The same id already has an operation in flight.
    DuplicateInFlight,
    /// The session is not ready.
    NotReady,
}

/// Bookkeeping for one accepted, not-yet-completed request.
#[derive(Debug)]
struct PendingRequest {
    kind: OperationKind,
    issued_at: Instant,
}

/// Tracks in-flight requests and correlates deliveries back to them.
///
/// The tracker owns the id→operation map exclusively. Callers pick their
/// own ids, so the tracker defends against misuse: one in-flight operation
/// per id, and late, duplicate or mismatched deliveries are treated as
/// data, logged and dropped rather than surfaced as errors, because no
/// caller context remains for them.
///
/// `submit` runs on the application thread and `complete` on the transport
/// delivery thread; the map is safe under that concurrency.
#[derive(Debug)]
pub struct RequestTracker {
    session: Arc<SessionState>,
    queue: Arc<EventQueue>,
    pending: Mutex<HashMap<i64, PendingRequest>>,
}

impl RequestTracker {
    /// Creates a tracker feeding completed events into `queue`.
    pub fn new(session: Arc<SessionState>, queue: Arc<EventQueue>) -> Self {
        Self {
            session,
            queue,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Admits a request id for the given operation.
    ///
    /// On acceptance a pending entry is created and the caller may hand the
    /// request to the transport. This is a provisional success: the actual
    /// result arrives later through [`complete`](Self::complete).
    pub fn submit(&self, id: i64, kind: OperationKind) -> Result<(), Rejection> {
        if !self.session.is_ready() {
            return Err(Rejection::NotReady);
        }
        let mut pending = self.pending.lock();
        if pending.contains_key(&id) {
            return Err(Rejection::DuplicateInFlight);
        }
        pending.insert(
            id,
            PendingRequest {
                kind,
                issued_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Withdraws an id admitted by `submit` whose transport hand-off
    /// failed, so the id is immediately reusable.
    pub fn rollback(&self, id: i64) {
        self.pending.lock().remove(&id);
    }

    /// Correlates a delivery to its pending request and enqueues the
    /// completion event. Returns true if the delivery was matched.
    ///
    /// Unknown ids (stale, duplicate, or abandoned at shutdown) and
    /// kind-mismatched responses are dropped.
    pub fn complete(&self, id: i64, response: OperationResponse) -> bool {
        let pending = {
            let mut map = self.pending.lock();
            match map.get(&id) {
                Some(entry) if entry.kind == response.kind() => map.remove(&id),
                Some(entry) => {
                    tracing::warn!(
                        request_id = id,
                        pending = ?entry.kind,
                        delivered = ?response.kind(),
                        "dropping completion with mismatched operation kind"
                    );
                    return false;
                }
                None => {
                    tracing::debug!(
                        request_id = id,
                        kind = ?response.kind(),
                        "dropping completion for unknown or already-completed request"
                    );
                    return false;
                }
            }
        };

        if let Some(entry) = pending {
            tracing::debug!(
                request_id = id,
                kind = ?entry.kind,
                elapsed_ms = entry.issued_at.elapsed().as_millis() as u64,
                "request completed"
            );
            self.queue.push(response.into_event(id));
            true
        } else {
            false
        }
    }

    /// Discards every pending request without completing it. Called at
    /// shutdown; abandoned requests never fire their completion event.
    pub fn abandon_all(&self) -> usize {
        let mut pending = self.pending.lock();
        let count = pending.len();
        if count > 0 {
            tracing::info!(count, "abandoning pending requests");
        }
        pending.clear();
        count
    }

    /// Number of requests currently in flight.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playdock_protocol::{DeleteResponse, EventKind, FileResponse, ListResponse};
    use std::thread;

    fn ready_tracker() -> (Arc<SessionState>, Arc<EventQueue>, RequestTracker) {
        let session = Arc::new(SessionState::new());
        session.mark_ready();
        let queue = Arc::new(EventQueue::new(64));
        let tracker = RequestTracker::new(Arc::clone(&session), Arc::clone(&queue));
        (session, queue, tracker)
    }

    #[test]
    fn submit_rejected_before_ready() {
        let session = Arc::new(SessionState::new());
        let queue = Arc::new(EventQueue::new(64));
        let tracker = RequestTracker::new(session, queue);

        assert_eq!(
            tracker.submit(1, OperationKind::List),
            Err(Rejection::NotReady)
        );
    }

    #[test]
    fn single_flight_per_id() {
        let (_session, _queue, tracker) = ready_tracker();

        assert!(tracker.submit(7, OperationKind::List).is_ok());
        assert_eq!(
            tracker.submit(7, OperationKind::Delete),
            Err(Rejection::DuplicateInFlight)
        );

        // A different id is unaffected.
        assert!(tracker.submit(8, OperationKind::Delete).is_ok());
        assert_eq!(tracker.pending_len(), 2);
    }

    #[test]
    fn id_reusable_after_completion() {
        let (_session, queue, tracker) = ready_tracker();

        tracker.submit(7, OperationKind::List).unwrap();
        assert!(tracker.complete(7, OperationResponse::List(ListResponse::ok(Vec::new()))));

        assert!(tracker.submit(7, OperationKind::List).is_ok());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn completion_echoes_request_id() {
        let (_session, queue, tracker) = ready_tracker();

        tracker.submit(41, OperationKind::Delete).unwrap();
        tracker.complete(41, OperationResponse::Delete(DeleteResponse::ok("u-1")));

        let batch = queue.drain();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].kind(), EventKind::CloudSaveDelete);
        assert_eq!(batch[0].request_id(), Some(41));
    }

    #[test]
    fn unknown_delivery_is_dropped() {
        let (_session, queue, tracker) = ready_tracker();

        assert!(!tracker.complete(99, OperationResponse::List(ListResponse::ok(Vec::new()))));
        assert!(queue.is_empty());
    }

    #[test]
    fn duplicate_delivery_completes_once() {
        let (_session, queue, tracker) = ready_tracker();

        tracker.submit(5, OperationKind::GetData).unwrap();
        let response = OperationResponse::GetData(FileResponse::ok(vec![1, 2]));
        assert!(tracker.complete(5, response.clone()));
        assert!(!tracker.complete(5, response));

        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn mismatched_kind_leaves_request_pending() {
        let (_session, queue, tracker) = ready_tracker();

        tracker.submit(5, OperationKind::GetData).unwrap();
        // A list completion for a pending fetch is bogus; the fetch must
        // still be completable afterwards.
        assert!(!tracker.complete(5, OperationResponse::List(ListResponse::ok(Vec::new()))));
        assert!(queue.is_empty());
        assert_eq!(tracker.pending_len(), 1);

        assert!(tracker.complete(5, OperationResponse::GetData(FileResponse::ok(vec![3]))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn rollback_frees_the_id() {
        let (_session, _queue, tracker) = ready_tracker();

        tracker.submit(3, OperationKind::Create).unwrap();
        tracker.rollback(3);
        assert_eq!(tracker.pending_len(), 0);
        assert!(tracker.submit(3, OperationKind::Create).is_ok());
    }

    #[test]
    fn abandon_discards_without_completing() {
        let (_session, queue, tracker) = ready_tracker();

        tracker.submit(1, OperationKind::List).unwrap();
        tracker.submit(2, OperationKind::Create).unwrap();
        assert_eq!(tracker.abandon_all(), 2);
        assert_eq!(tracker.pending_len(), 0);
        assert!(queue.is_empty());

        // A late delivery after abandonment is benign.
        assert!(!tracker.complete(1, OperationResponse::List(ListResponse::ok(Vec::new()))));
        assert!(queue.is_empty());
    }

    #[test]
    fn concurrent_submit_and_complete() {
        // Capacity above the completion count so nothing is dropped.
        let session = Arc::new(SessionState::new());
        session.mark_ready();
        let queue = Arc::new(EventQueue::new(256));
        let tracker = Arc::new(RequestTracker::new(Arc::clone(&session), Arc::clone(&queue)));

        for id in 0..100 {
            tracker.submit(id, OperationKind::List).unwrap();
        }

        let deliverer = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                for id in 0..100 {
                    tracker.complete(id, OperationResponse::List(ListResponse::ok(Vec::new())));
                }
            })
        };

        // Meanwhile the app thread keeps submitting fresh ids.
        for id in 100..200 {
            tracker.submit(id, OperationKind::List).unwrap();
        }

        deliverer.join().unwrap();
        assert_eq!(queue.dropped(), 0);
        assert_eq!(queue.len(), 100);
        assert_eq!(tracker.pending_len(), 100);
    }
}
