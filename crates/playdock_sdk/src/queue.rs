//! Thread-safe holding area for events between delivery and pump.

use parking_lot::Mutex;
use playdock_protocol::Event;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// A bounded multi-producer, single-consumer event queue.
///
/// Producers are transport delivery threads; the single consumer is the
/// application thread calling the pump. The queue is the only structure
/// mutated across that thread boundary.
///
/// The capacity bound protects against a host that has stopped pumping: an
/// overflowing push drops the event and counts it rather than growing
/// without limit or blocking the delivery thread.
#[derive(Debug)]
pub struct EventQueue {
    events: Mutex<VecDeque<Event>>,
    capacity: usize,
    dropped: AtomicU64,
}

impl EventQueue {
    /// Creates a queue holding at most `capacity` undrained events.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Enqueues an event. Returns false if the queue was full and the
    /// event was dropped.
    pub fn push(&self, event: Event) -> bool {
        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            drop(events);
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(kind = ?event.kind(), "event queue full, dropping event");
            return false;
        }
        events.push_back(event);
        true
    }

    /// Takes ownership of every event currently queued, preserving arrival
    /// order. Events pushed after the drain wait for the next drain.
    pub fn drain(&self) -> Vec<Event> {
        let mut events = self.events.lock();
        events.drain(..).collect()
    }

    /// Discards all queued events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Number of events dropped due to overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playdock_protocol::{FileResponse, SystemState};
    use std::sync::Arc;
    use std::thread;

    fn notice() -> Event {
        Event::SystemStateChanged(SystemState::Online)
    }

    fn completion(request_id: i64) -> Event {
        Event::CloudSaveGetData {
            request_id,
            response: FileResponse::ok(vec![1]),
        }
    }

    #[test]
    fn push_and_drain_preserve_order() {
        let queue = EventQueue::new(16);
        queue.push(completion(1));
        queue.push(completion(2));
        queue.push(notice());

        let batch = queue.drain();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].request_id(), Some(1));
        assert_eq!(batch[1].request_id(), Some(2));
        assert_eq!(batch[2].request_id(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_takes_a_snapshot() {
        let queue = EventQueue::new(16);
        queue.push(completion(1));

        let batch = queue.drain();
        assert_eq!(batch.len(), 1);

        // An event arriving after the drain belongs to the next batch.
        queue.push(completion(2));
        assert_eq!(queue.len(), 1);
        let next = queue.drain();
        assert_eq!(next[0].request_id(), Some(2));
    }

    #[test]
    fn overflow_drops_and_counts() {
        let queue = EventQueue::new(2);
        assert!(queue.push(completion(1)));
        assert!(queue.push(completion(2)));
        assert!(!queue.push(completion(3)));
        assert!(!queue.push(completion(4)));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 2);

        // Draining frees capacity again.
        queue.drain();
        assert!(queue.push(completion(5)));
    }

    #[test]
    fn clear_discards_everything() {
        let queue = EventQueue::new(16);
        queue.push(completion(1));
        queue.push(notice());
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn concurrent_producers() {
        let queue = Arc::new(EventQueue::new(1024));
        let mut handles = Vec::new();

        for worker in 0..4 {
            let queue = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    queue.push(completion(worker * 1000 + i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(queue.drain().len(), 400);
        assert_eq!(queue.dropped(), 0);
    }
}
