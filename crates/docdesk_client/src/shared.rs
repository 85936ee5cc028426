use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use docdesk_core::{FlightLedger, Generation, NewsFeed, Session, StreamKey};

pub type SharedSession = Arc<Mutex<Session>>;
pub type SharedNewsFeed = Arc<Mutex<NewsFeed>>;

/// Locks shared state. A panic elsewhere never leaves these structures half
/// updated, so a poisoned lock is taken over as is.
pub fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases an in-flight slot when dropped, whether the request settled,
/// failed or was abandoned mid-await.
pub(crate) struct FlightGuard<L: FlightLedger> {
    ledger: Arc<Mutex<L>>,
    stream: StreamKey,
    generation: Generation,
}

impl<L: FlightLedger> FlightGuard<L> {
    pub(crate) fn new(ledger: Arc<Mutex<L>>, stream: StreamKey, generation: Generation) -> Self {
        Self {
            ledger,
            stream,
            generation,
        }
    }
}

impl<L: FlightLedger> Drop for FlightGuard<L> {
    fn drop(&mut self) {
        lock(&self.ledger).end_flight(self.stream, self.generation);
    }
}
