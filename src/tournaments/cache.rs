//! Single-slot read-through cache for the tournament listing

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Option<(Instant, Vec<T>)>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self { Self { ttl, slot: None } }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Cached values younger than the TTL. An empty listing is never fresh.
    pub fn get_fresh(&self) -> Option<Vec<T>> {
        let (stored_at, values) = self.slot.as_ref()?;
        if values.is_empty() || stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(values.clone())
    }

    pub fn store(&mut self, values: Vec<T>) { self.slot = Some((Instant::now(), values)); }

    pub fn invalidate(&mut self) { self.slot = None; }
}
