//! Request-scoped memo of expensive datasets (computed card pools, parsed
//! tables) keyed by name.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type Slot<V> = Arc<Mutex<Option<Arc<V>>>>;

/// Shares one computed value per key between every caller.
///
/// Concurrent callers asking for the same key wait for the first computation
/// instead of repeating it. A failed computation stores nothing, so the next
/// caller retries. Keys are evicted oldest-first once `capacity` is exceeded.
#[derive(Debug)]
pub struct RequestCache<V> {
    slots: Mutex<Slots<V>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug)]
struct Slots<V> {
    entries: HashMap<String, Slot<V>>,
    order: VecDeque<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl<V> RequestCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_or_compute<E, F>(&self, key: &str, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let slot = self.slot(key);
        // Only this key is blocked while computing.
        let mut value = slot.lock();
        if let Some(cached) = value.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(cached));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = Arc::new(compute()?);
        *value = Some(Arc::clone(&computed));
        Ok(computed)
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let slot = self.slots.lock().entries.get(key).cloned()?;
        let value = slot.lock();
        value.as_ref().map(Arc::clone)
    }

    pub fn invalidate(&self, key: &str) -> bool {
        let mut slots = self.slots.lock();
        slots.order.retain(|existing| existing != key);
        slots.entries.remove(key).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.slots.lock().entries.len(),
        }
    }

    fn slot(&self, key: &str) -> Slot<V> {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.entries.get(key) {
            return Arc::clone(slot);
        }
        let slot: Slot<V> = Arc::new(Mutex::new(None));
        slots.entries.insert(key.to_owned(), Arc::clone(&slot));
        slots.order.push_back(key.to_owned());
        while slots.order.len() > self.capacity.max(1) {
            if let Some(oldest) = slots.order.pop_front() {
                slots.entries.remove(&oldest);
            }
        }
        slot
    }
}

impl<V> Default for RequestCache<V> {
    fn default() -> Self {
        Self::new(16)
    }
}
