use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{InstrumentBank, InstrumentId, InstrumentParams, SoundBuffer};

type CacheKey = (InstrumentId, Vec<u32>, u32, u32, u64);

/// Default entry limit; a few bars of drums, chords and melody notes.
pub const DEFAULT_CACHE_ENTRIES: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

struct Entry {
    buffer: SoundBuffer,
    last_used: u64,
}

#[derive(Default)]
struct Lru {
    entries: HashMap<CacheKey, Entry>,
    clock: u64,
}

/// Memoizes renders of another bank.
///
/// Drum hits repeat with identical parameters every bar, so most of their
/// renders are cache hits. Ambient layers bypass the cache. The map holds at
/// most `capacity` buffers and evicts the least recently used one. Buffers are
/// shared, never copied, and rendering happens outside the lock.
pub struct CachedBank<B> {
    inner: B,
    capacity: usize,
    cache: Mutex<Lru>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<B: InstrumentBank> CachedBank<B> {
    pub fn new(inner: B) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_ENTRIES)
    }

    pub fn with_capacity(inner: B, capacity: usize) -> Self {
        Self {
            inner,
            capacity,
            cache: Mutex::new(Lru::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().entries.len(),
        }
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    // A poisoned lock only means another thread panicked; the map itself
    // holds finished buffers and is still valid.
    fn lock(&self) -> MutexGuard<'_, Lru> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<B: InstrumentBank> InstrumentBank for CachedBank<B> {
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn render(&self, instrument: InstrumentId, params: &InstrumentParams, duration_ms: f64) -> SoundBuffer {
        if instrument.is_ambient() || self.capacity == 0 {
            return self.inner.render(instrument, params, duration_ms);
        }

        let (freqs, intensity, gain) = params.fingerprint();
        let key = (instrument, freqs, intensity, gain, duration_ms.to_bits());

        {
            let mut cache = self.lock();
            cache.clock += 1;
            let now = cache.clock;
            if let Some(entry) = cache.entries.get_mut(&key) {
                entry.last_used = now;
                self.hits.fetch_add(1, Ordering::Relaxed);
                return entry.buffer.clone();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let buffer = self.inner.render(instrument, params, duration_ms);

        let mut cache = self.lock();
        if !cache.entries.contains_key(&key) && cache.entries.len() >= self.capacity {
            let oldest = cache
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                cache.entries.remove(&oldest);
            }
        }
        cache.clock += 1;
        let last_used = cache.clock;
        cache.entries.insert(
            key,
            Entry {
                buffer: buffer.clone(),
                last_used,
            },
        );
        buffer
    }
}
