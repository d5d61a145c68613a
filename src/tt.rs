//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve position evaluations,
//! enabling significant search tree pruning. Buckets are individually
//! mutex-guarded so the table can be shared behind an `Arc` across Lazy-SMP
//! worker threads without a single global lock.

use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::board::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed low - score <= alpha)
    UpperBound, // Score is at most this value (failed high - score >= beta)
}

#[derive(Clone, Debug)]
pub(crate) struct TTEntry {
    hash: u64,
    depth: u32,
    score: i32,
    bound_type: BoundType,
    best_move: Option<Move>,
    generation: u16,
}

impl TTEntry {
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

type Bucket = [Option<TTEntry>; 4];

pub struct TranspositionTable {
    table: Vec<Mutex<Bucket>>,
    mask: usize, // To wrap index around using bitwise AND (table size must be power of 2)
    occupied: AtomicUsize,
}

impl TranspositionTable {
    // size_mb: Desired size in Megabytes
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<Bucket>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size;

        // Ensure num_entries is a power of 2 for efficient indexing
        num_entries = num_entries.next_power_of_two() / 2; // Find next power of 2, maybe go down one? Test this.
        if num_entries == 0 {
            num_entries = 1024;
        } // Minimum size fallback

        let mut table = Vec::with_capacity(num_entries);
        table.resize_with(num_entries, || Mutex::new([None, None, None, None]));

        TranspositionTable {
            table,
            mask: num_entries - 1, // e.g., if size is 1024, mask is 1023 (0b1111111111)
            occupied: AtomicUsize::new(0),
        }
    }

    // Calculate index using the hash and mask
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Hint the CPU to start loading the bucket for `hash` into cache.
    /// No-op on targets without an intrinsic prefetch instruction.
    #[inline]
    pub(crate) fn prefetch(&self, hash: u64) {
        let index = self.index(hash);
        #[cfg(target_arch = "x86_64")]
        unsafe {
            use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
            let ptr = self.table.as_ptr().add(index).cast::<i8>();
            _mm_prefetch::<_MM_HINT_T0>(ptr);
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            let _ = index;
        }
    }

    // Probe the table for a given hash. Returns a clone since the entry
    // lives behind a per-bucket mutex guard.
    pub(crate) fn probe(&self, hash: u64) -> Option<TTEntry> {
        let index = self.index(hash);
        let bucket = self.table[index].lock();
        bucket
            .iter()
            .flatten()
            .find(|entry| entry.hash == hash)
            .cloned()
    }

    // Store an entry in the table
    pub(crate) fn store(
        &self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
        generation: u16,
    ) {
        let index = self.index(hash);
        let mut bucket = self.table[index].lock();

        for slot in bucket.iter_mut() {
            if let Some(existing) = slot {
                if existing.hash == hash {
                    *slot = Some(TTEntry {
                        hash,
                        depth,
                        score,
                        bound_type,
                        best_move,
                        generation,
                    });
                    return;
                }
            }
        }

        for slot in bucket.iter_mut() {
            if slot.is_none() {
                *slot = Some(TTEntry {
                    hash,
                    depth,
                    score,
                    bound_type,
                    best_move,
                    generation,
                });
                self.occupied.fetch_add(1, Ordering::Relaxed);
                return;
            }
        }

        let mut replace_idx = 0;
        let mut worst_priority = i32::MAX;

        for (idx, slot) in bucket.iter().enumerate() {
            if let Some(entry) = slot {
                let age = generation.wrapping_sub(entry.generation);
                let priority = entry.depth.saturating_mul(2) as i32 - age as i32;
                if idx == 0 || priority < worst_priority {
                    replace_idx = idx;
                    worst_priority = priority;
                }
            }
        }

        bucket[replace_idx] = Some(TTEntry {
            hash,
            depth,
            score,
            bound_type,
            best_move,
            generation,
        });
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let total_slots = self.table.len().saturating_mul(4);
        if total_slots == 0 {
            return 0;
        }
        ((self.occupied.load(Ordering::Relaxed) as u64 * 1000) / total_slots as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_probe_roundtrip() {
        let tt = TranspositionTable::new(1);
        tt.store(42, 5, 100, BoundType::Exact, None, 0);
        let entry = tt.probe(42).expect("entry should be present");
        assert_eq!(entry.depth(), 5);
        assert_eq!(entry.score(), 100);
    }

    #[test]
    fn probe_miss_returns_none() {
        let tt = TranspositionTable::new(1);
        assert!(tt.probe(12345).is_none());
    }

    #[test]
    fn hashfull_reflects_occupancy() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.hashfull_per_mille(), 0);
        tt.store(1, 1, 0, BoundType::Exact, None, 0);
        assert!(tt.hashfull_per_mille() > 0);
    }
}
