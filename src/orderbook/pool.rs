//! Pre-sized order pool with O(1) acquire/release.
//!
//! All storage is allocated at construction: a contiguous slab of order
//! slots and a free-index stack seeded with every slot. Nothing on the
//! acquire/release path touches the allocator, and slot indices stay valid
//! for the pool's lifetime, so they can be held by the ladder queues and
//! the identifier index.

use super::Order;

/// Fixed-capacity object pool for [`Order`] slots.
#[derive(Debug)]
pub struct OrderPool {
    slots: Vec<Order>,
    // Free slot indices, used as a stack (LIFO reuse).
    free: Vec<u32>,
}

impl OrderPool {
    /// Allocate `capacity` slots up front. This is the only allocation the
    /// pool ever performs.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity < u32::MAX as usize,
            "pool capacity must fit u32 slot indices"
        );
        Self {
            slots: vec![Order::default(); capacity],
            // Seeded in reverse so slot 0 is handed out first.
            free: (0..capacity as u32).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently handed out.
    pub fn allocated(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of free slots remaining.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Pop a free slot index, or `None` when the pool is exhausted.
    ///
    /// The slot's contents are unspecified; the caller must initialize it
    /// before use. O(1).
    pub fn acquire(&mut self) -> Option<u32> {
        self.free.pop()
    }

    /// Return a slot to the free stack. O(1).
    ///
    /// `idx` must have come from [`acquire`](Self::acquire) on this pool
    /// and must not already have been released.
    pub fn release(&mut self, idx: u32) {
        debug_assert!((idx as usize) < self.slots.len(), "index outside pool");
        debug_assert!(!self.free.contains(&idx), "double release of slot {idx}");
        self.free.push(idx);
    }

    pub fn get(&self, idx: u32) -> &Order {
        &self.slots[idx as usize]
    }

    pub fn get_mut(&mut self, idx: u32) -> &mut Order {
        &mut self.slots[idx as usize]
    }
}
