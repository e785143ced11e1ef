//! Fixed-capacity entity pools
//!
//! Slots are allocated once at construction and recycled through a free
//! list. A handle carries the slot's generation, so a handle kept past a
//! release no longer resolves: a reused slot is a new entity.

use serde::{Deserialize, Serialize};

/// Reference to a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    active: bool,
    item: T,
}

/// Fixed-size store of reusable entities
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    /// Inactive slot indices (LIFO)
    free: Vec<u32>,
}

impl<T: Default> Pool<T> {
    /// Allocate `capacity` inactive slots
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be positive");
        let slots = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                active: false,
                item: T::default(),
            })
            .collect();
        // Reverse so the first acquire hands out slot 0
        let free = (0..capacity as u32).rev().collect();
        Self { slots, free }
    }
}

impl<T> Pool<T> {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Take an inactive slot, or `None` when the pool is exhausted
    ///
    /// The slot keeps whatever its previous occupant left behind; the
    /// caller overwrites it through the returned reference.
    pub fn acquire(&mut self) -> Option<(SlotId, &mut T)> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.active = true;
        let id = SlotId {
            index,
            generation: slot.generation,
        };
        Some((id, &mut slot.item))
    }

    /// Acquire and overwrite with `item`
    pub fn spawn(&mut self, item: T) -> Option<SlotId> {
        let (id, slot) = self.acquire()?;
        *slot = item;
        Some(id)
    }

    /// Return a slot to the pool. Stale or already-released handles are ignored.
    ///
    /// Returns whether anything was released.
    pub fn release(&mut self, id: SlotId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if !slot.active || slot.generation != id.generation {
            return false;
        }
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        true
    }

    /// Release every active slot matching `pred`
    ///
    /// Matches are collected first and released after the scan.
    pub fn release_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let doomed: Vec<SlotId> = self
            .iter_active()
            .filter(|(_, item)| pred(item))
            .map(|(id, _)| id)
            .collect();
        doomed.iter().filter(|id| self.release(**id)).count()
    }

    /// Release every active slot
    pub fn release_all(&mut self) -> usize {
        self.release_where(|_| true)
    }

    /// Resolve a handle, `None` if it went stale
    pub fn get(&self, id: SlotId) -> Option<&T> {
        let slot = self.slots.get(id.index as usize)?;
        (slot.active && slot.generation == id.generation).then_some(&slot.item)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        (slot.active && slot.generation == id.generation).then_some(&mut slot.item)
    }

    /// Active entities in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(i, s)| {
            (
                SlotId {
                    index: i as u32,
                    generation: s.generation,
                },
                &s.item,
            )
        })
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| {
                (
                    SlotId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &mut s.item,
                )
            })
    }

    /// Visit every active entity; handles collected in `release` are
    /// returned to the pool once the visit is over
    pub fn for_each_active(&mut self, mut f: impl FnMut(SlotId, &mut T, &mut Vec<SlotId>)) {
        let mut release = Vec::new();
        for (id, item) in self.iter_active_mut() {
            f(id, item, &mut release);
        }
        for id in release {
            self.release(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Dummy {
        value: i32,
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_zero_capacity_fails_fast() {
        let _ = Pool::<Dummy>::new(0);
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let mut pool = Pool::<Dummy>::new(2);
        assert!(pool.spawn(Dummy { value: 1 }).is_some());
        assert!(pool.spawn(Dummy { value: 2 }).is_some());
        assert!(pool.is_full());
        assert!(pool.acquire().is_none());
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool = Pool::<Dummy>::new(4);
        let id = pool.spawn(Dummy { value: 7 }).unwrap();
        assert!(pool.release(id));
        assert!(!pool.release(id));
        assert_eq!(pool.free_count(), 4);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut pool = Pool::<Dummy>::new(1);
        let old = pool.spawn(Dummy { value: 1 }).unwrap();
        pool.release(old);
        let new = pool.spawn(Dummy { value: 2 }).unwrap();

        assert_eq!(old.index, new.index);
        assert!(pool.get(old).is_none());
        assert!(!pool.release(old));
        assert_eq!(pool.get(new), Some(&Dummy { value: 2 }));
    }

    #[test]
    fn test_for_each_active_defers_release() {
        let mut pool = Pool::<Dummy>::new(8);
        for value in 0..6 {
            pool.spawn(Dummy { value });
        }
        let mut visited = 0;
        pool.for_each_active(|id, item, release| {
            visited += 1;
            item.value *= 10;
            if item.value % 20 == 0 {
                release.push(id);
            }
        });
        assert_eq!(visited, 6);
        // 0, 20, 40 released
        assert_eq!(pool.active_count(), 3);
        let left: Vec<i32> = pool.iter_active().map(|(_, d)| d.value).collect();
        assert_eq!(left, vec![10, 30, 50]);
    }

    #[test]
    fn test_release_where() {
        let mut pool = Pool::<Dummy>::new(5);
        for value in 0..5 {
            pool.spawn(Dummy { value });
        }
        assert_eq!(pool.release_where(|d| d.value >= 3), 2);
        assert_eq!(pool.release_all(), 3);
        assert_eq!(pool.free_count(), 5);
    }

    proptest! {
        #[test]
        fn prop_round_trip_never_leaks(capacity in 1usize..64, rounds in 1usize..6) {
            let mut pool = Pool::<Dummy>::new(capacity);
            for _ in 0..rounds {
                let ids: Vec<SlotId> = (0..capacity)
                    .map(|i| pool.spawn(Dummy { value: i as i32 }).unwrap())
                    .collect();
                prop_assert!(pool.acquire().is_none());
                for id in &ids {
                    pool.release(*id);
                    // Releasing twice must not grow the free list
                    pool.release(*id);
                }
                prop_assert_eq!(pool.free_count(), capacity);
            }
        }
    }
}
