use alloc::vec::Vec;

use super::handle::Handle;

/// Backing storage for tree nodes.
///
/// Splits and root growth allocate; merges and root shrink release. A
/// released slot is not returned to the allocator - it is threaded onto a
/// vacant chain running through the slots themselves, and the next split
/// reuses it. A tree that churns through inserts and removes therefore
/// settles at its high-water node count instead of growing without bound.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Most recently vacated slot; the chain continues inside each slot.
    vacant_head: Option<Handle>,
    /// Occupied slot count.
    live: usize,
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next: Option<Handle> },
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant_head: None,
            live: 0,
        }
    }

    /// Pre-allocates room for `slots` nodes, capped at what handles can
    /// address.
    pub(crate) fn with_capacity(slots: usize) -> Self {
        Self {
            slots: Vec::with_capacity(slots.min(Handle::LIMIT + 1)),
            vacant_head: None,
            live: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots, i.e. live nodes.
    pub(crate) const fn len(&self) -> usize {
        self.live
    }

    /// Stores `element`, reusing the most recently vacated slot when one
    /// exists and growing the backing vector otherwise.
    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        self.live += 1;
        match self.vacant_head {
            Some(handle) => {
                let Slot::Vacant { next } = &self.slots[handle.index()] else {
                    panic!("vacant chain runs through an occupied slot");
                };
                self.vacant_head = *next;
                self.slots[handle.index()] = Slot::Occupied(element);
                handle
            }
            None => {
                let handle = Handle::checked(self.slots.len()).expect("node arena exhausted");
                self.slots.push(Slot::Occupied(element));
                handle
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("stale node handle"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("stale node handle"),
        }
    }

    /// Vacates the slot behind `handle` and returns its node, pushing the
    /// slot onto the vacant chain.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let vacated = Slot::Vacant {
            next: self.vacant_head,
        };
        match core::mem::replace(&mut self.slots[handle.index()], vacated) {
            Slot::Occupied(element) => {
                self.vacant_head = Some(handle);
                self.live -= 1;
                element
            }
            Slot::Vacant { .. } => panic!("stale node handle"),
        }
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        let _ = self.take(handle);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant_head = None;
        self.live = 0;
    }
}
