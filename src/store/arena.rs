use tracing::debug;

use super::Handle;
use crate::error::{PhysicsError, Result};

/// A value that can live in an [`Arena`] slot.
///
/// Slots are never removed from the backing storage. A freed slot stays in
/// place in its vacant state until the next insert reuses it.
pub trait Slot: Sized {
    /// The state of a slot that holds nothing
    fn vacant() -> Self;

    fn is_vacant(&self) -> bool;

    /// Puts the slot back into its vacant state
    fn vacate(&mut self);

    /// Error reported when `handle` does not resolve to a live slot
    fn not_found(handle: Handle<Self>) -> PhysicsError;
}

/// Generational slot storage for bodies and colliders.
///
/// Inserting takes the first vacant slot, scanning linearly from the start.
/// When every slot is occupied the storage doubles. Removing a value bumps
/// the generation of its slot so handles to it stop resolving.
///
/// A value may also be vacated in place through [`Arena::get_mut`], e.g. a
/// body whose mass is set negative. Its handle stops resolving at once and
/// the slot's generation is bumped when the slot is reused.
#[derive(Debug, Clone)]
pub struct Arena<T: Slot> {
    slots: Vec<T>,
    generations: Vec<u32>,
    /// Slots handed out by `insert` and not yet released by the arena
    claimed: Vec<bool>,
}

impl<T: Slot> Default for Arena<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: Slot> Arena<T> {
    /// Creates an arena with `capacity` vacant slots
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::vacant);
        Self {
            slots,
            generations: vec![0; capacity],
            claimed: vec![false; capacity],
        }
    }

    /// Stores `value` in the first vacant slot, growing if there is none
    pub fn insert(&mut self, value: T) -> Handle<T> {
        debug_assert!(!value.is_vacant(), "inserting a vacant value");

        let index = match self.slots.iter().position(T::is_vacant) {
            Some(index) => index,
            None => {
                let index = self.slots.len();
                self.grow();
                index
            }
        };

        if self.claimed[index] {
            // Vacated in place; handles to the previous value must not resolve
            self.generations[index] = self.generations[index].wrapping_add(1);
        }
        self.slots[index] = value;
        self.claimed[index] = true;
        Handle::new(index as u32, self.generations[index])
    }

    fn grow(&mut self) {
        let previous = self.slots.len();
        let capacity = (previous * 2).max(1);
        self.slots.resize_with(capacity, T::vacant);
        self.generations.resize(capacity, 0);
        self.claimed.resize(capacity, false);
        debug!(
            slot_type = std::any::type_name::<T>(),
            previous, capacity, "arena grown"
        );
    }

    #[inline]
    fn live_index(&self, handle: Handle<T>) -> Option<usize> {
        let index = handle.index();
        let live = self.generations.get(index) == Some(&handle.generation())
            && !self.slots[index].is_vacant();
        live.then_some(index)
    }

    /// Returns true if `handle` refers to an occupied slot of its generation
    #[inline]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.live_index(handle).is_some()
    }

    pub fn get(&self, handle: Handle<T>) -> Result<&T> {
        match self.live_index(handle) {
            Some(index) => Ok(&self.slots[index]),
            None => Err(T::not_found(handle)),
        }
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T> {
        match self.live_index(handle) {
            Some(index) => Ok(&mut self.slots[index]),
            None => Err(T::not_found(handle)),
        }
    }

    /// Borrows two distinct live slots mutably at once.
    ///
    /// Returns `Ok(None)` when both handles name the same slot.
    pub fn get2_mut(&mut self, a: Handle<T>, b: Handle<T>) -> Result<Option<(&mut T, &mut T)>> {
        let ia = self.live_index(a).ok_or_else(|| T::not_found(a))?;
        let ib = self.live_index(b).ok_or_else(|| T::not_found(b))?;

        if ia == ib {
            return Ok(None);
        }

        let (lo, hi) = (ia.min(ib), ia.max(ib));
        let (head, tail) = self.slots.split_at_mut(hi);
        let (first, second) = (&mut head[lo], &mut tail[0]);
        Ok(Some(if ia < ib {
            (first, second)
        } else {
            (second, first)
        }))
    }

    /// Frees the slot behind `handle` and invalidates every copy of it
    pub fn remove(&mut self, handle: Handle<T>) -> Result<()> {
        let index = self.live_index(handle).ok_or_else(|| T::not_found(handle))?;
        self.slots[index].vacate();
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.claimed[index] = false;
        Ok(())
    }

    /// Iterates over occupied slots with their current handles
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (slot, _))| !slot.is_vacant())
            .map(|(index, (slot, &generation))| (Handle::new(index as u32, generation), slot))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (slot, _))| !slot.is_vacant())
            .map(|(index, (slot, &generation))| (Handle::new(index as u32, generation), slot))
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_vacant()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(T::is_vacant)
    }

    /// Number of slots, vacant or not
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Vacates every slot, bumping the generation of the claimed ones
    pub fn clear(&mut self) {
        let slots = self.slots.iter_mut().zip(&mut self.generations);
        for ((slot, generation), claimed) in slots.zip(&mut self.claimed) {
            if *claimed {
                slot.vacate();
                *generation = generation.wrapping_add(1);
                *claimed = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Cell(Option<i32>);

    impl Slot for Cell {
        fn vacant() -> Self {
            Cell(None)
        }

        fn is_vacant(&self) -> bool {
            self.0.is_none()
        }

        fn vacate(&mut self) {
            self.0 = None;
        }

        fn not_found(handle: Handle<Self>) -> PhysicsError {
            PhysicsError::BodyNotFound(Handle::new(handle.index() as u32, handle.generation()))
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.insert(Cell(Some(1)));
        let b = arena.insert(Cell(Some(2)));

        assert_eq!(arena.get(a).unwrap(), &Cell(Some(1)));
        arena.get_mut(b).unwrap().0 = Some(20);
        assert_eq!(arena.get(b).unwrap(), &Cell(Some(20)));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    fn test_growth_doubles_and_keeps_handles() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.insert(Cell(Some(1)));
        let b = arena.insert(Cell(Some(2)));
        let c = arena.insert(Cell(Some(3)));

        assert_eq!(arena.capacity(), 4);
        assert_eq!(arena.get(a).unwrap().0, Some(1));
        assert_eq!(arena.get(b).unwrap().0, Some(2));
        assert_eq!(arena.get(c).unwrap().0, Some(3));
    }

    #[test]
    fn test_grow_from_empty() {
        let mut arena = Arena::with_capacity(0);
        arena.insert(Cell(Some(1)));
        assert_eq!(arena.capacity(), 1);
        arena.insert(Cell(Some(2)));
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    fn test_remove_invalidates_handle() {
        let mut arena = Arena::with_capacity(1);
        let old = arena.insert(Cell(Some(1)));
        arena.remove(old).unwrap();

        assert!(arena.get(old).is_err());
        assert!(arena.remove(old).is_err());

        let new = arena.insert(Cell(Some(2)));
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(arena.get(old).is_err());
        assert_eq!(arena.capacity(), 1);
    }

    #[test]
    fn test_out_of_range_handle() {
        let arena: Arena<Cell> = Arena::with_capacity(4);
        assert!(matches!(
            arena.get(Handle::new(99, 0)),
            Err(PhysicsError::BodyNotFound(_))
        ));
        assert!(!arena.contains(Handle::new(0, 0)));
    }

    #[test]
    fn test_get2_mut() {
        let mut arena = Arena::with_capacity(4);
        let a = arena.insert(Cell(Some(1)));
        let b = arena.insert(Cell(Some(2)));

        let (x, y) = arena.get2_mut(b, a).unwrap().unwrap();
        assert_eq!((x.0, y.0), (Some(2), Some(1)));
        std::mem::swap(x, y);

        assert_eq!(arena.get(a).unwrap().0, Some(2));
        assert!(arena.get2_mut(a, a).unwrap().is_none());
    }

    #[test]
    fn test_iter_skips_vacant() {
        let mut arena = Arena::with_capacity(4);
        let a = arena.insert(Cell(Some(1)));
        let b = arena.insert(Cell(Some(2)));
        arena.remove(a).unwrap();

        let live: Vec<_> = arena.iter().map(|(h, _)| h).collect();
        assert_eq!(live, vec![b]);

        arena.clear();
        assert!(arena.is_empty());
        assert!(arena.get(b).is_err());
    }

    #[test]
    fn test_vacated_in_place_is_not_aliased() {
        let mut arena = Arena::with_capacity(2);
        let old = arena.insert(Cell(Some(1)));
        arena.get_mut(old).unwrap().0 = None;

        assert!(arena.get(old).is_err());
        assert_eq!(arena.len(), 0);

        let fresh = arena.insert(Cell(Some(2)));
        assert_eq!(fresh.index(), old.index());
        assert_ne!(fresh, old);
        assert!(arena.get(old).is_err());
        assert_eq!(arena.get(fresh).unwrap().0, Some(2));
        assert_eq!(arena.len(), 1);

        // Removal after an in-place vacate still works through the new handle
        arena.remove(fresh).unwrap();
        let again = arena.insert(Cell(Some(3)));
        assert_ne!(again, fresh);
        assert_eq!(again.generation(), fresh.generation() + 1);
    }
}
