//! Arena allocator for AST nodes.
//!
//! Wraps `bumpalo::Bump` with helpers tuned for syntax-tree workloads:
//!
//! - O(1) bulk deallocation
//! - cheap slice allocation for node lists
//! - allocation counting for debugging
//!
//! Every workspace snapshot chain shares one arena; rewrite passes that run
//! on worker threads create their own short-lived arenas. The arena is not
//! thread-safe by design.

use bumpalo::Bump;
use std::cell::Cell;

/// Arena allocator for AST nodes.
///
/// All allocations are valid for the arena's lifetime.
pub struct Arena {
    bump: Bump,
    /// Track allocation count for debugging/metrics
    allocation_count: Cell<usize>,
}

impl Arena {
    /// Create a new arena with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            bump: Bump::new(),
            allocation_count: Cell::new(0),
        }
    }

    /// Create a new arena with a capacity hint.
    ///
    /// A good heuristic is 10-20x the source size for AST allocation.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
            allocation_count: Cell::new(0),
        }
    }

    /// Allocate a single value in the arena.
    #[inline]
    pub fn alloc<T>(&self, value: T) -> &T {
        self.allocation_count.set(self.allocation_count.get() + 1);
        self.bump.alloc(value)
    }

    /// Allocate a slice by cloning from an existing slice.
    #[inline]
    pub fn alloc_slice_clone<T: Clone>(&self, slice: &[T]) -> &[T] {
        self.allocation_count.set(self.allocation_count.get() + 1);
        self.bump.alloc_slice_clone(slice)
    }

    /// Allocate a slice by copying from an existing slice of `Copy` values.
    #[inline]
    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.allocation_count.set(self.allocation_count.get() + 1);
        self.bump.alloc_slice_copy(slice)
    }

    /// Allocate a string slice.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.allocation_count.set(self.allocation_count.get() + 1);
        self.bump.alloc_str(s)
    }

    /// Number of allocations performed so far.
    #[inline]
    pub fn allocation_count(&self) -> usize {
        self.allocation_count.get()
    }

    /// Total bytes currently allocated.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_single_value() {
        let arena = Arena::new();
        let value: &i32 = arena.alloc(42);
        assert_eq!(*value, 42);
        assert_eq!(arena.allocation_count(), 1);
    }

    #[test]
    fn alloc_slices() {
        let arena = Arena::new();
        let copied: &[i32] = arena.alloc_slice_copy(&[1, 2, 3]);
        let cloned: &[String] = arena.alloc_slice_clone(&["a".to_string(), "b".to_string()]);
        assert_eq!(copied, &[1, 2, 3]);
        assert_eq!(cloned.len(), 2);
    }
}
