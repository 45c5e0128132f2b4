//! String interning for identifiers.
//!
//! Identifiers are stored once and referenced by a small copyable
//! [`StringId`]. The interner is shared (`Arc`) between the parser, the
//! refactoring engine and worker threads; interior locking keeps `intern`
//! usable from the parallel rewrite phase, where fresh names are minted.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Handle to an interned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringId(u32);

impl StringId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Default)]
struct Inner {
    map: FxHashMap<String, StringId>,
    strings: Vec<String>,
}

/// Thread-safe string interner.
#[derive(Default)]
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the existing id if it was seen before.
    pub fn intern(&self, s: &str) -> StringId {
        if let Some(id) = self.inner.read().map.get(s) {
            return *id;
        }
        let mut inner = self.inner.write();
        if let Some(id) = inner.map.get(s) {
            return *id;
        }
        let id = StringId(inner.strings.len() as u32);
        inner.strings.push(s.to_string());
        inner.map.insert(s.to_string(), id);
        id
    }

    /// Look up an already interned string without inserting.
    pub fn get(&self, s: &str) -> Option<StringId> {
        self.inner.read().map.get(s).copied()
    }

    /// Resolve an id back to its text.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this interner.
    pub fn resolve(&self, id: StringId) -> String {
        self.inner.read().strings[id.index()].clone()
    }

    /// Number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        let c = interner.intern("bar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "foo");
        assert_eq!(interner.resolve(c), "bar");
    }

    #[test]
    fn get_does_not_insert() {
        let interner = StringInterner::new();
        assert!(interner.get("missing").is_none());
        let id = interner.intern("present");
        assert_eq!(interner.get("present"), Some(id));
    }
}
