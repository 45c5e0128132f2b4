//! Collision-free names for the body's local declarations.
//!
//! When the body declares a local whose name is already visible at the call
//! site, the local (and every reference to it) is renamed before splicing.
//! Fresh names are minted with a numeric suffix: `v` becomes `v1`, then
//! `v2`, and so on until the candidate is free.

use rustc_hash::{FxHashMap, FxHashSet};
use splice_syntax::{StringId, StringInterner};

use crate::sema::scope::DeclaredSymbol;
use crate::sema::NodeKey;

/// Mint a name based on `base` that is not in `reserved`.
pub fn ensure_unique(
    interner: &StringInterner,
    base: &str,
    reserved: &FxHashSet<StringId>,
) -> StringId {
    let mut suffix = 1u32;
    loop {
        let candidate = format!("{base}{suffix}");
        match interner.get(&candidate) {
            Some(id) if reserved.contains(&id) => suffix += 1,
            Some(id) => return id,
            // Never interned before, so nothing can reserve it.
            None => return interner.intern(&candidate),
        }
    }
}

/// Decide which of the body's locals must be renamed at this call site.
///
/// `visible` is the set of names usable at the splice point. Both the
/// visible names and every name the body declares are reserved, so two
/// colliding locals can never be pushed onto the same fresh name.
pub fn symbols_to_rename(
    declared: &[DeclaredSymbol],
    visible: &FxHashSet<StringId>,
    interner: &StringInterner,
) -> FxHashMap<NodeKey, StringId> {
    let mut renames = FxHashMap::default();
    let colliding: Vec<&DeclaredSymbol> = declared
        .iter()
        .filter(|symbol| visible.contains(&symbol.name))
        .collect();
    if colliding.is_empty() {
        return renames;
    }

    let mut reserved: FxHashSet<StringId> = visible.clone();
    reserved.extend(declared.iter().map(|symbol| symbol.name));

    for symbol in colliding {
        let base = interner.resolve(symbol.name);
        let fresh = ensure_unique(interner, &base, &reserved);
        reserved.insert(fresh);
        renames.insert(symbol.key, fresh);
    }
    renames
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id_of(interner: &StringInterner, s: &str) -> StringId {
        interner.intern(s)
    }

    #[test]
    fn first_free_suffix_wins() {
        let interner = StringInterner::new();
        let v = id_of(&interner, "v");
        let v1 = id_of(&interner, "v1");
        let mut reserved = FxHashSet::default();
        reserved.insert(v);
        reserved.insert(v1);
        let fresh = ensure_unique(&interner, "v", &reserved);
        assert_eq!(interner.resolve(fresh), "v2");
    }

    #[test]
    fn non_colliding_locals_keep_their_names() {
        let interner = StringInterner::new();
        let local = id_of(&interner, "temp");
        let declared = vec![DeclaredSymbol {
            name: local,
            key: NodeKey::of(&local),
        }];
        let visible = FxHashSet::default();
        assert!(symbols_to_rename(&declared, &visible, &interner).is_empty());
    }

    #[test]
    fn colliding_locals_get_distinct_fresh_names() {
        let interner = StringInterner::new();
        let v = id_of(&interner, "v");
        let anchors = [0u8, 1u8];
        let declared = vec![
            DeclaredSymbol {
                name: v,
                key: NodeKey::of(&anchors[0]),
            },
            DeclaredSymbol {
                name: v,
                key: NodeKey::of(&anchors[1]),
            },
        ];
        let mut visible = FxHashSet::default();
        visible.insert(v);

        let renames = symbols_to_rename(&declared, &visible, &interner);
        assert_eq!(renames.len(), 2);
        let a = renames[&NodeKey::of(&anchors[0])];
        let b = renames[&NodeKey::of(&anchors[1])];
        assert_ne!(a, b);
        assert_eq!(interner.resolve(a), "v1");
        assert_eq!(interner.resolve(b), "v2");
    }

    proptest! {
        #[test]
        fn minted_names_avoid_every_reserved_suffix(taken in 0usize..20) {
            let interner = StringInterner::new();
            let mut reserved = FxHashSet::default();
            reserved.insert(interner.intern("x"));
            for i in 1..=taken {
                reserved.insert(interner.intern(&format!("x{i}")));
            }
            let fresh = ensure_unique(&interner, "x", &reserved);
            prop_assert!(!reserved.contains(&fresh));
            prop_assert_eq!(interner.resolve(fresh), format!("x{}", taken + 1));
        }
    }
}
