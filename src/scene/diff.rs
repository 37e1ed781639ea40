//! Keyed set reconciliation.
//!
//! Compares the keys currently on screen with the keys of the next frame and
//! splits them into enter / update / exit groups. Identity is the key, never
//! the value, so a centroid that moves keeps its marker.

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Result of diffing two key sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDiff<K> {
    /// Keys only in the next set, in next-set order.
    pub enter: Vec<K>,
    /// Keys in both sets, in next-set order.
    pub update: Vec<K>,
    /// Keys only in the current set, sorted.
    pub exit: Vec<K>,
}

/// Diff `current` against `next`. Duplicate keys in `next` are kept once.
pub fn diff_keys<K>(
    current: impl IntoIterator<Item = K>,
    next: impl IntoIterator<Item = K>,
) -> KeyedDiff<K>
where
    K: Copy + Eq + Hash + Ord,
{
    let mut remaining: FxHashSet<K> = current.into_iter().collect();
    let mut seen = FxHashSet::default();
    let mut enter = Vec::new();
    let mut update = Vec::new();

    for key in next {
        if !seen.insert(key) {
            continue;
        }
        if remaining.remove(&key) {
            update.push(key);
        } else {
            enter.push(key);
        }
    }

    let mut exit: Vec<K> = remaining.into_iter().collect();
    exit.sort_unstable();

    KeyedDiff {
        enter,
        update,
        exit,
    }
}
