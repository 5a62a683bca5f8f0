//! The open set: cells discovered but not yet expanded.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::cell::CellId;
use crate::error::EmptyFrontier;

/// Priority key of a live member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Key {
    f: u32,
    seq: u64,
}

/// Heap entry, ordered so that `BinaryHeap` (a max-heap) pops the smallest
/// `f` first and, among equal `f`, the earliest insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    key: Key,
    id: CellId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .f
            .cmp(&self.key.f)
            .then_with(|| other.key.seq.cmp(&self.key.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-`f` priority frontier with deterministic tie-breaking.
///
/// Membership is tracked per cell; the heap may hold outdated entries after
/// [`remove`](Frontier::remove) or [`decrease`](Frontier::decrease), which are
/// discarded lazily when they surface.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    members: Vec<Option<Key>>,
    len: usize,
    next_seq: u64,
}

impl Frontier {
    /// Create a frontier able to hold ids of a grid with `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            members: vec![None; capacity],
            len: 0,
            next_seq: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, id: CellId) -> bool {
        matches!(self.members.get(id.0), Some(Some(_)))
    }

    /// The priority a member is currently keyed by.
    pub fn priority(&self, id: CellId) -> Option<u32> {
        self.members.get(id.0).copied().flatten().map(|k| k.f)
    }

    /// Add `id` with priority `f`. Inserting a current member re-keys it and
    /// moves it to the back of the insertion order.
    pub fn insert(&mut self, id: CellId, f: u32) {
        if id.0 >= self.members.len() {
            self.members.resize(id.0 + 1, None);
        }
        if self.members[id.0].is_none() {
            self.len += 1;
        }
        let key = Key {
            f,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.members[id.0] = Some(key);
        self.heap.push(Entry { key, id });
    }

    /// Re-key a member with a new priority, keeping its insertion rank.
    ///
    /// Returns `false` (and does nothing) if `id` is not a member.
    pub fn decrease(&mut self, id: CellId, f: u32) -> bool {
        let Some(Some(key)) = self.members.get_mut(id.0) else {
            return false;
        };
        key.f = f;
        let key = *key;
        self.heap.push(Entry { key, id });
        true
    }

    /// Remove `id`. Returns whether it was a member.
    pub fn remove(&mut self, id: CellId) -> bool {
        let Some(slot) = self.members.get_mut(id.0) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.len -= 1;
        true
    }

    /// Remove and return the member with the smallest priority.
    pub fn pop_min(&mut self) -> Result<CellId, EmptyFrontier> {
        while let Some(entry) = self.heap.pop() {
            // Skip entries superseded by remove / decrease / re-insert.
            if self.members[entry.id.0] != Some(entry.key) {
                continue;
            }
            self.members[entry.id.0] = None;
            self.len -= 1;
            return Ok(entry.id);
        }
        Err(EmptyFrontier)
    }

    /// Drop every member.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.members.iter_mut().for_each(|m| *m = None);
        self.len = 0;
        self.next_seq = 0;
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = CellId> {
        let mut live: Vec<(u64, CellId)> = self
            .members
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.map(|k| (k.seq, CellId(i))))
            .collect();
        live.sort_unstable_by_key(|&(seq, _)| seq);
        live.into_iter().map(|(_, id)| id)
    }
}
