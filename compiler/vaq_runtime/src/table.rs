//! Open-addressed hash table keyed by [`Value`].
//!
//! Backs global variables, object fields, class methods, keyword arguments
//! and the string intern set. Linear probing over a power-of-two capacity;
//! deleted slots become tombstones so probe chains through them stay intact.
//!
//! The load count includes tombstones. Before an insertion would push it past
//! half the capacity the table doubles (minimum [`MIN_CAPACITY`]) and rehashes
//! live entries only, which drops every tombstone.

use crate::value::{ObjRef, Value};

/// Smallest non-zero capacity.
pub const MIN_CAPACITY: usize = 8;

#[derive(Copy, Clone, Debug)]
enum Slot {
    /// Never held a key. Terminates probing.
    Unused,
    /// Held a key that was removed. Probing continues past it.
    Tombstone,
    Occupied(Value),
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    /// `Value::Empty` unless the slot is occupied.
    key: Value,
    slot: Slot,
}

impl Entry {
    const UNUSED: Entry = Entry {
        key: Value::Empty,
        slot: Slot::Unused,
    };
}

#[derive(Clone, Debug, Default)]
pub struct Table {
    entries: Vec<Entry>,
    /// Occupied slots plus tombstones.
    count: usize,
    /// Occupied slots only.
    live: usize,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Number of slots. Always zero or a power of two.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Occupied slots plus tombstones; the figure the load factor bounds.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of live keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert or overwrite `key`. Returns `true` if the key was not present.
    ///
    /// `Empty` cannot be a key; it is ignored and `false` is returned.
    pub fn put(&mut self, key: Value, value: Value) -> bool {
        let Some(hash) = key.hash_code() else {
            return false;
        };

        if (self.count + 1) * 2 > self.capacity() {
            let grown = (self.capacity() * 2).max(MIN_CAPACITY);
            self.resize(grown);
        }

        let index = find_entry(&self.entries, key, hash);
        let entry = &mut self.entries[index];
        let is_new = entry.key.is_empty();
        if is_new {
            self.live += 1;
            // Reusing a tombstone keeps the load count unchanged.
            if matches!(entry.slot, Slot::Unused) {
                self.count += 1;
            }
        }
        entry.key = key;
        entry.slot = Slot::Occupied(value);
        is_new
    }

    pub fn get(&self, key: Value) -> Option<&Value> {
        let index = self.lookup(key)?;
        match &self.entries[index].slot {
            Slot::Occupied(value) => Some(value),
            Slot::Unused | Slot::Tombstone => None,
        }
    }

    #[inline]
    pub fn has(&self, key: Value) -> bool {
        self.lookup(key).is_some()
    }

    /// Remove `key`, leaving a tombstone. Returns whether it was present.
    pub fn remove(&mut self, key: Value) -> bool {
        let Some(index) = self.lookup(key) else {
            return false;
        };
        self.entries[index] = Entry {
            key: Value::Empty,
            slot: Slot::Tombstone,
        };
        self.live -= 1;
        true
    }

    /// Rehash into fresh storage of at least `capacity` slots.
    ///
    /// The capacity is rounded up to a power of two (minimum
    /// [`MIN_CAPACITY`]) large enough to keep the live entries within the
    /// load factor. Tombstones are dropped and the load count recomputed.
    pub fn resize(&mut self, capacity: usize) {
        let mut capacity = capacity.max(MIN_CAPACITY).next_power_of_two();
        while self.live * 2 > capacity {
            capacity *= 2;
        }

        tracing::trace!(from = self.capacity(), to = capacity, live = self.live, "table resize");

        let old = std::mem::replace(&mut self.entries, vec![Entry::UNUSED; capacity]);
        self.count = 0;
        for entry in old {
            if !matches!(entry.slot, Slot::Occupied(_)) {
                continue;
            }
            // Occupied keys always hash.
            let Some(hash) = entry.key.hash_code() else {
                continue;
            };
            let index = find_entry(&self.entries, entry.key, hash);
            self.entries[index] = entry;
            self.count += 1;
        }
        self.live = self.count;
    }

    /// Find an interned string by content.
    ///
    /// `matches` is asked about every string key whose cached hash equals
    /// `hash`; it compares length and bytes against the candidate.
    pub fn find_string(&self, hash: u32, mut matches: impl FnMut(ObjRef) -> bool) -> Option<ObjRef> {
        if self.count == 0 {
            return None;
        }
        let mask = self.capacity() - 1;
        let mut index = hash as usize & mask;
        loop {
            let entry = &self.entries[index];
            match entry.slot {
                Slot::Unused => return None,
                Slot::Tombstone => {}
                Slot::Occupied(_) => {
                    if let Value::Object(r) = entry.key {
                        if r.hash() == hash && matches(r) {
                            return Some(r);
                        }
                    }
                }
            }
            index = (index + 1) & mask;
        }
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Value, Value)> + '_ {
        self.entries.iter().filter_map(|entry| match entry.slot {
            Slot::Occupied(value) => Some((entry.key, value)),
            Slot::Unused | Slot::Tombstone => None,
        })
    }

    /// Slot index holding `key`, if present.
    fn lookup(&self, key: Value) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let hash = key.hash_code()?;
        let index = find_entry(&self.entries, key, hash);
        (!self.entries[index].key.is_empty()).then_some(index)
    }
}

/// Probe for `key`.
///
/// Returns the slot holding it, or else the slot an insertion should use: the
/// first tombstone passed, falling back to the unused slot that ended the
/// probe. `entries` must be non-empty and contain at least one unused slot,
/// which the load factor guarantees.
fn find_entry(entries: &[Entry], key: Value, hash: u32) -> usize {
    let mask = entries.len() - 1;
    let mut index = hash as usize & mask;
    let mut tombstone = None;
    loop {
        let entry = &entries[index];
        match entry.slot {
            Slot::Unused => return tombstone.unwrap_or(index),
            Slot::Tombstone => {
                tombstone.get_or_insert(index);
            }
            Slot::Occupied(_) => {
                if entry.key.same_key(key) {
                    return index;
                }
            }
        }
        index = (index + 1) & mask;
    }
}
