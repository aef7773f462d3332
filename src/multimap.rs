use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Maps each distinct key to a slot number, handed out in first-insertion order.
///
/// Slots are never reused or removed individually; the whole index is reset by
/// [`clear()`](Self::clear).
#[derive(Debug, Clone)]
struct KeyIndex<K> {
    slots: HashMap<K, usize>,
    order: Vec<K>,
}

impl<K> KeyIndex<K> {
    fn new() -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }
}

impl<K: Hash + Eq + Clone> KeyIndex<K> {
    /// Register a key, returning its slot. If the key is already registered,
    /// returns the existing slot.
    fn register(&mut self, key: K) -> usize {
        if let Some(&slot) = self.slots.get(&key) {
            return slot;
        }
        let slot = self.order.len();
        self.slots.insert(key.clone(), slot);
        self.order.push(key);
        slot
    }

    fn slot<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(key).copied()
    }
}

/// Insertion-ordered set of values belonging to one key.
#[derive(Debug, Clone)]
struct LinkedSet<V> {
    values: Vec<V>,
    // value hash -> positions in `values` carrying that hash
    buckets: HashMap<u64, Vec<usize>>,
}

impl<V> Default for LinkedSet<V> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            buckets: HashMap::new(),
        }
    }
}

impl<V: Hash + Eq> LinkedSet<V> {
    fn insert(&mut self, value: V, hasher: &RandomState) -> bool {
        let bucket = self.buckets.entry(hasher.hash_one(&value)).or_default();
        if bucket.iter().any(|&pos| self.values[pos] == value) {
            return false;
        }
        bucket.push(self.values.len());
        self.values.push(value);
        true
    }

    fn contains(&self, value: &V, hasher: &RandomState) -> bool {
        self.buckets
            .get(&hasher.hash_one(value))
            .is_some_and(|bucket| bucket.iter().any(|&pos| &self.values[pos] == value))
    }
}

/// A multimap holding an insertion-ordered **set** of values per key.
///
/// Keys iterate in the order they were first inserted. Putting a value that is
/// already present under the same key is a no-op: neither the values nor the
/// key order change.
///
/// # Example
///
/// ```
/// use tagstore::LinkedSetMultimap;
///
/// let mut map = LinkedSetMultimap::new();
/// assert!(map.put("b", 1));
/// assert!(map.put("a", 2));
/// assert!(!map.put("b", 1));
///
/// assert_eq!(map.get("b"), &[1]);
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b", "a"]);
/// ```
#[derive(Debug, Clone)]
pub struct LinkedSetMultimap<K, V> {
    keys: KeyIndex<K>,
    sets: Vec<LinkedSet<V>>,
    hasher: RandomState,
    len: usize,
}

impl<K, V> LinkedSetMultimap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: KeyIndex::new(),
            sets: Vec::new(),
            hasher: RandomState::new(),
            len: 0,
        }
    }

    /// Total number of values across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Distinct keys in first-insertion order.
    #[must_use]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.keys.order.iter()
    }

    /// Each key with all of its values, keys in first-insertion order.
    #[must_use]
    pub fn groups(&self) -> impl DoubleEndedIterator<Item = (&K, &[V])> {
        self.keys
            .order
            .iter()
            .zip(self.sets.iter().map(|set| set.values.as_slice()))
    }

    /// Every `(key, value)` entry: keys in first-insertion order, then values in
    /// insertion order within each key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.groups()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    /// All values in entry order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.sets.iter().flat_map(|set| set.values.iter())
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.sets.clear();
        self.len = 0;
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Eq> LinkedSetMultimap<K, V> {
    /// Insert `value` under `key`. Returns `false` if the value was already
    /// present under that key, in which case the map is left unchanged.
    pub fn put(&mut self, key: K, value: V) -> bool {
        let slot = self.keys.register(key);
        if slot == self.sets.len() {
            self.sets.push(LinkedSet::default());
        }
        let inserted = self.sets[slot].insert(value, &self.hasher);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Values stored under `key` in insertion order. Empty for unknown keys.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.keys.slot(key) {
            Some(slot) => &self.sets[slot].values,
            None => &[],
        }
    }

    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.slot(key).is_some()
    }

    /// Whether `value` is stored under `key`.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q, value: &V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys
            .slot(key)
            .is_some_and(|slot| self.sets[slot].contains(value, &self.hasher))
    }
}

impl<K, V> Default for LinkedSetMultimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for LinkedSetMultimap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.groups().eq(other.groups())
    }
}

impl<K: Eq, V: Eq> Eq for LinkedSetMultimap<K, V> {}

impl<K: Hash + Eq + Clone, V: Hash + Eq> Extend<(K, V)> for LinkedSetMultimap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Eq> FromIterator<(K, V)> for LinkedSetMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// A multimap holding an insertion-ordered **list** of values per key.
///
/// Keys iterate in the order they were first inserted; duplicate values are
/// kept.
///
/// # Example
///
/// ```
/// use tagstore::ListMultimap;
///
/// let mut map = ListMultimap::new();
/// map.put("b", 1);
/// map.put("a", 2);
/// map.put("b", 1);
///
/// assert_eq!(map.get("b"), &[1, 1]);
/// assert_eq!(map.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ListMultimap<K, V> {
    keys: KeyIndex<K>,
    lists: Vec<Vec<V>>,
    len: usize,
}

impl<K, V> ListMultimap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: KeyIndex::new(),
            lists: Vec::new(),
            len: 0,
        }
    }

    /// Total number of values across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Distinct keys in first-insertion order.
    #[must_use]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.keys.order.iter()
    }

    /// Each key with all of its values, keys in first-insertion order.
    #[must_use]
    pub fn groups(&self) -> impl DoubleEndedIterator<Item = (&K, &[V])> {
        self.keys
            .order
            .iter()
            .zip(self.lists.iter().map(Vec::as_slice))
    }

    /// Every `(key, value)` entry: keys in first-insertion order, then values in
    /// insertion order within each key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.groups()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    /// All values in entry order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.lists.iter().flatten()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.lists.clear();
        self.len = 0;
    }
}

impl<K: Hash + Eq + Clone, V> ListMultimap<K, V> {
    /// Append `value` to the list stored under `key`.
    pub fn put(&mut self, key: K, value: V) {
        let slot = self.keys.register(key);
        if slot == self.lists.len() {
            self.lists.push(Vec::new());
        }
        self.lists[slot].push(value);
        self.len += 1;
    }

    /// Values stored under `key` in insertion order. Empty for unknown keys.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> &[V]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.keys.slot(key) {
            Some(slot) => &self.lists[slot],
            None => &[],
        }
    }

    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.slot(key).is_some()
    }
}

impl<K, V> Default for ListMultimap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for ListMultimap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.groups().eq(other.groups())
    }
}

impl<K: Eq, V: Eq> Eq for ListMultimap<K, V> {}

impl<K: Hash + Eq + Clone, V> Extend<(K, V)> for ListMultimap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for ListMultimap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
