use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::digest::djb2;

/// Number of buckets allocated by the first insert into a table that was not
/// given an explicit initial capacity.
pub const INITIAL_CAPACITY: usize = 256;

/// Maps a digest to its home bucket index.
///
/// Capacity is always a power of two, so masking with `capacity - 1` produces
/// the same index as reducing the digest modulo the capacity.
#[inline(always)]
fn home_index(digest: u64, mask: usize) -> usize {
    digest as usize & mask
}

/// An occupied slot: an owned copy of the key's bytes plus the caller's
/// value. Empty slots are `None`.
struct Bucket<V> {
    key: Box<[u8]>,
    value: V,
}

/// The probe sequence shared by insertion and lookup.
///
/// Each step advances the current index by the step counter itself:
/// `index = (index + i) & mask` for `i = 0, 1, 2, ...`. The first advance has
/// stride 0, so the home bucket is examined twice; after that the offsets
/// from home grow as the triangular numbers, which over a power-of-two
/// capacity cover every residue. `capacity + 1` steps therefore visit every
/// bucket.
struct Probe {
    index: usize,
    step: usize,
    mask: usize,
}

impl Probe {
    fn new(home: usize, mask: usize) -> Self {
        Probe {
            index: home,
            step: 0,
            mask,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.index;
        self.index = (self.index + self.step) & self.mask;
        self.step += 1;
        Some(current)
    }
}

/// Walks the probe sequence from the key's home bucket and returns the first
/// free slot.
///
/// Extension runs before the table can fill, so a full probe cycle without a
/// free bucket is a broken invariant, not a recoverable condition.
fn free_slot<V>(buckets: &[Option<Bucket<V>>], digest: u64) -> usize {
    let mask = buckets.len() - 1;
    Probe::new(home_index(digest, mask), mask)
        .take(buckets.len() + 1)
        .find(|&index| buckets[index].is_none())
        .expect("no free bucket after a full probe cycle")
}

/// An open-addressing hash table keyed by raw bytes.
///
/// `HashTable<V>` maps byte-sequence keys to values of type `V`. Keys are
/// hashed with the [djb2 digest](crate::digest::djb2) and collisions are
/// resolved in the bucket array itself by an increasing-stride probe. The
/// table owns a copy of every key's bytes and compares keys by content
/// during lookup, so callers never have to keep key storage alive.
///
/// Values are moved into the table. To store references to caller-owned
/// data, instantiate `V` as `&T` (the borrow checker enforces that the data
/// outlives the table) or as a shared-ownership type such as `Rc<T>`.
///
/// The table starts at capacity zero and allocates nothing until the first
/// insert. It doubles its capacity whenever an insert finds it full, so the
/// load factor never reaches 1.0 at rest. Entries are never removed or
/// overwritten.
///
/// ## Example
///
/// ```rust
/// # use tri_hash::HashTable;
/// #
/// let mut table: HashTable<i32> = HashTable::new();
/// table.insert(b"one", 1);
/// table.insert(&2.0f32.to_ne_bytes(), 2);
///
/// assert_eq!(table.get(b"one"), Some(&1));
/// assert_eq!(table.get(&2.0f32.to_ne_bytes()), Some(&2));
/// assert_eq!(table.get(b"three"), None);
/// ```
pub struct HashTable<V> {
    buckets: Vec<Option<Bucket<V>>>,
    populated: usize,
    initial_capacity: usize,
}

impl<V: Debug> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table.
    ///
    /// No memory is allocated until the first insert, which sizes the bucket
    /// array to [`INITIAL_CAPACITY`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tri_hash::HashTable;
    /// #
    /// let table: HashTable<i32> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_initial_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty table whose first allocation will hold `capacity`
    /// buckets.
    ///
    /// The value is rounded up to the next power of two, since bucket
    /// placement masks the digest and masking is only equivalent to a modulo
    /// for power-of-two capacities. Like [`new`](Self::new), the table
    /// allocates nothing until the first insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tri_hash::HashTable;
    /// #
    /// let mut table: HashTable<i32> = HashTable::with_initial_capacity(6);
    /// assert_eq!(table.capacity(), 0);
    ///
    /// table.insert(b"first", 1);
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn with_initial_capacity(capacity: usize) -> Self {
        Self {
            buckets: Vec::new(),
            populated: 0,
            initial_capacity: capacity.next_power_of_two(),
        }
    }

    /// Returns the number of entries in the table.
    ///
    /// Duplicate-key inserts each count as an entry.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the current size of the bucket array.
    ///
    /// This is zero for a table that has never been inserted into, and a
    /// power of two otherwise.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of occupied buckets to capacity, or `0.0` for an
    /// unallocated table.
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.populated as f64 / self.buckets.len() as f64
        }
    }

    /// Inserts a key-value pair.
    ///
    /// The table stores its own copy of `key`'s bytes. If the bucket array
    /// is full (or not yet allocated) it is extended first, which re-homes
    /// every existing entry.
    ///
    /// Existing keys are not checked: inserting a key that is already
    /// present occupies an additional bucket rather than overwriting.
    /// [`get`](Self::get) returns whichever duplicate sits earliest in the
    /// probe sequence — the first one inserted, until an extension re-homes
    /// entries in bucket order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tri_hash::HashTable;
    /// #
    /// let mut table: HashTable<&str> = HashTable::new();
    /// table.insert(b"greeting", "hello");
    ///
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.get(b"greeting"), Some(&"hello"));
    /// ```
    pub fn insert(&mut self, key: &[u8], value: V) {
        if self.populated >= self.buckets.len() {
            self.extend();
        }

        let index = free_slot(&self.buckets, djb2(key));
        self.buckets[index] = Some(Bucket {
            key: key.into(),
            value,
        });
        self.populated += 1;
    }

    /// Returns a reference to the value stored for `key`, or `None` if the
    /// key was never inserted.
    ///
    /// Keys compare by byte content, never by storage identity: any slice
    /// with the same bytes as the inserted key matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tri_hash::HashTable;
    /// #
    /// let mut table: HashTable<u32> = HashTable::new();
    /// let key = String::from("John Doe");
    /// table.insert(key.as_bytes(), 27);
    /// drop(key);
    ///
    /// // A separately built key with the same content still matches.
    /// assert_eq!(table.get("John Doe".as_bytes()), Some(&27));
    /// assert_eq!(table.get(b"Jane Doe"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        let index = self.find_index(key)?;
        self.buckets[index].as_ref().map(|bucket| &bucket.value)
    }

    /// Returns a mutable reference to the value stored for `key`, or `None`
    /// if the key was never inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tri_hash::HashTable;
    /// #
    /// let mut table: HashTable<u32> = HashTable::new();
    /// table.insert(b"counter", 0);
    ///
    /// if let Some(count) = table.get_mut(b"counter") {
    ///     *count += 1;
    /// }
    /// assert_eq!(table.get(b"counter"), Some(&1));
    /// ```
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.buckets[index].as_mut().map(|bucket| &mut bucket.value)
    }

    /// Returns `true` if an entry with this key content exists.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.find_index(key).is_some()
    }

    /// Locates the bucket holding `key`, probing with the same sequence as
    /// insertion.
    ///
    /// An empty home bucket means the key was never inserted. Empty buckets
    /// further along the sequence do not end the scan; only key equality
    /// does, for at most one full cycle.
    fn find_index(&self, key: &[u8]) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }

        let mask = self.buckets.len() - 1;
        let home = home_index(djb2(key), mask);
        if self.buckets[home].is_none() {
            return None;
        }

        Probe::new(home, mask)
            .take(self.buckets.len() + 1)
            .find(|&index| {
                self.buckets[index]
                    .as_ref()
                    .is_some_and(|bucket| bucket.key.as_ref() == key)
            })
    }

    /// Grows the bucket array and re-homes every occupied bucket.
    ///
    /// The first call sizes the array to the configured initial capacity;
    /// later calls double it. Re-insertion uses the same probe as
    /// [`insert`](Self::insert) and can never trigger a further extension,
    /// because the new capacity is at least twice the number of occupied
    /// buckets.
    #[cold]
    fn extend(&mut self) {
        let new_capacity = if self.buckets.is_empty() {
            self.initial_capacity
        } else {
            self.buckets.len() * 2
        };

        let mut buckets: Vec<Option<Bucket<V>>> = Vec::with_capacity(new_capacity);
        buckets.resize_with(new_capacity, || None);

        for bucket in core::mem::replace(&mut self.buckets, buckets)
            .into_iter()
            .flatten()
        {
            let index = free_slot(&self.buckets, djb2(&bucket.key));
            self.buckets[index] = Some(bucket);
        }
    }

    /// Returns an iterator over the table's entries as `(key bytes, value)`
    /// pairs.
    ///
    /// Entries are yielded in bucket order, which is neither insertion order
    /// nor stable across extensions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tri_hash::HashTable;
    /// #
    /// let mut table: HashTable<u32> = HashTable::new();
    /// table.insert(b"a", 1);
    /// table.insert(b"b", 2);
    ///
    /// let mut total = 0;
    /// for (_key, value) in table.iter() {
    ///     total += value;
    /// }
    /// assert_eq!(total, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.buckets.iter(),
        }
    }

    /// Computes probe-length statistics by re-deriving every occupied
    /// bucket's home index and walking the probe sequence back to it.
    ///
    /// Nothing is tracked during normal operation; this scans the whole
    /// bucket array. It doubles as an internal-consistency check: an
    /// occupied bucket the probe sequence cannot reach would make lookups
    /// miss stored keys, so that case panics.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_stats(&self) -> ProbeStats {
        let mut histogram = Vec::new();
        let mut longest = 0;

        if !self.buckets.is_empty() {
            let mask = self.buckets.len() - 1;
            for (index, slot) in self.buckets.iter().enumerate() {
                let Some(bucket) = slot else { continue };
                let home = home_index(djb2(&bucket.key), mask);
                let length = Probe::new(home, mask)
                    .take(self.buckets.len() + 1)
                    .position(|probed| probed == index)
                    .expect("occupied bucket unreachable from its home index");

                if length >= histogram.len() {
                    histogram.resize(length + 1, 0);
                }
                histogram[length] += 1;
                longest = longest.max(length);
            }
        }

        ProbeStats {
            populated: self.populated,
            capacity: self.buckets.len(),
            load_factor: self.load_factor(),
            histogram,
            longest,
        }
    }
}

/// Iterator over the `(key, value)` pairs of a [`HashTable`].
///
/// Created by [`HashTable::iter`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Option<Bucket<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots
            .find_map(|slot| slot.as_ref().map(|b| (b.key.as_ref(), &b.value)))
    }
}

/// Probe-length statistics for the current table state.
///
/// Built on demand by [`HashTable::probe_stats`]. A probe length of `n`
/// means a lookup for that key examines `n` buckets beyond its first check
/// of the home bucket.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct ProbeStats {
    /// Number of occupied buckets.
    pub populated: usize,
    /// Current size of the bucket array.
    pub capacity: usize,
    /// Occupied buckets divided by capacity.
    pub load_factor: f64,
    /// `histogram[n]` counts entries found `n` probe steps from home.
    pub histogram: Vec<usize>,
    /// Longest probe in the table.
    pub longest: usize,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeStats {
    /// Pretty-prints the statistics to stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!(
            "probe stats: {}/{} occupied ({:.2}% load factor), longest probe {}",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.longest
        );
        for (length, count) in self.histogram.iter().enumerate() {
            if *count > 0 {
                println!("  {length:>4} steps: {count}");
            }
        }
    }
}
