use {
    super::{
        hash::replica_positions,
        range::{merge_ranges_sorted, KeyRange},
        Crc32Hasher,
        Error,
        Result,
        RingHasher,
    },
    parking_lot::RwLock,
    std::{collections::HashMap, sync::Arc},
    tracing::debug,
};

/// Number of virtual nodes per member unless configured otherwise.
pub const DEFAULT_REPLICAS: usize = 20;

/// A member of the ring.
///
/// The member occupies `replicas` positions on the ring. Positions are not
/// stored with the member, they are recomputed from the key whenever needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<V> {
    key: String,
    value: V,
    replicas: usize,
}

impl<V> Member<V> {
    /// Returns the member's key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the member's value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the number of virtual nodes the member was added with.
    #[inline]
    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

/// Ring state. Only ever accessed under the ring's lock.
struct Inner<V> {
    /// Ring position -> key of the member owning it.
    circle: HashMap<u32, String>,
    members: HashMap<String, Arc<Member<V>>>,
    /// Keys of `circle`, ascending. Rebuilt after every structural change.
    sorted: Vec<u32>,
}

impl<V> Inner<V> {
    fn new() -> Self {
        Self {
            circle: HashMap::new(),
            members: HashMap::new(),
            sorted: Vec::new(),
        }
    }

    /// Registers the member without rebuilding the sorted index.
    ///
    /// An existing member with the same key is torn down first.
    fn insert<H: RingHasher>(&mut self, hasher: &H, key: String, value: V, replicas: usize) {
        self.evict(hasher, &key);

        for position in replica_positions(hasher, &key, replicas) {
            // Colliding positions go to the last writer.
            self.circle.insert(position, key.clone());
        }

        let member = Member {
            key: key.clone(),
            value,
            replicas,
        };
        self.members.insert(key, Arc::new(member));
    }

    /// Unregisters the member without rebuilding the sorted index. Returns
    /// `false` if there was no such member.
    fn evict<H: RingHasher>(&mut self, hasher: &H, key: &str) -> bool {
        let Some(member) = self.members.remove(key) else {
            return false;
        };

        for position in replica_positions(hasher, key, member.replicas) {
            // Leave positions which a colliding member has since taken over.
            if self.circle.get(&position).is_some_and(|owner| owner == key) {
                self.circle.remove(&position);
            }
        }

        true
    }

    fn rebuild(&mut self) {
        self.sorted.clear();
        self.sorted.extend(self.circle.keys().copied());
        self.sorted.sort_unstable();
    }

    fn owner(&self, position: u32) -> Option<&Arc<Member<V>>> {
        self.circle
            .get(&position)
            .and_then(|key| self.members.get(key))
    }

    /// Index of the first position strictly greater than `position`, wrapping
    /// to zero past the end of the ring.
    fn successor(&self, position: u32) -> usize {
        let index = self.sorted.partition_point(|&p| p <= position);

        if index == self.sorted.len() {
            0
        } else {
            index
        }
    }

    /// Owners of every position, going clockwise from the successor of
    /// `position`, one lap around the ring.
    fn walk(&self, position: u32) -> impl Iterator<Item = &Arc<Member<V>>> + '_ {
        let (tail, head) = self.sorted.split_at(self.successor(position));

        head.iter()
            .chain(tail)
            .filter_map(move |&position| self.owner(position))
    }

    /// Up to `n` distinct members, closest first.
    fn distinct(&self, position: u32, n: usize) -> Vec<Arc<Member<V>>> {
        let n = n.min(self.members.len());
        let mut found: Vec<Arc<Member<V>>> = Vec::with_capacity(n);

        if n == 0 {
            return found;
        }

        for member in self.walk(position) {
            if !found.iter().any(|m| Arc::ptr_eq(m, member)) {
                found.push(member.clone());

                if found.len() == n {
                    break;
                }
            }
        }

        found
    }
}

/// Consistent hashing ring.
///
/// Every member is placed on the ring as a number of virtual nodes, and a
/// lookup key belongs to the member owning the first virtual node clockwise
/// from the key's own position. Adding or removing a member only remaps the
/// keys adjacent to its virtual nodes.
///
/// All methods take `&self`: mutations hold the write lock for their whole
/// duration, lookups hold the read lock. Readers thus always see a ring state
/// committed by a finished mutation.
pub struct Ring<V, H: RingHasher = Crc32Hasher> {
    hasher: H,
    replicas: usize,
    inner: RwLock<Inner<V>>,
}

impl<V> Default for Ring<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Ring<V> {
    /// Create an empty ring using [`DEFAULT_REPLICAS`] virtual nodes per
    /// member.
    pub fn new() -> Self {
        Self::with_replicas(DEFAULT_REPLICAS)
    }

    /// Create an empty ring with the given default number of virtual nodes
    /// per member.
    pub fn with_replicas(replicas: usize) -> Self {
        Self::from_parts(replicas, Crc32Hasher)
    }
}

impl<V, H: RingHasher> Ring<V, H> {
    /// Create an empty ring which places keys with the given hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self::from_parts(DEFAULT_REPLICAS, hasher)
    }

    pub(crate) fn from_parts(replicas: usize, hasher: H) -> Self {
        Self {
            hasher,
            replicas,
            inner: RwLock::new(Inner::new()),
        }
    }

    /// Default number of virtual nodes per member.
    #[inline]
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.inner.read().members.len()
    }

    /// Returns true if the ring has no members.
    pub fn is_empty(&self) -> bool {
        self.inner.read().members.is_empty()
    }

    /// Number of occupied positions on the ring.
    ///
    /// This is the sum of all members' replicas, minus positions lost to hash
    /// collisions.
    pub fn vnode_count(&self) -> usize {
        self.inner.read().sorted.len()
    }

    /// Position of `key` on the ring.
    #[inline]
    pub fn position(&self, key: impl AsRef<[u8]>) -> u32 {
        self.hasher.hash(key.as_ref())
    }

    /// Add a member with the default number of virtual nodes.
    pub fn add(&self, key: impl Into<String>, value: V) {
        self.add_with_replicas(key, value, self.replicas)
    }

    /// Add a member with `replicas` virtual nodes.
    ///
    /// Adding a key which is already a member replaces it: its old virtual
    /// nodes are removed before the new ones are placed. A member with zero
    /// replicas is kept but never returned by lookups.
    pub fn add_with_replicas(&self, key: impl Into<String>, value: V, replicas: usize) {
        let key = key.into();
        let mut inner = self.inner.write();

        debug!(%key, replicas, "adding member to ring");
        inner.insert(&self.hasher, key, value, replicas);
        inner.rebuild();
    }

    /// Remove a member. Does nothing if `key` is not a member.
    pub fn remove(&self, key: &str) {
        let mut inner = self.inner.write();

        if inner.evict(&self.hasher, key) {
            inner.rebuild();
            debug!(%key, "removed member from ring");
        }
    }

    /// Replace all members with `members`, each given the default number of
    /// virtual nodes.
    pub fn set<K, I>(&self, members: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inner = self.inner.write();

        inner.circle.clear();
        inner.members.clear();
        for (key, value) in members {
            inner.insert(&self.hasher, key.into(), value, self.replicas);
        }
        inner.rebuild();

        debug!(members = inner.members.len(), "replaced ring members");
    }

    /// Returns the member with the given key.
    pub fn member(&self, key: &str) -> Option<Arc<Member<V>>> {
        self.inner.read().members.get(key).cloned()
    }

    /// Returns true if `key` is a member.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().members.contains_key(key)
    }

    /// Snapshot of all members' values by key.
    pub fn members(&self) -> HashMap<String, V>
    where
        V: Clone,
    {
        self.inner
            .read()
            .members
            .iter()
            .map(|(key, member)| (key.clone(), member.value.clone()))
            .collect()
    }

    /// Returns the member responsible for `key`, or an error if the ring is
    /// empty.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Arc<Member<V>>> {
        let position = self.position(key);
        let inner = self.inner.read();
        let member = inner.walk(position).next().cloned();

        member.ok_or(Error::EmptyRing)
    }

    /// Returns the member responsible for `key`, and the next distinct member
    /// clockwise from it. The second member is `None` if the ring only has a
    /// single member.
    pub fn get_two(
        &self,
        key: impl AsRef<[u8]>,
    ) -> Result<(Arc<Member<V>>, Option<Arc<Member<V>>>)> {
        let mut found = self.get_n(key, 2)?.into_iter();
        let first = found.next().ok_or(Error::EmptyRing)?;

        Ok((first, found.next()))
    }

    /// Returns up to `n` distinct members for `key`, closest first. The first
    /// member is the one [`get()`](Self::get) returns.
    ///
    /// Fewer than `n` members are returned if the ring doesn't have enough.
    pub fn get_n(&self, key: impl AsRef<[u8]>, n: usize) -> Result<Vec<Arc<Member<V>>>> {
        let position = self.position(key);
        let inner = self.inner.read();

        if inner.sorted.is_empty() {
            return Err(Error::EmptyRing);
        }

        Ok(inner.distinct(position, n))
    }

    /// Returns the arcs of the ring whose keys are routed to the member, or
    /// `None` if `key` is not a member.
    ///
    /// Arcs are half-open (`[start, end)`) and in ascending order, with
    /// adjacent arcs joined. An arc with `start == end` is the whole ring.
    pub fn ranges(&self, key: &str) -> Option<Vec<KeyRange<u32>>> {
        let inner = self.inner.read();
        let member = inner.members.get(key)?;
        let sorted = &inner.sorted;

        // A position owns the keys between its predecessor and itself. Going
        // from index 1 and finishing with the wrapping arc of index 0 yields
        // arcs sorted by start.
        let arcs = (1..=sorted.len())
            .map(|i| (sorted[i - 1], sorted[i % sorted.len()]))
            .filter(|(_, end)| inner.owner(*end).is_some_and(|m| Arc::ptr_eq(m, member)))
            .map(|(start, end)| KeyRange::new(start, end));

        let mut ranges = merge_ranges_sorted(arcs).collect::<Vec<_>>();

        // Join the arc through zero with the one continuing it at the bottom.
        if ranges.len() > 1 {
            let last = ranges[ranges.len() - 1];

            if last.is_wrapping() && last.end == ranges[0].start {
                ranges[0].start = last.start;
                ranges.pop();
            }
        }

        Some(ranges)
    }
}
