// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Descending-order skip set over caller-owned items.
//!
//! An [`OrderedIndex`] keeps a set of `Rc<T>` items sorted by a key read out
//! of each item, largest key first. It allocates no nodes of its own: the
//! forward links live in the [`Links`] record each item embeds, under tags
//! that belong to this index alone. The same item can therefore be a member
//! of several indices at the same time.
//!
//! # Operations
//!
//! - `insert(item)`: O(log n) expected - rejects items already present
//! - `remove(item)`: O(log n) expected - returns whether it was unlinked
//! - `get(key)`: O(log n) expected - some member with exactly this key
//! - `fetch_last()`: O(log n) expected - removes the largest-key member
//! - `has(item)` / `prev(item)` / `is_empty()`: O(1)
//! - `iter()`: level-0 walk in non-increasing key order
//! - `clear()`: O(n) - strips every slot this index put on its members
//!
//! # Structure
//!
//! ```text
//! Level 2: HEAD ---------------------> 7 ---------------------> NULL
//! Level 1: HEAD ----------> 9 -------> 7 ----------> 3 -------> NULL
//! Level 0: HEAD -> 12 ----> 9 -> 9 --> 7 -> 5 -----> 3 -> 1 --> NULL
//! ```
//!
//! Equal keys sit next to each other. A newly inserted item lands in front
//! of any existing items with the same key.
//!
//! # Caller obligations
//!
//! The key of an item must not change while it is a member of any index;
//! remove it, change it, and insert it again. An item must not be dropped
//! while it is a member: links are weak, so the chain is cut at that point.
//! Neither is checked at runtime.

mod config;
mod height;
mod links;

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::rc::Weak;

use rand::SeedableRng;
use rand::rngs::StdRng;
use smallvec::SmallVec;
use smallvec::smallvec;

pub use config::ConfigError;
pub use config::DEFAULT_MAX_HEIGHT;
pub use config::DEFAULT_PROMOTE;
pub use config::Options;
pub use height::HeightSampler;
pub use links::LevelTag;
pub use links::Linked;
pub use links::Links;

/// Reads the ordering key out of an item.
pub type KeyFn<T, K> = fn(&T) -> &K;

/// Inline capacity for per-level vectors. Most indices never grow past it.
const INLINE_LEVELS: usize = 8;

/// A position during a walk: the sentinel or a member item.
enum Cursor<T> {
    Head,
    Item(Rc<T>),
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        match self {
            Cursor::Head => return Cursor::Head,
            Cursor::Item(item) => return Cursor::Item(Rc::clone(item)),
        }
    }
}

/// A skip set ordered by descending key.
pub struct OrderedIndex<T: Linked, K: Ord> {
    /// Selects the key field of an item.
    key: KeyFn<T, K>,
    /// Sentinel entry links, one per level. An empty `Weak` means unset.
    head: SmallVec<[Weak<T>; INLINE_LEVELS]>,
    /// Level roster. Its length is the current height of the structure.
    levels: SmallVec<[LevelTag; INLINE_LEVELS]>,
    /// Number of members.
    len: usize,
    sampler: HeightSampler,
    rng: StdRng,
}

impl<T: Linked, K: Ord> OrderedIndex<T, K> {
    /// Create an empty index with default options.
    pub fn new(key: KeyFn<T, K>) -> Self {
        return Self::from_parts(key, HeightSampler::default(), StdRng::from_entropy());
    }

    /// Create an empty index with explicit options.
    pub fn with_options(key: KeyFn<T, K>, options: Options) -> Result<Self, ConfigError> {
        let sampler = HeightSampler::new(options.promote, options.max_height)?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return Ok(Self::from_parts(key, sampler, rng));
    }

    fn from_parts(key: KeyFn<T, K>, sampler: HeightSampler, rng: StdRng) -> Self {
        return OrderedIndex {
            key,
            head: smallvec![Weak::new()],
            levels: smallvec![LevelTag::fresh()],
            len: 0,
            sampler,
            rng,
        };
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        return self.len;
    }

    /// Current number of levels. Always at least 1.
    pub fn height(&self) -> usize {
        return self.levels.len();
    }

    /// True iff the sentinel has no level-0 successor.
    pub fn is_empty(&self) -> bool {
        return self.head[0].strong_count() == 0;
    }

    /// True iff `item` is a member of this index.
    pub fn has(&self, item: &T) -> bool {
        return item.links().contains(self.levels[0]);
    }

    // --- Walk helpers ---

    fn next_at(&self, cursor: &Cursor<T>, level: usize) -> Option<Rc<T>> {
        match cursor {
            Cursor::Head => return self.head[level].upgrade(),
            Cursor::Item(item) => return item.links().next(self.levels[level]),
        }
    }

    fn set_next(&mut self, cursor: &Cursor<T>, level: usize, next: Option<&Rc<T>>) {
        match cursor {
            Cursor::Head => {
                self.head[level] = next.map(Rc::downgrade).unwrap_or_default();
            }
            Cursor::Item(item) => item.links().set(self.levels[level], next),
        }
    }

    /// Move right along `level` while the next key is strictly greater than `key`.
    fn advance(&self, mut cursor: Cursor<T>, level: usize, key: &K) -> Cursor<T> {
        while let Some(next) = self.next_at(&cursor, level) {
            if (self.key)(&next) <= key {
                break;
            }
            cursor = Cursor::Item(next);
        }
        return cursor;
    }

    /// Extend the roster until it has at least `height` levels.
    fn grow_to(&mut self, height: usize) {
        if height <= self.levels.len() {
            return;
        }
        let from = self.levels.len();
        while self.levels.len() < height {
            self.levels.push(LevelTag::fresh());
            self.head.push(Weak::new());
        }
        tracing::trace!(from, to = height, len = self.len, "ordered index grew");
    }

    // --- Core operations ---

    /// Insert `item`. Returns false, changing nothing, if it is already a member.
    pub fn insert(&mut self, item: &Rc<T>) -> bool {
        if self.has(item) {
            tracing::debug!(len = self.len, "rejected duplicate insert");
            return false;
        }

        let height = self.sampler.sample(&mut self.rng);
        self.grow_to(height);

        let key = (self.key)(item);
        let mut cursor = Cursor::Head;
        for level in (0..self.levels.len()).rev() {
            cursor = self.advance(cursor, level, key);
            if level < height {
                let after = self.next_at(&cursor, level);
                item.links().set(self.levels[level], after.as_ref());
                self.set_next(&cursor, level, Some(item));
            }
        }

        self.len += 1;
        self.check_invariants();
        return true;
    }

    /// Some member whose key equals `key`.
    ///
    /// With duplicates this is the first one the descending walk reaches:
    /// the front of the run, which is the most recently inserted of them.
    pub fn get(&self, key: &K) -> Option<Rc<T>> {
        let mut cursor = Cursor::Head;
        for level in (0..self.levels.len()).rev() {
            cursor = self.advance(cursor, level, key);
        }
        return self
            .next_at(&cursor, 0)
            .filter(|next| (self.key)(next) == key);
    }

    /// Remove `item`. Returns whether it was a member and has been unlinked.
    pub fn remove(&mut self, item: &Rc<T>) -> bool {
        if !self.has(item) {
            tracing::debug!(len = self.len, "rejected remove of non-member");
            return false;
        }

        let key = (self.key)(item);
        let mut found = false;
        let mut cursor = Cursor::Head;
        for level in (0..self.levels.len()).rev() {
            // The descent itself stops before the run of equal keys so that
            // lower levels can still reach the item wherever it sits in the run.
            cursor = self.advance(cursor, level, key);
            let tag = self.levels[level];
            if !item.links().contains(tag) {
                continue;
            }

            let mut scan = cursor.clone();
            while let Some(next) = self.next_at(&scan, level) {
                if Rc::ptr_eq(&next, item) {
                    let after = item.links().next(tag);
                    self.set_next(&scan, level, after.as_ref());
                    found |= level == 0;
                    break;
                }
                if (self.key)(&next) != key {
                    break;
                }
                scan = Cursor::Item(next);
            }
        }

        for &tag in &self.levels {
            item.links().unset(tag);
        }
        if found {
            self.len -= 1;
        }
        self.check_invariants();
        return found;
    }

    /// The member `fetch_last` would return, without removing it.
    pub fn peek_last(&self) -> Option<Rc<T>> {
        return self.head[0].upgrade();
    }

    /// Remove and return the member with the largest key.
    ///
    /// This is the first item of the descending order, despite the name.
    pub fn fetch_last(&mut self) -> Option<Rc<T>> {
        let first = self.peek_last()?;
        self.remove(&first);
        return Some(first);
    }

    /// The member after `item` in descending order: the next smaller or
    /// equal key. `None` for the last member or for non-members.
    pub fn prev(&self, item: &T) -> Option<Rc<T>> {
        return item.links().next(self.levels[0]);
    }

    /// Iterate members in non-increasing key order.
    pub fn iter(&self) -> Iter<'_, T> {
        return Iter {
            tag: self.levels[0],
            next: self.head[0].upgrade(),
            _index: PhantomData,
        };
    }

    /// Remove every member and reset to a single empty level.
    pub fn clear(&mut self) {
        let cleared = self.unlink_all();
        self.head = smallvec![Weak::new()];
        self.levels = smallvec![LevelTag::fresh()];
        self.len = 0;
        tracing::trace!(cleared, "ordered index cleared");
    }

    /// Strip this index's slots from every member. Returns how many were visited.
    fn unlink_all(&self) -> usize {
        let mut count = 0;
        let mut next = self.head[0].upgrade();
        while let Some(item) = next {
            next = item.links().next(self.levels[0]);
            for &tag in &self.levels {
                item.links().unset(tag);
            }
            count += 1;
        }
        return count;
    }

    // --- Invariant checking ---

    /// Panics if the structure is inconsistent. No-op in release builds.
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) {
        use rustc_hash::FxHashMap;

        // Invariant 1: level 0 is non-increasing and its length matches len
        let mut position: FxHashMap<*const T, usize> = FxHashMap::default();
        let mut previous: Option<Rc<T>> = None;
        let mut next = self.head[0].upgrade();
        while let Some(item) = next {
            if let Some(before) = &previous {
                assert!(
                    (self.key)(before) >= (self.key)(&item),
                    "INVARIANT VIOLATED: level 0 out of order at position {}",
                    position.len()
                );
            }
            position.insert(Rc::as_ptr(&item), position.len());
            next = item.links().next(self.levels[0]);
            previous = Some(item);
        }
        assert_eq!(
            position.len(),
            self.len,
            "INVARIANT VIOLATED: level 0 holds {} items but len()={}",
            position.len(),
            self.len
        );

        // Invariant 2: every higher level is a subsequence of level 0, and
        // each item on it carries slots for all lower levels
        for level in 1..self.levels.len() {
            let mut last = None;
            let mut next = self.head[level].upgrade();
            while let Some(item) = next {
                let at = position.get(&Rc::as_ptr(&item)).copied();
                assert!(at.is_some(), "INVARIANT VIOLATED: level {} item missing from level 0", level);
                assert!(
                    last < at,
                    "INVARIANT VIOLATED: level {} is not a subsequence of level 0",
                    level
                );
                for lower in 0..level {
                    assert!(
                        item.links().contains(self.levels[lower]),
                        "INVARIANT VIOLATED: item on level {} lacks level {} slot",
                        level,
                        lower
                    );
                }
                last = at;
                next = item.links().next(self.levels[level]);
            }
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    pub fn check_invariants(&self) {}
}

impl<T: Linked, K: Ord> Drop for OrderedIndex<T, K> {
    fn drop(&mut self) {
        self.unlink_all();
    }
}

impl<T: Linked, K: Ord> fmt::Debug for OrderedIndex<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("OrderedIndex")
            .field("len", &self.len)
            .field("height", &self.levels.len())
            .finish();
    }
}

/// Iterator over the members of an [`OrderedIndex`], largest key first.
///
/// Borrows the index, so it cannot be mutated mid-walk.
pub struct Iter<'a, T: Linked> {
    tag: LevelTag,
    next: Option<Rc<T>>,
    _index: PhantomData<&'a ()>,
}

impl<'a, T: Linked> Iterator for Iter<'a, T> {
    type Item = Rc<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.links().next(self.tag);
        return Some(current);
    }
}

impl<'a, T: Linked, K: Ord> IntoIterator for &'a OrderedIndex<T, K> {
    type Item = Rc<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: u32,
        rank: i64,
        links: Links<Row>,
    }

    impl Linked for Row {
        fn links(&self) -> &Links<Row> {
            return &self.links;
        }
    }

    fn rank(row: &Row) -> &i64 {
        return &row.rank;
    }

    fn row(id: u32, rank: i64) -> Rc<Row> {
        return Rc::new(Row { id, rank, links: Links::new() });
    }

    fn seeded(seed: u64) -> OrderedIndex<Row, i64> {
        return OrderedIndex::with_options(rank, Options::seeded(seed)).unwrap();
    }

    fn ranks(index: &OrderedIndex<Row, i64>) -> Vec<i64> {
        return index.iter().map(|r| r.rank).collect();
    }

    #[test]
    fn empty_index() {
        let mut index = seeded(0);
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.height(), 1);
        assert!(index.get(&3).is_none());
        assert!(index.fetch_last().is_none());
        assert!(index.peek_last().is_none());
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn insert_one() {
        let mut index = seeded(1);
        let a = row(0, 10);
        assert!(index.insert(&a));
        assert!(index.has(&a));
        assert!(!index.is_empty());
        assert_eq!(index.len(), 1);
        assert_eq!(ranks(&index), vec![10]);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut index = seeded(2);
        let a = row(0, 10);
        assert!(index.insert(&a));
        let slots = a.links.len();
        assert!(!index.insert(&a));
        assert_eq!(index.len(), 1);
        assert_eq!(a.links.len(), slots);
    }

    #[test]
    fn descending_order() {
        let mut index = seeded(3);
        let rows: Vec<_> = [4, 9, -2, 7, 0, 9].iter().enumerate().map(|(i, &r)| row(i as u32, r)).collect();
        for r in &rows {
            index.insert(r);
        }
        assert_eq!(ranks(&index), vec![9, 9, 7, 4, 0, -2]);
    }

    #[test]
    fn equal_keys_insert_in_front() {
        let mut index = seeded(4);
        let first = row(1, 5);
        let second = row(2, 5);
        index.insert(&first);
        index.insert(&second);
        let ids: Vec<u32> = index.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn get_finds_key() {
        let mut index = seeded(5);
        let rows: Vec<_> = (0..50).map(|i| row(i, i as i64 * 2)).collect();
        for r in &rows {
            index.insert(r);
        }
        for i in 0..50 {
            let found = index.get(&(i * 2)).unwrap();
            assert_eq!(found.rank, i * 2);
            assert!(index.get(&(i * 2 + 1)).is_none());
        }
        assert!(index.get(&-1).is_none());
        assert!(index.get(&1000).is_none());
    }

    #[test]
    fn remove_non_member() {
        let mut index = seeded(6);
        let a = row(0, 1);
        let b = row(1, 1);
        index.insert(&a);
        assert!(!index.remove(&b));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_restores_item() {
        let mut index = seeded(7);
        let a = row(0, 3);
        index.insert(&a);
        assert!(index.remove(&a));
        assert!(!index.has(&a));
        assert!(a.links.is_empty());
        assert!(index.is_empty());
        assert!(!index.remove(&a));
    }

    #[test]
    fn remove_from_run_of_duplicates() {
        // A run of equal keys with varied heights; every item must be removable
        // regardless of where it sits in the run.
        for seed in 0..20 {
            let mut index = OrderedIndex::with_options(
                rank,
                Options { promote: 0.5, seed: Some(seed), ..Options::default() },
            )
            .unwrap();
            let rows: Vec<_> = (0..30).map(|i| row(i, 8)).collect();
            for r in &rows {
                index.insert(r);
            }
            for r in rows.iter().rev().step_by(2).chain(rows.iter().step_by(2)) {
                if index.has(r) {
                    assert!(index.remove(r), "seed {} id {}", seed, r.id);
                }
            }
            assert!(index.is_empty());
            assert!(rows.iter().all(|r| r.links.is_empty()));
        }
    }

    #[test]
    fn fetch_last_takes_largest() {
        let mut index = seeded(8);
        let rows: Vec<_> = [3, 8, 1].iter().enumerate().map(|(i, &r)| row(i as u32, r)).collect();
        for r in &rows {
            index.insert(r);
        }
        assert_eq!(index.peek_last().unwrap().rank, 8);
        assert_eq!(index.fetch_last().unwrap().rank, 8);
        assert_eq!(index.fetch_last().unwrap().rank, 3);
        assert_eq!(index.fetch_last().unwrap().rank, 1);
        assert!(index.fetch_last().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn prev_walks_down() {
        let mut index = seeded(9);
        let high = row(0, 30);
        let mid = row(1, 20);
        let low = row(2, 10);
        index.insert(&mid);
        index.insert(&high);
        index.insert(&low);
        assert!(Rc::ptr_eq(&index.prev(&high).unwrap(), &mid));
        assert!(Rc::ptr_eq(&index.prev(&mid).unwrap(), &low));
        assert!(index.prev(&low).is_none());
    }

    #[test]
    fn prev_of_non_member_is_none() {
        let index = seeded(10);
        let a = row(0, 1);
        assert!(index.prev(&a).is_none());
    }

    #[test]
    fn clear_unlinks_everything() {
        let mut index = seeded(11);
        let rows: Vec<_> = (0..100).map(|i| row(i, (i % 7) as i64)).collect();
        for r in &rows {
            index.insert(r);
        }
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.height(), 1);
        for r in &rows {
            assert!(!index.has(r));
            assert!(r.links.is_empty());
        }

        // Usable again afterwards.
        index.insert(&rows[0]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn drop_unlinks_members() {
        let a = row(0, 1);
        {
            let mut index = seeded(12);
            index.insert(&a);
            assert!(!a.links.is_empty());
        }
        assert!(a.links.is_empty());
    }

    #[test]
    fn two_indices_share_items() {
        fn id(row: &Row) -> &u32 {
            return &row.id;
        }

        let mut by_rank = seeded(13);
        let mut by_id: OrderedIndex<Row, u32> =
            OrderedIndex::with_options(id, Options::seeded(14)).unwrap();
        let rows: Vec<_> = (0..20).map(|i| row(i, 100 - i as i64 * 3)).collect();
        for r in &rows {
            by_rank.insert(r);
            by_id.insert(r);
        }

        let ids: Vec<u32> = by_id.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..20).rev().collect::<Vec<u32>>());

        by_rank.remove(&rows[5]);
        assert!(!by_rank.has(&rows[5]));
        assert!(by_id.has(&rows[5]));
        assert_eq!(by_id.len(), 20);
        by_id.check_invariants();
    }

    #[test]
    fn roster_grows_with_tall_items() {
        let mut index = OrderedIndex::with_options(
            rank,
            Options { promote: 0.9, max_height: 6, seed: Some(15) },
        )
        .unwrap();
        let rows: Vec<_> = (0..40).map(|i| row(i, i as i64)).collect();
        for r in &rows {
            index.insert(r);
        }
        assert!(index.height() > 1);
        assert!(index.height() <= 6);
    }

    #[test]
    fn invalid_options_rejected() {
        let result = OrderedIndex::with_options(rank, Options { max_height: 0, ..Options::default() });
        assert_eq!(result.unwrap_err(), ConfigError::ZeroMaxHeight);
    }

    #[test]
    fn string_keys() {
        struct Tag {
            name: String,
            links: Links<Tag>,
        }
        impl Linked for Tag {
            fn links(&self) -> &Links<Tag> {
                return &self.links;
            }
        }
        fn name(tag: &Tag) -> &String {
            return &tag.name;
        }

        let mut index = OrderedIndex::new(name);
        let tags: Vec<_> = ["pear", "apple", "quince", "fig"]
            .iter()
            .map(|n| Rc::new(Tag { name: n.to_string(), links: Links::new() }))
            .collect();
        for t in &tags {
            index.insert(t);
        }
        let names: Vec<String> = index.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["quince", "pear", "fig", "apple"]);
        assert_eq!(index.get(&"fig".to_string()).unwrap().name, "fig");
    }

    #[test]
    fn debug_output() {
        let index = seeded(16);
        assert_eq!(format!("{:?}", index), "OrderedIndex { len: 0, height: 1 }");
    }

    #[test]
    fn stress_against_model() {
        use rand::Rng;

        let mut rng = StdRng::seed_from_u64(99);
        let mut index = seeded(17);
        let rows: Vec<_> = (0..300).map(|i| row(i, rng.gen_range(0..40))).collect();
        let mut members = vec![false; rows.len()];

        for _ in 0..3000 {
            let i = rng.gen_range(0..rows.len());
            if rng.gen_bool(0.6) {
                assert_eq!(index.insert(&rows[i]), !members[i]);
                members[i] = true;
            } else {
                assert_eq!(index.remove(&rows[i]), members[i]);
                members[i] = false;
            }
        }

        let mut expected: Vec<i64> = rows
            .iter()
            .zip(&members)
            .filter(|(_, m)| **m)
            .map(|(r, _)| r.rank)
            .collect();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(ranks(&index), expected);
        assert_eq!(index.len(), expected.len());
    }
}
