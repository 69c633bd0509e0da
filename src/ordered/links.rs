// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Linkage storage carried by items tracked in an [`OrderedIndex`].
//!
//! Each item embeds a [`Links`] record: a small map from [`LevelTag`] to the
//! next item at that level. Every level of every index gets its own tag, so
//! one item can sit in several indices at once and each index only ever
//! touches the slots under its own tags.
//!
//! ```text
//! item.links:  { L7 -> next@0, L8 -> next@1 }   (index A, height 2)
//!              { L12 -> next@0 }                (index B, height 1)
//! ```
//!
//! [`OrderedIndex`]: super::OrderedIndex

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::rc::Weak;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rustc_hash::FxHashMap;

/// Source of level tags. Shared by every index in the process.
static NEXT_TAG: AtomicU64 = AtomicU64::new(1);

/// Identifies one level of one index instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelTag(u64);

impl LevelTag {
    /// Allocate a tag no other level of any index has used.
    pub fn fresh() -> LevelTag {
        return LevelTag(NEXT_TAG.fetch_add(1, Ordering::Relaxed));
    }
}

/// Items that can be tracked by an ordered index.
///
/// The implementation just hands out a reference to an embedded [`Links`]
/// field. The index owns what is stored in it; callers should treat it as
/// opaque.
pub trait Linked: Sized {
    fn links(&self) -> &Links<Self>;
}

/// Per-item linkage slots, keyed by level tag.
///
/// A slot that exists but has no successor holds an empty `Weak`. Links
/// never keep the next item alive: the caller owns every item.
pub struct Links<T> {
    slots: RefCell<FxHashMap<LevelTag, Weak<T>>>,
}

impl<T> Links<T> {
    /// Create an empty linkage record.
    pub fn new() -> Links<T> {
        return Links {
            slots: RefCell::new(FxHashMap::default()),
        };
    }

    /// Number of slots held across all indices.
    pub fn len(&self) -> usize {
        return self.slots.borrow().len();
    }

    /// True if no index currently tracks this item.
    pub fn is_empty(&self) -> bool {
        return self.slots.borrow().is_empty();
    }

    #[inline]
    pub(crate) fn contains(&self, tag: LevelTag) -> bool {
        return self.slots.borrow().contains_key(&tag);
    }

    /// The successor stored under `tag`, if the slot exists and is set.
    #[inline]
    pub(crate) fn next(&self, tag: LevelTag) -> Option<Rc<T>> {
        return self.slots.borrow().get(&tag).and_then(Weak::upgrade);
    }

    /// Create or overwrite the slot under `tag`.
    #[inline]
    pub(crate) fn set(&self, tag: LevelTag, next: Option<&Rc<T>>) {
        let weak = next.map(Rc::downgrade).unwrap_or_default();
        self.slots.borrow_mut().insert(tag, weak);
    }

    /// Delete the slot under `tag`. Returns whether it existed.
    #[inline]
    pub(crate) fn unset(&self, tag: LevelTag) -> bool {
        return self.slots.borrow_mut().remove(&tag).is_some();
    }
}

impl<T> Default for Links<T> {
    fn default() -> Self {
        return Self::new();
    }
}

/// Cloning an item does not clone its memberships.
impl<T> Clone for Links<T> {
    fn clone(&self) -> Self {
        return Self::new();
    }
}

impl<T> fmt::Debug for Links<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_struct("Links").field("slots", &self.len()).finish();
    }
}
