//! Tree pages and the in-page binary search.
//!
//! A page is addressed by a [`PageId`] handle into the tree's
//! [`PageArena`](super::arena::PageArena). Children are owned through the arena
//! slots; `parent` is a plain handle used only for navigation, with [`NONE`]
//! marking the root.

use super::ordering::Comparator;
use crate::BTreeError;
use core::cmp::Ordering;

/// Handle of a page inside its tree's arena.
pub type PageId = usize;

/// Sentinel handle for "no page" (the root's parent, a missing child).
pub const NONE: PageId = usize::MAX;

/// A node of the tree.
///
/// Invariants between operations:
/// - `keys` is strictly increasing under the tree's comparator.
/// - A leaf has no children; an internal page has exactly `keys.len() + 1`.
/// - A page holds at most `order` keys, and at least `order / 2` unless it is
///   the root.
///
/// The key and child buffers are reserved for `order + 1` keys and
/// `order + 2` children when the page is built, so the transient overflow that
/// precedes a split never reallocates.
#[derive(Debug)]
pub struct Page<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<PageId>,
    pub(crate) parent: PageId,
    // Counts pages, not keys: 1 + the sum over present children.
    pub(crate) subtree_pages: usize,
}

impl<K> Page<K> {
    /// Builds an empty leaf sized for a tree of the given order.
    pub(crate) fn try_with_order(order: usize) -> Result<Self, BTreeError> {
        let mut keys = Vec::new();
        keys.try_reserve_exact(order.saturating_add(1))?;
        let mut children = Vec::new();
        children.try_reserve_exact(order.saturating_add(2))?;
        Ok(Self {
            keys,
            children,
            parent: NONE,
            subtree_pages: 1,
        })
    }

    /// Empties the page for reuse, keeping its buffers.
    pub(crate) fn reset(&mut self) {
        self.keys.clear();
        self.children.clear();
        self.parent = NONE;
        self.subtree_pages = 1;
    }

    /// Returns `true` if the page has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the page has no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent == NONE
    }

    /// Number of keys held.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the page holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The page's keys in ascending order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child handles, empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[PageId] {
        &self.children
    }

    /// Handle of the parent page, `None` at the root.
    #[inline]
    pub fn parent(&self) -> Option<PageId> {
        (self.parent != NONE).then_some(self.parent)
    }

    /// Number of pages in the subtree rooted here, this page included.
    #[inline]
    pub fn subtree_pages(&self) -> usize {
        self.subtree_pages
    }

    /// Child at `idx`, or [`NONE`] for a leaf.
    #[inline]
    pub(crate) fn child(&self, idx: usize) -> PageId {
        self.children.get(idx).copied().unwrap_or(NONE)
    }

    /// Locates `target` among the page's keys.
    ///
    /// Returns `Ok(idx)` on an exact match and `Err(idx)` with the descent (or
    /// insertion) index otherwise.
    #[inline]
    pub(crate) fn locate<C: Comparator<K>>(&self, target: &K, cmp: &C) -> Result<usize, usize> {
        let idx = page_locate(&self.keys, target, 0, self.keys.len(), cmp);
        match self.keys.get(idx) {
            Some(key) if cmp.compare(target, key) == Ordering::Equal => Ok(idx),
            _ => Err(idx),
        }
    }
}

/// Lower-bound binary search over `keys[lo..hi]`.
///
/// Returns the smallest `i` in `lo..hi` such that `keys[i] >= target`, or
/// `hi` when every key in the range is smaller.
///
/// `hi` is exclusive. To search the inclusive range `lo..=last`, pass
/// `hi = last + 1`; the "every key is smaller" result is then `last + 1`.
///
/// # Panics
/// Panics if `lo > hi` or `hi > keys.len()`.
pub fn page_locate<K, C: Comparator<K>>(
    keys: &[K],
    target: &K,
    lo: usize,
    hi: usize,
    cmp: &C,
) -> usize {
    assert!(lo <= hi && hi <= keys.len(), "search range out of bounds");
    let (mut lo, mut hi) = (lo, hi);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cmp.compare(&keys[mid], target) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::btree::ordering::{FnComparator, NaturalOrder};

    #[test]
    fn test_page_locate_lower_bound() {
        let keys = [10, 20, 30, 40];
        let cmp = NaturalOrder;
        assert_eq!(page_locate(&keys, &5, 0, 4, &cmp), 0);
        assert_eq!(page_locate(&keys, &10, 0, 4, &cmp), 0);
        assert_eq!(page_locate(&keys, &25, 0, 4, &cmp), 2);
        assert_eq!(page_locate(&keys, &40, 0, 4, &cmp), 3);
        assert_eq!(page_locate(&keys, &99, 0, 4, &cmp), 4);
    }

    #[test]
    fn test_page_locate_subrange() {
        let keys = [1, 3, 5, 7, 9];
        let cmp = NaturalOrder;
        assert_eq!(page_locate(&keys, &0, 2, 4, &cmp), 2);
        assert_eq!(page_locate(&keys, &8, 2, 4, &cmp), 4);
        assert_eq!(page_locate(&keys, &8, 1, 1, &cmp), 1);
        assert_eq!(page_locate::<i32, _>(&[], &1, 0, 0, &cmp), 0);
    }

    #[test]
    fn test_page_locate_exclusive_upper_bound() {
        let keys = [2, 4, 6, 8];
        let cmp = NaturalOrder;
        // Inclusive range 0..=2 covers [2, 4, 6].
        let last = 2;
        assert_eq!(page_locate(&keys, &7, 0, last + 1, &cmp), last + 1);
        assert_eq!(page_locate(&keys, &6, 0, last + 1, &cmp), 2);
        // Key 8 lies outside the range and is never compared.
        assert_eq!(page_locate(&keys, &9, 0, last + 1, &cmp), 3);
    }

    #[test]
    fn test_locate_with_reversed_comparator() {
        let cmp = FnComparator(|a: &i32, b: &i32| b.cmp(a));
        let mut page = Page::try_with_order(4).unwrap();
        page.keys.extend([40, 30, 20]);
        assert_eq!(page.locate(&30, &cmp), Ok(1));
        assert_eq!(page.locate(&35, &cmp), Err(1));
        assert_eq!(page.locate(&10, &cmp), Err(3));
    }

    #[test]
    fn test_fresh_page_is_leaf_root() {
        let page: Page<u8> = Page::try_with_order(2).unwrap();
        assert!(page.is_leaf());
        assert!(page.is_root());
        assert!(page.is_empty());
        assert_eq!(page.parent(), None);
        assert_eq!(page.subtree_pages(), 1);
        assert!(page.keys.capacity() >= 3);
        assert!(page.children.capacity() >= 4);
    }
}
