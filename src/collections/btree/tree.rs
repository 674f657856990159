//! `BTree`, the tree handle.
//!
//! Owns the page arena, the root handle, the order, and the comparator and
//! key-destructor strategies. The operations live in sibling modules as
//! further `impl` blocks on this type.

use super::arena::PageArena;
use super::ordering::{Comparator, DropKey, FnComparator, KeyDestructor, NaturalOrder};
use super::page::{Page, PageId, NONE};
use crate::collections::stack::{Stack, Worklist};
use crate::trace::trace_event;
use crate::BTreeError;
use core::cmp::Ordering;
use core::fmt;

/// Order used by [`BTree::default`].
pub const DEFAULT_ORDER: usize = 6;

/// Location of one key: the page holding it and its index within that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Page holding the key.
    pub page: PageId,
    /// Index of the key within the page.
    pub index: usize,
}

/// Structural event counters, cumulative over the tree's lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub(crate) splits: u64,
    pub(crate) root_splits: u64,
    pub(crate) catenations: u64,
    pub(crate) borrows: u64,
    pub(crate) root_collapses: u64,
}

/// A balanced multiway search tree storing keys of type `K`.
///
/// Every non-root page holds between `order / 2` and `order` keys, and all
/// leaves sit at the same depth. The key is the stored item: callers that need
/// a payload bundle it into `K` and order it with a [`Comparator`] that looks
/// only at the key part.
///
/// `D` receives every key the tree stops owning through `delete`, `clear` or
/// teardown. The default [`DropKey`] simply drops them.
///
/// # Example
///
/// ```rust
/// use pagetree::BTree;
///
/// let mut tree = BTree::new(2).unwrap();
/// for k in 1..=7 {
///     tree.insert(k).unwrap();
/// }
/// assert_eq!(tree.height(), 2);
/// assert!(tree.contains(&5));
/// assert!(tree.delete(&5));
/// assert!(!tree.contains(&5));
/// ```
pub struct BTree<K, C = NaturalOrder, D = DropKey>
where
    D: KeyDestructor<K>,
{
    pub(crate) arena: PageArena<K>,
    pub(crate) root: PageId,
    pub(crate) order: usize,
    pub(crate) len: usize,
    // Mirrors the root's `subtree_pages`.
    pub(crate) size: usize,
    pub(crate) compare: C,
    pub(crate) destroy_key: D,
    pub(crate) counters: Counters,
}

impl<K: Ord> BTree<K> {
    /// Creates an empty tree ordered by `K: Ord`.
    ///
    /// # Errors
    /// Returns [`BTreeError::InvalidOrder`] if `order` is odd or below 2, and
    /// [`BTreeError::AllocFailed`] if a page of that order cannot be allocated.
    pub fn new(order: usize) -> Result<Self, BTreeError> {
        Self::with_parts(order, NaturalOrder, DropKey)
    }
}

impl<K, F> BTree<K, FnComparator<F>>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty tree ordered by `compare`.
    ///
    /// # Errors
    /// Returns [`BTreeError::InvalidOrder`] if `order` is odd or below 2, and
    /// [`BTreeError::AllocFailed`] if a page of that order cannot be allocated.
    pub fn with_comparator(order: usize, compare: F) -> Result<Self, BTreeError> {
        Self::with_parts(order, FnComparator(compare), DropKey)
    }
}

impl<K, C, D> BTree<K, C, D>
where
    C: Comparator<K>,
    D: KeyDestructor<K>,
{
    /// Creates an empty tree from explicit ordering and release strategies.
    ///
    /// # Errors
    /// Returns [`BTreeError::InvalidOrder`] if `order` is odd or below 2, and
    /// [`BTreeError::AllocFailed`] if a page of that order cannot be allocated.
    /// No tree is handed out in either case.
    pub fn with_parts(order: usize, compare: C, destroy_key: D) -> Result<Self, BTreeError> {
        if order < 2 || order % 2 != 0 {
            return Err(BTreeError::InvalidOrder { order });
        }
        let mut tree = Self::from_parts_unchecked(order, compare, destroy_key);
        // Prebuilds the first root page; fails for an order too large to allocate.
        tree.arena.reserve(1)?;
        Ok(tree)
    }

    fn from_parts_unchecked(order: usize, compare: C, destroy_key: D) -> Self {
        Self {
            arena: PageArena::new(order),
            root: NONE,
            order,
            len: 0,
            size: 0,
            compare,
            destroy_key,
            counters: Counters::default(),
        }
    }
}

impl<K, C, D> BTree<K, C, D>
where
    D: KeyDestructor<K>,
{
    /// Releases every key through the destructor, leaving an empty tree that
    /// can be reused.
    pub fn clear(&mut self) {
        self.teardown();
    }

    /// Consumes the tree, releasing every page and every key.
    ///
    /// Equivalent to dropping it.
    pub fn destroy(self) {
        drop(self);
    }

    // Walks every page through a LIFO worklist, handing each key to the
    // destructor. Children are pushed before their parent's keys are released.
    fn teardown(&mut self) {
        if self.root == NONE {
            return;
        }
        trace_event!(pages = self.arena.live(), keys = self.len, "tearing down tree");
        let mut worklist: Stack<PageId> = Stack::with_capacity(self.arena.live());
        worklist.push(self.root);
        while let Some(&id) = worklist.peek() {
            worklist.pop();
            let page = self.arena.take(id);
            for &child in page.children() {
                worklist.push(child);
            }
            for key in page.keys {
                self.destroy_key.destroy(key);
            }
        }
        self.arena.clear();
        self.root = NONE;
        self.len = 0;
        self.size = 0;
    }

    /// Returns `true` if the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root == NONE
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of pages in the tree (the root's subtree page count).
    #[inline]
    pub fn page_count(&self) -> usize {
        self.size
    }

    /// The order `M`: the most keys a page may hold.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Handle of the root page, `None` when the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<PageId> {
        (self.root != NONE).then_some(self.root)
    }

    /// Returns the page behind `id`, if it is live.
    #[inline]
    pub fn page(&self, id: PageId) -> Option<&Page<K>> {
        self.arena.get(id)
    }

    /// Returns the key at `pos`, if the position is valid.
    #[inline]
    pub fn key_at(&self, pos: Position) -> Option<&K> {
        self.arena.get(pos.page)?.keys.get(pos.index)
    }

    /// Recomputes the subtree page count of `id` from its children.
    pub(crate) fn refresh_subtree(&mut self, id: PageId) {
        let pages = 1 + self.arena[id]
            .children
            .iter()
            .map(|&child| self.arena[child].subtree_pages)
            .sum::<usize>();
        self.arena[id].subtree_pages = pages;
    }

    /// Re-mirrors the root's subtree page count into `size`.
    pub(crate) fn refresh_size(&mut self) {
        self.size = self.arena.get(self.root).map_or(0, Page::subtree_pages);
    }
}

impl<K: Ord> Default for BTree<K> {
    fn default() -> Self {
        Self::from_parts_unchecked(DEFAULT_ORDER, NaturalOrder, DropKey)
    }
}

impl<K, C, D> Drop for BTree<K, C, D>
where
    D: KeyDestructor<K>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<K, C, D> fmt::Debug for BTree<K, C, D>
where
    K: fmt::Debug,
    D: KeyDestructor<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("order", &self.order)
            .field("len", &self.len)
            .field("pages", &self.size)
            .field("root", &self.root())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FnDestructor;
    use std::cell::RefCell;

    #[test]
    fn test_unallocatable_order_fails_at_creation() {
        let order = (usize::MAX / 4) & !1;
        assert!(matches!(
            BTree::<u64>::new(order),
            Err(BTreeError::AllocFailed)
        ));
        assert!(matches!(
            BTree::<u64>::new(usize::MAX - 1),
            Err(BTreeError::AllocFailed)
        ));
    }

    #[test]
    fn test_new_tree_has_first_page_ready() {
        let mut tree: BTree<u64> = BTree::new(4).unwrap();
        assert_eq!(tree.page_count(), 0);
        assert_eq!(tree.arena.spare_pages(), 1);
        assert_eq!(tree.insert(1), Ok(true));
        assert_eq!(tree.arena.spare_pages(), 0);
        assert_eq!(tree.page_count(), 1);
    }

    #[test]
    fn test_clear_releases_every_key_once() {
        let released = RefCell::new(Vec::new());
        let mut tree = BTree::with_parts(
            2,
            NaturalOrder,
            FnDestructor(|k: u32| released.borrow_mut().push(k)),
        )
        .unwrap();
        for k in 0..40 {
            tree.insert(k).unwrap();
        }
        assert!(tree.page_count() > 1);

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.page_count(), 0);
        assert_eq!(tree.root(), None);

        let mut seen = released.borrow().clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());

        assert_eq!(tree.insert(7), Ok(true));
        assert_eq!(tree.validate(), Ok(1));
    }
}
