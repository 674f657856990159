//! Structural self-checks and statistics.
//!
//! [`BTree::validate`] walks every page and checks the fill, ordering,
//! linkage and depth invariants, plus the cached page counts. It is meant for
//! tests and debugging; none of the tree operations call it.

use super::ordering::{Comparator, KeyDestructor};
use super::page::{PageId, NONE};
use super::tree::BTree;
use core::cmp::Ordering;
use core::fmt;
use serde::Serialize;

/// A broken tree invariant, with the page where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A page holds more than `order` keys.
    Overfull {
        /// Offending page.
        page: PageId,
        /// Keys held.
        len: usize,
    },
    /// A non-root page holds fewer than `order / 2` keys.
    Underfull {
        /// Offending page.
        page: PageId,
        /// Keys held.
        len: usize,
    },
    /// A root with children holds no keys, or a live root holds nothing at all.
    EmptyRoot {
        /// Offending page.
        page: PageId,
    },
    /// Keys are not strictly increasing, within a page or against the
    /// separators above it.
    Unordered {
        /// Offending page.
        page: PageId,
    },
    /// An internal page does not have exactly one more child than keys.
    ChildCount {
        /// Offending page.
        page: PageId,
        /// Keys held.
        keys: usize,
        /// Children held.
        children: usize,
    },
    /// A child does not point back at the page that links it.
    ParentLink {
        /// The child page.
        page: PageId,
        /// The page linking it.
        expected: PageId,
        /// The parent it records.
        found: PageId,
    },
    /// Leaves sit at different depths.
    LeafDepth {
        /// Offending leaf.
        page: PageId,
        /// Its depth.
        depth: usize,
        /// Depth of the first leaf seen.
        expected: usize,
    },
    /// A cached subtree page count is stale.
    SubtreePages {
        /// Offending page.
        page: PageId,
        /// Cached value.
        cached: usize,
        /// Recounted value.
        actual: usize,
    },
    /// The tree-level key or page counters disagree with the pages.
    Totals {
        /// Tracked key count.
        len: usize,
        /// Keys found in the pages.
        counted: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Overfull { page, len } => write!(f, "page {page} overfull with {len} keys"),
            Self::Underfull { page, len } => write!(f, "page {page} underfull with {len} keys"),
            Self::EmptyRoot { page } => write!(f, "root page {page} holds no keys"),
            Self::Unordered { page } => write!(f, "keys out of order at page {page}"),
            Self::ChildCount {
                page,
                keys,
                children,
            } => write!(f, "page {page} has {keys} keys but {children} children"),
            Self::ParentLink {
                page,
                expected,
                found,
            } => write!(f, "page {page} records parent {found}, linked from {expected}"),
            Self::LeafDepth {
                page,
                depth,
                expected,
            } => write!(f, "leaf {page} at depth {depth}, expected {expected}"),
            Self::SubtreePages {
                page,
                cached,
                actual,
            } => write!(f, "page {page} caches {cached} subtree pages, actual {actual}"),
            Self::Totals { len, counted } => {
                write!(f, "tree tracks {len} keys but pages hold {counted}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// A snapshot of the tree's shape and of its cumulative rebalancing activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TreeStats {
    /// Maximum keys per page.
    pub order: usize,
    /// Keys stored.
    pub len: usize,
    /// Pages in use.
    pub pages: usize,
    /// Tree height (-1 when empty).
    pub height: isize,
    /// Page splits, root splits included.
    pub splits: u64,
    /// Splits that grew the tree by one level.
    pub root_splits: u64,
    /// Sibling merges.
    pub catenations: u64,
    /// Keys borrowed from a sibling through the parent.
    pub borrows: u64,
    /// Catenations that removed the root and shrank the tree by one level.
    pub root_collapses: u64,
}

struct Walk<'a, K> {
    lower: Option<&'a K>,
    upper: Option<&'a K>,
    depth: usize,
}

impl<K, C, D> BTree<K, C, D>
where
    C: Comparator<K>,
    D: KeyDestructor<K>,
{
    /// Checks every structural invariant and returns the number of keys found.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] encountered.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        if self.root == NONE {
            return if self.len == 0 {
                Ok(0)
            } else {
                Err(InvariantViolation::Totals {
                    len: self.len,
                    counted: 0,
                })
            };
        }

        let root = &self.arena[self.root];
        if root.parent != NONE {
            return Err(InvariantViolation::ParentLink {
                page: self.root,
                expected: NONE,
                found: root.parent,
            });
        }
        if root.is_empty() {
            return Err(InvariantViolation::EmptyRoot { page: self.root });
        }

        let mut leaf_depth = None;
        let walk = Walk {
            lower: None,
            upper: None,
            depth: 0,
        };
        let (counted, pages) = self.check_page(self.root, &walk, &mut leaf_depth)?;
        if counted != self.len {
            return Err(InvariantViolation::Totals {
                len: self.len,
                counted,
            });
        }
        if pages != self.size || pages != self.arena.live() {
            return Err(InvariantViolation::SubtreePages {
                page: self.root,
                cached: self.size,
                actual: pages,
            });
        }
        Ok(counted)
    }

    /// Checks the subtree at `id`, returning its key and page counts.
    fn check_page(
        &self,
        id: PageId,
        walk: &Walk<'_, K>,
        leaf_depth: &mut Option<usize>,
    ) -> Result<(usize, usize), InvariantViolation> {
        let page = &self.arena[id];
        let len = page.len();

        if len > self.order {
            return Err(InvariantViolation::Overfull { page: id, len });
        }
        if !page.is_root() && len < self.order / 2 {
            return Err(InvariantViolation::Underfull { page: id, len });
        }

        let less = |a: &K, b: &K| self.compare.compare(a, b) == Ordering::Less;
        let ordered = page.keys.windows(2).all(|w| less(&w[0], &w[1]))
            && walk.lower.map_or(true, |lo| page.keys.first().map_or(true, |k| less(lo, k)))
            && walk.upper.map_or(true, |hi| page.keys.last().map_or(true, |k| less(k, hi)));
        if !ordered {
            return Err(InvariantViolation::Unordered { page: id });
        }

        if page.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(walk.depth),
                Some(expected) if expected != walk.depth => {
                    return Err(InvariantViolation::LeafDepth {
                        page: id,
                        depth: walk.depth,
                        expected,
                    });
                }
                Some(_) => {}
            }
            return self.check_cached(id, len, 1);
        }

        if page.children.len() != len + 1 {
            return Err(InvariantViolation::ChildCount {
                page: id,
                keys: len,
                children: page.children.len(),
            });
        }

        let mut keys = len;
        let mut pages = 1;
        for (i, &child) in page.children.iter().enumerate() {
            let found = self.arena.get(child).map_or(NONE, |c| c.parent);
            if found != id {
                return Err(InvariantViolation::ParentLink {
                    page: child,
                    expected: id,
                    found,
                });
            }
            let bounds = Walk {
                lower: if i == 0 { walk.lower } else { page.keys.get(i - 1) },
                upper: page.keys.get(i).or(walk.upper),
                depth: walk.depth + 1,
            };
            let (k, p) = self.check_page(child, &bounds, leaf_depth)?;
            keys += k;
            pages += p;
        }
        self.check_cached(id, keys, pages)
    }

    fn check_cached(
        &self,
        id: PageId,
        keys: usize,
        pages: usize,
    ) -> Result<(usize, usize), InvariantViolation> {
        let cached = self.arena[id].subtree_pages;
        if cached != pages {
            return Err(InvariantViolation::SubtreePages {
                page: id,
                cached,
                actual: pages,
            });
        }
        Ok((keys, pages))
    }

    /// Returns a snapshot of the tree's shape and rebalancing counters.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            order: self.order,
            len: self.len,
            pages: self.size,
            height: self.height(),
            splits: self.counters.splits,
            root_splits: self.counters.root_splits,
            catenations: self.counters.catenations,
            borrows: self.counters.borrows,
            root_collapses: self.counters.root_collapses,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::BTree;

    #[test]
    fn test_validate_empty_and_populated() {
        let mut tree = BTree::new(4).unwrap();
        assert_eq!(tree.validate(), Ok(0));
        for k in 0..100 {
            tree.insert(k).unwrap();
        }
        assert_eq!(tree.validate(), Ok(100));
    }

    #[test]
    fn test_validate_detects_stale_page_count() {
        let mut tree = BTree::new(2).unwrap();
        for k in 0..10 {
            tree.insert(k).unwrap();
        }
        let root = tree.root().unwrap();
        tree.arena[root].subtree_pages += 1;
        assert!(matches!(
            tree.validate(),
            Err(super::InvariantViolation::SubtreePages { page, .. }) if page == root
        ));
    }

    #[test]
    fn test_validate_detects_misordered_keys() {
        let mut tree = BTree::new(4).unwrap();
        for k in 0..10 {
            tree.insert(k).unwrap();
        }
        let leaf = tree.search(&0).unwrap();
        tree.arena[leaf].keys.swap(0, 1);
        assert_eq!(
            tree.validate(),
            Err(super::InvariantViolation::Unordered { page: leaf })
        );
    }

    #[test]
    fn test_stats_track_rebalancing() {
        let mut tree = BTree::new(2).unwrap();
        for k in 1..=7 {
            tree.insert(k).unwrap();
        }
        let stats = tree.stats();
        assert_eq!(stats.len, 7);
        assert_eq!(stats.pages, 7);
        assert_eq!(stats.height, 2);
        assert_eq!(stats.root_splits, 2);
        assert_eq!(stats.splits, 4);

        for k in 1..=7 {
            tree.delete(&k);
        }
        let stats = tree.stats();
        assert_eq!(stats.len, 0);
        assert_eq!(stats.pages, 0);
        assert_eq!(stats.height, -1);
        assert!(stats.catenations > 0);
    }
}
