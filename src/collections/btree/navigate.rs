//! Ordered navigation: extremes, neighbours and height.
//!
//! The page-level functions take a starting page so they work on any subtree;
//! `first`, `last`, `next_key` and `prev_key` are the whole-tree shortcuts.

use super::ordering::{Comparator, KeyDestructor};
use super::page::PageId;
use super::tree::{BTree, Position};

impl<K, C, D> BTree<K, C, D>
where
    C: Comparator<K>,
    D: KeyDestructor<K>,
{
    /// Smallest key of the subtree rooted at `from`.
    ///
    /// Follows first children down to a leaf.
    pub fn minimum(&self, from: PageId) -> Option<Position> {
        let mut cur = from;
        let mut page = self.arena.get(cur)?;
        while let Some(&first) = page.children.first() {
            cur = first;
            page = &self.arena[cur];
        }
        (!page.is_empty()).then_some(Position { page: cur, index: 0 })
    }

    /// Largest key of the subtree rooted at `from`.
    ///
    /// Follows last children down to a leaf.
    pub fn maximum(&self, from: PageId) -> Option<Position> {
        let mut cur = from;
        let mut page = self.arena.get(cur)?;
        while let Some(&last) = page.children.last() {
            cur = last;
            page = &self.arena[cur];
        }
        let index = page.len().checked_sub(1)?;
        Some(Position { page: cur, index })
    }

    /// The next larger key after `key`, searching from `from`.
    ///
    /// Returns `None` if `key` is not found below `from` or is the largest key.
    pub fn successor(&self, from: PageId, key: &K) -> Option<Position> {
        let host = self.position_from(from, key)?;
        let page = &self.arena[host.page];

        if !page.is_leaf() {
            return self.minimum(page.children[host.index + 1]);
        }
        if host.index + 1 < page.len() {
            return Some(Position {
                page: host.page,
                index: host.index + 1,
            });
        }

        // Last key of a leaf: the first ancestor with a key above `key` holds it.
        let mut cur = page.parent;
        while let Some(ancestor) = self.arena.get(cur) {
            let (Ok(idx) | Err(idx)) = ancestor.locate(key, &self.compare);
            if idx != ancestor.len() {
                return Some(Position { page: cur, index: idx });
            }
            cur = ancestor.parent;
        }
        None
    }

    /// The next smaller key before `key`, searching from `from`.
    ///
    /// Returns `None` if `key` is not found below `from` or is the smallest key.
    pub fn predecessor(&self, from: PageId, key: &K) -> Option<Position> {
        let host = self.position_from(from, key)?;
        let page = &self.arena[host.page];

        if !page.is_leaf() {
            return self.maximum(page.children[host.index]);
        }
        if host.index > 0 {
            return Some(Position {
                page: host.page,
                index: host.index - 1,
            });
        }

        let mut cur = page.parent;
        while let Some(ancestor) = self.arena.get(cur) {
            let (Ok(idx) | Err(idx)) = ancestor.locate(key, &self.compare);
            if idx != 0 {
                return Some(Position {
                    page: cur,
                    index: idx - 1,
                });
            }
            cur = ancestor.parent;
        }
        None
    }

    /// Height of the subtree rooted at `page`: 0 for a single page, -1 for
    /// [`NONE`](super::NONE) or a vacant handle.
    pub fn height_of(&self, page: PageId) -> isize {
        match self.arena.get(page) {
            None => -1,
            Some(p) => {
                1 + p
                    .children
                    .iter()
                    .map(|&child| self.height_of(child))
                    .max()
                    .unwrap_or(-1)
            }
        }
    }

    /// Height of the tree: -1 when empty, 0 for a lone root.
    #[inline]
    pub fn height(&self) -> isize {
        self.height_of(self.root)
    }

    /// Smallest key in the tree.
    pub fn first(&self) -> Option<&K> {
        self.minimum(self.root).and_then(|pos| self.key_at(pos))
    }

    /// Largest key in the tree.
    pub fn last(&self) -> Option<&K> {
        self.maximum(self.root).and_then(|pos| self.key_at(pos))
    }

    /// The stored key that follows `key`.
    pub fn next_key(&self, key: &K) -> Option<&K> {
        self.successor(self.root, key)
            .and_then(|pos| self.key_at(pos))
    }

    /// The stored key that precedes `key`.
    pub fn prev_key(&self, key: &K) -> Option<&K> {
        self.predecessor(self.root, key)
            .and_then(|pos| self.key_at(pos))
    }
}
