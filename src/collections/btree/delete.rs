//! Deletion and underflow rebalancing.
//!
//! Physical removal always happens in a leaf: a key found in an internal page
//! is overwritten by its in-order predecessor (the maximum of its left
//! subtree), and that predecessor's leaf loses a key instead.
//!
//! Rebalancing then walks from the leaf to the root. A non-root page with
//! fewer than `order / 2` keys either catenates with a neighbour (when the two
//! together hold fewer than `order` keys) or borrows one key through the
//! parent. Catenation that empties the root makes the merged page the new
//! root, which is the only way the tree loses height.

use super::ordering::{Comparator, KeyDestructor};
use super::page::{Page, PageId, NONE};
use super::tree::{BTree, Position};
use crate::trace::trace_event;
use core::mem;

impl<K, C, D> BTree<K, C, D>
where
    C: Comparator<K>,
    D: KeyDestructor<K>,
{
    /// Removes `key` and hands it to the destructor.
    ///
    /// Returns `false` if the key is absent; nothing is released then.
    pub fn delete(&mut self, key: &K) -> bool {
        match self.remove_entry(key) {
            Some(removed) => {
                self.destroy_key.destroy(removed);
                true
            }
            None => false,
        }
    }

    /// Removes `key` and returns the stored key to the caller, bypassing the
    /// destructor.
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.remove_entry(key)
    }

    fn remove_entry(&mut self, key: &K) -> Option<K> {
        let Position { page, index } = self.position(key)?;

        let (leaf, removed) = if self.arena[page].is_leaf() {
            (page, self.arena[page].keys.remove(index))
        } else {
            let left = self.arena[page].children[index];
            let leaf = self.rightmost_leaf(left);
            let predecessor = self.arena[leaf]
                .keys
                .pop()
                .expect("leaf below an internal page holds keys");
            let removed = mem::replace(&mut self.arena[page].keys[index], predecessor);
            (leaf, removed)
        };

        self.len -= 1;
        self.rebalance(leaf);
        self.refresh_size();
        Some(removed)
    }

    fn rightmost_leaf(&self, from: PageId) -> PageId {
        let mut cur = from;
        while let Some(&last) = self.arena[cur].children.last() {
            cur = last;
        }
        cur
    }

    /// Restores the fill invariant from `from` up to the root.
    fn rebalance(&mut self, from: PageId) {
        let min = self.order / 2;
        let mut cur = from;
        loop {
            let parent = self.arena[cur].parent;
            if parent == NONE {
                self.settle_root(cur);
                return;
            }

            if self.arena[cur].len() >= min {
                self.refresh_subtree(cur);
                cur = parent;
                continue;
            }

            let pos = self.child_index(parent, cur);
            // Prefer the right neighbour; the last child falls back to its left one.
            let sib_pos = if pos < self.arena[parent].len() {
                pos + 1
            } else {
                pos - 1
            };
            let sibling = self.arena[parent].children[sib_pos];

            if self.arena[sibling].len() + self.arena[cur].len() < self.order {
                let survivor = self.catenate(parent, pos.min(sib_pos));
                if parent == self.root && self.arena[parent].is_empty() {
                    self.collapse_root(parent, survivor);
                    return;
                }
            } else {
                self.borrow(parent, pos, sib_pos);
            }
            cur = parent;
        }
    }

    /// Index of `child` among `parent`'s children.
    fn child_index(&self, parent: PageId, child: PageId) -> usize {
        let parent_page = &self.arena[parent];
        match self.arena[child].keys.first() {
            Some(first) => {
                let (Ok(idx) | Err(idx)) = parent_page.locate(first, &self.compare);
                debug_assert_eq!(parent_page.children[idx], child);
                idx
            }
            // An emptied page (order 2) has no key to search with.
            None => parent_page
                .children
                .iter()
                .position(|&c| c == child)
                .expect("child is linked from its parent"),
        }
    }

    /// Merges the children at `left_pos` and `left_pos + 1` of `parent`,
    /// pulling their separator down between them. Returns the surviving
    /// (left) page.
    fn catenate(&mut self, parent: PageId, left_pos: usize) -> PageId {
        let (left, right) = {
            let p = &self.arena[parent];
            (p.children[left_pos], p.children[left_pos + 1])
        };
        let separator = self.arena[parent].keys.remove(left_pos);
        self.arena[parent].children.remove(left_pos + 1);

        let mut absorbed = self.arena.take(right);
        for &child in &absorbed.children {
            self.arena[child].parent = left;
        }
        let survivor = &mut self.arena[left];
        survivor.keys.push(separator);
        survivor.keys.extend(absorbed.keys.drain(..));
        survivor.children.extend(absorbed.children.drain(..));
        self.arena.recycle(absorbed);

        self.refresh_subtree(left);
        self.counters.catenations += 1;
        trace_event!(
            survivor = left,
            removed = right,
            parent,
            keys = self.arena[left].len(),
            "catenated pages"
        );
        left
    }

    /// Moves one key from the sibling at `sib_pos` into the underflowing child
    /// at `pos`, rotating through the parent's separator.
    fn borrow(&mut self, parent: PageId, pos: usize, sib_pos: usize) {
        let (receiver, lender) = {
            let p = &self.arena[parent];
            (p.children[pos], p.children[sib_pos])
        };

        if sib_pos > pos {
            // Right neighbour lends its leftmost key and child.
            let lent_key = self.arena[lender].keys.remove(0);
            let lent_child = take_child(&mut self.arena[lender], 0);
            let separator = mem::replace(&mut self.arena[parent].keys[pos], lent_key);
            let page = &mut self.arena[receiver];
            page.keys.push(separator);
            if let Some(child) = lent_child {
                page.children.push(child);
                self.arena[child].parent = receiver;
            }
        } else {
            // Left neighbour lends its rightmost key and child.
            let lent_key = self.arena[lender]
                .keys
                .pop()
                .expect("lending sibling holds keys");
            let last = self.arena[lender].children.len().saturating_sub(1);
            let lent_child = take_child(&mut self.arena[lender], last);
            let separator = mem::replace(&mut self.arena[parent].keys[sib_pos], lent_key);
            let page = &mut self.arena[receiver];
            page.keys.insert(0, separator);
            if let Some(child) = lent_child {
                page.children.insert(0, child);
                self.arena[child].parent = receiver;
            }
        }

        self.refresh_subtree(lender);
        self.refresh_subtree(receiver);
        self.counters.borrows += 1;
        trace_event!(receiver, lender, parent, "borrowed key through parent");
    }

    /// Replaces an emptied root by its single remaining child.
    fn collapse_root(&mut self, old_root: PageId, survivor: PageId) {
        self.arena.release(old_root);
        self.arena[survivor].parent = NONE;
        self.root = survivor;
        self.refresh_subtree(survivor);
        self.counters.root_collapses += 1;
        trace_event!(old_root, new_root = survivor, "root collapsed");
    }

    /// Final step at the root: drop it once it holds no keys.
    fn settle_root(&mut self, root: PageId) {
        if self.arena[root].is_empty() {
            assert!(
                self.arena[root].is_leaf(),
                "an empty root cannot keep children"
            );
            self.arena.release(root);
            self.root = NONE;
            trace_event!(page = root, "tree emptied");
        } else {
            self.refresh_subtree(root);
        }
    }
}

fn take_child<K>(page: &mut Page<K>, idx: usize) -> Option<PageId> {
    if page.is_leaf() {
        None
    } else {
        Some(page.children.remove(idx))
    }
}
