//! Insertion and split propagation.
//!
//! A key is always placed in a leaf. If that pushes the leaf to `order + 1`
//! keys it splits around its median, the median moves into the parent, and the
//! parent may overflow in turn. A root split is the only way the tree grows
//! taller, and it grows by exactly one level.
//!
//! Every page a split cascade could need (one sibling per level plus a new
//! root) is reserved before the tree is touched, so an allocation failure
//! leaves the tree unchanged.

use super::ordering::{Comparator, KeyDestructor};
use super::page::{PageId, NONE};
use super::tree::BTree;
use crate::trace::trace_event;
use crate::BTreeError;
use core::mem;

impl<K, C, D> BTree<K, C, D>
where
    C: Comparator<K>,
    D: KeyDestructor<K>,
{
    /// Inserts `key`.
    ///
    /// Returns `Ok(false)` without touching the tree if an equal key is already
    /// stored; the stored key is kept and `key` is dropped without going
    /// through the destructor.
    ///
    /// # Errors
    /// Returns [`BTreeError::AllocFailed`] if page storage cannot be reserved.
    /// The tree is unchanged in that case.
    pub fn insert(&mut self, key: K) -> Result<bool, BTreeError> {
        let mut landing = NONE;
        let mut slot = 0;
        let mut depth = 0;
        let mut cur = self.root;
        while let Some(page) = self.arena.get(cur) {
            match page.locate(&key, &self.compare) {
                Ok(_) => return Ok(false),
                Err(idx) => {
                    landing = cur;
                    slot = idx;
                    depth += 1;
                    cur = page.child(idx);
                }
            }
        }

        self.arena.reserve(depth + 1)?;
        if landing == NONE {
            landing = self.arena.alloc(NONE)?;
            self.root = landing;
        }

        self.arena[landing].keys.insert(slot, key);
        self.len += 1;
        self.split_upward(landing)?;
        self.refresh_size();
        Ok(true)
    }

    /// Walks from `from` to the root, splitting every overflowing page and
    /// refreshing subtree page counts on the way.
    fn split_upward(&mut self, from: PageId) -> Result<(), BTreeError> {
        let mut cur = from;
        while cur != NONE {
            if self.arena[cur].len() > self.order {
                self.split(cur)?;
            }
            self.refresh_subtree(cur);
            cur = self.arena[cur].parent;
        }
        Ok(())
    }

    /// Splits an overflowing page around its median key.
    ///
    /// Keys above the median (and their children) move to a new right sibling,
    /// the median moves into the parent, and the sibling is linked in right
    /// after `id`. A parentless page first gets a new root above it.
    fn split(&mut self, id: PageId) -> Result<(), BTreeError> {
        let median = self.arena[id].len() / 2;

        let mut parent = self.arena[id].parent;
        if parent == NONE {
            parent = self.arena.alloc(NONE)?;
            self.arena[parent].children.push(id);
            self.arena[id].parent = parent;
            self.root = parent;
            self.counters.root_splits += 1;
            trace_event!(old_root = id, new_root = parent, "root split");
        }
        let sibling = self.arena.alloc(parent)?;

        // The sibling's buffers were sized for the order, so moving into them
        // does not reallocate.
        let mut keys = mem::take(&mut self.arena[sibling].keys);
        let mut children = mem::take(&mut self.arena[sibling].children);
        let median_key = {
            let page = &mut self.arena[id];
            keys.extend(page.keys.drain(median + 1..));
            if !page.is_leaf() {
                children.extend(page.children.drain(median + 1..));
            }
            page.keys.pop().expect("overflowing page holds a median key")
        };
        for &child in &children {
            self.arena[child].parent = sibling;
        }
        self.arena[sibling].keys = keys;
        self.arena[sibling].children = children;

        let (Ok(at) | Err(at)) = self.arena[parent].locate(&median_key, &self.compare);
        let parent_page = &mut self.arena[parent];
        parent_page.keys.insert(at, median_key);
        parent_page.children.insert(at + 1, sibling);

        self.refresh_subtree(id);
        self.refresh_subtree(sibling);
        self.counters.splits += 1;
        trace_event!(
            page = id,
            sibling,
            parent,
            left = self.arena[id].len(),
            right = self.arena[sibling].len(),
            "split page"
        );
        Ok(())
    }
}
