//! Point lookups.

use super::ordering::{Comparator, KeyDestructor};
use super::page::PageId;
use super::tree::{BTree, Position};

impl<K, C, D> BTree<K, C, D>
where
    C: Comparator<K>,
    D: KeyDestructor<K>,
{
    /// Returns the page holding `key`, or `None` if the key is absent.
    ///
    /// Visits one page per level and performs a binary search inside each.
    pub fn search(&self, key: &K) -> Option<PageId> {
        self.position(key).map(|pos| pos.page)
    }

    /// Returns the exact location of `key`, or `None` if the key is absent.
    pub fn position(&self, key: &K) -> Option<Position> {
        self.position_from(self.root, key)
    }

    /// Like [`position`](Self::position) but descends from `from` instead of
    /// the root.
    pub(crate) fn position_from(&self, from: PageId, key: &K) -> Option<Position> {
        let mut cur = from;
        while let Some(page) = self.arena.get(cur) {
            match page.locate(key, &self.compare) {
                Ok(index) => return Some(Position { page: cur, index }),
                Err(idx) => cur = page.child(idx),
            }
        }
        None
    }

    /// Returns `true` if the tree holds `key`.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Returns the stored key equal to `key`.
    ///
    /// Useful when `K` bundles a payload that the comparator ignores.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.position(key).and_then(|pos| self.key_at(pos))
    }
}

#[cfg(test)]
mod tests {
    use crate::BTree;

    #[test]
    fn test_search_empty_tree() {
        let tree: BTree<i32> = BTree::new(4).unwrap();
        assert_eq!(tree.search(&1), None);
        assert!(!tree.contains(&1));
    }

    #[test]
    fn test_search_reports_host_page() {
        let mut tree = BTree::new(2).unwrap();
        for k in [10, 20, 30] {
            tree.insert(k).unwrap();
        }
        // 20 was promoted into the new root by the first split.
        let root = tree.root().unwrap();
        assert_eq!(tree.search(&20), Some(root));
        let leaf = tree.search(&10).unwrap();
        assert_ne!(leaf, root);
        assert_eq!(tree.page(leaf).unwrap().parent(), Some(root));
        assert_eq!(tree.search(&15), None);
    }

    #[test]
    fn test_get_returns_stored_key() {
        let mut tree =
            BTree::with_comparator(4, |a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0)).unwrap();
        tree.insert((1, 'a')).unwrap();
        tree.insert((2, 'b')).unwrap();
        assert_eq!(tree.insert((2, 'z')), Ok(false));
        assert_eq!(tree.get(&(2, '?')), Some(&(2, 'b')));
        assert_eq!(tree.get(&(3, '?')), None);
    }
}
