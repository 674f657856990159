//! `PageArena`: handle-addressed page storage.
//!
//! Pages live in a slot vector and are addressed by [`PageId`]. Vacated slots
//! are threaded onto a free list and reused O(1). Released pages keep their key
//! and child buffers on a small spare list so the next split can take one
//! without allocating.
//!
//! Allocation is split in two phases: [`PageArena::reserve`] performs every
//! fallible allocation up front, after which [`PageArena::alloc`] cannot fail
//! for the reserved number of pages.

use super::page::{Page, PageId, NONE};
use crate::BTreeError;
use core::ops::{Index, IndexMut};

// Upper bound on recycled pages kept around after deletions.
const SPARE_LIMIT: usize = 8;

pub(crate) struct PageArena<K> {
    slots: Vec<Option<Page<K>>>,
    free: Vec<PageId>,
    spare: Vec<Page<K>>,
    order: usize,
    live: usize,
    // Pages `reserve` may still build; `None` is unlimited.
    #[cfg(test)]
    budget: Option<usize>,
}

impl<K> PageArena<K> {
    pub(crate) fn new(order: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            spare: Vec::new(),
            order,
            live: 0,
            #[cfg(test)]
            budget: None,
        }
    }

    /// Number of pages currently in use.
    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Guarantees that the next `pages` calls to [`alloc`](Self::alloc) succeed
    /// without allocating.
    pub(crate) fn reserve(&mut self, pages: usize) -> Result<(), BTreeError> {
        if self.spare.len() < pages {
            self.spare.try_reserve(pages - self.spare.len())?;
            while self.spare.len() < pages {
                #[cfg(test)]
                self.charge_budget()?;
                self.spare.push(Page::try_with_order(self.order)?);
            }
        }
        let vacant = self.free.len();
        if pages > vacant {
            self.slots.try_reserve(pages - vacant)?;
        }
        Ok(())
    }

    /// Places an empty leaf page under `parent` and returns its handle.
    pub(crate) fn alloc(&mut self, parent: PageId) -> Result<PageId, BTreeError> {
        self.reserve(1)?;
        let mut page = match self.spare.pop() {
            Some(page) => page,
            None => Page::try_with_order(self.order)?,
        };
        page.parent = parent;

        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(page);
                id
            }
            None => {
                self.slots.push(Some(page));
                self.slots.len() - 1
            }
        };
        self.live += 1;
        Ok(id)
    }

    /// Removes the page at `id` from the arena and returns it.
    ///
    /// # Panics
    /// Panics if `id` is not a live page.
    pub(crate) fn take(&mut self, id: PageId) -> Page<K> {
        let page = self
            .slots
            .get_mut(id)
            .and_then(Option::take)
            .expect("page handle is not live");
        self.free.push(id);
        self.live -= 1;
        page
    }

    /// Frees the page at `id`, keeping its buffers for reuse.
    ///
    /// The page must already be emptied of keys the caller still needs.
    pub(crate) fn release(&mut self, id: PageId) {
        let page = self.take(id);
        self.recycle(page);
    }

    /// Keeps the buffers of a page taken out of the arena for later splits.
    pub(crate) fn recycle(&mut self, mut page: Page<K>) {
        if self.spare.len() < SPARE_LIMIT {
            page.reset();
            self.spare.push(page);
        }
    }

    /// Returns the page at `id`, or `None` for a vacant slot or [`NONE`].
    #[inline]
    pub(crate) fn get(&self, id: PageId) -> Option<&Page<K>> {
        if id == NONE {
            return None;
        }
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Drops the spare pages and caps how many more `reserve` may build.
    #[cfg(test)]
    pub(crate) fn limit_pages(&mut self, budget: Option<usize>) {
        self.spare.clear();
        self.budget = budget;
    }

    #[cfg(test)]
    pub(crate) fn spare_pages(&self) -> usize {
        self.spare.len()
    }

    #[cfg(test)]
    fn charge_budget(&mut self) -> Result<(), BTreeError> {
        if let Some(left) = self.budget.as_mut() {
            if *left == 0 {
                return Err(BTreeError::AllocFailed);
            }
            *left -= 1;
        }
        Ok(())
    }

    /// Drops every page and resets the arena to empty.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl<K> Index<PageId> for PageArena<K> {
    type Output = Page<K>;

    #[inline]
    fn index(&self, id: PageId) -> &Page<K> {
        self.get(id).expect("page handle is not live")
    }
}

impl<K> IndexMut<PageId> for PageArena<K> {
    #[inline]
    fn index_mut(&mut self, id: PageId) -> &mut Page<K> {
        self.slots
            .get_mut(id)
            .and_then(Option::as_mut)
            .expect("page handle is not live")
    }
}
