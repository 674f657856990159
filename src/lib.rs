//! # `pagetree` - Classic In-Memory B-Tree
//!
//! An ordered key container built as a balanced multiway search tree. Search,
//! insertion and deletion are O(log n), kept that way by strict page-fill and
//! equal-leaf-depth invariants restored through page splits, catenation
//! (sibling merge) and borrowing through the parent.
//!
//! ## Architecture
//!
//! Pages live in an arena and are addressed by integer [`PageId`] handles. A
//! page owns its children through their handles; its `parent` is a plain
//! handle used only to walk upward during rebalancing, with [`NONE`] at the
//! root. Teardown and rebalancing therefore never chase dangling pointers.
//!
//! Ordering and key release are compile-time strategies:
//! - [`Comparator`]: total order over keys ([`NaturalOrder`] uses `Ord`)
//! - [`KeyDestructor`]: receives every key the tree stops owning
//!   ([`DropKey`] just drops it)
//!
//! ### Invariants
//!
//! With order `M` (even, at least 2), between operations:
//! - every non-root page holds between `M / 2` and `M` keys
//! - keys within a page strictly increase, and every key of `children[i]` lies
//!   between `keys[i - 1]` and `keys[i]`
//! - an internal page has exactly one more child than keys
//! - all leaves are at the same depth
//!
//! [`BTree::validate`] checks all of them.
//!
//! ## Example
//!
//! ```rust
//! use pagetree::BTree;
//!
//! let mut tree = BTree::new(2).unwrap();
//! for k in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(k).unwrap();
//! }
//! assert_eq!(tree.height(), 2);
//! assert!(tree.contains(&17));
//!
//! tree.delete(&10);
//! assert!(!tree.contains(&10));
//! assert_eq!(tree.next_key(&7), Some(&12));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod trace;

pub mod collections;
mod error;

pub use collections::btree::{
    page_locate, BTree, Comparator, DropKey, FnComparator, FnDestructor, InvariantViolation,
    KeyDestructor, NaturalOrder, Page, PageId, Position, TreeStats, DEFAULT_ORDER, NONE,
};
pub use collections::stack::{Stack, Worklist};
pub use error::BTreeError;
