//! Collections.
//!
//! - `btree`: the balanced multiway search tree and its page machinery
//! - `stack`: LIFO worklists used for tree teardown

pub mod btree;
pub mod stack;

pub use btree::BTree;
pub use stack::{Stack, Worklist};
