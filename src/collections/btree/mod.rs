//! Balanced multiway search tree.
//!
//! - `page`: pages, handles and the in-page binary search
//! - `arena`: handle-addressed page storage
//! - `ordering`: comparator and key-release strategies
//! - `search`, `insert`, `delete`, `navigate`: the tree operations
//! - `validate`: invariant checking and statistics

mod arena;
mod delete;
mod insert;
mod navigate;
pub mod ordering;
pub mod page;
mod search;
mod tree;
mod validate;

pub use ordering::{Comparator, DropKey, FnComparator, FnDestructor, KeyDestructor, NaturalOrder};
pub use page::{page_locate, Page, PageId, NONE};
pub use tree::{BTree, Position, DEFAULT_ORDER};
pub use validate::{InvariantViolation, TreeStats};
