//! Key ordering and key release strategies.
//!
//! Both are type parameters of [`BTree`](super::BTree), so the default
//! strategies (`NaturalOrder`, `DropKey`) compile down to plain `Ord::cmp` and
//! `drop`.

use core::cmp::Ordering;

/// A total order over keys.
pub trait Comparator<K> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Adapts a closure into a [`Comparator`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<K, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

/// Releases keys the tree stops owning.
///
/// Called once per key removed by `delete`, `clear` or teardown. Never called
/// for a rejected duplicate insert or a delete of an absent key.
pub trait KeyDestructor<K> {
    /// Takes ownership of a key leaving the tree.
    fn destroy(&mut self, key: K);
}

/// Drops released keys in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropKey;

impl<K> KeyDestructor<K> for DropKey {
    #[inline]
    fn destroy(&mut self, key: K) {
        drop(key);
    }
}

/// Adapts a closure into a [`KeyDestructor`].
pub struct FnDestructor<F>(pub F);

impl<K, F> KeyDestructor<K> for FnDestructor<F>
where
    F: FnMut(K),
{
    #[inline]
    fn destroy(&mut self, key: K) {
        (self.0)(key);
    }
}
