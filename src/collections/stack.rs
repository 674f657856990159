//! LIFO worklists.
//!
//! Tree teardown walks its pages with push, peek and pop over opaque handles.
//! The [`Worklist`] trait states that contract plus `is_empty`, and any stack
//! satisfies it.
//! [`Stack`] is the default `Vec`-backed implementation.

/// A last-in, first-out worklist.
pub trait Worklist<T> {
    /// Pushes `item` on top.
    fn push(&mut self, item: T);

    /// Removes and returns the top item, if any.
    fn pop(&mut self) -> Option<T>;

    /// Returns the top item without removing it.
    fn peek(&self) -> Option<&T>;

    /// Returns `true` if the worklist holds no items.
    fn is_empty(&self) -> bool;
}

/// A growable stack.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty stack able to hold `capacity` items without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Number of items on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Worklist<T> for Stack<T> {
    #[inline]
    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    #[inline]
    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[inline]
    fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_lifo_order() {
        let mut stack = Stack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.peek(), None);

        for i in 0..5 {
            stack.push(i);
        }
        assert_eq!(stack.len(), 5);
        assert_eq!(stack.peek(), Some(&4));

        let drained: Vec<_> = std::iter::from_fn(|| stack.pop()).collect();
        assert_eq!(drained, vec![4, 3, 2, 1, 0]);
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_stack_peek_does_not_remove() {
        let mut stack = Stack::with_capacity(2);
        stack.push("a");
        stack.push("b");
        assert_eq!(stack.peek(), Some(&"b"));
        assert_eq!(stack.peek(), Some(&"b"));
        assert_eq!(stack.pop(), Some("b"));
        assert_eq!(stack.peek(), Some(&"a"));
    }
}
