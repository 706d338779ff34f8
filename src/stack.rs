use crate::error::{GraphError, Result};

/// LIFO stack used by the traversal algorithms.
///
/// Unlike `Vec::pop`, popping or peeking an empty stack is an error: the
/// algorithms only do so when their own bookkeeping is broken, so the
/// failure is surfaced instead of being folded into an `Option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the top element.
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or(GraphError::EmptyStack)
    }

    /// Returns the top element without removing it.
    pub fn top(&self) -> Result<&T> {
        self.items.last().ok_or(GraphError::EmptyStack)
    }

    /// Snapshot of the contents, bottom first.
    pub fn content(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: PartialEq> Stack<T> {
    /// Linear membership test.
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}
