//! Navigation history.
//!
//! [`StateStack`] is the back-stack owned by a [`crate::Container`]. It is a
//! plain LIFO with two twists: pushing a state equal to the top is ignored,
//! and the root entry can never be popped.

use std::fmt;

/// Ordered history of states, last in first out.
///
/// # Invariants
///
/// - Once the first state is pushed, the stack is never empty again.
/// - Consecutive entries are never equal.
#[derive(Debug, Clone)]
pub struct StateStack<S> {
    entries: Vec<S>,
}

impl<S> Default for StateStack<S> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<S: Clone + PartialEq> StateStack<S> {
    /// Create an uninitialized stack. [`Self::peek`] returns `None` until the
    /// first push.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack holding `root`.
    pub fn with_root(root: S) -> Self {
        Self { entries: vec![root] }
    }

    /// Push `state` unless it equals the current top.
    ///
    /// Returns `true` if the stack grew.
    pub fn push(&mut self, state: S) -> bool {
        if self.peek() == Some(&state) {
            return false;
        }
        self.entries.push(state);
        true
    }

    /// Remove and return the top state.
    ///
    /// The root is never removed: popping a single-element stack returns a
    /// copy of the root and leaves it in place. Returns `None` only before
    /// initialization.
    pub fn pop(&mut self) -> Option<S> {
        if self.entries.len() > 1 { self.entries.pop() } else { self.entries.last().cloned() }
    }

    /// Pop the top state and return the state that is current afterwards.
    pub fn undo(&mut self) -> Option<S> {
        let popped = self.pop()?;
        Some(self.peek().cloned().unwrap_or(popped))
    }

    /// Current top. `None` only before initialization.
    pub fn peek(&self) -> Option<&S> {
        self.entries.last()
    }

    /// State directly below the top. `None` at the root.
    pub fn previous(&self) -> Option<&S> {
        self.entries.len().checked_sub(2).and_then(|i| self.entries.get(i))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no root has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate from the top of the stack down to the root.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &S> + ExactSizeIterator {
        self.entries.iter().rev()
    }

    /// Entries from root to top.
    pub fn as_slice(&self) -> &[S] {
        &self.entries
    }
}

impl<S: fmt::Debug> fmt::Display for StateStack<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn uninitialized_stack_has_no_current() {
        let mut stack: StateStack<u8> = StateStack::new();
        assert!(stack.peek().is_none());
        assert!(stack.pop().is_none());
        assert!(stack.undo().is_none());
    }

    #[test]
    fn duplicate_push_is_ignored() {
        let mut stack = StateStack::with_root(1);
        assert!(stack.push(2));
        assert!(!stack.push(2));
        assert_eq!(stack.as_slice(), &[1, 2]);
    }

    #[test]
    fn root_survives_pop() {
        let mut stack = StateStack::with_root(1);
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.peek(), Some(&1));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn undo_returns_new_current() {
        let mut stack = StateStack::with_root(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.undo(), Some(2));
        assert_eq!(stack.undo(), Some(1));
        assert_eq!(stack.undo(), Some(1));
    }

    #[test]
    fn previous_and_iter_order() {
        let mut stack = StateStack::with_root("splash");
        assert!(stack.previous().is_none());
        stack.push("auth");
        stack.push("main");
        assert_eq!(stack.previous(), Some(&"auth"));
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec!["main", "auth", "splash"]);
        assert_eq!(stack.to_string(), r#"["splash", "auth", "main"]"#);
    }

    proptest! {
        #[test]
        fn prop_push_then_pop_restores_top(
            history in prop::collection::vec(0u8..8, 1..16),
            next in 0u8..8,
        ) {
            let mut stack = StateStack::new();
            for state in history {
                stack.push(state);
            }
            let before = stack.peek().copied();
            prop_assume!(before != Some(next));

            stack.push(next);
            stack.pop();
            prop_assert_eq!(stack.peek().copied(), before);
        }

        #[test]
        fn prop_never_empty_and_no_adjacent_duplicates(
            ops in prop::collection::vec(prop::option::of(0u8..4), 1..64),
        ) {
            let mut stack = StateStack::with_root(0u8);
            for op in ops {
                match op {
                    Some(state) => { stack.push(state); },
                    None => { stack.pop(); },
                }
                prop_assert!(!stack.is_empty());
                prop_assert!(stack.as_slice().windows(2).all(|w| w[0] != w[1]));
            }
        }
    }
}
