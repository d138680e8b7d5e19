//! Invariant checking for navigation testing.
//!
//! Invariants are properties that must hold between any two navigations,
//! whatever sequence of `invoke` and `undo` calls led there. Tests capture a
//! [`NavigationSnapshot`] after every step and run the registered checks
//! against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! container.invoke(state).await;
//! registry.assert_all(&NavigationSnapshot::capture(&container), "after invoke");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    DisplayedMatchesTop, IdleBetweenNavigations, NoAdjacentDuplicates, SingleAttachedScene,
};
pub use snapshot::NavigationSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property checked against a [`NavigationSnapshot`].
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the snapshot.
    fn check(&self, snapshot: &NavigationSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Registry with every navigation invariant.
    ///
    /// Includes:
    /// - [`NoAdjacentDuplicates`]: no state directly on top of itself
    /// - [`DisplayedMatchesTop`]: displayed scene renders the top state
    /// - [`SingleAttachedScene`]: only the displayed scene is attached
    /// - [`IdleBetweenNavigations`]: no navigation left half-done
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(NoAdjacentDuplicates);
        registry.add(DisplayedMatchesTop);
        registry.add(SingleAttachedScene);
        registry.add(IdleBetweenNavigations);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants, collecting every violation.
    pub fn check_all(&self, snapshot: &NavigationSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(snapshot).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation found.
    #[allow(clippy::panic, reason = "test assertion helper")]
    pub fn assert_all(&self, snapshot: &NavigationSnapshot, context: &str) {
        if let Err(violations) = self.check_all(snapshot) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        assert_eq!(InvariantRegistry::standard().len(), 4);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&NavigationSnapshot::default()).is_ok());
    }
}
