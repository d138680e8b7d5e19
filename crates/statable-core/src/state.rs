//! Application state values.
//!
//! A state identifies where the application logically is (splash, auth, a
//! specific chat room). States are plain values: they are compared with `Eq`,
//! cloned into the history stack, and never mutated once handed to the
//! [`crate::Container`].

use std::fmt;

/// Stable identifier of a scene type.
///
/// Every state variant names the scene responsible for rendering it. The
/// [`crate::SceneRegistry`] maps keys to factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneKey(&'static str);

impl SceneKey {
    /// Create a key from a static identifier.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Identifier as a string slice.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Application state driving the navigation container.
///
/// Implementations are usually enums with one variant per screen. Payload
/// (a channel ID, a user profile) lives inside the variant and is extracted by
/// the scene factory with a `match`.
///
/// # Invariants
///
/// - Two states are equal iff they should display the same scene with the
///   same payload. Equal consecutive states never produce a transition.
/// - `scene_key()` is a pure function of the value.
pub trait StateType: Clone + Eq + fmt::Debug + Send + Sync + 'static {
    /// Key of the scene that renders this state.
    fn scene_key(&self) -> SceneKey;
}
