//! Displayable scenes.
//!
//! A [`Scene`] is the live screen bound to a state. Scenes are created by the
//! [`crate::SceneRegistry`] on demand, owned by the [`crate::Container`] while
//! displayed, and dropped once their exit transition has finished.
//!
//! The stage never sees scene objects directly. It receives a [`SceneHandle`]
//! (instance ID plus scene key) so that the container stays the only owner of
//! its children.

use std::fmt;

use crate::{NavigatorRef, SceneKey, StateType, Transition};

/// Direction of a navigation, used by scenes to pick a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `invoke`: moving to a new state.
    Forward,
    /// `undo`: returning to the previous state.
    Backward,
}

/// Unique ID of a scene instance within one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u64);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to a live scene handed to the [`crate::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle {
    /// Instance ID, unique per container.
    pub id: SceneId,
    /// Scene type.
    pub key: SceneKey,
}

impl fmt::Display for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key, self.id)
    }
}

/// A screen that renders one kind of state.
pub trait Scene<S: StateType>: Send {
    /// Scene type. Must match the key the factory was registered under.
    fn key(&self) -> SceneKey;

    /// Inject state payload.
    ///
    /// Called once right after creation, and again when the container is
    /// asked to navigate to the state it already displays.
    fn bind_state(&mut self, state: &S) {
        let _ = state;
    }

    /// Transition to run when this scene replaces `from`.
    ///
    /// `None` swaps the scenes without animation.
    fn transition(&self, from: SceneKey, direction: Direction) -> Option<Transition> {
        let _ = (from, direction);
        None
    }
}

/// Context handed to scene factories.
///
/// Carries a non-owning reference back to the navigator so scenes can request
/// navigation without holding on to the container.
#[derive(Debug)]
pub struct SceneContext<S: StateType> {
    navigator: Option<NavigatorRef<S>>,
}

impl<S: StateType> Default for SceneContext<S> {
    fn default() -> Self {
        Self { navigator: None }
    }
}

impl<S: StateType> Clone for SceneContext<S> {
    fn clone(&self) -> Self {
        Self { navigator: self.navigator.clone() }
    }
}

impl<S: StateType> SceneContext<S> {
    /// Context for a container driven by a [`crate::Navigator`].
    pub fn with_navigator(navigator: NavigatorRef<S>) -> Self {
        Self { navigator: Some(navigator) }
    }

    /// Back-reference to the navigator. `None` when the container is driven
    /// directly rather than spawned.
    pub fn navigator(&self) -> Option<&NavigatorRef<S>> {
        self.navigator.as_ref()
    }
}
