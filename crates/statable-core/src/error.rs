//! Error types for the navigation core.
//!
//! None of these escape the container as panics or `Err` returns from
//! `invoke`/`undo`: they are carried inside [`crate::NavigationOutcome`] and
//! reported through the completion channel. A failed navigation leaves the
//! current scene on screen.

use std::time::Duration;

use thiserror::Error;

use crate::{NavigationPhase, SceneKey};

/// Why a scene could not be produced for a state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No factory is registered for the state's scene key.
    #[error("no factory registered")]
    Unregistered,

    /// The factory ran but could not build the scene (missing template,
    /// payload of the wrong variant).
    #[error("instantiation failed: {0}")]
    Instantiation(String),

    /// The factory built a scene whose key differs from the requested one.
    #[error("factory produced scene {actual}")]
    KeyMismatch {
        /// Key reported by the produced scene
        actual: SceneKey,
    },
}

/// Errors that abort a navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The target state could not be turned into a scene. The stack is left
    /// unchanged.
    #[error("scene creation failed for {key}: {reason}")]
    SceneCreationFailed {
        /// Scene key declared by the target state
        key: SceneKey,
        /// Underlying factory failure
        reason: SceneError,
    },

    /// No state to navigate to: undo before the first invoke.
    #[error("navigation history is empty")]
    EmptyHistory,

    /// A navigation was started while another had not reached `Idle`.
    ///
    /// Only reachable when an `invoke`/`undo` future is leaked mid-flight
    /// without being dropped.
    #[error("container busy in phase {phase:?}")]
    Busy {
        /// Phase the unfinished navigation stopped in
        phase: NavigationPhase,
    },

    /// The `invoke`/`undo` future was dropped before the navigation finished.
    /// The incoming scene was detached and the stack left unchanged.
    #[error("navigation interrupted in phase {phase:?}")]
    Interrupted {
        /// Phase the navigation was dropped in
        phase: NavigationPhase,
    },
}

/// Broken completion contract of a delegate or functional transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The completion token was dropped without being completed.
    #[error("transition dropped its completion")]
    CompletionDropped,

    /// The transition did not complete before the watchdog fired.
    #[error("transition watchdog expired after {elapsed:?}")]
    WatchdogExpired {
        /// Watchdog duration that elapsed
        elapsed: Duration,
    },
}

/// Errors returned by [`crate::Navigator`] calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigatorError {
    /// The container task has stopped.
    #[error("navigator closed")]
    Closed,
}
