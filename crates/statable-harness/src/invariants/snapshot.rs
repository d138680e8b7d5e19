//! Observable navigation state.
//!
//! Snapshots capture the container and its stage at one point in time so
//! invariants run against a consistent view.

use statable_chat::AppState;
use statable_core::{Container, NavigationPhase, SceneHandle};

use crate::{HeadlessStage, Timeline};

/// Snapshot of a container and its stage.
#[derive(Debug, Clone)]
pub struct NavigationSnapshot {
    /// History from root to top.
    pub history: Vec<AppState>,
    /// Scene the container reports as displayed.
    pub displayed: Option<SceneHandle>,
    /// State the displayed scene is bound to. `None` when not observable.
    pub bound: Option<AppState>,
    /// Scenes attached to the stage, oldest first.
    pub attached: Vec<SceneHandle>,
    /// Navigation step the container is in.
    pub phase: NavigationPhase,
}

impl Default for NavigationSnapshot {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            displayed: None,
            bound: None,
            attached: Vec::new(),
            phase: NavigationPhase::Idle,
        }
    }
}

impl NavigationSnapshot {
    /// Capture a container driven directly.
    pub fn capture(container: &Container<AppState, HeadlessStage>) -> Self {
        Self {
            history: container.stack().as_slice().to_vec(),
            displayed: container.displayed(),
            bound: container.displayed_state().cloned(),
            attached: container.stage().timeline().attached(),
            phase: container.phase(),
        }
    }

    /// Reconstruct from what a navigator exposes: its history and the stage
    /// timeline. Only valid once the navigator is idle; the newest attached
    /// scene stands in for the displayed one, whose bound state is unknown.
    pub fn observe(history: Vec<AppState>, timeline: &Timeline) -> Self {
        let attached = timeline.attached();
        let displayed = attached.last().copied();
        Self { history, displayed, bound: None, attached, phase: NavigationPhase::Idle }
    }
}
