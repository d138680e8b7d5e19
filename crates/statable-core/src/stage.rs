//! Display surface abstraction.
//!
//! The [`Stage`] trait decouples the navigation container from a concrete UI
//! toolkit. A terminal frontend, a headless test stage and a logging stage all
//! implement it, while the generic [`crate::Container`] handles all
//! orchestration.

use std::future::Future;

use crate::{Animation, SceneHandle};

/// Surface the container attaches scenes to.
///
/// # Invariants
///
/// Implementations can rely on the container to:
///
/// - attach a scene before it appears in [`Stage::animate`]
/// - detach the outgoing scene only after its animation has finished
/// - call at most one method at a time
pub trait Stage: Send {
    /// Number of modal overlays currently presented above the container.
    fn overlay_count(&self) -> usize;

    /// Dismiss every overlay, topmost first, resolving when all are gone.
    fn dismiss_overlays(&mut self) -> impl Future<Output = ()> + Send;

    /// Add a scene to the container's child hierarchy, filling its bounds.
    fn attach(&mut self, scene: SceneHandle);

    /// Remove a scene from the child hierarchy.
    fn detach(&mut self, scene: SceneHandle);

    /// Play `animation` from `from` to `to`, resolving when it has finished.
    fn animate(
        &mut self,
        animation: Animation,
        from: SceneHandle,
        to: SceneHandle,
    ) -> impl Future<Output = ()> + Send;
}
