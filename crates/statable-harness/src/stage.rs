//! Headless stage recording every operation to a shared timeline.
//!
//! `HeadlessStage` implements [`Stage`] so the same
//! [`statable_core::Container`] orchestration code runs in production and in
//! tests. Animations take their full duration in (virtual) time, which lets
//! tests observe what is attached mid-transition.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use statable_core::{Animation, AnimationKind, SceneHandle, Stage};

/// One recorded stage operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    /// Scene added to the child hierarchy.
    Attached(SceneHandle),
    /// Scene removed from the child hierarchy.
    Detached(SceneHandle),
    /// Built-in animation played.
    Animated {
        /// Animation kind
        kind: AnimationKind,
        /// Outgoing scene
        from: SceneHandle,
        /// Incoming scene
        to: SceneHandle,
    },
    /// Overlay presented above the container.
    OverlayPresented(String),
    /// Overlay dismissed by the container.
    OverlayDismissed(String),
}

impl fmt::Display for StageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attached(scene) => write!(f, "attach {scene}"),
            Self::Detached(scene) => write!(f, "detach {scene}"),
            Self::Animated { kind, from, to } => write!(f, "{kind} {from} -> {to}"),
            Self::OverlayPresented(name) => write!(f, "overlay {name}"),
            Self::OverlayDismissed(name) => write!(f, "dismiss {name}"),
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    events: Vec<StageEvent>,
    attached: Vec<SceneHandle>,
    overlays: Vec<String>,
}

/// Shared view of a [`HeadlessStage`].
///
/// Stays usable after the stage has moved into a container or a navigator
/// task.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    shared: Arc<Mutex<Shared>>,
}

impl Timeline {
    /// Present an overlay the next navigation will have to dismiss.
    pub fn present_overlay(&self, name: impl Into<String>) {
        let name = name.into();
        let mut shared = self.lock();
        shared.events.push(StageEvent::OverlayPresented(name.clone()));
        shared.overlays.push(name);
    }

    /// Every event recorded so far.
    pub fn events(&self) -> Vec<StageEvent> {
        self.lock().events.clone()
    }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<StageEvent> {
        std::mem::take(&mut self.lock().events)
    }

    /// Recorded events, one line each.
    pub fn render(&self) -> String {
        self.lock().events.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }

    /// Scenes currently attached, oldest first.
    pub fn attached(&self) -> Vec<SceneHandle> {
        self.lock().attached.clone()
    }

    /// Overlays currently presented.
    pub fn overlays(&self) -> Vec<String> {
        self.lock().overlays.clone()
    }

    /// Number of animations played so far.
    pub fn animation_count(&self) -> usize {
        self.lock().events.iter().filter(|e| matches!(e, StageEvent::Animated { .. })).count()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stage without a display.
#[derive(Debug, Default)]
pub struct HeadlessStage {
    timeline: Timeline,
}

impl HeadlessStage {
    /// Create a stage with an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of this stage.
    pub fn timeline(&self) -> Timeline {
        self.timeline.clone()
    }
}

impl Stage for HeadlessStage {
    fn overlay_count(&self) -> usize {
        self.timeline.lock().overlays.len()
    }

    fn dismiss_overlays(&mut self) -> impl Future<Output = ()> + Send {
        let mut shared = self.timeline.lock();
        while let Some(name) = shared.overlays.pop() {
            shared.events.push(StageEvent::OverlayDismissed(name));
        }
        std::future::ready(())
    }

    fn attach(&mut self, scene: SceneHandle) {
        let mut shared = self.timeline.lock();
        shared.events.push(StageEvent::Attached(scene));
        shared.attached.push(scene);
    }

    fn detach(&mut self, scene: SceneHandle) {
        let mut shared = self.timeline.lock();
        shared.events.push(StageEvent::Detached(scene));
        shared.attached.retain(|attached| *attached != scene);
    }

    fn animate(
        &mut self,
        animation: Animation,
        from: SceneHandle,
        to: SceneHandle,
    ) -> impl Future<Output = ()> + Send {
        self.timeline.lock().events.push(StageEvent::Animated { kind: animation.kind, from, to });
        tracing::trace!(kind = %animation.kind, %from, %to, "animating");
        tokio::time::sleep(animation.duration)
    }
}

#[cfg(test)]
mod tests {
    use statable_core::{SceneId, SceneKey};

    use super::*;

    fn handle(id: u64, key: &'static str) -> SceneHandle {
        SceneHandle { id: SceneId(id), key: SceneKey::new(key) }
    }

    #[tokio::test]
    async fn overlays_dismissed_topmost_first() {
        let mut stage = HeadlessStage::new();
        let timeline = stage.timeline();
        timeline.present_overlay("picker");
        timeline.present_overlay("alert");
        assert_eq!(stage.overlay_count(), 2);

        stage.dismiss_overlays().await;

        assert_eq!(stage.overlay_count(), 0);
        assert_eq!(
            timeline.render(),
            "overlay picker\noverlay alert\ndismiss alert\ndismiss picker"
        );
    }

    #[test]
    fn attach_and_detach_track_children() {
        let mut stage = HeadlessStage::new();
        let timeline = stage.timeline();
        stage.attach(handle(1, "Splash"));
        stage.attach(handle(2, "Auth"));
        stage.detach(handle(1, "Splash"));

        assert_eq!(timeline.attached(), vec![handle(2, "Auth")]);
        assert_eq!(timeline.take().len(), 3);
        assert!(timeline.events().is_empty());
    }
}
