//! Stage that renders navigation as structured log output.

use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use statable_core::{Animation, SceneHandle, Stage};

/// Modal overlays shown above the container.
///
/// Cloneable handle shared between the stage and whoever presents overlays.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    stack: Arc<Mutex<Vec<String>>>,
}

impl Overlays {
    /// Present `name` on top of every other overlay.
    pub fn present(&self, name: impl Into<String>) {
        let name = name.into();
        tracing::info!(overlay = %name, "overlay presented");
        self.lock().push(name);
    }

    /// Number of overlays presented.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no overlay is presented.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stage logging every attach, detach and animation frame.
#[derive(Debug)]
pub struct LogStage {
    overlays: Overlays,
    attached: Vec<SceneHandle>,
    frames: u32,
    dismiss_duration: Duration,
}

impl LogStage {
    /// Stage stepping `frames` frames per animation and spending
    /// `dismiss_duration` on each overlay dismissal.
    pub fn new(overlays: Overlays, frames: u32, dismiss_duration: Duration) -> Self {
        Self { overlays, attached: Vec::new(), frames: frames.max(1), dismiss_duration }
    }

    /// Scenes currently attached, oldest first.
    pub fn attached(&self) -> &[SceneHandle] {
        &self.attached
    }
}

impl Stage for LogStage {
    fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    fn dismiss_overlays(&mut self) -> impl Future<Output = ()> + Send {
        let overlays = self.overlays.take();
        let duration = self.dismiss_duration;
        async move {
            for overlay in overlays.iter().rev() {
                tokio::time::sleep(duration).await;
                tracing::info!(%overlay, "overlay dismissed");
            }
        }
    }

    fn attach(&mut self, scene: SceneHandle) {
        tracing::info!(%scene, "attach");
        self.attached.push(scene);
    }

    fn detach(&mut self, scene: SceneHandle) {
        tracing::info!(%scene, "detach");
        self.attached.retain(|attached| *attached != scene);
    }

    fn animate(
        &mut self,
        animation: Animation,
        from: SceneHandle,
        to: SceneHandle,
    ) -> impl Future<Output = ()> + Send {
        let frames = self.frames;
        async move {
            let keyframes = animation.keyframes();
            let step = animation.duration / frames;
            tracing::info!(
                kind = %animation.kind,
                %from,
                %to,
                layering = ?animation.layering(),
                "animate"
            );

            for frame in 1..=frames {
                tokio::time::sleep(step).await;
                let progress = frame as f32 / frames as f32;
                tracing::debug!(
                    frame,
                    incoming = ?keyframes.incoming.at(progress),
                    outgoing = ?keyframes.outgoing.at(progress),
                    "frame"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use statable_core::{AnimationKind, SceneId, SceneKey};

    use super::*;

    fn handle(id: u64, key: &'static str) -> SceneHandle {
        SceneHandle { id: SceneId(id), key: SceneKey::new(key) }
    }

    #[tokio::test(start_paused = true)]
    async fn dismissal_empties_overlays() {
        let overlays = Overlays::default();
        let mut stage = LogStage::new(overlays.clone(), 2, Duration::from_millis(100));
        overlays.present("picker");
        overlays.present("alert");
        assert_eq!(stage.overlay_count(), 2);

        let started = tokio::time::Instant::now();
        stage.dismiss_overlays().await;

        assert!(overlays.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn animation_spans_its_duration() {
        let mut stage = LogStage::new(Overlays::default(), 3, Duration::ZERO);
        let (from, to) = (handle(1, "Splash"), handle(2, "Auth"));
        stage.attach(from);
        stage.attach(to);

        let started = tokio::time::Instant::now();
        let animation =
            Animation { kind: AnimationKind::Push, duration: Duration::from_millis(300) };
        stage.animate(animation, from, to).await;
        stage.detach(from);

        assert!(started.elapsed() >= Duration::from_millis(300));
        assert_eq!(stage.attached(), [to]);
    }
}
