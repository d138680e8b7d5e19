//! Transition engine.
//!
//! Runs one [`Transition`] between an outgoing and an incoming scene and
//! resolves once the handoff is over. Built-in animations are played by the
//! [`Stage`]; delegate and functional transitions receive a [`Completion`]
//! token and the engine waits for it, bounded by an optional watchdog.

use std::time::Duration;

use crate::{
    Completion, Direction, SceneHandle, Stage, Transition, TransitionContext, TransitionError,
};

/// How a transition ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionStatus {
    /// No outgoing scene, or the incoming scene declared no transition.
    Skipped,
    /// The transition ran to completion.
    Completed,
    /// A custom transition broke its completion contract. The navigation was
    /// finalized anyway.
    Forced(TransitionError),
}

/// Executes transitions on a [`Stage`].
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    watchdog: Option<Duration>,
}

impl TransitionEngine {
    /// Create an engine. `watchdog` bounds how long custom transitions may
    /// take to complete; `None` waits forever.
    pub fn new(watchdog: Option<Duration>) -> Self {
        Self { watchdog }
    }

    /// Run `transition` from `from` to `to`.
    ///
    /// Both scenes must already be attached to `stage`. Resolves exactly once,
    /// after the animation or custom transition has finished.
    pub async fn execute<T: Stage>(
        &self,
        transition: Option<&Transition>,
        stage: &mut T,
        from: SceneHandle,
        to: SceneHandle,
        direction: Direction,
    ) -> TransitionStatus {
        let Some(transition) = transition else {
            return TransitionStatus::Skipped;
        };

        tracing::debug!(
            transition = transition.name(),
            %from,
            %to,
            ?direction,
            "transition started"
        );

        let ctx = TransitionContext { from: from.key, to: to.key, direction };
        let status = match transition {
            Transition::Paste => TransitionStatus::Completed,
            Transition::Delegate(delegate) => {
                let (completion, done) = Completion::channel();
                delegate.execute(ctx, completion);
                self.wait(done).await
            },
            Transition::Functional(f) => {
                let (completion, done) = Completion::channel();
                f(ctx, completion);
                self.wait(done).await
            },
            Transition::Push { .. }
            | Transition::Pop { .. }
            | Transition::Present { .. }
            | Transition::Dismiss { .. }
            | Transition::Fade { .. } => {
                if let Some(animation) = transition.animation() {
                    stage.animate(animation, from, to).await;
                }
                TransitionStatus::Completed
            },
        };

        if let TransitionStatus::Forced(err) = &status {
            tracing::warn!(transition = transition.name(), %from, %to, %err, "transition forced");
        }
        status
    }

    async fn wait(&self, done: tokio::sync::oneshot::Receiver<()>) -> TransitionStatus {
        let result = match self.watchdog {
            Some(limit) => match tokio::time::timeout(limit, done).await {
                Ok(result) => result,
                Err(_) => {
                    return TransitionStatus::Forced(TransitionError::WatchdogExpired {
                        elapsed: limit,
                    });
                },
            },
            None => done.await,
        };

        match result {
            Ok(()) => TransitionStatus::Completed,
            Err(_) => TransitionStatus::Forced(TransitionError::CompletionDropped),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, time::Duration};

    use super::*;
    use crate::{Animation, SceneId, SceneKey, TransitionDelegate};

    #[derive(Default)]
    struct RecordingStage {
        animations: Vec<Animation>,
    }

    impl Stage for RecordingStage {
        fn overlay_count(&self) -> usize {
            0
        }

        fn dismiss_overlays(&mut self) -> impl Future<Output = ()> + Send {
            async {}
        }

        fn attach(&mut self, _scene: SceneHandle) {}

        fn detach(&mut self, _scene: SceneHandle) {}

        fn animate(
            &mut self,
            animation: Animation,
            _from: SceneHandle,
            _to: SceneHandle,
        ) -> impl Future<Output = ()> + Send {
            self.animations.push(animation);
            tokio::time::sleep(animation.duration)
        }
    }

    fn handles() -> (SceneHandle, SceneHandle) {
        (
            SceneHandle { id: SceneId(1), key: SceneKey::new("Auth") },
            SceneHandle { id: SceneId(2), key: SceneKey::new("Main") },
        )
    }

    async fn run(engine: &TransitionEngine, transition: Option<&Transition>) -> TransitionStatus {
        let (from, to) = handles();
        let mut stage = RecordingStage::default();
        engine.execute(transition, &mut stage, from, to, Direction::Forward).await
    }

    #[tokio::test(start_paused = true)]
    async fn built_in_transition_plays_on_stage() {
        let engine = TransitionEngine::new(None);
        let (from, to) = handles();
        let mut stage = RecordingStage::default();

        let started = tokio::time::Instant::now();
        let status = engine
            .execute(Some(&Transition::push()), &mut stage, from, to, Direction::Forward)
            .await;

        assert_eq!(status, TransitionStatus::Completed);
        assert_eq!(stage.animations.len(), 1);
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn paste_and_missing_transition_complete_immediately() {
        let engine = TransitionEngine::new(None);
        assert_eq!(run(&engine, Some(&Transition::Paste)).await, TransitionStatus::Completed);
        assert_eq!(run(&engine, None).await, TransitionStatus::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn functional_transition_may_complete_later() {
        let engine = TransitionEngine::new(Some(Duration::from_secs(5)));
        let transition = Transition::functional(|ctx, completion| {
            assert_eq!(ctx.to, SceneKey::new("Main"));
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                completion.complete();
            });
        });

        assert_eq!(run(&engine, Some(&transition)).await, TransitionStatus::Completed);
    }

    #[tokio::test]
    async fn dropped_completion_is_forced() {
        let engine = TransitionEngine::new(None);
        let transition = Transition::functional(|_, completion| drop(completion));

        assert_eq!(
            run(&engine, Some(&transition)).await,
            TransitionStatus::Forced(TransitionError::CompletionDropped)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_forces_hung_delegate() {
        struct Hang(std::sync::Mutex<Vec<Completion>>);

        impl TransitionDelegate for Hang {
            fn execute(&self, _ctx: TransitionContext, completion: Completion) {
                // Keep the token alive but never complete it.
                self.0.lock().unwrap().push(completion);
            }
        }

        let limit = Duration::from_secs(2);
        let engine = TransitionEngine::new(Some(limit));
        let transition = Transition::delegate(Hang(std::sync::Mutex::default()));

        assert_eq!(
            run(&engine, Some(&transition)).await,
            TransitionStatus::Forced(TransitionError::WatchdogExpired { elapsed: limit })
        );
    }
}
