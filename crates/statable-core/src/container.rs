//! Navigation container.
//!
//! The [`Container`] owns the state history, the displayed scene and the
//! [`Stage`] it renders on. It exposes exactly two mutating operations,
//! [`Container::invoke`] and [`Container::undo`], each running the full
//! navigation pipeline.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  overlays?  ┌────────────────────┐   ┌────────────────┐
//! │ Idle │────────────>│ DismissingOverlays │──>│ ResolvingScene │──┐
//! └──────┘             └────────────────────┘   └────────────────┘  │
//!    ^  ^                                        resolve failed │   │
//!    │  └───────────────────────────────────────────────────────┘   │
//!    │                                                              ↓
//!    │  ┌───────────────────┐   ┌───────────────┐   ┌────────────────┐
//!    └──│ DetachingOldScene │<──│ Transitioning │<──│ AttachingScene │
//!       └───────────────────┘   └───────────────┘   └────────────────┘
//! ```
//!
//! The stack is only mutated once the new scene is attached and the old one
//! detached, so a failed resolution leaves history and screen untouched.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::{
    Direction, NavigationError, NavigatorRef, Scene, SceneContext, SceneHandle, SceneId,
    SceneKey, SceneRegistry, Stage, StateStack, StateType, TransitionEngine, TransitionStatus,
};

/// Time a delegate or functional transition may take before it is forced.
pub const DEFAULT_TRANSITION_WATCHDOG: Duration = Duration::from_secs(5);

/// Buffered navigation updates per subscriber before the oldest are dropped.
pub const DEFAULT_UPDATE_CAPACITY: usize = 64;

/// Container configuration.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Watchdog for custom transitions. `None` waits forever.
    pub transition_watchdog: Option<Duration>,
    /// Capacity of the update broadcast channel.
    pub update_capacity: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            transition_watchdog: Some(DEFAULT_TRANSITION_WATCHDOG),
            update_capacity: DEFAULT_UPDATE_CAPACITY,
        }
    }
}

/// Step of an in-flight navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    /// No navigation in progress.
    Idle,
    /// Waiting for modal overlays to be dismissed.
    DismissingOverlays,
    /// Building the incoming scene.
    ResolvingScene,
    /// Adding the incoming scene to the stage.
    AttachingScene,
    /// Running the transition between outgoing and incoming scene.
    Transitioning,
    /// Removing the outgoing scene from the stage.
    DetachingOldScene,
}

/// Result of one `invoke` or `undo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A new scene is displayed.
    Navigated {
        /// How the transition ended
        transition: TransitionStatus,
    },
    /// The target is already displayed; its scene was re-bound.
    Unchanged,
    /// [`ContainerDelegate::should_change`] refused the target.
    Vetoed,
    /// Navigation aborted; the previous scene is still displayed.
    Failed(NavigationError),
}

impl NavigationOutcome {
    /// Value reported to [`ContainerDelegate::did_update`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Navigated { .. } | Self::Unchanged)
    }
}

/// Completion notification broadcast after every `invoke` and `undo`.
#[derive(Debug, Clone)]
pub struct NavigationUpdate<S> {
    /// What happened.
    pub outcome: NavigationOutcome,
    /// Top of the history afterwards.
    pub current: Option<S>,
}

/// Hooks customizing a [`Container`].
pub trait ContainerDelegate<S>: Send {
    /// Veto a navigation before anything changes. Not consulted by `undo`.
    fn should_change(&mut self, state: &S) -> bool {
        let _ = state;
        true
    }

    /// A new scene for `state` is displayed.
    fn did_change(&mut self, state: &S) {
        let _ = state;
    }

    /// Fired exactly once per `invoke` and `undo`.
    fn did_update(&mut self, success: bool) {
        let _ = success;
    }
}

/// Delegate accepting every navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<S> ContainerDelegate<S> for AllowAll {}

struct Displayed<S: StateType> {
    state: S,
    scene: Box<dyn Scene<S>>,
    handle: SceneHandle,
}

/// State-driven navigation container.
///
/// Maps each state to a scene through a [`SceneRegistry`], keeps a
/// [`StateStack`] of visited states and drives transitions on a [`Stage`].
///
/// # Invariants
///
/// - At most one scene is displayed between navigations, and it renders
///   [`Container::current`].
/// - The stack never contains a state whose scene failed to resolve.
/// - Navigations never overlap: both operations take `&mut self`, and
///   [`Container::spawn`](crate::Container::spawn) queues shared callers.
pub struct Container<S: StateType, T: Stage> {
    stage: T,
    registry: SceneRegistry<S>,
    delegate: Box<dyn ContainerDelegate<S>>,
    engine: TransitionEngine,
    stack: StateStack<S>,
    displayed: Option<Displayed<S>>,
    phase: NavigationPhase,
    next_scene_id: u64,
    context: SceneContext<S>,
    updates: broadcast::Sender<NavigationUpdate<S>>,
}

impl<S: StateType, T: Stage> Container<S, T> {
    /// Create an empty container. The first [`Container::invoke`] sets the
    /// root state.
    pub fn new(stage: T, registry: SceneRegistry<S>, config: ContainerConfig) -> Self {
        let (updates, _) = broadcast::channel(config.update_capacity.max(1));
        Self {
            stage,
            registry,
            delegate: Box::new(AllowAll),
            engine: TransitionEngine::new(config.transition_watchdog),
            stack: StateStack::new(),
            displayed: None,
            phase: NavigationPhase::Idle,
            next_scene_id: 0,
            context: SceneContext::default(),
            updates,
        }
    }

    /// Install navigation hooks.
    #[must_use]
    pub fn with_delegate(mut self, delegate: impl ContainerDelegate<S> + 'static) -> Self {
        self.delegate = Box::new(delegate);
        self
    }

    /// Navigate to `state`.
    ///
    /// Equal to the displayed state: re-binds the scene, no transition.
    /// Otherwise dismisses overlays, resolves and attaches the new scene,
    /// runs its transition, detaches the old scene and pushes `state`.
    pub async fn invoke(&mut self, state: S) -> NavigationOutcome {
        if let Some(busy) = self.busy() {
            return self.finish(busy);
        }

        if !self.delegate.should_change(&state) {
            tracing::debug!(?state, "navigation vetoed");
            return self.finish(NavigationOutcome::Vetoed);
        }

        if let Some(displayed) = self.displayed.as_mut()
            && displayed.state == state
        {
            displayed.scene.bind_state(&state);
            return self.finish(NavigationOutcome::Unchanged);
        }

        let outcome = self.navigate(state, Direction::Forward).await;
        self.finish(outcome)
    }

    /// Return to the previous state.
    ///
    /// At the root the displayed scene is re-bound and nothing else changes;
    /// reported as success. Before the first `invoke` it fails with
    /// [`NavigationError::EmptyHistory`].
    pub async fn undo(&mut self) -> NavigationOutcome {
        if let Some(busy) = self.busy() {
            return self.finish(busy);
        }

        let outcome = match self.stack.previous().cloned() {
            Some(previous) => self.navigate(previous, Direction::Backward).await,
            None if self.stack.is_empty() => {
                NavigationOutcome::Failed(NavigationError::EmptyHistory)
            },
            None => {
                if let Some(displayed) = self.displayed.as_mut() {
                    displayed.scene.bind_state(&displayed.state);
                }
                NavigationOutcome::Unchanged
            },
        };
        self.finish(outcome)
    }

    /// Current state. `None` before the first successful `invoke`.
    pub fn current(&self) -> Option<&S> {
        self.stack.peek()
    }

    /// Full navigation history.
    pub fn stack(&self) -> &StateStack<S> {
        &self.stack
    }

    /// Handle of the displayed scene.
    pub fn displayed(&self) -> Option<SceneHandle> {
        self.displayed.as_ref().map(|d| d.handle)
    }

    /// State the displayed scene is bound to.
    pub fn displayed_state(&self) -> Option<&S> {
        self.displayed.as_ref().map(|d| &d.state)
    }

    /// Step of the in-flight navigation.
    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    /// Stage the container renders on.
    pub fn stage(&self) -> &T {
        &self.stage
    }

    /// Mutable stage access, e.g. to present an overlay.
    pub fn stage_mut(&mut self) -> &mut T {
        &mut self.stage
    }

    /// Subscribe to completion notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationUpdate<S>> {
        self.updates.subscribe()
    }

    pub(crate) fn updates(&self) -> broadcast::Sender<NavigationUpdate<S>> {
        self.updates.clone()
    }

    pub(crate) fn set_navigator(&mut self, navigator: NavigatorRef<S>) {
        self.context = SceneContext::with_navigator(navigator);
    }

    fn busy(&self) -> Option<NavigationOutcome> {
        (self.phase != NavigationPhase::Idle).then(|| {
            tracing::error!(phase = ?self.phase, "navigation entered while another is in flight");
            NavigationOutcome::Failed(NavigationError::Busy { phase: self.phase })
        })
    }

    async fn navigate(&mut self, target: S, direction: Direction) -> NavigationOutcome {
        InFlight { container: self, incoming: None }.run(target, direction).await
    }

    fn finish(&mut self, outcome: NavigationOutcome) -> NavigationOutcome {
        self.delegate.did_update(outcome.is_success());

        // No subscribers is fine.
        let _ = self
            .updates
            .send(NavigationUpdate { outcome: outcome.clone(), current: self.current().cloned() });

        outcome
    }

    fn enter(&mut self, phase: NavigationPhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "navigation phase");
        self.phase = phase;
    }

    fn next_handle(&mut self, key: SceneKey) -> SceneHandle {
        self.next_scene_id += 1;
        SceneHandle { id: SceneId(self.next_scene_id), key }
    }
}

/// One navigation borrowing the container until it reaches `Idle`.
///
/// Dropping it early, e.g. when an `invoke` future is dropped mid-transition,
/// detaches the incoming scene, returns to `Idle` and reports the call as
/// [`NavigationError::Interrupted`]. History and the displayed scene are
/// untouched.
struct InFlight<'a, S: StateType, T: Stage> {
    container: &'a mut Container<S, T>,
    incoming: Option<SceneHandle>,
}

impl<S: StateType, T: Stage> InFlight<'_, S, T> {
    async fn run(&mut self, target: S, direction: Direction) -> NavigationOutcome {
        let container = &mut *self.container;
        if container.stage.overlay_count() > 0 {
            container.enter(NavigationPhase::DismissingOverlays);
            container.stage.dismiss_overlays().await;
        }

        container.enter(NavigationPhase::ResolvingScene);
        let scene = match container.registry.resolve(&target, &container.context) {
            Ok(scene) => scene,
            Err(err) => {
                tracing::warn!(?target, %err, "scene resolution failed");
                container.enter(NavigationPhase::Idle);
                return NavigationOutcome::Failed(err);
            },
        };

        container.enter(NavigationPhase::AttachingScene);
        let handle = container.next_handle(scene.key());
        container.stage.attach(handle);
        self.incoming = Some(handle);

        let outgoing = container.displayed.as_ref().map(|d| d.handle);
        let transition = match outgoing {
            Some(from) => {
                container.enter(NavigationPhase::Transitioning);
                let transition = scene.transition(from.key, direction);
                container
                    .engine
                    .execute(transition.as_ref(), &mut container.stage, from, handle, direction)
                    .await
            },
            None => TransitionStatus::Skipped,
        };

        if let Some(old) = container.displayed.take() {
            container.enter(NavigationPhase::DetachingOldScene);
            container.stage.detach(old.handle);
        }

        match direction {
            Direction::Forward => {
                container.stack.push(target.clone());
            },
            Direction::Backward => {
                container.stack.pop();
            },
        }

        tracing::info!(
            state = ?target,
            scene = %handle,
            ?direction,
            ?transition,
            depth = container.stack.len(),
            "navigated"
        );

        container.delegate.did_change(&target);
        container.displayed = Some(Displayed { state: target, scene, handle });
        self.incoming = None;
        container.enter(NavigationPhase::Idle);

        NavigationOutcome::Navigated { transition }
    }
}

impl<S: StateType, T: Stage> Drop for InFlight<'_, S, T> {
    fn drop(&mut self) {
        let phase = self.container.phase;
        if phase == NavigationPhase::Idle {
            return;
        }

        tracing::warn!(?phase, "navigation interrupted, rolling back");
        if let Some(handle) = self.incoming.take() {
            self.container.stage.detach(handle);
        }
        self.container.enter(NavigationPhase::Idle);
        self.container.finish(NavigationOutcome::Failed(NavigationError::Interrupted { phase }));
    }
}
