//! Chat app wiring: delegate, container startup and script execution.

use statable_core::{
    Container, ContainerDelegate, NavigationOutcome, Navigator, NavigatorError, StateType,
};
use thiserror::Error;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{AppState, ChatConfig, LogStage, Overlays, ScriptError, Step, scenes};

/// Chat app errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Script could not be parsed.
    #[error("invalid script: {0}")]
    Script(#[from] ScriptError),

    /// Navigator task stopped.
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
}

/// Delegate refusing user screens without a signed-in user.
#[derive(Debug, Default)]
pub struct ChatDelegate {
    changes: usize,
}

impl ContainerDelegate<AppState> for ChatDelegate {
    fn should_change(&mut self, state: &AppState) -> bool {
        let allowed = state.user_id().is_none_or(|user_id| !user_id.is_empty());
        if !allowed {
            tracing::warn!(%state, "not signed in");
        }
        allowed
    }

    fn did_change(&mut self, state: &AppState) {
        self.changes += 1;
        tracing::info!(
            %state,
            scene = %state.scene_key(),
            changes = self.changes,
            "screen changed"
        );
    }

    fn did_update(&mut self, success: bool) {
        tracing::debug!(success, "navigation finished");
    }
}

/// Result of one script step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Step executed.
    pub step: Step,
    /// Navigation outcome. `None` for overlays.
    pub outcome: Option<NavigationOutcome>,
}

/// Result of a script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Per-step results, in script order.
    pub steps: Vec<StepReport>,
    /// History from root to top after the last step.
    pub history: Vec<AppState>,
}

/// Running chat app: a spawned container plus the overlay handle of its
/// stage.
#[derive(Debug)]
pub struct ChatApp {
    navigator: Navigator<AppState>,
    overlays: Overlays,
    task: JoinHandle<()>,
}

impl ChatApp {
    /// Spawn the container on a [`LogStage`]. Must be called from within a
    /// tokio runtime.
    pub fn start(config: &ChatConfig) -> Self {
        let overlays = Overlays::default();
        let stage = LogStage::new(overlays.clone(), config.frames, config.transition_duration);
        let container = Container::new(stage, scenes::registry(config), config.container.clone())
            .with_delegate(ChatDelegate::default());
        let (navigator, task) = container.spawn();

        Self { navigator, overlays, task }
    }

    /// Navigator driving the app.
    pub fn navigator(&self) -> &Navigator<AppState> {
        &self.navigator
    }

    /// Show the splash screen, then wait for it to advance if `wait_for_splash`
    /// is set.
    ///
    /// # Errors
    ///
    /// - `ChatError::Navigator` if the container task has stopped
    pub async fn launch(&self, wait_for_splash: bool) -> Result<NavigationOutcome, ChatError> {
        let mut updates = self.navigator.subscribe();
        let outcome = self.navigator.invoke(AppState::Splash).await?;
        if wait_for_splash && outcome.is_success() {
            wait_until_left(&mut updates, &AppState::Splash).await?;
        }
        Ok(outcome)
    }

    /// Execute `steps` in order.
    ///
    /// # Errors
    ///
    /// - `ChatError::Navigator` if the container task has stopped
    pub async fn run(&self, steps: &[Step]) -> Result<RunReport, ChatError> {
        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            let outcome = match step {
                Step::Invoke(state) => Some(self.navigator.invoke(state.clone()).await?),
                Step::Undo => Some(self.navigator.undo().await?),
                Step::Overlay(name) => {
                    self.overlays.present(name.clone());
                    None
                },
            };

            match &outcome {
                Some(NavigationOutcome::Failed(err)) => tracing::warn!(%step, %err, "step failed"),
                Some(outcome) => tracing::debug!(%step, ?outcome, "step done"),
                None => {},
            }
            reports.push(StepReport { step: step.clone(), outcome });
        }

        let history = self.navigator.history().await?;
        Ok(RunReport { steps: reports, history })
    }

    /// Stop the container task once every queued request has been applied.
    pub async fn shutdown(self) {
        drop(self.navigator);
        if let Err(err) = self.task.await {
            tracing::error!(%err, "navigator task failed");
        }
    }
}

async fn wait_until_left(
    updates: &mut broadcast::Receiver<statable_core::NavigationUpdate<AppState>>,
    state: &AppState,
) -> Result<(), ChatError> {
    loop {
        match updates.recv().await {
            Ok(update) if update.current.as_ref() != Some(state) => return Ok(()),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {},
            Err(broadcast::error::RecvError::Closed) => {
                return Err(ChatError::Navigator(NavigatorError::Closed));
            },
        }
    }
}
