//! Queue-backed handle to a spawned container.
//!
//! [`Container::spawn`] moves the container into its own task. Requests from
//! any number of [`Navigator`] clones are queued and applied one at a time in
//! arrival order, so a second `invoke` can never race an in-flight
//! transition. Scenes receive a [`NavigatorRef`], which does not keep the task
//! alive.

use std::fmt;

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    Container, NavigationOutcome, NavigationUpdate, NavigatorError, Stage, StateType,
};

enum Request<S> {
    Invoke { state: S, reply: Option<oneshot::Sender<NavigationOutcome>> },
    Undo { reply: Option<oneshot::Sender<NavigationOutcome>> },
    Current { reply: oneshot::Sender<Option<S>> },
    History { reply: oneshot::Sender<Vec<S>> },
}

/// Handle to a container running in its own task.
///
/// The task stops once every `Navigator` clone has been dropped.
pub struct Navigator<S: StateType> {
    requests: mpsc::UnboundedSender<Request<S>>,
    updates: broadcast::Sender<NavigationUpdate<S>>,
}

impl<S: StateType> Clone for Navigator<S> {
    fn clone(&self) -> Self {
        Self { requests: self.requests.clone(), updates: self.updates.clone() }
    }
}

impl<S: StateType> fmt::Debug for Navigator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator").field("closed", &self.requests.is_closed()).finish()
    }
}

impl<S: StateType> Navigator<S> {
    /// Navigate to `state` and wait for the outcome.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub async fn invoke(&self, state: S) -> Result<NavigationOutcome, NavigatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Invoke { state, reply: Some(reply) })?;
        rx.await.map_err(|_| NavigatorError::Closed)
    }

    /// Return to the previous state and wait for the outcome.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub async fn undo(&self) -> Result<NavigationOutcome, NavigatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Undo { reply: Some(reply) })?;
        rx.await.map_err(|_| NavigatorError::Closed)
    }

    /// Current state once all earlier requests have been applied.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub async fn current(&self) -> Result<Option<S>, NavigatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Current { reply })?;
        rx.await.map_err(|_| NavigatorError::Closed)
    }

    /// History from root to top once all earlier requests have been applied.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub async fn history(&self) -> Result<Vec<S>, NavigatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::History { reply })?;
        rx.await.map_err(|_| NavigatorError::Closed)
    }

    /// Queue a navigation to `state` without waiting.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub fn request(&self, state: S) -> Result<(), NavigatorError> {
        self.send(Request::Invoke { state, reply: None })
    }

    /// Queue an undo without waiting.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub fn request_undo(&self) -> Result<(), NavigatorError> {
        self.send(Request::Undo { reply: None })
    }

    /// Subscribe to completion notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationUpdate<S>> {
        self.updates.subscribe()
    }

    /// Non-owning reference for scenes.
    pub fn downgrade(&self) -> NavigatorRef<S> {
        NavigatorRef { requests: self.requests.downgrade() }
    }

    fn send(&self, request: Request<S>) -> Result<(), NavigatorError> {
        self.requests.send(request).map_err(|_| NavigatorError::Closed)
    }
}

/// Weak navigator reference handed to scenes through
/// [`crate::SceneContext`].
pub struct NavigatorRef<S: StateType> {
    requests: mpsc::WeakUnboundedSender<Request<S>>,
}

impl<S: StateType> Clone for NavigatorRef<S> {
    fn clone(&self) -> Self {
        Self { requests: self.requests.clone() }
    }
}

impl<S: StateType> fmt::Debug for NavigatorRef<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigatorRef").finish_non_exhaustive()
    }
}

impl<S: StateType> NavigatorRef<S> {
    /// Queue a navigation to `state`. Applied after the current one finishes.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub fn request(&self, state: S) -> Result<(), NavigatorError> {
        self.send(Request::Invoke { state, reply: None })
    }

    /// Queue an undo. Applied after the current navigation finishes.
    ///
    /// # Errors
    ///
    /// - `NavigatorError::Closed` if the container task has stopped
    pub fn request_undo(&self) -> Result<(), NavigatorError> {
        self.send(Request::Undo { reply: None })
    }

    fn send(&self, request: Request<S>) -> Result<(), NavigatorError> {
        let requests = self.requests.upgrade().ok_or(NavigatorError::Closed)?;
        requests.send(request).map_err(|_| NavigatorError::Closed)
    }
}

impl<S: StateType, T: Stage + 'static> Container<S, T> {
    /// Move the container into a new task and return its [`Navigator`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(mut self) -> (Navigator<S>, JoinHandle<()>) {
        let (requests, rx) = mpsc::unbounded_channel();
        let navigator = Navigator { requests, updates: self.updates() };
        self.set_navigator(navigator.downgrade());

        let task = tokio::spawn(self.serve(rx));
        (navigator, task)
    }

    async fn serve(mut self, mut rx: mpsc::UnboundedReceiver<Request<S>>) {
        while let Some(request) = rx.recv().await {
            match request {
                Request::Invoke { state, reply } => {
                    let outcome = self.invoke(state).await;
                    if let Some(reply) = reply {
                        // Requester may have given up waiting; the navigation still happened.
                        let _ = reply.send(outcome);
                    }
                },
                Request::Undo { reply } => {
                    let outcome = self.undo().await;
                    if let Some(reply) = reply {
                        let _ = reply.send(outcome);
                    }
                },
                Request::Current { reply } => {
                    let _ = reply.send(self.current().cloned());
                },
                Request::History { reply } => {
                    let _ = reply.send(self.stack().as_slice().to_vec());
                },
            }
        }
        tracing::debug!("navigator closed");
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::{
        Animation, ContainerConfig, Scene, SceneHandle, SceneKey, SceneRegistry, Transition,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Screen {
        Splash,
        Auth,
        Main,
    }

    impl StateType for Screen {
        fn scene_key(&self) -> SceneKey {
            match self {
                Self::Splash => SceneKey::new("Splash"),
                Self::Auth => SceneKey::new("Auth"),
                Self::Main => SceneKey::new("Main"),
            }
        }
    }

    struct Slow(SceneKey);

    impl Scene<Screen> for Slow {
        fn key(&self) -> SceneKey {
            self.0
        }

        fn transition(&self, _from: SceneKey, _direction: crate::Direction) -> Option<Transition> {
            Some(Transition::fade())
        }
    }

    struct SleepStage;

    impl Stage for SleepStage {
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
            tokio::time::sleep(animation.duration)
        }
    }

    fn spawn() -> (Navigator<Screen>, JoinHandle<()>) {
        let mut registry = SceneRegistry::new();
        for key in ["Splash", "Auth", "Main"] {
            registry.register(SceneKey::new(key), |state: &Screen, _| {
                Ok(Box::new(Slow(state.scene_key())))
            });
        }
        Container::new(SleepStage, registry, ContainerConfig::default()).spawn()
    }

    #[tokio::test(start_paused = true)]
    async fn queued_requests_apply_in_order() {
        let (navigator, _task) = spawn();

        navigator.request(Screen::Splash).unwrap();
        navigator.request(Screen::Auth).unwrap();
        let outcome = navigator.invoke(Screen::Main).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(navigator.history().await.unwrap(), vec![
            Screen::Splash,
            Screen::Auth,
            Screen::Main
        ]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_invokes_are_serialized() {
        let (navigator, _task) = spawn();
        navigator.invoke(Screen::Splash).await.unwrap();

        let a = navigator.clone();
        let b = navigator.clone();
        let (first, second) = tokio::join!(a.invoke(Screen::Auth), b.invoke(Screen::Main));

        assert!(first.unwrap().is_success());
        assert!(second.unwrap().is_success());
        assert_eq!(navigator.current().await.unwrap(), Some(Screen::Main));
        assert!(navigator.undo().await.unwrap().is_success());
        assert_eq!(navigator.current().await.unwrap(), Some(Screen::Auth));
    }

    #[tokio::test]
    async fn task_stops_when_navigators_drop() {
        let (navigator, task) = spawn();
        let weak = navigator.downgrade();
        drop(navigator);

        task.await.unwrap();
        assert_eq!(weak.request(Screen::Auth), Err(NavigatorError::Closed));
    }
}
