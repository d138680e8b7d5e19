//! Chat app fixtures on a headless stage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use statable_chat::{AppState, ChatConfig, scenes, state::SCENE_KEYS};
use statable_core::{Container, ContainerConfig, ContainerDelegate, SceneKey, SceneRegistry};

use crate::{HeadlessStage, Timeline};

/// Container on a headless stage.
pub type TestContainer = Container<AppState, HeadlessStage>;

/// `ChannelList` for `user_id`.
pub fn channels(user_id: &str) -> AppState {
    AppState::ChannelList { user_id: user_id.into() }
}

/// `ChannelCreate` for `user_id`.
pub fn create(user_id: &str) -> AppState {
    AppState::ChannelCreate { user_id: user_id.into() }
}

/// `Chat` in `channel_url`.
pub fn chat(channel_url: &str) -> AppState {
    AppState::Chat { channel_url: channel_url.into() }
}

/// `Setting` for `user_id`.
pub fn setting(user_id: &str) -> AppState {
    AppState::Setting { user_id: user_id.into() }
}

/// Registry with every chat scene except `missing`.
pub fn registry_except(config: &ChatConfig, missing: &[SceneKey]) -> SceneRegistry<AppState> {
    let mut registry = SceneRegistry::new();
    for key in SCENE_KEYS.into_iter().filter(|key| !missing.contains(key)) {
        let config = config.clone();
        registry.register(key, move |state, ctx| scenes::build_scene(state, ctx, &config));
    }
    registry
}

/// Chat container with every scene registered, plus its stage timeline.
pub fn chat_container() -> (TestContainer, Timeline) {
    container_with(scenes::registry(&ChatConfig::default()))
}

/// Container over `registry`, plus its stage timeline.
pub fn container_with(registry: SceneRegistry<AppState>) -> (TestContainer, Timeline) {
    let stage = HeadlessStage::new();
    let timeline = stage.timeline();
    (Container::new(stage, registry, ContainerConfig::default()), timeline)
}

/// Calls observed by a [`RecordingDelegate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookLog {
    /// States passed to `should_change`.
    pub asked: Vec<AppState>,
    /// States passed to `did_change`.
    pub changed: Vec<AppState>,
    /// Values passed to `did_update`.
    pub updates: Vec<bool>,
}

/// Delegate recording every hook call and vetoing states matching a
/// predicate.
pub struct RecordingDelegate {
    log: Arc<Mutex<HookLog>>,
    veto: Box<dyn Fn(&AppState) -> bool + Send>,
}

impl RecordingDelegate {
    /// Delegate vetoing every state for which `veto` returns `true`, plus a
    /// handle to its log.
    pub fn new(veto: impl Fn(&AppState) -> bool + Send + 'static) -> (Self, HookRecorder) {
        let log = Arc::new(Mutex::new(HookLog::default()));
        (Self { log: Arc::clone(&log), veto: Box::new(veto) }, HookRecorder { log })
    }

    fn lock(&self) -> MutexGuard<'_, HookLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContainerDelegate<AppState> for RecordingDelegate {
    fn should_change(&mut self, state: &AppState) -> bool {
        self.lock().asked.push(state.clone());
        !(self.veto)(state)
    }

    fn did_change(&mut self, state: &AppState) {
        self.lock().changed.push(state.clone());
    }

    fn did_update(&mut self, success: bool) {
        self.lock().updates.push(success);
    }
}

/// Read access to a [`RecordingDelegate`]'s log.
#[derive(Debug, Clone)]
pub struct HookRecorder {
    log: Arc<Mutex<HookLog>>,
}

impl HookRecorder {
    /// Copy of the log.
    pub fn log(&self) -> HookLog {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
