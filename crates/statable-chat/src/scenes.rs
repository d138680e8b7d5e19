//! Chat app scenes and their registration.
//!
//! Every scene picks its own entry transition from the scene it replaces:
//!
//! ```text
//! Splash ──fade──> Auth ──fade──> ChannelList ──push──> Chat / Setting
//!                                      │   ^
//!                                present  dismiss
//!                                      v   │
//!                                 ChannelCreate
//! ```
//!
//! Going back pops, except when leaving the modal channel form, which is
//! dismissed. The splash screen always fades in unscaled.

use std::time::Duration;

use statable_core::{
    Direction, NavigatorRef, Scene, SceneContext, SceneError, SceneKey, SceneRegistry, Transition,
};
use tokio::task::AbortHandle;

use crate::{
    AppState, ChatConfig,
    state::{AUTH, CHANNEL_CREATE, CHANNEL_LIST, CHAT, SCENE_KEYS, SETTING, SPLASH},
};

/// Initial scale of a scene faded in from a launch screen.
const FADE_SCALE: f32 = 0.95;

/// Initial scale of the splash screen fading back in.
const SPLASH_FADE_SCALE: f32 = 1.0;

/// Transition policy shared by all chat scenes.
#[derive(Debug, Clone, Copy)]
pub struct TransitionStyle {
    duration: Duration,
}

impl TransitionStyle {
    /// Policy running every built-in animation for `duration`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Transition shown when a scene of type `to` replaces `from`.
    pub fn pick(&self, to: SceneKey, from: SceneKey, direction: Direction) -> Transition {
        let duration = self.duration;
        match direction {
            _ if to == SPLASH => Transition::Fade { scale: SPLASH_FADE_SCALE, duration },
            Direction::Forward if to == CHANNEL_CREATE => Transition::Present { duration },
            Direction::Forward if from == SPLASH || from == AUTH => {
                Transition::Fade { scale: FADE_SCALE, duration }
            },
            Direction::Forward => Transition::Push { duration },
            Direction::Backward if from == CHANNEL_CREATE => Transition::Dismiss { duration },
            Direction::Backward => Transition::Pop { duration },
        }
    }
}

struct Advance {
    navigator: NavigatorRef<AppState>,
    delay: Duration,
    next: AppState,
}

/// Launch screen. Advances on its own when spawned under a navigator with a
/// splash delay configured.
///
/// The timer is owned by the scene: displacing the scene cancels it.
pub struct SplashScene {
    advance: Option<Advance>,
    timer: Option<AbortHandle>,
    style: TransitionStyle,
}

impl SplashScene {
    fn new(ctx: &SceneContext<AppState>, config: &ChatConfig, style: TransitionStyle) -> Self {
        let advance = match (ctx.navigator(), config.splash_delay) {
            (Some(navigator), Some(delay)) => Some(Advance {
                navigator: navigator.clone(),
                delay,
                next: match &config.signed_in_user {
                    Some(user_id) => AppState::ChannelList { user_id: user_id.clone() },
                    None => AppState::Auth,
                },
            }),
            _ => None,
        };
        Self { advance, timer: None, style }
    }
}

impl Drop for SplashScene {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Scene<AppState> for SplashScene {
    fn key(&self) -> SceneKey {
        SPLASH
    }

    fn bind_state(&mut self, _state: &AppState) {
        let Some(Advance { navigator, delay, next }) = self.advance.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no runtime, splash screen will not advance");
            return;
        };

        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%next, "splash finished");
            if let Err(err) = navigator.request(next) {
                tracing::debug!(%err, "splash advance dropped");
            }
        });
        self.timer = Some(timer.abort_handle());
    }

    fn transition(&self, from: SceneKey, direction: Direction) -> Option<Transition> {
        Some(self.style.pick(SPLASH, from, direction))
    }
}

/// Sign-in screen.
pub struct AuthScene {
    style: TransitionStyle,
}

impl Scene<AppState> for AuthScene {
    fn key(&self) -> SceneKey {
        AUTH
    }

    fn transition(&self, from: SceneKey, direction: Direction) -> Option<Transition> {
        Some(self.style.pick(AUTH, from, direction))
    }
}

/// Scene showing data of one user: channel list, channel form or settings.
pub struct UserScene {
    key: SceneKey,
    user_id: String,
    style: TransitionStyle,
}

impl Scene<AppState> for UserScene {
    fn key(&self) -> SceneKey {
        self.key
    }

    fn bind_state(&mut self, state: &AppState) {
        if let Some(user_id) = state.user_id() {
            user_id.clone_into(&mut self.user_id);
        }
        tracing::debug!(scene = %self.key, user_id = %self.user_id, "bound");
    }

    fn transition(&self, from: SceneKey, direction: Direction) -> Option<Transition> {
        Some(self.style.pick(self.key, from, direction))
    }
}

/// Conversation screen.
pub struct ChatScene {
    channel_url: String,
    style: TransitionStyle,
}

impl Scene<AppState> for ChatScene {
    fn key(&self) -> SceneKey {
        CHAT
    }

    fn bind_state(&mut self, state: &AppState) {
        if let AppState::Chat { channel_url } = state {
            channel_url.clone_into(&mut self.channel_url);
        }
        tracing::debug!(channel_url = %self.channel_url, "entered channel");
    }

    fn transition(&self, from: SceneKey, direction: Direction) -> Option<Transition> {
        Some(self.style.pick(CHAT, from, direction))
    }
}

/// Build the scene for `state`.
///
/// # Errors
///
/// - `SceneError::Instantiation` if the state payload cannot back a scene
pub fn build_scene(
    state: &AppState,
    ctx: &SceneContext<AppState>,
    config: &ChatConfig,
) -> Result<Box<dyn Scene<AppState>>, SceneError> {
    let style = TransitionStyle::new(config.transition_duration);
    let scene: Box<dyn Scene<AppState>> = match state {
        AppState::Splash => Box::new(SplashScene::new(ctx, config, style)),
        AppState::Auth => Box::new(AuthScene { style }),
        AppState::ChannelList { user_id } => {
            Box::new(UserScene { key: CHANNEL_LIST, user_id: user_id.clone(), style })
        },
        AppState::ChannelCreate { user_id } => {
            Box::new(UserScene { key: CHANNEL_CREATE, user_id: user_id.clone(), style })
        },
        AppState::Setting { user_id } => {
            Box::new(UserScene { key: SETTING, user_id: user_id.clone(), style })
        },
        AppState::Chat { channel_url } if channel_url.is_empty() => {
            return Err(SceneError::Instantiation("chat requires a channel url".into()));
        },
        AppState::Chat { channel_url } => {
            Box::new(ChatScene { channel_url: channel_url.clone(), style })
        },
    };
    Ok(scene)
}

/// Register a factory for every chat scene.
pub fn register_all(registry: &mut SceneRegistry<AppState>, config: &ChatConfig) {
    for key in SCENE_KEYS {
        let config = config.clone();
        registry.register(key, move |state, ctx| build_scene(state, ctx, &config));
    }
}

/// Registry with every chat scene registered.
pub fn registry(config: &ChatConfig) -> SceneRegistry<AppState> {
    let mut registry = SceneRegistry::new();
    register_all(&mut registry, config);
    registry
}

#[cfg(test)]
mod tests {
    use statable_core::{AnimationKind, NavigationError, StateType};

    use super::*;

    fn chat(url: &str) -> AppState {
        AppState::Chat { channel_url: url.into() }
    }

    #[test]
    fn transitions_follow_navigation_graph() {
        let style = TransitionStyle::new(Duration::from_millis(100));
        let kind =
            |to, from, direction| style.pick(to, from, direction).animation().map(|a| a.kind);

        assert_eq!(
            kind(AUTH, SPLASH, Direction::Forward),
            Some(AnimationKind::Fade { scale: FADE_SCALE })
        );
        assert_eq!(kind(CHAT, CHANNEL_LIST, Direction::Forward), Some(AnimationKind::Push));
        assert_eq!(
            kind(CHANNEL_CREATE, CHANNEL_LIST, Direction::Forward),
            Some(AnimationKind::Present)
        );
        assert_eq!(
            kind(CHANNEL_LIST, CHANNEL_CREATE, Direction::Backward),
            Some(AnimationKind::Dismiss)
        );
        assert_eq!(kind(CHANNEL_LIST, CHAT, Direction::Backward), Some(AnimationKind::Pop));
        assert_eq!(
            kind(SPLASH, AUTH, Direction::Backward),
            Some(AnimationKind::Fade { scale: SPLASH_FADE_SCALE })
        );
    }

    #[test]
    fn registry_resolves_every_state() {
        let registry = registry(&ChatConfig::default());
        let ctx = SceneContext::default();

        assert_eq!(registry.len(), SCENE_KEYS.len());
        for state in [AppState::Splash, AppState::Auth, chat("general")] {
            let scene = registry.resolve(&state, &ctx).unwrap();
            assert_eq!(scene.key(), state.scene_key());
        }
    }

    #[test]
    fn empty_channel_url_fails_resolution() {
        let registry = registry(&ChatConfig::default());

        let err = registry.resolve(&chat(""), &SceneContext::default()).err().unwrap();
        assert!(matches!(
            err,
            NavigationError::SceneCreationFailed { key: CHAT, reason: SceneError::Instantiation(_) }
        ));
    }

    #[test]
    fn splash_without_navigator_stays_put() {
        let config = ChatConfig { splash_delay: Some(Duration::ZERO), ..ChatConfig::default() };
        let style = TransitionStyle::new(config.transition_duration);
        let mut scene = SplashScene::new(&SceneContext::default(), &config, style);

        assert!(scene.advance.is_none());
        scene.bind_state(&AppState::Splash);
        assert!(scene.timer.is_none());
        assert_eq!(scene.key(), SPLASH);
    }
}
