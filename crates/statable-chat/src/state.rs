//! Application states of the chat client.

use std::fmt;

use statable_core::{SceneKey, StateType};

/// Launch screen.
pub const SPLASH: SceneKey = SceneKey::new("Splash");
/// Sign-in screen.
pub const AUTH: SceneKey = SceneKey::new("Auth");
/// Open channels of the signed-in user.
pub const CHANNEL_LIST: SceneKey = SceneKey::new("ChannelList");
/// New channel form.
pub const CHANNEL_CREATE: SceneKey = SceneKey::new("ChannelCreate");
/// Conversation in one channel.
pub const CHAT: SceneKey = SceneKey::new("Chat");
/// Account settings.
pub const SETTING: SceneKey = SceneKey::new("Setting");

/// Every scene key the chat app registers.
pub const SCENE_KEYS: [SceneKey; 6] = [SPLASH, AUTH, CHANNEL_LIST, CHANNEL_CREATE, CHAT, SETTING];

/// Where the chat client logically is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppState {
    /// Launch screen, always the history root.
    Splash,
    /// Sign-in.
    Auth,
    /// Channels of `user_id`.
    ChannelList {
        /// Signed-in user
        user_id: String,
    },
    /// Create a channel owned by `user_id`.
    ChannelCreate {
        /// Signed-in user
        user_id: String,
    },
    /// Conversation in `channel_url`.
    Chat {
        /// Channel identifier
        channel_url: String,
    },
    /// Settings of `user_id`.
    Setting {
        /// Signed-in user
        user_id: String,
    },
}

impl AppState {
    /// User the state belongs to, for states that require one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::ChannelList { user_id }
            | Self::ChannelCreate { user_id }
            | Self::Setting { user_id } => Some(user_id),
            Self::Splash | Self::Auth | Self::Chat { .. } => None,
        }
    }
}

impl StateType for AppState {
    fn scene_key(&self) -> SceneKey {
        match self {
            Self::Splash => SPLASH,
            Self::Auth => AUTH,
            Self::ChannelList { .. } => CHANNEL_LIST,
            Self::ChannelCreate { .. } => CHANNEL_CREATE,
            Self::Chat { .. } => CHAT,
            Self::Setting { .. } => SETTING,
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Splash | Self::Auth => write!(f, "{}", self.scene_key()),
            Self::ChannelList { user_id }
            | Self::ChannelCreate { user_id }
            | Self::Setting { user_id } => write!(f, "{}({user_id})", self.scene_key()),
            Self::Chat { channel_url } => write!(f, "Chat({channel_url})"),
        }
    }
}
