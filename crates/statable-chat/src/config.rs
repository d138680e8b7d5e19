//! Chat app configuration.

use std::time::Duration;

use statable_core::{ContainerConfig, DEFAULT_TRANSITION_DURATION};

/// Frames stepped per built-in animation by the logging stage.
pub const DEFAULT_FRAMES: u32 = 4;

/// Chat app configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Duration of every built-in transition.
    pub transition_duration: Duration,
    /// Delay before the splash screen advances on its own. `None` keeps the
    /// splash screen until the script moves on.
    pub splash_delay: Option<Duration>,
    /// User restored from a previous session. The splash screen advances to
    /// the channel list when set, to sign-in otherwise.
    pub signed_in_user: Option<String>,
    /// Frames logged per built-in animation.
    pub frames: u32,
    /// Container settings.
    pub container: ContainerConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            splash_delay: None,
            signed_in_user: None,
            frames: DEFAULT_FRAMES,
            container: ContainerConfig::default(),
        }
    }
}
