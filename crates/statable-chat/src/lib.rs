//! Chat client navigation
//!
//! Drives the screens of a chat client (splash, sign-in, channel list,
//! channel form, conversation, settings) through a
//! [`statable_core::Container`] rendering on a [`LogStage`]. Scripts of
//! navigation steps stand in for user input.
//!
//! This crate only defines the app's states, scenes and stage. All
//! navigation logic lives in [`statable_core`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod app;
mod config;
pub mod scenes;
mod script;
pub mod stage;
pub mod state;

pub use app::{ChatApp, ChatDelegate, ChatError, RunReport, StepReport};
pub use config::{ChatConfig, DEFAULT_FRAMES};
pub use script::{DEFAULT_SCRIPT, ScriptError, Step, parse_script};
pub use stage::{LogStage, Overlays};
pub use state::AppState;
