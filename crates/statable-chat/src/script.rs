//! Navigation scripts.
//!
//! A script is a comma-separated list of steps:
//!
//! | step               | effect                                  |
//! |--------------------|-----------------------------------------|
//! | `splash`, `auth`   | invoke the state                        |
//! | `channels:<user>`  | invoke `ChannelList`                    |
//! | `create:<user>`    | invoke `ChannelCreate`                  |
//! | `chat:<url>`       | invoke `Chat`                           |
//! | `setting:<user>`   | invoke `Setting`                        |
//! | `back`             | undo                                    |
//! | `overlay:<name>`   | present a modal overlay on the stage    |

use std::fmt;

use thiserror::Error;

use crate::AppState;

/// Walk through splash, sign-in and a short chat session.
pub const DEFAULT_SCRIPT: &str =
    "auth,channels:alice,chat:general,back,create:alice,back,overlay:picker,setting:alice,back";

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Navigate to a state.
    Invoke(AppState),
    /// Return to the previous state.
    Undo,
    /// Present a modal overlay.
    Overlay(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke(state) => write!(f, "invoke {state}"),
            Self::Undo => f.write_str("undo"),
            Self::Overlay(name) => write!(f, "overlay {name}"),
        }
    }
}

/// Script parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Step name not recognized.
    #[error("unknown step '{0}'")]
    UnknownStep(String),

    /// Step needs a `:<argument>` suffix.
    #[error("step '{step}' requires an argument")]
    MissingArgument {
        /// Step name
        step: String,
    },

    /// Step takes no argument.
    #[error("step '{step}' takes no argument")]
    UnexpectedArgument {
        /// Step name
        step: String,
    },
}

/// Parse a comma-separated script. Blank steps are skipped.
///
/// # Errors
///
/// - `ScriptError` for the first malformed step
pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script.split(',').map(str::trim).filter(|s| !s.is_empty()).map(parse_step).collect()
}

fn parse_step(token: &str) -> Result<Step, ScriptError> {
    let (name, arg) = match token.split_once(':') {
        Some((name, arg)) => (name.trim(), Some(arg.trim().to_owned())),
        None => (token, None),
    };

    let required = |arg: Option<String>| {
        arg.ok_or_else(|| ScriptError::MissingArgument { step: name.to_owned() })
    };
    let has_arg = arg.is_some();
    let none = |step: Step| {
        if has_arg {
            Err(ScriptError::UnexpectedArgument { step: name.to_owned() })
        } else {
            Ok(step)
        }
    };

    match name {
        "splash" => none(Step::Invoke(AppState::Splash)),
        "auth" => none(Step::Invoke(AppState::Auth)),
        "back" => none(Step::Undo),
        "channels" => Ok(Step::Invoke(AppState::ChannelList { user_id: required(arg)? })),
        "create" => Ok(Step::Invoke(AppState::ChannelCreate { user_id: required(arg)? })),
        "chat" => Ok(Step::Invoke(AppState::Chat { channel_url: required(arg)? })),
        "setting" => Ok(Step::Invoke(AppState::Setting { user_id: required(arg)? })),
        "overlay" => Ok(Step::Overlay(required(arg)?)),
        _ => Err(ScriptError::UnknownStep(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_parses() {
        let steps = parse_script(DEFAULT_SCRIPT).unwrap();

        assert_eq!(steps.first(), Some(&Step::Invoke(AppState::Auth)));
        assert_eq!(steps.iter().filter(|s| **s == Step::Undo).count(), 3);
    }

    #[test]
    fn arguments_and_whitespace() {
        let steps = parse_script(" chat: general , , back,overlay:picker ").unwrap();

        assert_eq!(steps, vec![
            Step::Invoke(AppState::Chat { channel_url: "general".into() }),
            Step::Undo,
            Step::Overlay("picker".into()),
        ]);
    }

    #[test]
    fn empty_argument_is_kept() {
        let steps = parse_script("chat:").unwrap();
        assert_eq!(steps, vec![Step::Invoke(AppState::Chat { channel_url: String::new() })]);
    }

    #[test]
    fn malformed_steps() {
        assert_eq!(parse_script("auth,fly"), Err(ScriptError::UnknownStep("fly".into())));
        assert_eq!(
            parse_script("channels"),
            Err(ScriptError::MissingArgument { step: "channels".into() })
        );
        assert_eq!(
            parse_script("back:2"),
            Err(ScriptError::UnexpectedArgument { step: "back".into() })
        );
    }
}
