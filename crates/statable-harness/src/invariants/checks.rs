//! Standard navigation invariants.

use statable_core::{NavigationPhase, StateType};

use super::{Invariant, InvariantResult, NavigationSnapshot, Violation};

/// No state sits directly on top of an equal state.
///
/// Invoking the displayed state is a no-op, so history never records the
/// same state twice in a row.
pub struct NoAdjacentDuplicates;

impl Invariant for NoAdjacentDuplicates {
    fn name(&self) -> &'static str {
        "NoAdjacentDuplicates"
    }

    fn check(&self, snapshot: &NavigationSnapshot) -> InvariantResult {
        match snapshot.history.windows(2).position(|pair| pair[0] == pair[1]) {
            Some(index) => Err(Violation {
                invariant: self.name(),
                message: format!("{} repeated at depth {}", snapshot.history[index], index + 1),
            }),
            None => Ok(()),
        }
    }
}

/// The displayed scene renders the top of the history.
///
/// Both are absent before the first navigation, and both present after. The
/// scene key must match, and so must the bound state when it is known.
pub struct DisplayedMatchesTop;

impl Invariant for DisplayedMatchesTop {
    fn name(&self) -> &'static str {
        "DisplayedMatchesTop"
    }

    fn check(&self, snapshot: &NavigationSnapshot) -> InvariantResult {
        let top = snapshot.history.last();
        match (top, snapshot.displayed) {
            (None, None) => Ok(()),
            (Some(top), Some(displayed))
                if top.scene_key() == displayed.key
                    && snapshot.bound.as_ref().is_none_or(|bound| bound == top) =>
            {
                Ok(())
            },
            (top, displayed) => Err(Violation {
                invariant: self.name(),
                message: format!(
                    "top {top:?} displayed as {displayed:?} bound to {:?}",
                    snapshot.bound
                ),
            }),
        }
    }
}

/// Between navigations the stage holds exactly the displayed scene.
pub struct SingleAttachedScene;

impl Invariant for SingleAttachedScene {
    fn name(&self) -> &'static str {
        "SingleAttachedScene"
    }

    fn check(&self, snapshot: &NavigationSnapshot) -> InvariantResult {
        let expected: Vec<_> = snapshot.displayed.into_iter().collect();
        if snapshot.attached == expected {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!("attached {:?}, displayed {:?}", snapshot.attached, expected),
            })
        }
    }
}

/// No navigation is left half-done.
pub struct IdleBetweenNavigations;

impl Invariant for IdleBetweenNavigations {
    fn name(&self) -> &'static str {
        "IdleBetweenNavigations"
    }

    fn check(&self, snapshot: &NavigationSnapshot) -> InvariantResult {
        if snapshot.phase == NavigationPhase::Idle {
            Ok(())
        } else {
            Err(Violation {
                invariant: self.name(),
                message: format!("stuck in {:?}", snapshot.phase),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use statable_chat::AppState;
    use statable_core::{SceneHandle, SceneId};

    use super::*;

    fn handle(id: u64, state: &AppState) -> SceneHandle {
        SceneHandle { id: SceneId(id), key: state.scene_key() }
    }

    #[test]
    fn adjacent_duplicate_is_reported() {
        let snapshot = NavigationSnapshot {
            history: vec![AppState::Splash, AppState::Auth, AppState::Auth],
            ..NavigationSnapshot::default()
        };

        let violation = NoAdjacentDuplicates.check(&snapshot).unwrap_err();
        assert_eq!(violation.message, "Auth repeated at depth 2");
    }

    #[test]
    fn stale_scene_is_reported() {
        let splash = handle(1, &AppState::Splash);
        let snapshot = NavigationSnapshot {
            history: vec![AppState::Splash, AppState::Auth],
            displayed: Some(splash),
            attached: vec![splash],
            ..NavigationSnapshot::default()
        };

        assert!(DisplayedMatchesTop.check(&snapshot).is_err());
        assert!(SingleAttachedScene.check(&snapshot).is_ok());
    }

    #[test]
    fn scene_bound_to_other_payload_is_reported() {
        let general = AppState::Chat { channel_url: "general".into() };
        let random = AppState::Chat { channel_url: "random".into() };
        let chat = handle(2, &general);
        let snapshot = NavigationSnapshot {
            history: vec![AppState::Splash, random.clone()],
            displayed: Some(chat),
            bound: Some(general),
            attached: vec![chat],
            ..NavigationSnapshot::default()
        };

        let violation = DisplayedMatchesTop.check(&snapshot).unwrap_err();
        assert!(violation.message.contains("\"general\""));

        let current = NavigationSnapshot { bound: Some(random), ..snapshot };
        assert!(DisplayedMatchesTop.check(&current).is_ok());
    }

    #[test]
    fn leftover_scene_is_reported() {
        let splash = handle(1, &AppState::Splash);
        let auth = handle(2, &AppState::Auth);
        let snapshot = NavigationSnapshot {
            history: vec![AppState::Splash, AppState::Auth],
            displayed: Some(auth),
            attached: vec![splash, auth],
            phase: NavigationPhase::DetachingOldScene,
            ..NavigationSnapshot::default()
        };

        assert!(SingleAttachedScene.check(&snapshot).is_err());
        assert!(IdleBetweenNavigations.check(&snapshot).is_err());
    }
}
