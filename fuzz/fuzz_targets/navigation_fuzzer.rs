//! Fuzz target for container navigation
//!
//! # Strategy
//!
//! - Arbitrary sequences of invoke, undo and overlay presentation against the
//!   chat app on a headless stage, under paused virtual time
//! - A third of the chat channels resolve to an empty URL and fail scene
//!   creation; settings of user 0 are vetoed
//!
//! # Invariants
//!
//! - Every standard navigation invariant holds after every step
//! - Failed and vetoed navigations leave the history unchanged
//! - Overlays never survive a navigation
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use statable_chat::AppState;
use statable_core::NavigationOutcome;
use statable_harness::{
    fixtures::{chat_container, RecordingDelegate},
    InvariantRegistry, NavigationSnapshot,
};

#[derive(Debug, Clone, Arbitrary)]
enum Target {
    Splash,
    Auth,
    Channels(u8),
    Create(u8),
    Chat(u8),
    Setting(u8),
}

impl Target {
    fn state(&self) -> AppState {
        let user = |id: &u8| format!("user{}", id % 4);
        match self {
            Self::Splash => AppState::Splash,
            Self::Auth => AppState::Auth,
            Self::Channels(id) => AppState::ChannelList { user_id: user(id) },
            Self::Create(id) => AppState::ChannelCreate { user_id: user(id) },
            Self::Setting(id) => AppState::Setting { user_id: user(id) },
            Self::Chat(id) => AppState::Chat {
                channel_url: if id % 3 == 0 { String::new() } else { format!("channel{}", id % 5) },
            },
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Invoke(Target),
    Undo,
    Overlay,
}

fn vetoed(state: &AppState) -> bool {
    matches!(state, AppState::Setting { user_id } if user_id == "user0")
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
    else {
        return;
    };

    runtime.block_on(async {
        let invariants = InvariantRegistry::standard();
        let (container, timeline) = chat_container();
        let (delegate, _hooks) = RecordingDelegate::new(vetoed);
        let mut container = container.with_delegate(delegate);

        for op in ops.into_iter().take(64) {
            let before = container.stack().as_slice().to_vec();
            let outcome = match op {
                Op::Invoke(target) => container.invoke(target.state()).await,
                Op::Undo => container.undo().await,
                Op::Overlay => {
                    timeline.present_overlay("overlay");
                    continue;
                }
            };

            match outcome {
                NavigationOutcome::Navigated { .. } => assert!(timeline.overlays().is_empty()),
                NavigationOutcome::Unchanged
                | NavigationOutcome::Vetoed
                | NavigationOutcome::Failed(_) => {
                    assert_eq!(container.stack().as_slice(), before.as_slice());
                }
            }
            invariants.assert_all(&NavigationSnapshot::capture(&container), "after step");
        }
    });
});
