//! State-driven scene navigation.
//!
//! Maps application state values to scenes, keeps a back-stack of visited
//! states and drives transitions between scenes, decoupling "what state the
//! app is in" from "what is on screen".
//!
//! # Components
//!
//! - [`StateStack`]: undo-capable history that never empties once rooted
//! - [`SceneRegistry`]: explicit state-to-scene factory table
//! - [`TransitionEngine`]: runs a [`Transition`] on a [`Stage`]
//! - [`Container`]: orchestrates one navigation as a single operation
//! - [`Navigator`]: queue-backed handle serializing requests to a container
//!
//! # Example
//!
//! ```ignore
//! let registry = SceneRegistry::new()
//!     .with(SPLASH, |_, _| Ok(Box::new(SplashScene::default())))
//!     .with(CHAT, |state, ctx| ChatScene::build(state, ctx));
//!
//! let container = Container::new(stage, registry, ContainerConfig::default());
//! let (navigator, _task) = container.spawn();
//!
//! navigator.invoke(AppState::Splash).await?;
//! navigator.invoke(AppState::Chat { channel }).await?;
//! navigator.undo().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod container;
mod engine;
mod error;
mod navigator;
mod registry;
mod scene;
mod stack;
mod stage;
mod state;
mod transition;

pub use container::{
    AllowAll, Container, ContainerConfig, ContainerDelegate, DEFAULT_TRANSITION_WATCHDOG,
    DEFAULT_UPDATE_CAPACITY, NavigationOutcome, NavigationPhase, NavigationUpdate,
};
pub use engine::{TransitionEngine, TransitionStatus};
pub use error::{NavigationError, NavigatorError, SceneError, TransitionError};
pub use navigator::{Navigator, NavigatorRef};
pub use registry::{SceneFactory, SceneRegistry};
pub use scene::{Direction, Scene, SceneContext, SceneHandle, SceneId};
pub use stack::StateStack;
pub use stage::Stage;
pub use state::{SceneKey, StateType};
pub use transition::{
    Animation, AnimationKind, Completion, DEFAULT_TRANSITION_DURATION, Keyframes, Layering,
    Motion, Pose, Transition, TransitionContext, TransitionDelegate, TransitionFn,
};
