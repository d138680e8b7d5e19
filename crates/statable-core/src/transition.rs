//! Transition descriptors.
//!
//! A [`Transition`] describes how the incoming scene replaces the outgoing
//! one. Built-in variants lower to an [`Animation`] that a
//! [`crate::Stage`] plays; `Delegate` and `Functional` hand control to user
//! code together with a [`Completion`] token.
//!
//! # Geometry
//!
//! Poses are expressed in fractions of the container bounds, so `x = 1.0`
//! means "one full width to the right".
//!
//! ```text
//!   push      incoming  x  1.0 -> 0.0    outgoing x 0.0 -> -0.25 (from 10%)
//!   pop       incoming  x -1.0 -> 0.0    outgoing x 0.0 ->  0.4
//!   present   incoming  y  1.0 -> 0.0
//!   dismiss   outgoing  y  0.0 -> 1.0
//!   fade      incoming  alpha 0 -> 1, scale s -> 1
//! ```

use std::{fmt, sync::Arc, time::Duration};

use tokio::sync::oneshot;

use crate::{Direction, SceneKey};

/// Duration of built-in animated transitions.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(300);

/// Scenes and direction involved in one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext {
    /// Scene being replaced.
    pub from: SceneKey,
    /// Scene being shown.
    pub to: SceneKey,
    /// Whether this is an `invoke` or an `undo`.
    pub direction: Direction,
}

/// Token a custom transition consumes to signal that it has finished.
///
/// Completing consumes the token, so a transition can complete at most once.
/// Dropping it without completing is reported as
/// [`crate::TransitionError::CompletionDropped`].
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<()>,
}

impl Completion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal that the transition has finished.
    pub fn complete(self) {
        // Receiver is gone only if the watchdog already fired.
        let _ = self.tx.send(());
    }
}

/// Object-style custom transition, supplied by the incoming scene.
pub trait TransitionDelegate: Send + Sync {
    /// Run the transition and eventually call [`Completion::complete`].
    fn execute(&self, ctx: TransitionContext, completion: Completion);
}

/// Closure-style custom transition.
pub type TransitionFn = Arc<dyn Fn(TransitionContext, Completion) + Send + Sync>;

/// Animated or immediate handoff between two scenes.
#[derive(Clone)]
pub enum Transition {
    /// Slide in from the right, outgoing scene drifts left.
    Push {
        /// Animation length
        duration: Duration,
    },
    /// Slide in from the left, outgoing scene slides right on top.
    Pop {
        /// Animation length
        duration: Duration,
    },
    /// Cover from the bottom.
    Present {
        /// Animation length
        duration: Duration,
    },
    /// Outgoing scene slides down, uncovering the incoming one.
    Dismiss {
        /// Animation length
        duration: Duration,
    },
    /// Swap without animation.
    Paste,
    /// Fade the incoming scene in while scaling it to identity.
    Fade {
        /// Initial scale of the incoming scene
        scale: f32,
        /// Animation length
        duration: Duration,
    },
    /// Defer to a delegate object.
    Delegate(Arc<dyn TransitionDelegate>),
    /// Defer to a closure.
    Functional(TransitionFn),
}

impl Transition {
    /// Push with the default duration.
    pub const fn push() -> Self {
        Self::Push { duration: DEFAULT_TRANSITION_DURATION }
    }

    /// Pop with the default duration.
    pub const fn pop() -> Self {
        Self::Pop { duration: DEFAULT_TRANSITION_DURATION }
    }

    /// Present with the default duration.
    pub const fn present() -> Self {
        Self::Present { duration: DEFAULT_TRANSITION_DURATION }
    }

    /// Dismiss with the default duration.
    pub const fn dismiss() -> Self {
        Self::Dismiss { duration: DEFAULT_TRANSITION_DURATION }
    }

    /// Fade without scaling, default duration.
    pub const fn fade() -> Self {
        Self::Fade { scale: 1.0, duration: DEFAULT_TRANSITION_DURATION }
    }

    /// Custom transition from a delegate object.
    pub fn delegate(delegate: impl TransitionDelegate + 'static) -> Self {
        Self::Delegate(Arc::new(delegate))
    }

    /// Custom transition from a closure.
    ///
    /// The closure must call [`Completion::complete`] exactly once, possibly
    /// later from another task.
    pub fn functional<F>(f: F) -> Self
    where
        F: Fn(TransitionContext, Completion) + Send + Sync + 'static,
    {
        Self::Functional(Arc::new(f))
    }

    /// Animation played by the stage. `None` for `Paste` and custom
    /// transitions.
    pub fn animation(&self) -> Option<Animation> {
        let (kind, duration) = match *self {
            Self::Push { duration } => (AnimationKind::Push, duration),
            Self::Pop { duration } => (AnimationKind::Pop, duration),
            Self::Present { duration } => (AnimationKind::Present, duration),
            Self::Dismiss { duration } => (AnimationKind::Dismiss, duration),
            Self::Fade { scale, duration } => (AnimationKind::Fade { scale }, duration),
            Self::Paste | Self::Delegate(_) | Self::Functional(_) => return None,
        };
        Some(Animation { kind, duration })
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Pop { .. } => "pop",
            Self::Present { .. } => "present",
            Self::Dismiss { .. } => "dismiss",
            Self::Paste => "paste",
            Self::Fade { .. } => "fade",
            Self::Delegate(_) => "delegate",
            Self::Functional(_) => "functional",
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push { duration }
            | Self::Pop { duration }
            | Self::Present { duration }
            | Self::Dismiss { duration } => {
                f.debug_struct(self.name()).field("duration", duration).finish()
            },
            Self::Fade { scale, duration } => f
                .debug_struct(self.name())
                .field("scale", scale)
                .field("duration", duration)
                .finish(),
            Self::Paste | Self::Delegate(_) | Self::Functional(_) => f.write_str(self.name()),
        }
    }
}

/// Built-in animation kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKind {
    /// See [`Transition::Push`].
    Push,
    /// See [`Transition::Pop`].
    Pop,
    /// See [`Transition::Present`].
    Present,
    /// See [`Transition::Dismiss`].
    Dismiss,
    /// See [`Transition::Fade`].
    Fade {
        /// Initial scale of the incoming scene
        scale: f32,
    },
}

impl fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => f.write_str("push"),
            Self::Pop => f.write_str("pop"),
            Self::Present => f.write_str("present"),
            Self::Dismiss => f.write_str("dismiss"),
            Self::Fade { scale } => write!(f, "fade(scale={scale})"),
        }
    }
}

/// Which scene is drawn above the other during the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layering {
    /// Incoming scene on top (push, present, fade).
    IncomingOnTop,
    /// Outgoing scene on top (pop, dismiss).
    OutgoingOnTop,
}

/// Position, opacity and scale of a scene relative to the container bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Horizontal offset in widths.
    pub x: f32,
    /// Vertical offset in heights.
    pub y: f32,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Pose {
    /// Resting pose filling the container.
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, alpha: 1.0, scale: 1.0 };

    const fn at_x(x: f32) -> Self {
        Self { x, ..Self::IDENTITY }
    }

    const fn at_y(y: f32) -> Self {
        Self { y, ..Self::IDENTITY }
    }

    fn lerp(self, to: Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            x: mix(self.x, to.x),
            y: mix(self.y, to.y),
            alpha: mix(self.alpha, to.alpha),
            scale: mix(self.scale, to.scale),
        }
    }
}

/// Movement of one scene across the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Pose at the start.
    pub from: Pose,
    /// Pose at the end.
    pub to: Pose,
    /// Fraction of the animation before this motion starts.
    pub delay: f32,
}

impl Motion {
    const fn fixed() -> Self {
        Self { from: Pose::IDENTITY, to: Pose::IDENTITY, delay: 0.0 }
    }

    const fn new(from: Pose, to: Pose) -> Self {
        Self { from, to, delay: 0.0 }
    }

    /// Pose at `progress` in `0.0..=1.0` of the whole animation.
    pub fn at(&self, progress: f32) -> Pose {
        let span = 1.0 - self.delay;
        let t = if span <= 0.0 { 1.0 } else { (progress - self.delay) / span };
        self.from.lerp(self.to, t.clamp(0.0, 1.0))
    }
}

/// Motions of both scenes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframes {
    /// Scene being shown.
    pub incoming: Motion,
    /// Scene being replaced.
    pub outgoing: Motion,
}

/// Animation played by a [`crate::Stage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// What to animate.
    pub kind: AnimationKind,
    /// How long it takes.
    pub duration: Duration,
}

impl Animation {
    /// Stacking order while animating.
    pub fn layering(&self) -> Layering {
        match self.kind {
            AnimationKind::Pop | AnimationKind::Dismiss => Layering::OutgoingOnTop,
            AnimationKind::Push | AnimationKind::Present | AnimationKind::Fade { .. } => {
                Layering::IncomingOnTop
            },
        }
    }

    /// Start and end poses of both scenes.
    pub fn keyframes(&self) -> Keyframes {
        match self.kind {
            AnimationKind::Push => Keyframes {
                incoming: Motion::new(Pose::at_x(1.0), Pose::IDENTITY),
                outgoing: Motion { delay: 0.1, ..Motion::new(Pose::IDENTITY, Pose::at_x(-0.25)) },
            },
            AnimationKind::Pop => Keyframes {
                incoming: Motion::new(Pose::at_x(-1.0), Pose::IDENTITY),
                outgoing: Motion::new(Pose::IDENTITY, Pose::at_x(0.4)),
            },
            AnimationKind::Present => Keyframes {
                incoming: Motion::new(Pose::at_y(1.0), Pose::IDENTITY),
                outgoing: Motion::fixed(),
            },
            AnimationKind::Dismiss => Keyframes {
                incoming: Motion::fixed(),
                outgoing: Motion::new(Pose::IDENTITY, Pose::at_y(1.0)),
            },
            AnimationKind::Fade { scale } => Keyframes {
                incoming: Motion::new(
                    Pose { alpha: 0.0, scale, ..Pose::IDENTITY },
                    Pose::IDENTITY,
                ),
                outgoing: Motion::fixed(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paste_and_custom_transitions_have_no_animation() {
        assert!(Transition::Paste.animation().is_none());
        assert!(Transition::functional(|_, done| done.complete()).animation().is_none());
    }

    #[test]
    fn built_ins_use_default_duration() {
        let animation = Transition::push().animation();
        assert_eq!(
            animation,
            Some(Animation { kind: AnimationKind::Push, duration: DEFAULT_TRANSITION_DURATION })
        );
    }

    #[test]
    fn pop_and_dismiss_keep_outgoing_on_top() {
        for transition in [Transition::pop(), Transition::dismiss()] {
            let layering = transition.animation().map(|a| a.layering());
            assert_eq!(layering, Some(Layering::OutgoingOnTop), "{transition:?}");
        }
        let layering = Transition::present().animation().map(|a| a.layering());
        assert_eq!(layering, Some(Layering::IncomingOnTop));
    }

    #[test]
    fn push_outgoing_motion_starts_late() {
        let frames = Animation { kind: AnimationKind::Push, duration: DEFAULT_TRANSITION_DURATION }
            .keyframes();

        assert_eq!(frames.incoming.at(0.0).x, 1.0);
        assert_eq!(frames.incoming.at(1.0), Pose::IDENTITY);
        assert_eq!(frames.outgoing.at(0.05).x, 0.0);
        assert_eq!(frames.outgoing.at(1.0).x, -0.25);
    }

    #[test]
    fn fade_interpolates_alpha_and_scale() {
        let frames = Animation {
            kind: AnimationKind::Fade { scale: 0.5 },
            duration: DEFAULT_TRANSITION_DURATION,
        }
        .keyframes();

        let mid = frames.incoming.at(0.5);
        assert!((mid.alpha - 0.5).abs() < f32::EPSILON);
        assert!((mid.scale - 0.75).abs() < f32::EPSILON);
        assert_eq!(frames.outgoing.at(0.5), Pose::IDENTITY);
    }

    #[test]
    fn debug_names_variant() {
        assert_eq!(format!("{:?}", Transition::Paste), "paste");
        assert!(format!("{:?}", Transition::fade()).starts_with("fade"));
    }
}
