//! Test harness for state-driven navigation.
//!
//! A headless [`statable_core::Stage`] that records every operation to a
//! shared [`Timeline`], chat app fixtures wired onto it, and invariant checks
//! run after every navigation step.
//!
//! # Invariant Testing
//!
//! The `invariants` module captures a [`NavigationSnapshot`] of a container
//! and runs registered [`Invariant`] checks against it. Use
//! [`InvariantRegistry::standard()`] for every navigation invariant.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod invariants;
pub mod stage;

pub use invariants::{
    DisplayedMatchesTop, IdleBetweenNavigations, Invariant, InvariantRegistry, InvariantResult,
    NavigationSnapshot, NoAdjacentDuplicates, SingleAttachedScene, Violation,
};
pub use stage::{HeadlessStage, StageEvent, Timeline};
