//! Fuzz target for the state stack
//!
//! # Strategy
//!
//! - Arbitrary interleavings of push, pop, undo and peek on a stack of small
//!   integer states, starting empty or rooted
//! - A plain `Vec` model applies the same operations
//!
//! # Invariants
//!
//! - Stack contents always equal the model
//! - Once rooted, the stack never empties
//! - No state sits directly on top of an equal state
//! - On a rooted stack, `push` of a new state followed by `pop` restores
//!   the previous top
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use statable_core::StateStack;

#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
struct Screen(u8);

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Push(Screen),
    Pop,
    Undo,
    PushPop(Screen),
}

#[derive(Debug, Arbitrary)]
struct Input {
    root: Option<Screen>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let (mut stack, mut model) = match input.root {
        Some(root) => (StateStack::with_root(root.clone()), vec![root]),
        None => (StateStack::new(), Vec::new()),
    };
    let mut rooted = !model.is_empty();

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Push(state) => {
                let pushed = stack.push(state.clone());
                assert_eq!(pushed, model.last() != Some(&state));
                if pushed {
                    model.push(state);
                }
                rooted = true;
            }
            Op::Pop => {
                let popped = stack.pop();
                let expected = match model.len() {
                    0 => None,
                    1 => model.last().cloned(),
                    _ => model.pop(),
                };
                assert_eq!(popped, expected);
            }
            Op::Undo => {
                let current = stack.undo();
                if model.len() > 1 {
                    model.pop();
                }
                assert_eq!(current.as_ref(), model.last());
            }
            Op::PushPop(state) => {
                let Some(top) = stack.peek().cloned() else {
                    continue;
                };
                if stack.push(state) {
                    stack.pop();
                }
                assert_eq!(stack.peek(), Some(&top));
            }
        }

        assert_eq!(stack.as_slice(), model.as_slice());
        assert!(!rooted || !stack.is_empty());
        assert!(stack.as_slice().windows(2).all(|pair| pair[0] != pair[1]));
    }
});
