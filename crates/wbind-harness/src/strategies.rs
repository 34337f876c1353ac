#![forbid(unsafe_code)]

//! `proptest` strategies for binding lifecycles.

use proptest::prelude::*;

/// One host-side event in a generated lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStep {
    /// Parent re-render with the same collection.
    Rerender,
    /// Caller sets the expanded flag.
    SetExpanded(bool),
    /// Frame clock advances.
    Advance(u64),
    /// Host drives deferred work.
    Tick,
}

/// Identity keys: short, non-empty, lowercase.
pub fn identity_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

/// Distinct identities in arbitrary order.
pub fn identity_collection(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set(identity_key(), 0..=max)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Expanded-flag sequences, repeats included.
pub fn presentation_sequence(max_len: usize) -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), 0..=max_len)
}

/// Mixed lifecycle steps.
pub fn host_steps(max_len: usize) -> impl Strategy<Value = Vec<HostStep>> {
    let step = prop_oneof![
        3 => Just(HostStep::Rerender),
        3 => any::<bool>().prop_map(HostStep::SetExpanded),
        2 => (0u64..=250).prop_map(HostStep::Advance),
        2 => Just(HostStep::Tick),
    ];
    proptest::collection::vec(step, 0..=max_len)
}

/// Number of value changes in `seq` starting from `initial`.
#[must_use]
pub fn transitions(initial: bool, seq: &[bool]) -> usize {
    let mut prev = initial;
    let mut count = 0;
    for &v in seq {
        if v != prev {
            count += 1;
            prev = v;
        }
    }
    count
}
