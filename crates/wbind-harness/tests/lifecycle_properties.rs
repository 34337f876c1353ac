#![forbid(unsafe_code)]

//! Property tests: identity stability and push minimality under arbitrary
//! host churn.

use proptest::prelude::*;
use wbind_core::{BindingOptions, BindingPolicy, PresentationState, TableSnapshot};
use wbind_harness::strategies::{
    HostStep, host_steps, identity_collection, presentation_sequence, transitions,
};
use wbind_harness::{FrameClock, RecordingHost};
use wbind_runtime::{BindingPhase, BindingRegistry, StableBinding, TickOutcome};

fn table() -> TableSnapshot {
    TableSnapshot::new(["a", "b"], 4)
}

proptest! {
    #[test]
    fn pushes_equal_value_changes(seq in presentation_sequence(40)) {
        let mut host = RecordingHost::default();
        let clock = FrameClock::new();
        let mut b = StableBinding::create(
            "m1",
            &table(),
            &BindingOptions::new(),
            BindingPolicy::new(),
            &mut host,
        )
        .unwrap();
        b.on_mount(&mut host);
        for &expanded in &seq {
            b.apply_presentation_update(PresentationState::new(expanded), clock.now());
        }
        let log = host.log();
        prop_assert_eq!(log.pushes("m1"), transitions(false, &seq));
        prop_assert_eq!(log.creations("m1"), 1);
    }

    #[test]
    fn rerenders_create_each_identity_once(
        ids in identity_collection(12),
        passes in 1usize..8,
    ) {
        let mut host = RecordingHost::default();
        let mut reg = BindingRegistry::new(BindingPolicy::new());
        let data = table();
        for _ in 0..passes {
            reg.reconcile(ids.iter().map(|k| (k.as_str(), &data)), &mut host).unwrap();
            reg.mount_pending(&mut host);
        }
        let log = host.log();
        for id in &ids {
            prop_assert_eq!(log.creations(id), 1);
            prop_assert_eq!(log.releases(id), 0);
        }
        prop_assert_eq!(reg.len(), ids.len());
        prop_assert_eq!(host.live_elements(), ids.len());
        let order: Vec<&str> = reg.ids().map(|id| id.as_str()).collect();
        let expected: Vec<&str> = ids.iter().map(String::as_str).collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn dropping_identities_releases_exactly_those(
        ids in identity_collection(10),
        keep_mask in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let mut host = RecordingHost::default();
        let mut reg = BindingRegistry::new(BindingPolicy::new());
        let data = table();
        reg.reconcile(ids.iter().map(|k| (k.as_str(), &data)), &mut host).unwrap();
        reg.mount_pending(&mut host);

        let kept: Vec<&String> = ids
            .iter()
            .zip(&keep_mask)
            .filter_map(|(id, &keep)| keep.then_some(id))
            .collect();
        reg.reconcile(kept.iter().map(|k| (k.as_str(), &data)), &mut host).unwrap();

        let log = host.log();
        for id in &ids {
            let expected = usize::from(!kept.contains(&id));
            prop_assert_eq!(log.releases(id), expected);
            prop_assert_eq!(log.creations(id), 1);
        }
        prop_assert_eq!(host.live_elements(), kept.len());
    }

    #[test]
    fn arbitrary_host_churn_keeps_one_widget(steps in host_steps(60)) {
        let mut host = RecordingHost::default();
        let mut clock = FrameClock::new();
        let mut reg = BindingRegistry::new(BindingPolicy::new());
        let data = table();
        let mut expanded = Vec::new();

        for step in steps {
            match step {
                HostStep::Rerender => {
                    reg.reconcile([("m1", &data)], &mut host).unwrap();
                    reg.mount_pending(&mut host);
                }
                HostStep::SetExpanded(value) => {
                    if reg.get("m1").is_some() {
                        reg.set_presentation("m1", PresentationState::new(value), clock.now())
                            .unwrap();
                        expanded.push(value);
                    }
                }
                HostStep::Advance(ms) => {
                    clock.advance_ms(ms);
                }
                HostStep::Tick => {
                    for (_, outcome) in reg.tick_at(clock.now()) {
                        prop_assert_eq!(outcome, TickOutcome::AutoSized);
                    }
                }
            }
        }

        let log = host.log();
        prop_assert!(log.creations("m1") <= 1);
        prop_assert_eq!(log.releases("m1"), 0);
        prop_assert!(log.auto_sizes("m1") <= log.pushes("m1"));
        if let Some(b) = reg.get("m1") {
            prop_assert_eq!(b.phase(), BindingPhase::Mounted);
            prop_assert_eq!(log.pushes("m1"), transitions(false, &expanded));
        }
    }

    #[test]
    fn destroy_at_any_point_silences_the_widget(
        seq in presentation_sequence(10),
        after in presentation_sequence(10),
        wait in 0u64..300,
    ) {
        let mut host = RecordingHost::default();
        let mut clock = FrameClock::new();
        let mut b = StableBinding::create(
            "m1",
            &table(),
            &BindingOptions::new(),
            BindingPolicy::new(),
            &mut host,
        )
        .unwrap();
        b.on_mount(&mut host);
        for &v in &seq {
            b.apply_presentation_update(PresentationState::new(v), clock.now());
        }
        b.destroy(&mut host);
        let ops_at_destroy = host.log().len();

        for &v in &after {
            b.apply_presentation_update(PresentationState::new(v), clock.now());
        }
        clock.advance_ms(wait);
        let tick = b.tick_at(clock.now());
        prop_assert!(!matches!(tick, TickOutcome::AutoSized));
        prop_assert_eq!(host.log().len(), ops_at_destroy);
        prop_assert_eq!(b.phase(), BindingPhase::Destroyed);
    }
}
