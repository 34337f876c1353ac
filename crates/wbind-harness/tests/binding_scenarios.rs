#![forbid(unsafe_code)]

//! End-to-end binding scenarios against the recording host.

use wbind_core::{
    BindError, BindingOptions, BindingPolicy, DerivedColumn, HeightHints, PresentationState,
    Surface, TableSnapshot,
};
use wbind_harness::{CommitMode, FrameClock, OpKind, RecordingHost};
use wbind_runtime::{
    BindingPhase, BindingRegistry, MountOutcome, PresentationSignal, StableBinding, TickOutcome,
    UpdateOutcome,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Print the op log when `WBIND_E2E_JSONL` is set.
fn dump_log(host: &RecordingHost) {
    if std::env::var("WBIND_E2E_JSONL").is_ok()
        && let Ok(jsonl) = host.log().to_jsonl()
    {
        eprint!("{jsonl}");
    }
}

fn table() -> TableSnapshot {
    TableSnapshot::new(["symbol", "price", "volume"], 12)
}

fn policy() -> BindingPolicy {
    BindingPolicy::new().with_settle_delay(web_time::Duration::from_millis(100))
}

// ============================================================================
// Single binding
// ============================================================================

#[test]
fn toggle_expanded_false_true_false_pushes_twice_creates_once() {
    init_tracing();
    let mut host = RecordingHost::default();
    let clock = FrameClock::new();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    b.on_mount(&mut host);

    for expanded in [false, true, false] {
        b.apply_presentation_update(PresentationState::new(expanded), clock.now());
    }

    dump_log(&host);
    let log = host.log();
    assert_eq!(log.pushes("m1"), 2);
    assert_eq!(log.creations("m1"), 1);
}

#[test]
fn empty_identity_is_rejected_and_registers_nothing() {
    let mut host = RecordingHost::default();
    let err = StableBinding::create("", &table(), &BindingOptions::new(), policy(), &mut host)
        .unwrap_err();
    assert!(matches!(err, BindError::InvalidInput { .. }));
    assert!(!err.is_recoverable());
    assert!(host.log().is_empty());
    assert_eq!(host.live_elements(), 0);
}

#[test]
fn unrelated_rerenders_never_recreate() {
    let mut host = RecordingHost::default();
    let mut reg = BindingRegistry::new(policy());
    let data = table();

    for _ in 0..50 {
        reg.reconcile([("m1", &data)], &mut host).unwrap();
        reg.mount_pending(&mut host);
    }

    let log = host.log();
    assert_eq!(log.creations("m1"), 1);
    assert_eq!(
        log.count("m1", |k| matches!(k, OpKind::Register { .. })),
        1
    );
}

#[test]
fn repeated_mount_notifications_are_noops() {
    let mut host = RecordingHost::default();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    assert!(matches!(b.on_mount(&mut host), MountOutcome::Resolved(_)));
    for _ in 0..5 {
        assert_eq!(b.on_mount(&mut host), MountOutcome::AlreadyMounted);
    }
    assert_eq!(host.log().creations("m1"), 1);
}

#[test]
fn update_racing_ahead_of_mount_is_dropped_not_raised() {
    init_tracing();
    let mut host = RecordingHost::new(CommitMode::Manual);
    let clock = FrameClock::new();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();

    let out = b.apply_presentation_update(PresentationState::EXPANDED, clock.now());
    let UpdateOutcome::Dropped(err) = out else {
        panic!("expected a dropped update, got {out:?}");
    };
    assert!(matches!(err, BindError::WidgetNotReady { .. }));
    assert!(err.is_recoverable());
    assert_eq!(host.log().pushes("m1"), 0);

    assert_eq!(b.on_mount(&mut host), MountOutcome::NotCommitted);
    host.commit_all();
    assert!(matches!(b.on_mount(&mut host), MountOutcome::Resolved(_)));

    // The framework re-fires on the next change; the same value now lands.
    let out = b.apply_presentation_update(PresentationState::EXPANDED, clock.now());
    assert!(matches!(out, UpdateOutcome::Applied(_)));
    assert_eq!(host.log().pushes("m1"), 1);
}

#[test]
fn toggle_flipped_before_commit_reaches_the_widget() {
    init_tracing();
    let mut host = RecordingHost::new(CommitMode::Manual);
    let clock = FrameClock::new();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    let signal = PresentationSignal::default();
    b.watch(&signal);

    signal.set_expanded(true);
    assert!(matches!(
        b.flush_effects(clock.now()),
        Some(UpdateOutcome::Dropped(BindError::WidgetNotReady { .. }))
    ));
    host.commit_all();
    assert!(matches!(b.on_mount(&mut host), MountOutcome::Resolved(_)));
    assert!(matches!(b.flush_effects(clock.now()), Some(UpdateOutcome::Applied(_))));
    assert!(b.presented().is_expanded());
    assert_eq!(b.render_surface(signal.get()).surface, Surface::Overlay);

    signal.set_expanded(false);
    b.flush_effects(clock.now());
    dump_log(&host);
    assert_eq!(host.log().pushes("m1"), 2);
    assert_eq!(host.log().creations("m1"), 1);
}

#[test]
fn transition_auto_sizes_after_settle_delay() {
    let mut host = RecordingHost::default();
    let mut clock = FrameClock::new();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    b.on_mount(&mut host);

    b.apply_presentation_update(PresentationState::EXPANDED, clock.now());
    assert_eq!(host.log().auto_sizes("m1"), 0);

    clock.advance_ms(99);
    assert!(matches!(b.tick_at(clock.now()), TickOutcome::Waiting(_)));
    clock.advance_ms(1);
    assert_eq!(b.tick_at(clock.now()), TickOutcome::AutoSized);
    assert_eq!(host.log().auto_sizes("m1"), 1);

    let ops = host.log().ops_for("m1");
    let push_idx = ops
        .iter()
        .position(|op| matches!(op.kind, OpKind::Push { .. }))
        .unwrap();
    let auto_idx = ops
        .iter()
        .position(|op| matches!(op.kind, OpKind::AutoSize))
        .unwrap();
    assert!(push_idx < auto_idx);
}

#[test]
fn destroy_before_settle_makes_callback_a_noop() {
    init_tracing();
    let mut host = RecordingHost::default();
    let mut clock = FrameClock::new();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    b.on_mount(&mut host);
    b.apply_presentation_update(PresentationState::EXPANDED, clock.now());

    b.destroy(&mut host);
    clock.advance_ms(500);
    let out = b.tick_at(clock.now());
    assert!(matches!(out, TickOutcome::Stale(BindError::StaleHandle { .. })));

    dump_log(&host);
    let log = host.log();
    assert_eq!(log.auto_sizes("m1"), 0);
    assert_eq!(log.releases("m1"), 1);
    assert_eq!(b.phase(), BindingPhase::Destroyed);
}

#[test]
fn pushed_heights_follow_hints() {
    let mut host = RecordingHost::default();
    let opts = BindingOptions::new().height_hints(
        HeightHints::new()
            .row_height(20)
            .header_height(30)
            .max_inline_rows(5)
            .overlay_height(480),
    );
    let mut b = StableBinding::create("m1", &table(), &opts, policy(), &mut host).unwrap();
    b.on_mount(&mut host);
    let now = FrameClock::new().now();
    b.apply_presentation_update(PresentationState::EXPANDED, now);
    b.apply_presentation_update(PresentationState::COLLAPSED, now);

    let heights: Vec<(String, u32)> = host
        .log()
        .ops_for("m1")
        .into_iter()
        .filter_map(|op| match op.kind {
            OpKind::Create { surface, height, .. } | OpKind::Push { surface, height, .. } => {
                Some((surface.to_owned(), height))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        heights,
        vec![
            ("inline".to_owned(), 130),
            ("overlay".to_owned(), 480),
            ("inline".to_owned(), 130),
        ]
    );
}

#[test]
fn derived_and_hidden_columns_reach_the_widget_once() {
    let mut host = RecordingHost::default();
    let opts = BindingOptions::new()
        .hide("volume")
        .derived_column(DerivedColumn::new("change").header("Δ"));
    let mut b = StableBinding::create("m1", &table(), &opts, policy(), &mut host).unwrap();
    b.on_mount(&mut host);

    let cols: Vec<_> = b.config().columns().iter().map(|c| c.field.as_str()).collect();
    assert_eq!(cols, ["symbol", "price", "change"]);
    let created = host.log().count("m1", |k| {
        matches!(k, OpKind::Create { columns: 3, .. })
    });
    assert_eq!(created, 1);
}

#[test]
fn signal_driven_updates_apply_in_effect_phase() {
    let mut host = RecordingHost::default();
    let clock = FrameClock::new();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    b.on_mount(&mut host);

    let signal = PresentationSignal::default();
    b.watch(&signal);
    signal.set_expanded(true);
    signal.set_expanded(false);
    signal.set_expanded(true);
    // Only the latest value is applied.
    assert!(matches!(b.flush_effects(clock.now()), Some(UpdateOutcome::Applied(_))));
    assert_eq!(host.log().pushes("m1"), 1);
    assert!(b.flush_effects(clock.now()).is_none());
}

// ============================================================================
// Multiple bindings
// ============================================================================

#[test]
fn destroying_one_identity_leaves_the_other_intact() {
    init_tracing();
    let mut host = RecordingHost::default();
    let mut clock = FrameClock::new();
    let mut reg = BindingRegistry::new(policy());
    let data = table();

    reg.reconcile([("m1", &data), ("m2", &data)], &mut host)
        .unwrap();
    reg.mount_pending(&mut host);
    reg.set_presentation("m2", PresentationState::EXPANDED, clock.now())
        .unwrap();

    let m2_token = reg.get("m2").unwrap().handle_token();
    let m2_cfg = std::rc::Rc::clone(reg.get("m2").unwrap().config());

    let report = reg.reconcile([("m2", &data)], &mut host).unwrap();
    assert_eq!(report.destroyed.len(), 1);
    assert_eq!(report.retained, 1);

    let m2 = reg.get("m2").unwrap();
    assert_eq!(m2.handle_token(), m2_token);
    assert!(std::rc::Rc::ptr_eq(m2.config(), &m2_cfg));
    assert_eq!(m2.phase(), BindingPhase::Mounted);

    clock.advance_ms(150);
    let ticks = reg.tick_at(clock.now());
    assert_eq!(ticks.len(), 1);
    assert_eq!(ticks[0].0.as_str(), "m2");
    assert_eq!(ticks[0].1, TickOutcome::AutoSized);

    let log = host.log();
    assert_eq!(log.releases("m1"), 1);
    assert_eq!(log.releases("m2"), 0);
    assert_eq!(log.creations("m2"), 1);
}

#[test]
fn replacing_an_identity_creates_a_new_instance() {
    let mut host = RecordingHost::default();
    let mut reg = BindingRegistry::new(policy());
    let data = table();

    reg.reconcile([("m1", &data)], &mut host).unwrap();
    reg.mount_pending(&mut host);
    let report = reg.reconcile([("m1-edited", &data)], &mut host).unwrap();
    reg.mount_pending(&mut host);

    assert_eq!(report.created.len(), 1);
    assert_eq!(report.destroyed.len(), 1);
    let log = host.log();
    assert_eq!(log.creations("m1"), 1);
    assert_eq!(log.releases("m1"), 1);
    assert_eq!(log.creations("m1-edited"), 1);
}

#[test]
fn composition_yields_one_surface_per_identity() {
    let mut host = RecordingHost::default();
    let mut reg = BindingRegistry::new(policy());
    let data = table();
    reg.reconcile([("m1", &data), ("m2", &data), ("m3", &data)], &mut host)
        .unwrap();

    let out = reg
        .compose(|id| PresentationState::new(id.as_str() != "m2"))
        .unwrap();
    assert_eq!(out.len(), 3);
    let surfaces: Vec<Surface> = out.iter().map(|d| d.surface).collect();
    assert_eq!(surfaces, [Surface::Overlay, Surface::Inline, Surface::Overlay]);
    assert!(out[2].z_index > out[0].z_index);
    assert_eq!(out[0].element, host.element_for("m1"));
}

#[test]
fn forced_recreation_is_a_loud_error() {
    let mut host = RecordingHost::default();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    b.on_mount(&mut host);
    let err = b.force_recreate().unwrap_err();
    assert!(err.to_string().contains("forbidden"));
    assert!(!err.is_recoverable());
    assert_eq!(host.log().creations("m1"), 1);
    assert_eq!(host.log().releases("m1"), 0);
}

#[test]
fn failed_run_log_is_dumpable() {
    let mut host = RecordingHost::default();
    let mut b =
        StableBinding::create("m1", &table(), &BindingOptions::new(), policy(), &mut host)
            .unwrap();
    b.on_mount(&mut host);
    b.destroy(&mut host);
    let jsonl = host.log().to_jsonl().unwrap();
    let kinds: Vec<String> = jsonl
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["op"].as_str().unwrap().to_owned()
        })
        .collect();
    assert_eq!(kinds, ["register", "create", "release", "unregister"]);
}
