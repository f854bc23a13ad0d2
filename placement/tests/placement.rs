use std::time::Duration;

use pinpin_catalog::{MapLayout, Region, RegionCatalog};
use pinpin_core::{
    Affordance, Bounds, Command, Difficulty, Event, PieceId, PieceState, Point, RegionId,
    RejectRecovery, ScreenSize, SlotState,
};
use pinpin_placement::{apply, query, PlacementSession};
use pinpin_system_snap::SnapPolicy;

const ORIGIN: Point = Point::new(600.0, 400.0);

fn single_region_catalog() -> RegionCatalog {
    RegionCatalog::from_regions(vec![Region::new(
        RegionId::new(7),
        "Reference",
        Point::new(100.0, 75.0),
        Bounds::new(0.0, 0.0, 200.0, 150.0),
    )])
    .expect("catalog")
}

fn two_region_catalog() -> RegionCatalog {
    RegionCatalog::from_regions(vec![
        Region::new(
            RegionId::new(1),
            "West",
            Point::new(100.0, 100.0),
            Bounds::new(50.0, 50.0, 150.0, 150.0),
        ),
        Region::new(
            RegionId::new(2),
            "East",
            Point::new(400.0, 100.0),
            Bounds::new(350.0, 50.0, 450.0, 150.0),
        ),
    ])
    .expect("catalog")
}

fn session(catalog: &RegionCatalog, policy: SnapPolicy, origins: &[Point]) -> PlacementSession {
    PlacementSession::with_origins(catalog, MapLayout::identity(), policy, origins)
}

fn drag(
    session: &mut PlacementSession,
    piece: PieceId,
    from: Point,
    to: Point,
    events: &mut Vec<Event>,
) {
    apply(
        session,
        Command::PointerDown {
            piece,
            position: from,
        },
        events,
    );
    apply(session, Command::PointerMove { position: to }, events);
    apply(session, Command::PointerUp { position: to }, events);
}

fn tick(session: &mut PlacementSession, millis: u64, events: &mut Vec<Event>) {
    apply(
        session,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        events,
    );
}

fn piece_state(session: &PlacementSession, piece: PieceId) -> (PieceState, Point) {
    let view = query::piece_view(session);
    let snapshot = view.get(piece).expect("piece snapshot");
    (snapshot.state, snapshot.position)
}

#[test]
fn hinted_release_near_slot_snaps_and_counts() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), ORIGIN, Point::new(96.0, 78.0), &mut events);

    assert!(events.contains(&Event::PieceSnapped {
        piece: PieceId::new(0),
        region: RegionId::new(7),
        target: Point::new(100.0, 75.0),
    }));
    assert_eq!(query::placed_count(&session), 1);
    assert_eq!(piece_state(&session, PieceId::new(0)).0, PieceState::Snapped);

    tick(&mut session, 200, &mut events);
    assert_eq!(
        piece_state(&session, PieceId::new(0)).1,
        Point::new(100.0, 75.0),
        "snap animation must land exactly on the slot",
    );
}

#[test]
fn hinted_release_on_threshold_stays_put() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();
    let release = Point::new(150.0, 75.0);

    drag(&mut session, PieceId::new(0), ORIGIN, release, &mut events);

    assert!(events.contains(&Event::PieceRejected {
        piece: PieceId::new(0),
        recovery: RejectRecovery::Stay,
    }));
    tick(&mut session, 1_000, &mut events);
    assert_eq!(
        piece_state(&session, PieceId::new(0)),
        (PieceState::Free, release)
    );
    assert_eq!(query::placed_count(&session), 0);
}

#[test]
fn hinted_release_just_inside_threshold_snaps() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), ORIGIN, Point::new(149.0, 75.0), &mut events);
    assert_eq!(query::placed_count(&session), 1);
}

#[test]
fn precision_rejection_tweens_back_to_origin() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::precision(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), ORIGIN, Point::new(140.0, 75.0), &mut events);

    assert!(events.contains(&Event::PieceRejected {
        piece: PieceId::new(0),
        recovery: RejectRecovery::ReturnToStart,
    }));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::SlotHintChanged { .. })),
        "the precision policy never hints",
    );

    tick(&mut session, 150, &mut events);
    let (_, midway) = piece_state(&session, PieceId::new(0));
    assert_ne!(midway, ORIGIN, "return must be animated, not a jump");

    tick(&mut session, 150, &mut events);
    assert_eq!(
        piece_state(&session, PieceId::new(0)),
        (PieceState::Free, ORIGIN)
    );
    assert!(matches!(
        events.last(),
        Some(Event::PieceSettled { position, .. }) if *position == ORIGIN
    ));
}

#[test]
fn precision_accepts_inside_tolerance() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::precision(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), ORIGIN, Point::new(130.0, 75.0), &mut events);
    assert_eq!(query::placed_count(&session), 1);
    assert!(query::is_complete(&session));
}

#[test]
fn snapped_pieces_ignore_further_drags() {
    let catalog = two_region_catalog();
    let origins = [Point::new(800.0, 300.0), Point::new(900.0, 300.0)];
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &origins);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), origins[0], Point::new(101.0, 99.0), &mut events);
    tick(&mut session, 500, &mut events);
    let placed = piece_state(&session, PieceId::new(0));
    events.clear();

    drag(
        &mut session,
        PieceId::new(0),
        Point::new(100.0, 100.0),
        Point::new(700.0, 700.0),
        &mut events,
    );

    assert_eq!(piece_state(&session, PieceId::new(0)), placed);
    assert_eq!(query::active_drag(&session), None);
    assert!(
        !events.iter().any(|event| matches!(
            event,
            Event::PieceDragStarted { .. } | Event::PieceDragUpdated { .. } | Event::PieceSnapped { .. }
        )),
        "snapped piece produced drag events: {events:?}",
    );
    assert_eq!(query::placed_count(&session), 1);
}

#[test]
fn completion_fires_exactly_once() {
    let catalog = two_region_catalog();
    let origins = [Point::new(800.0, 300.0), Point::new(900.0, 300.0)];
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &origins);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), origins[0], Point::new(100.0, 100.0), &mut events);
    assert!(!query::is_complete(&session));
    drag(&mut session, PieceId::new(1), origins[1], Point::new(400.0, 100.0), &mut events);

    assert!(!session.check_completion(&mut events));
    assert!(!session.check_completion(&mut events));
    session.force_place_all(&mut events);

    let completions = events
        .iter()
        .filter(|event| matches!(event, Event::AllPiecesPlaced))
        .count();
    assert_eq!(completions, 1);
    assert!(query::is_complete(&session));
}

#[test]
fn second_press_during_drag_is_ignored() {
    let catalog = two_region_catalog();
    let origins = [Point::new(800.0, 300.0), Point::new(900.0, 300.0)];
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &origins);
    let mut events = Vec::new();

    apply(
        &mut session,
        Command::PointerDown {
            piece: PieceId::new(0),
            position: origins[0],
        },
        &mut events,
    );
    apply(
        &mut session,
        Command::PointerDown {
            piece: PieceId::new(1),
            position: origins[1],
        },
        &mut events,
    );

    assert_eq!(query::active_drag(&session), Some(PieceId::new(0)));
    assert_eq!(piece_state(&session, PieceId::new(1)).0, PieceState::Free);
}

#[test]
fn hint_events_fire_only_on_change() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    apply(
        &mut session,
        Command::PointerDown {
            piece: PieceId::new(0),
            position: ORIGIN,
        },
        &mut events,
    );
    for position in [
        Point::new(180.0, 75.0),
        Point::new(170.0, 75.0),
        Point::new(400.0, 75.0),
        Point::new(120.0, 75.0),
    ] {
        apply(&mut session, Command::PointerMove { position }, &mut events);
    }

    let hints: Vec<SlotState> = events
        .iter()
        .filter_map(|event| match event {
            Event::SlotHintChanged { state, .. } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(
        hints,
        vec![SlotState::Hinted, SlotState::Idle, SlotState::Hinted]
    );
    let slot = query::slot(&session, RegionId::new(7)).expect("slot");
    assert_eq!(slot.state(), SlotState::Hinted);
}

#[test]
fn accepted_release_clears_the_hint() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    drag(&mut session, PieceId::new(0), ORIGIN, Point::new(100.0, 80.0), &mut events);

    let slot = query::slot(&session, RegionId::new(7)).expect("slot");
    assert_eq!(slot.state(), SlotState::Idle);
    assert!(events.contains(&Event::SlotHintChanged {
        region: RegionId::new(7),
        state: SlotState::Idle,
    }));
}

#[test]
fn rejected_release_clears_the_hint() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();
    let release = Point::new(170.0, 75.0);

    drag(&mut session, PieceId::new(0), ORIGIN, release, &mut events);

    assert!(events.contains(&Event::PieceRejected {
        piece: PieceId::new(0),
        recovery: RejectRecovery::Stay,
    }));
    assert_eq!(query::active_drag(&session), None);
    assert_eq!(
        piece_state(&session, PieceId::new(0)),
        (PieceState::Free, release)
    );
    let slot = query::slot(&session, RegionId::new(7)).expect("slot");
    assert_eq!(slot.state(), SlotState::Idle);
    let hints: Vec<SlotState> = events
        .iter()
        .filter_map(|event| match event {
            Event::SlotHintChanged { state, .. } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(hints, vec![SlotState::Hinted, SlotState::Idle]);
}

#[test]
fn idle_pointer_updates_hover_affordance() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    apply(
        &mut session,
        Command::PointerMove {
            position: ORIGIN.offset(10.0, 10.0),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::PieceAffordanceChanged {
            piece: PieceId::new(0),
            affordance: Affordance::Hovered,
        }]
    );
}

#[test]
fn pointer_up_without_drag_is_a_no_op() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    apply(
        &mut session,
        Command::PointerUp {
            position: Point::new(100.0, 75.0),
        },
        &mut events,
    );
    apply(
        &mut session,
        Command::PointerDown {
            piece: PieceId::new(42),
            position: ORIGIN,
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(query::placed_count(&session), 0);
}

#[test]
fn unresolved_pieces_report_remaining_targets() {
    let catalog = two_region_catalog();
    let origins = [Point::new(800.0, 300.0), Point::new(900.0, 300.0)];
    let mut session = session(&catalog, SnapPolicy::hinted(1.0), &origins);
    let mut events = Vec::new();

    assert_eq!(session.unresolved_pieces().len(), 2);
    drag(&mut session, PieceId::new(0), origins[0], Point::new(100.0, 100.0), &mut events);

    let unresolved = session.unresolved_pieces();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].piece, PieceId::new(1));
    assert_eq!(unresolved[0].region, RegionId::new(2));
    assert_eq!(unresolved[0].target, Point::new(400.0, 100.0));
    assert_eq!(unresolved[0].position, origins[1]);

    session.force_place_all(&mut events);
    assert!(session.unresolved_pieces().is_empty());
    assert_eq!(query::placed_count(&session), 2);
}

#[test]
fn force_place_all_cancels_active_drag() {
    let catalog = single_region_catalog();
    let mut session = session(&catalog, SnapPolicy::precision(1.0), &[ORIGIN]);
    let mut events = Vec::new();

    apply(
        &mut session,
        Command::PointerDown {
            piece: PieceId::new(0),
            position: ORIGIN,
        },
        &mut events,
    );
    session.force_place_all(&mut events);

    assert_eq!(query::active_drag(&session), None);
    assert_eq!(piece_state(&session, PieceId::new(0)).0, PieceState::Snapped);
    assert!(query::is_complete(&session));
}

#[test]
fn empty_session_completes_on_first_check() {
    let catalog = RegionCatalog::default();
    let mut session = PlacementSession::for_difficulty(
        &catalog,
        Difficulty::Easy,
        ScreenSize::default(),
        1,
    );
    let mut events = Vec::new();

    assert!(session.check_completion(&mut events));
    assert!(!session.check_completion(&mut events));
    assert_eq!(events, vec![Event::AllPiecesPlaced]);
}

#[test]
fn difficulty_wires_policy_and_fitted_layout() {
    let catalog = two_region_catalog();
    let screen = ScreenSize::default();

    let easy = PlacementSession::for_difficulty(&catalog, Difficulty::Easy, screen, 3);
    let hard = PlacementSession::for_difficulty(&catalog, Difficulty::Hard, screen, 3);

    assert!(matches!(query::policy(&easy), SnapPolicy::Hinted(_)));
    assert!(matches!(query::policy(&hard), SnapPolicy::Precision(_)));

    let layout = query::layout(&hard);
    assert!((layout.scale() - 720.0 * 0.85 / 100.0).abs() < 1e-3);
    let slots = query::slot_view(&hard);
    assert_eq!(slots.len(), 2);
    let mid_x = (slots[0].position().x() + slots[1].position().x()) / 2.0;
    assert!((mid_x - screen.center().x()).abs() < 1e-2, "map is centered");
    assert!((slots[0].position().y() - screen.center().y()).abs() < 1e-2);

    let pieces = query::piece_view(&hard).into_vec();
    assert!(pieces[0].origin.x() <= 300.0, "first piece scatters left");
    assert!(pieces[1].origin.x() >= 980.0, "second piece scatters right");
}
