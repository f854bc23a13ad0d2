//! Scripted players that drive both stages without a window.

use std::time::Duration;

use pinpin_core::{Command, Event, PieceId, Point};
use pinpin_placement::{self as placement, PlacementSession};
use pinpin_system_matching::{self as matching, MatchEngine, MatchPhase};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::{BoardSection, MatchSection};

const DRAG_STEPS: u32 = 8;
const FRAME: Duration = Duration::from_millis(16);
const SETTLE: Duration = Duration::from_millis(400);

/// Outcome of the placement stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlacementReport {
    pub(crate) attempts: u32,
    pub(crate) rejections: u32,
    pub(crate) forced: bool,
}

/// Drags every piece toward its slot, aiming less sloppily after each round.
///
/// Pieces still unplaced after `max_attempts` rounds are force-placed.
pub(crate) fn solve_placement(
    session: &mut PlacementSession,
    board: &BoardSection,
) -> PlacementReport {
    let mut rng = ChaCha8Rng::seed_from_u64(board.seed);
    let mut report = PlacementReport::default();
    let mut events = Vec::new();

    for round in 0..board.max_attempts {
        let pending = session.unresolved_pieces();
        if pending.is_empty() {
            break;
        }

        let jitter = board.aim_jitter_px.abs() / (round + 1) as f32;
        for piece in pending {
            let aim = piece.target.offset(
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
            );
            drag(session, piece.piece, piece.position, aim, &mut events);
            report.attempts += 1;
            report.rejections += drain(&mut events, "placement");
        }
    }

    if !placement::query::is_complete(session) {
        warn!(
            remaining = session.unresolved_pieces().len(),
            "autoplayer gave up, force-placing remaining pieces"
        );
        session.force_place_all(&mut events);
        placement::apply(session, Command::Tick { dt: SETTLE }, &mut events);
        let _ = drain(&mut events, "placement");
        report.forced = true;
    }
    report
}

fn drag(
    session: &mut PlacementSession,
    piece: PieceId,
    from: Point,
    to: Point,
    events: &mut Vec<Event>,
) {
    placement::apply(
        session,
        Command::PointerDown {
            piece,
            position: from,
        },
        events,
    );
    for step in 1..=DRAG_STEPS {
        let position = from.lerp(to, step as f32 / DRAG_STEPS as f32);
        placement::apply(session, Command::PointerMove { position }, events);
        placement::apply(session, Command::Tick { dt: FRAME }, events);
    }
    placement::apply(session, Command::PointerUp { position: to }, events);
    placement::apply(session, Command::Tick { dt: SETTLE }, events);
}

/// Logs drained events and returns how many placements were rejected.
fn drain(events: &mut Vec<Event>, stage: &str) -> u32 {
    let mut rejections = 0;
    for event in events.drain(..) {
        match &event {
            Event::PieceSnapped { piece, region, .. } => {
                info!(stage, piece = %piece, region = %region, "piece snapped");
            }
            Event::PieceRejected { piece, recovery } => {
                rejections += 1;
                info!(stage, piece = %piece, ?recovery, "placement rejected");
            }
            Event::AllPiecesPlaced => info!(stage, "puzzle complete"),
            other => debug!(stage, event = ?other),
        }
    }
    rejections
}

/// Outcome of the matching stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MatchReport {
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) matches: u32,
    pub(crate) misses: u32,
    pub(crate) phase: MatchPhase,
}

/// Plays the matching stage by clicking the oldest complete pair once per reaction window.
pub(crate) fn play_match(engine: &mut MatchEngine, settings: &MatchSection) -> MatchReport {
    let frame = Duration::from_millis(settings.frame_ms.max(1));
    let reaction = Duration::from_millis(settings.reaction_ms);
    let total = Duration::from_secs(settings.duration_secs);

    let mut elapsed = Duration::ZERO;
    let mut since_click = Duration::ZERO;
    let mut matches = 0;
    let mut misses = 0;
    let mut events = Vec::new();

    while elapsed < total {
        matching::apply(engine, Command::Tick { dt: frame }, &mut events);
        elapsed += frame;
        since_click += frame;

        if since_click >= reaction {
            if let Some(pair) = engine.pending_pairs().first().copied() {
                matching::apply(engine, Command::ClickObject { object: pair.shape }, &mut events);
                matching::apply(engine, Command::ClickObject { object: pair.label }, &mut events);
                since_click = Duration::ZERO;
            }
        }

        for event in events.drain(..) {
            match event {
                Event::ObjectMatched { region, .. } => {
                    matches += 1;
                    info!(region = %region, "pair matched");
                }
                Event::ObjectMissed { region, .. } => {
                    misses += 1;
                    info!(region = %region, "object missed");
                }
                other => debug!(stage = "match", event = ?other),
            }
        }

        if matching::query::phase(engine) == MatchPhase::GameOver {
            break;
        }
    }

    MatchReport {
        score: matching::query::score(engine),
        lives: matching::query::lives(engine),
        matches,
        misses,
        phase: matching::query::phase(engine),
    }
}
