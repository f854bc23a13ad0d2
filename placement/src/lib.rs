#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Drag-and-drop placement stage of PinPin.
//!
//! A [`PlacementSession`] binds one draggable piece per region to one fixed
//! slot per region and a single [`SnapPolicy`]. Adapters drive it through
//! [`apply`] and read it back through [`query`].

use pinpin_catalog::{MapLayout, RegionCatalog};
use pinpin_core::{
    Command, Difficulty, Event, PieceId, PieceState, Point, RegionId, RejectRecovery, ScreenSize,
    SlotState,
};
use pinpin_system_snap::{SnapEvaluator, SnapPolicy, SnapProbe};
use tracing::{debug, info};

mod pieces;
mod scatter;
mod slots;

pub use pieces::{PieceController, PieceExtent};
pub use scatter::ScatterConfig;
pub use slots::Slot;

use scatter::scatter_positions;
use slots::SlotRegistry;

/// Puzzle board holding pieces, their slots, and the active snap policy.
#[derive(Clone, Debug)]
pub struct PlacementSession {
    pieces: Vec<PieceController>,
    slots: SlotRegistry,
    policy: SnapPolicy,
    layout: MapLayout,
    active: Option<PieceId>,
    placed: usize,
    completed: bool,
}

impl PlacementSession {
    /// Creates a session whose pieces are scattered according to `scatter`.
    #[must_use]
    pub fn new(
        catalog: &RegionCatalog,
        layout: MapLayout,
        policy: SnapPolicy,
        screen: ScreenSize,
        scatter: &ScatterConfig,
    ) -> Self {
        let origins = scatter_positions(catalog.len(), screen, scatter);
        Self::with_origins(catalog, layout, policy, &origins)
    }

    /// Creates a session with explicit starting positions, one per region in
    /// catalog order. Regions without a provided origin start at the screen origin.
    #[must_use]
    pub fn with_origins(
        catalog: &RegionCatalog,
        layout: MapLayout,
        policy: SnapPolicy,
        origins: &[Point],
    ) -> Self {
        let mut slots = SlotRegistry::default();
        let mut pieces = Vec::with_capacity(catalog.len());

        for (index, region) in catalog.iter().enumerate() {
            let bounds = region.bounds();
            slots.insert(
                region.id(),
                layout.to_screen(region.center()),
                (bounds.width(), bounds.height()),
            );

            let origin = origins.get(index).copied().unwrap_or_default();
            let extent = PieceExtent::from_region(region.center(), bounds, layout.scale());
            pieces.push(PieceController::new(
                PieceId::new(index as u32),
                region.id(),
                origin,
                extent,
            ));
        }

        Self {
            pieces,
            slots,
            policy,
            layout,
            active: None,
            placed: 0,
            completed: false,
        }
    }

    /// Builds the board for a difficulty mode, fitting the map to the screen.
    ///
    /// Both modes share the fitted layout; they differ in snap policy and scatter margins.
    #[must_use]
    pub fn for_difficulty(
        catalog: &RegionCatalog,
        difficulty: Difficulty,
        screen: ScreenSize,
        seed: u64,
    ) -> Self {
        let layout = catalog
            .content_bounds()
            .map_or_else(MapLayout::identity, |content| {
                MapLayout::fit_default(content, screen)
            });
        let policy = SnapPolicy::for_difficulty(difficulty, layout.scale());
        let scatter = ScatterConfig::for_difficulty(difficulty, seed);
        Self::new(catalog, layout, policy, screen, &scatter)
    }

    /// Emits `AllPiecesPlaced` the first time every piece is placed.
    ///
    /// Returns `true` only for the call that fired the event.
    pub fn check_completion(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.completed || self.placed < self.pieces.len() {
            return false;
        }

        self.completed = true;
        info!(pieces = self.pieces.len(), "all pieces placed");
        out_events.push(Event::AllPiecesPlaced);
        true
    }

    /// Places every remaining piece on its slot, cancelling any active drag.
    pub fn force_place_all(&mut self, out_events: &mut Vec<Event>) {
        self.active = None;
        for index in 0..self.pieces.len() {
            let _ = self.place(index, out_events);
        }
        let _ = self.check_completion(out_events);
    }

    /// Pieces that are not yet placed, with the slot each one belongs on.
    #[must_use]
    pub fn unresolved_pieces(&self) -> Vec<UnresolvedPiece> {
        self.pieces
            .iter()
            .filter(|piece| piece.state() != PieceState::Snapped)
            .filter_map(|piece| {
                let slot = self.slots.get(piece.region())?;
                Some(UnresolvedPiece {
                    piece: piece.id(),
                    region: piece.region(),
                    position: piece.position(),
                    target: slot.position(),
                })
            })
            .collect()
    }

    fn press(&mut self, id: PieceId, pointer: Point, out_events: &mut Vec<Event>) {
        if self.active.is_some() {
            return;
        }

        let Some(piece) = self.pieces.get_mut(piece_index(id)) else {
            return;
        };
        if piece.begin_drag(pointer, out_events) {
            self.active = Some(id);
        }
    }

    fn pointer_moved(&mut self, pointer: Point, out_events: &mut Vec<Event>) {
        let Some(id) = self.active else {
            for piece in &mut self.pieces {
                let _ = piece.hover(pointer, out_events);
            }
            return;
        };

        let Some(piece) = self.pieces.get_mut(piece_index(id)) else {
            return;
        };
        if !piece.update_drag(pointer, out_events) {
            return;
        }

        let region = piece.region();
        let Some(probe) = self.probe(piece_index(id)) else {
            return;
        };
        if let Some(near) = self.policy.hint(&probe) {
            let state = if near {
                SlotState::Hinted
            } else {
                SlotState::Idle
            };
            let _ = self.slots.set_state(region, state, out_events);
        }
    }

    fn release(&mut self, pointer: Point, out_events: &mut Vec<Event>) {
        let Some(id) = self.active.take() else {
            return;
        };
        let index = piece_index(id);
        let Some(piece) = self.pieces.get_mut(index) else {
            return;
        };
        if !piece.end_drag(pointer, out_events) {
            return;
        }
        // Hints only describe a piece that is being dragged.
        let region = piece.region();
        let _ = self.slots.set_state(region, SlotState::Idle, out_events);

        let Some(probe) = self.probe(index) else {
            return;
        };
        let verdict = self.policy.evaluate(&probe);
        debug!(
            piece = %id,
            distance = verdict.distance,
            threshold = verdict.threshold,
            accept = verdict.accept,
            "snap check"
        );

        if verdict.accept {
            if self.place(index, out_events) {
                let _ = self.check_completion(out_events);
            }
            return;
        }

        let recovery = self.policy.recovery();
        out_events.push(Event::PieceRejected {
            piece: id,
            recovery,
        });
        if recovery == RejectRecovery::ReturnToStart {
            if let Some(piece) = self.pieces.get_mut(index) {
                let _ = piece.return_to_start();
            }
        }
    }

    fn place(&mut self, index: usize, out_events: &mut Vec<Event>) -> bool {
        let Some(piece) = self.pieces.get_mut(index) else {
            return false;
        };
        let region = piece.region();
        let Some(target) = self.slots.get(region).map(Slot::position) else {
            return false;
        };
        if !piece.snap_to(target, out_events) {
            return false;
        }

        out_events.push(Event::PieceSnapped {
            piece: piece.id(),
            region,
            target,
        });
        let _ = self.slots.set_state(region, SlotState::Idle, out_events);
        self.placed += 1;
        true
    }

    fn probe(&self, index: usize) -> Option<SnapProbe> {
        let piece = self.pieces.get(index)?;
        let slot = self.slots.get(piece.region())?;
        let (width, height) = slot.region_size();
        Some(SnapProbe::new(piece.position(), slot.position(), width, height))
    }
}

/// Debug summary of a piece that has not been placed yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnresolvedPiece {
    /// Piece that is still free or dragging.
    pub piece: PieceId,
    /// Region the piece represents.
    pub region: RegionId,
    /// Current screen-space position.
    pub position: Point,
    /// Slot position the piece belongs on.
    pub target: Point,
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut PlacementSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PointerDown { piece, position } => session.press(piece, position, out_events),
        Command::PointerMove { position } => session.pointer_moved(position, out_events),
        Command::PointerUp { position } => session.release(position, out_events),
        Command::Tick { dt } => {
            for piece in &mut session.pieces {
                piece.advance(dt, out_events);
            }
        }
        Command::ClickObject { .. } => {}
    }
}

fn piece_index(id: PieceId) -> usize {
    id.get() as usize
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use pinpin_catalog::MapLayout;
    use pinpin_core::{Affordance, PieceId, PieceState, Point, RegionId};
    use pinpin_system_snap::SnapPolicy;

    use super::{PlacementSession, Slot};

    /// Captures a read-only view of every piece.
    #[must_use]
    pub fn piece_view(session: &PlacementSession) -> PieceView {
        let mut snapshots: Vec<PieceSnapshot> = session
            .pieces
            .iter()
            .map(|piece| PieceSnapshot {
                id: piece.id(),
                region: piece.region(),
                position: piece.position(),
                origin: piece.origin(),
                state: piece.state(),
                affordance: piece.affordance(),
                moving: piece.is_moving(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        PieceView { snapshots }
    }

    /// Captures a read-only view of every slot, ordered by region.
    #[must_use]
    pub fn slot_view(session: &PlacementSession) -> Vec<Slot> {
        session.slots.iter().copied().collect()
    }

    /// Looks up the slot belonging to a region.
    #[must_use]
    pub fn slot(session: &PlacementSession, region: RegionId) -> Option<Slot> {
        session.slots.get(region).copied()
    }

    /// Number of pieces placed so far.
    #[must_use]
    pub fn placed_count(session: &PlacementSession) -> usize {
        session.placed
    }

    /// Number of pieces on the board.
    #[must_use]
    pub fn piece_count(session: &PlacementSession) -> usize {
        session.pieces.len()
    }

    /// Reports whether `AllPiecesPlaced` has fired.
    #[must_use]
    pub fn is_complete(session: &PlacementSession) -> bool {
        session.completed
    }

    /// Piece currently following the pointer, if any.
    #[must_use]
    pub fn active_drag(session: &PlacementSession) -> Option<PieceId> {
        session.active
    }

    /// Snap policy wired into the session.
    #[must_use]
    pub fn policy(session: &PlacementSession) -> &SnapPolicy {
        &session.policy
    }

    /// Layout used to place slots on screen.
    #[must_use]
    pub fn layout(session: &PlacementSession) -> MapLayout {
        session.layout
    }

    /// Read-only snapshot describing all pieces.
    #[derive(Clone, Debug)]
    pub struct PieceView {
        snapshots: Vec<PieceSnapshot>,
    }

    impl PieceView {
        /// Iterator over the captured piece snapshots in identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &PieceSnapshot> {
            self.snapshots.iter()
        }

        /// Looks up the snapshot of a single piece.
        #[must_use]
        pub fn get(&self, id: PieceId) -> Option<&PieceSnapshot> {
            self.snapshots.iter().find(|snapshot| snapshot.id == id)
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<PieceSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single piece used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PieceSnapshot {
        /// Identifier of the piece.
        pub id: PieceId,
        /// Region the piece represents.
        pub region: RegionId,
        /// Current screen-space position.
        pub position: Point,
        /// Scatter position the piece started from.
        pub origin: Point,
        /// Current lifecycle state.
        pub state: PieceState,
        /// Affordance the renderer should display.
        pub affordance: Affordance,
        /// Indicates whether a snap or return animation is in flight.
        pub moving: bool,
    }
}
