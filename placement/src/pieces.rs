//! Drag state machine owned by each individual piece.

use std::time::Duration;

use pinpin_core::{Affordance, Bounds, Event, PieceId, PieceState, Point, RegionId};

/// Scale applied to hovered and lifted pieces.
const LIFT_SCALE: f32 = 1.1;
const SNAP_DURATION: Duration = Duration::from_millis(200);
const RETURN_DURATION: Duration = Duration::from_millis(300);
const BACK_OVERSHOOT: f32 = 1.701_58;

/// Screen-space distances from a piece's anchor to the edges of its hit area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PieceExtent {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl PieceExtent {
    /// Creates an extent from explicit edge distances. Negative values clamp to zero.
    #[must_use]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.max(0.0),
            top: top.max(0.0),
            right: right.max(0.0),
            bottom: bottom.max(0.0),
        }
    }

    /// Derives the extent of a region anchored at its centroid, scaled to screen space.
    #[must_use]
    pub fn from_region(center: Point, bounds: Bounds, scale: f32) -> Self {
        Self::new(
            (center.x() - bounds.min_x()) * scale,
            (center.y() - bounds.min_y()) * scale,
            (bounds.max_x() - center.x()) * scale,
            (bounds.max_y() - center.y()) * scale,
        )
    }
}

/// Owns one draggable piece and its pointer interaction lifecycle.
///
/// `Free → Dragging → Free` is driven by pointer input; the placement session
/// promotes a released piece to `Snapped`, after which every pointer method is
/// a no-op.
#[derive(Clone, Debug)]
pub struct PieceController {
    id: PieceId,
    region: RegionId,
    position: Point,
    origin: Point,
    state: PieceState,
    affordance: Affordance,
    extent: PieceExtent,
    grab_offset: (f32, f32),
    motion: Option<Motion>,
}

impl PieceController {
    /// Creates a free piece resting at its scatter origin.
    #[must_use]
    pub fn new(id: PieceId, region: RegionId, origin: Point, extent: PieceExtent) -> Self {
        Self {
            id,
            region,
            position: origin,
            origin,
            state: PieceState::Free,
            affordance: Affordance::Resting,
            extent,
            grab_offset: (0.0, 0.0),
            motion: None,
        }
    }

    /// Identifier of the piece.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Region the piece represents.
    #[must_use]
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// Current screen-space position.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Scatter position the piece started from.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PieceState {
        self.state
    }

    /// Current hover/lift affordance.
    #[must_use]
    pub const fn affordance(&self) -> Affordance {
        self.affordance
    }

    /// Reports whether a snap or return animation is in flight.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Picks the piece up. Only valid from `Free`.
    pub fn begin_drag(&mut self, pointer: Point, out: &mut Vec<Event>) -> bool {
        if self.state != PieceState::Free {
            return false;
        }

        self.motion = None;
        self.state = PieceState::Dragging;
        self.grab_offset = self.position.delta_from(pointer);
        let _ = self.set_affordance(Affordance::Lifted, out);
        out.push(Event::PieceDragStarted { piece: self.id });
        true
    }

    /// Moves the piece with the pointer. Only valid while `Dragging`.
    pub fn update_drag(&mut self, pointer: Point, out: &mut Vec<Event>) -> bool {
        if self.state != PieceState::Dragging {
            return false;
        }

        let (dx, dy) = self.grab_offset;
        self.position = pointer.offset(dx, dy);
        out.push(Event::PieceDragUpdated {
            piece: self.id,
            position: self.position,
        });
        true
    }

    /// Drops the piece. Only valid while `Dragging`.
    ///
    /// A release with the pointer still inside the piece keeps the hover
    /// affordance instead of flashing back to resting.
    pub fn end_drag(&mut self, pointer: Point, out: &mut Vec<Event>) -> bool {
        if self.state != PieceState::Dragging {
            return false;
        }

        let still_over = self.contains(pointer);
        self.state = PieceState::Free;
        out.push(Event::PieceDragEnded {
            piece: self.id,
            position: self.position,
        });
        let affordance = if still_over {
            Affordance::Hovered
        } else {
            Affordance::Resting
        };
        let _ = self.set_affordance(affordance, out);
        true
    }

    /// Updates the hover affordance for an idle pointer. Only valid from `Free`.
    pub fn hover(&mut self, pointer: Point, out: &mut Vec<Event>) -> bool {
        if self.state != PieceState::Free {
            return false;
        }

        let affordance = if self.contains(pointer) {
            Affordance::Hovered
        } else {
            Affordance::Resting
        };
        self.set_affordance(affordance, out)
    }

    /// Reports whether the point lies within the piece's current screen bounds.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let scale = match self.affordance {
            Affordance::Resting => 1.0,
            Affordance::Hovered | Affordance::Lifted => LIFT_SCALE,
        };
        let (x, y) = (self.position.x(), self.position.y());
        Bounds::new(
            x - self.extent.left * scale,
            y - self.extent.top * scale,
            x + self.extent.right * scale,
            y + self.extent.bottom * scale,
        )
        .contains(point)
    }

    /// Advances any in-flight animation, emitting `PieceSettled` on arrival.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };

        let (position, finished) = motion.advance(dt);
        self.position = position;
        if finished {
            self.motion = None;
            out.push(Event::PieceSettled {
                piece: self.id,
                position,
            });
        }
    }

    /// Enters the terminal placed state and animates onto `target`.
    pub(crate) fn snap_to(&mut self, target: Point, out: &mut Vec<Event>) -> bool {
        if self.state == PieceState::Snapped {
            return false;
        }

        self.state = PieceState::Snapped;
        self.motion = Some(Motion::new(
            self.position,
            target,
            SNAP_DURATION,
            Easing::BackOut,
        ));
        let _ = self.set_affordance(Affordance::Resting, out);
        true
    }

    /// Animates a free piece back to its scatter origin.
    pub(crate) fn return_to_start(&mut self) -> bool {
        if self.state != PieceState::Free || self.position == self.origin {
            return false;
        }

        self.motion = Some(Motion::new(
            self.position,
            self.origin,
            RETURN_DURATION,
            Easing::CubicOut,
        ));
        true
    }

    fn set_affordance(&mut self, affordance: Affordance, out: &mut Vec<Event>) -> bool {
        if self.affordance == affordance {
            return false;
        }

        self.affordance = affordance;
        out.push(Event::PieceAffordanceChanged {
            piece: self.id,
            affordance,
        });
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Easing {
    BackOut,
    CubicOut,
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::BackOut => {
                let shifted = t - 1.0;
                1.0 + (BACK_OVERSHOOT + 1.0) * shifted.powi(3) + BACK_OVERSHOOT * shifted.powi(2)
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Motion {
    from: Point,
    to: Point,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

impl Motion {
    fn new(from: Point, to: Point, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing,
        }
    }

    fn advance(&mut self, dt: Duration) -> (Point, bool) {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.duration {
            return (self.to, true);
        }

        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.from.lerp(self.to, self.easing.apply(t)), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_at(origin: Point) -> PieceController {
        PieceController::new(
            PieceId::new(0),
            RegionId::new(1),
            origin,
            PieceExtent::new(20.0, 20.0, 20.0, 20.0),
        )
    }

    #[test]
    fn drag_follows_pointer_with_grab_offset() {
        let mut piece = piece_at(Point::new(100.0, 100.0));
        let mut events = Vec::new();

        assert!(piece.begin_drag(Point::new(110.0, 95.0), &mut events));
        assert!(piece.update_drag(Point::new(210.0, 195.0), &mut events));

        assert_eq!(piece.position(), Point::new(200.0, 200.0));
        assert_eq!(piece.state(), PieceState::Dragging);
        assert_eq!(piece.affordance(), Affordance::Lifted);
    }

    #[test]
    fn update_and_end_require_dragging() {
        let mut piece = piece_at(Point::new(0.0, 0.0));
        let mut events = Vec::new();

        assert!(!piece.update_drag(Point::new(5.0, 5.0), &mut events));
        assert!(!piece.end_drag(Point::new(5.0, 5.0), &mut events));
        assert!(events.is_empty());
        assert_eq!(piece.position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn release_over_piece_keeps_hover() {
        let mut piece = piece_at(Point::new(50.0, 50.0));
        let mut events = Vec::new();

        let _ = piece.begin_drag(Point::new(50.0, 50.0), &mut events);
        let _ = piece.update_drag(Point::new(80.0, 80.0), &mut events);
        events.clear();
        assert!(piece.end_drag(Point::new(81.0, 79.0), &mut events));

        assert_eq!(piece.affordance(), Affordance::Hovered);
        assert_eq!(
            events,
            vec![
                Event::PieceDragEnded {
                    piece: PieceId::new(0),
                    position: Point::new(80.0, 80.0),
                },
                Event::PieceAffordanceChanged {
                    piece: PieceId::new(0),
                    affordance: Affordance::Hovered,
                },
            ]
        );
    }

    #[test]
    fn release_outside_piece_resets_affordance() {
        let mut piece = piece_at(Point::new(50.0, 50.0));
        let mut events = Vec::new();

        let _ = piece.begin_drag(Point::new(50.0, 50.0), &mut events);
        assert!(piece.end_drag(Point::new(400.0, 400.0), &mut events));
        assert_eq!(piece.affordance(), Affordance::Resting);
    }

    #[test]
    fn lifted_bounds_are_enlarged() {
        let mut piece = piece_at(Point::new(0.0, 0.0));
        let mut events = Vec::new();
        let edge = Point::new(21.0, 0.0);

        assert!(!piece.contains(edge));
        let _ = piece.begin_drag(Point::new(0.0, 0.0), &mut events);
        assert!(piece.contains(edge));
    }

    #[test]
    fn hover_toggles_only_on_change() {
        let mut piece = piece_at(Point::new(0.0, 0.0));
        let mut events = Vec::new();

        assert!(piece.hover(Point::new(5.0, 5.0), &mut events));
        assert!(!piece.hover(Point::new(6.0, 6.0), &mut events));
        assert!(piece.hover(Point::new(500.0, 5.0), &mut events));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn snap_animation_lands_exactly_on_target() {
        let mut piece = piece_at(Point::new(0.0, 0.0));
        let mut events = Vec::new();
        let target = Point::new(30.0, -40.0);

        assert!(piece.snap_to(target, &mut events));
        piece.advance(Duration::from_millis(100), &mut events);
        assert!(piece.is_moving());
        assert_ne!(piece.position(), target);

        piece.advance(Duration::from_millis(150), &mut events);
        assert!(!piece.is_moving());
        assert_eq!(piece.position(), target);
        assert_eq!(
            events.last(),
            Some(&Event::PieceSettled {
                piece: PieceId::new(0),
                position: target,
            })
        );
    }

    #[test]
    fn snapped_piece_rejects_every_pointer_method() {
        let mut piece = piece_at(Point::new(0.0, 0.0));
        let mut events = Vec::new();
        let _ = piece.snap_to(Point::new(10.0, 10.0), &mut events);
        piece.advance(Duration::from_secs(1), &mut events);
        events.clear();

        assert!(!piece.begin_drag(Point::new(10.0, 10.0), &mut events));
        assert!(!piece.update_drag(Point::new(90.0, 90.0), &mut events));
        assert!(!piece.end_drag(Point::new(90.0, 90.0), &mut events));
        assert!(!piece.hover(Point::new(10.0, 10.0), &mut events));
        assert!(!piece.snap_to(Point::new(0.0, 0.0), &mut events));
        assert!(events.is_empty());
        assert_eq!(piece.position(), Point::new(10.0, 10.0));
        assert_eq!(piece.state(), PieceState::Snapped);
    }

    #[test]
    fn return_animation_is_tweened_and_cancelled_by_pickup() {
        let mut piece = piece_at(Point::new(0.0, 0.0));
        let mut events = Vec::new();
        let _ = piece.begin_drag(Point::new(0.0, 0.0), &mut events);
        let _ = piece.update_drag(Point::new(100.0, 0.0), &mut events);
        let _ = piece.end_drag(Point::new(100.0, 0.0), &mut events);

        assert!(piece.return_to_start());
        assert_eq!(piece.position(), Point::new(100.0, 0.0));
        piece.advance(Duration::from_millis(100), &mut events);
        let midway = piece.position();
        assert!(midway.x() > 0.0 && midway.x() < 100.0);

        assert!(piece.begin_drag(midway, &mut events));
        assert!(!piece.is_moving());
    }

    #[test]
    fn easing_curves_start_and_end_on_endpoints() {
        for easing in [Easing::BackOut, Easing::CubicOut] {
            assert!(easing.apply(0.0).abs() < 1e-5);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5);
        }
        assert!(Easing::BackOut.apply(0.7) > 1.0, "back-out overshoots");
    }
}
