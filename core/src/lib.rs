#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the PinPin puzzle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! placement session, and the matching mini-game. Adapters submit [`Command`]
//! values describing pointer input and elapsed time, the engines apply those
//! commands via their `apply` entry points, and then append [`Event`] values
//! that renderers and scene-flow collaborators react to. Nothing here knows
//! about textures, audio, or any particular windowing framework.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Commands that express all input the engines accept.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Pointer pressed on a draggable piece.
    PointerDown {
        /// Piece reported under the pointer by the input collaborator.
        piece: PieceId,
        /// Screen-space pointer location at the moment of the press.
        position: Point,
    },
    /// Pointer moved to a new screen-space location.
    PointerMove {
        /// Screen-space pointer location after the move.
        position: Point,
    },
    /// Pointer released.
    PointerUp {
        /// Screen-space pointer location at the moment of release.
        position: Point,
    },
    /// Click-equivalent input on a falling object.
    ClickObject {
        /// Object reported under the pointer by the input collaborator.
        object: ObjectId,
    },
    /// Advances the frame clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the engines after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A free piece was picked up.
    PieceDragStarted {
        /// Piece that entered the dragging state.
        piece: PieceId,
    },
    /// A dragged piece moved.
    PieceDragUpdated {
        /// Piece being dragged.
        piece: PieceId,
        /// Screen-space position of the piece after the move.
        position: Point,
    },
    /// A dragged piece was released and is about to be evaluated.
    PieceDragEnded {
        /// Piece that left the dragging state.
        piece: PieceId,
        /// Screen-space position of the piece at release.
        position: Point,
    },
    /// The hover/lift affordance of a piece changed.
    PieceAffordanceChanged {
        /// Piece whose affordance changed.
        piece: PieceId,
        /// Affordance the renderer should now display.
        affordance: Affordance,
    },
    /// Proximity feedback on a slot toggled.
    SlotHintChanged {
        /// Region whose slot changed state.
        region: RegionId,
        /// New state of the slot.
        state: SlotState,
    },
    /// A piece was accepted and entered its terminal placed state.
    PieceSnapped {
        /// Piece that snapped.
        piece: PieceId,
        /// Region the piece belongs to.
        region: RegionId,
        /// Exact slot position the piece animates toward.
        target: Point,
    },
    /// A placement attempt was rejected.
    PieceRejected {
        /// Piece whose release was rejected.
        piece: PieceId,
        /// Recovery applied to the piece after rejection.
        recovery: RejectRecovery,
    },
    /// A piece finished its snap or return animation.
    PieceSettled {
        /// Piece that stopped moving.
        piece: PieceId,
        /// Final screen-space position.
        position: Point,
    },
    /// Every piece in the session is placed. Fires once per session.
    AllPiecesPlaced,
    /// A falling object entered play.
    ObjectSpawned {
        /// Identifier allocated to the object.
        object: ObjectId,
        /// Whether the object shows a shape or a label.
        kind: ObjectKind,
        /// Region the object represents.
        region: RegionId,
        /// Screen-space spawn location.
        position: Point,
    },
    /// A falling object became the current selection.
    ObjectSelected {
        /// Object that was selected.
        object: ObjectId,
    },
    /// A falling object stopped being the current selection.
    ObjectDeselected {
        /// Object that was deselected.
        object: ObjectId,
    },
    /// A shape and its label were paired and removed.
    ObjectMatched {
        /// Region both objects represented.
        region: RegionId,
        /// Shape object removed by the match.
        shape: ObjectId,
        /// Label object removed by the match.
        label: ObjectId,
    },
    /// A second selection did not pair with the first.
    ObjectMismatched {
        /// Object that was selected before the click.
        selected: ObjectId,
        /// Object that was clicked.
        clicked: ObjectId,
    },
    /// A falling object crossed the bottom boundary unmatched.
    ObjectMissed {
        /// Object that was removed.
        object: ObjectId,
        /// Region the object represented.
        region: RegionId,
    },
    /// The match score changed.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// The remaining lives changed.
    LivesChanged {
        /// Lives remaining after the change.
        lives: u32,
    },
    /// The matching session ran out of lives.
    GameOver,
}

/// Difficulty mode of the placement stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Magnetic map: continuous proximity hints and a generous fixed margin.
    #[default]
    Easy,
    /// Precision map: no hints, release-only check scaled by shape size.
    Hard,
}

/// Lifecycle of a draggable piece.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PieceState {
    /// Resting somewhere on the board and available for pickup.
    #[default]
    Free,
    /// Following the pointer.
    Dragging,
    /// Placed on its slot. Terminal.
    Snapped,
}

/// Visual affordance a renderer applies to a piece.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Affordance {
    /// Base scale, no highlight.
    #[default]
    Resting,
    /// Pointer is over the piece while no drag is active.
    Hovered,
    /// Piece is being dragged.
    Lifted,
}

/// Activation state of a placement slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// No feedback shown.
    #[default]
    Idle,
    /// The slot's own piece is being dragged nearby.
    Hinted,
}

/// What happens to a piece after a rejected release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectRecovery {
    /// The piece stays where it was released.
    Stay,
    /// The piece animates back to its scatter position.
    ReturnToStart,
}

/// Kind of falling object in the matching mini-game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Outline of a region.
    Shape,
    /// Capital name paired with a region.
    Label,
}

/// Stable identifier of a region, taken from the map data.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a new region identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a draggable piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u32);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a falling object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a new object identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two-dimensional coordinate, used for both map-data and screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the point shifted by the provided deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }

    /// Linear interpolation toward `other` by factor `t`.
    ///
    /// `t` is not clamped so overshooting easing curves can be expressed.
    #[must_use]
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Reports whether both components are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box in the map-data coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(rename = "minX")]
    min_x: f32,
    #[serde(rename = "minY")]
    min_y: f32,
    #[serde(rename = "maxX")]
    max_x: f32,
    #[serde(rename = "maxY")]
    max_y: f32,
}

impl Bounds {
    /// Creates a bounding box from its extreme coordinates.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest x covered by the box.
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Smallest y covered by the box.
    #[must_use]
    pub const fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Largest x covered by the box.
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Largest y covered by the box.
    #[must_use]
    pub const fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Horizontal extent. Never negative.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    /// Vertical extent. Never negative.
    #[must_use]
    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Reports whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x() >= self.min_x
            && point.x() <= self.max_x
            && point.y() >= self.min_y
            && point.y() <= self.max_y
    }

    /// Smallest box covering both boxes.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Reports whether every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }
}

/// Dimensions of the screen the engines lay content out on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    width: f32,
    height: f32,
}

impl ScreenSize {
    /// Creates a new screen size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Screen width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Screen height in pixels. Falling objects below this are missed.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Center of the screen.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
