#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure snap evaluation policies deciding whether a released piece is placed.
//!
//! Both policies share the [`SnapEvaluator`] contract: given where a piece is,
//! where its own slot is, and the size of its region, answer whether a release
//! succeeds. Nothing here keeps history between calls.

use pinpin_core::{Difficulty, Point, RejectRecovery};

/// Hint radius of the hinted policy at map scale 1.0.
pub const HINT_DISTANCE: f32 = 100.0;
/// Acceptance radius of the hinted policy at map scale 1.0.
pub const SNAP_DISTANCE: f32 = 50.0;
/// Share of the scaled region diagonal the precision policy tolerates.
pub const PRECISION_RATIO: f32 = 0.15;
/// Smallest tolerance the precision policy ever uses, in screen pixels.
pub const MIN_PRECISION_TOLERANCE: f32 = 4.0;

/// Geometry describing one placement attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapProbe {
    /// Screen-space position of the piece.
    pub piece: Point,
    /// Screen-space position of the piece's own slot.
    pub slot: Point,
    /// Unscaled width of the region's bounding box.
    pub region_width: f32,
    /// Unscaled height of the region's bounding box.
    pub region_height: f32,
}

impl SnapProbe {
    /// Creates a new probe.
    #[must_use]
    pub const fn new(piece: Point, slot: Point, region_width: f32, region_height: f32) -> Self {
        Self {
            piece,
            slot,
            region_width,
            region_height,
        }
    }

    /// Distance between the piece and its slot.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.piece.distance(self.slot)
    }
}

/// Outcome of a placement evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapVerdict {
    /// Whether the placement succeeds.
    pub accept: bool,
    /// Measured distance between piece and slot.
    pub distance: f32,
    /// Threshold the distance was compared against.
    pub threshold: f32,
}

/// Contract shared by every snap policy.
pub trait SnapEvaluator {
    /// Live proximity feedback during a drag, or `None` when the policy shows none.
    fn hint(&self, probe: &SnapProbe) -> Option<bool>;

    /// Decides a release.
    fn evaluate(&self, probe: &SnapProbe) -> SnapVerdict;

    /// Recovery applied to a piece whose release was rejected.
    fn recovery(&self) -> RejectRecovery;
}

/// Continuous hint plus tolerant, fixed-radius acceptance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HintedPolicy {
    hint_threshold: f32,
    snap_threshold: f32,
}

impl HintedPolicy {
    /// Creates the policy with design thresholds multiplied by `map_scale`.
    #[must_use]
    pub fn new(map_scale: f32) -> Self {
        Self::with_thresholds(HINT_DISTANCE * map_scale, SNAP_DISTANCE * map_scale)
    }

    /// Creates the policy with explicit thresholds.
    ///
    /// The snap threshold is clamped so it never exceeds the hint threshold.
    #[must_use]
    pub fn with_thresholds(hint_threshold: f32, snap_threshold: f32) -> Self {
        Self {
            hint_threshold,
            snap_threshold: snap_threshold.min(hint_threshold),
        }
    }

    /// Radius below which the slot is hinted.
    #[must_use]
    pub const fn hint_threshold(&self) -> f32 {
        self.hint_threshold
    }

    /// Radius below which a release is accepted.
    #[must_use]
    pub const fn snap_threshold(&self) -> f32 {
        self.snap_threshold
    }
}

impl SnapEvaluator for HintedPolicy {
    fn hint(&self, probe: &SnapProbe) -> Option<bool> {
        Some(probe.distance() < self.hint_threshold)
    }

    fn evaluate(&self, probe: &SnapProbe) -> SnapVerdict {
        let distance = probe.distance();
        SnapVerdict {
            accept: distance < self.snap_threshold,
            distance,
            threshold: self.snap_threshold,
        }
    }

    fn recovery(&self) -> RejectRecovery {
        RejectRecovery::Stay
    }
}

/// Release-only acceptance proportional to the region's size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecisionPolicy {
    map_scale: f32,
}

impl PrecisionPolicy {
    /// Creates the policy for the provided map scale.
    #[must_use]
    pub const fn new(map_scale: f32) -> Self {
        Self { map_scale }
    }

    /// Map scale applied to region extents.
    #[must_use]
    pub const fn map_scale(&self) -> f32 {
        self.map_scale
    }

    /// Tolerance for a region of the given unscaled size.
    ///
    /// Degenerate or non-finite sizes never produce a tolerance below
    /// [`MIN_PRECISION_TOLERANCE`].
    #[must_use]
    pub fn tolerance(&self, region_width: f32, region_height: f32) -> f32 {
        let width = region_width.max(0.0) * self.map_scale;
        let height = region_height.max(0.0) * self.map_scale;
        let tolerance = width.hypot(height) * PRECISION_RATIO;
        if tolerance.is_finite() {
            tolerance.max(MIN_PRECISION_TOLERANCE)
        } else {
            MIN_PRECISION_TOLERANCE
        }
    }
}

impl SnapEvaluator for PrecisionPolicy {
    fn hint(&self, _probe: &SnapProbe) -> Option<bool> {
        None
    }

    fn evaluate(&self, probe: &SnapProbe) -> SnapVerdict {
        let distance = probe.distance();
        let threshold = self.tolerance(probe.region_width, probe.region_height);
        SnapVerdict {
            accept: distance <= threshold,
            distance,
            threshold,
        }
    }

    fn recovery(&self) -> RejectRecovery {
        RejectRecovery::ReturnToStart
    }
}

/// The policy wired into a placement session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapPolicy {
    /// Magnetic map with live hints.
    Hinted(HintedPolicy),
    /// Precision map without hints.
    Precision(PrecisionPolicy),
}

impl SnapPolicy {
    /// Hinted policy for the provided map scale.
    #[must_use]
    pub fn hinted(map_scale: f32) -> Self {
        Self::Hinted(HintedPolicy::new(map_scale))
    }

    /// Precision policy for the provided map scale.
    #[must_use]
    pub const fn precision(map_scale: f32) -> Self {
        Self::Precision(PrecisionPolicy::new(map_scale))
    }

    /// Policy used by the given difficulty mode.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty, map_scale: f32) -> Self {
        match difficulty {
            Difficulty::Easy => Self::hinted(map_scale),
            Difficulty::Hard => Self::precision(map_scale),
        }
    }
}

impl SnapEvaluator for SnapPolicy {
    fn hint(&self, probe: &SnapProbe) -> Option<bool> {
        match self {
            Self::Hinted(policy) => policy.hint(probe),
            Self::Precision(policy) => policy.hint(probe),
        }
    }

    fn evaluate(&self, probe: &SnapProbe) -> SnapVerdict {
        match self {
            Self::Hinted(policy) => policy.evaluate(probe),
            Self::Precision(policy) => policy.evaluate(probe),
        }
    }

    fn recovery(&self) -> RejectRecovery {
        match self {
            Self::Hinted(policy) => policy.recovery(),
            Self::Precision(policy) => policy.recovery(),
        }
    }
}
