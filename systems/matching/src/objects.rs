//! Falling shapes and labels.

use pinpin_core::{ObjectId, ObjectKind, Point, RegionId};

#[derive(Clone, Debug)]
pub(crate) struct FallingObject {
    pub(crate) id: ObjectId,
    pub(crate) kind: ObjectKind,
    pub(crate) region: RegionId,
    pub(crate) text: String,
    pub(crate) position: Point,
    pub(crate) speed: f32,
    pub(crate) born_tick: u64,
}

impl FallingObject {
    /// Moves the object down by `speed` pixels per second.
    pub(crate) fn fall(&mut self, dt_secs: f32) {
        self.position = self.position.offset(0.0, self.speed * dt_secs);
    }

    /// Shapes and labels pair when they differ in kind and share a region.
    pub(crate) fn pairs_with(&self, other: &FallingObject) -> bool {
        self.kind != other.kind && self.region == other.region
    }
}
