//! Placement targets, one per region.

use std::collections::BTreeMap;

use pinpin_core::{Event, Point, RegionId, SlotState};

/// Fixed placement target for one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    region: RegionId,
    position: Point,
    region_size: (f32, f32),
    state: SlotState,
}

impl Slot {
    /// Region the slot accepts.
    #[must_use]
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// Screen-space position pieces snap onto.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Unscaled width and height of the region's bounding box.
    #[must_use]
    pub const fn region_size(&self) -> (f32, f32) {
        self.region_size
    }

    /// Current activation state.
    #[must_use]
    pub const fn state(&self) -> SlotState {
        self.state
    }
}

/// Registry that stores slots keyed by region.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotRegistry {
    entries: BTreeMap<RegionId, Slot>,
}

impl SlotRegistry {
    pub(crate) fn insert(&mut self, region: RegionId, position: Point, region_size: (f32, f32)) {
        let _ = self.entries.insert(
            region,
            Slot {
                region,
                position,
                region_size,
                state: SlotState::Idle,
            },
        );
    }

    pub(crate) fn get(&self, region: RegionId) -> Option<&Slot> {
        self.entries.get(&region)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.entries.values()
    }

    /// Updates the slot state, emitting `SlotHintChanged` only when it changes.
    pub(crate) fn set_state(
        &mut self,
        region: RegionId,
        state: SlotState,
        out: &mut Vec<Event>,
    ) -> bool {
        let Some(slot) = self.entries.get_mut(&region) else {
            return false;
        };
        if slot.state == state {
            return false;
        }

        slot.state = state;
        out.push(Event::SlotHintChanged { region, state });
        true
    }
}
