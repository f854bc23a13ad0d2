#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Read-only region data consumed by the PinPin engines.
//!
//! The map file is produced offline by the projection pipeline and trusted as
//! input. This crate only indexes it: [`RegionCatalog`] answers lookups by
//! [`RegionId`], [`LabelTable`] pairs regions with their capital names, and
//! [`MapLayout`] converts map-data coordinates to screen space.

use std::collections::BTreeMap;

use pinpin_core::{Bounds, Point, RegionId};
use serde::Deserialize;
use thiserror::Error;

mod labels;
mod layout;

pub use labels::{LabelError, LabelTable};
pub use layout::MapLayout;

/// Reasons a region collection may fail to load.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not valid map JSON.
    #[error("map data is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two regions share an identifier.
    #[error("region {0} appears more than once in the map data")]
    DuplicateRegion(RegionId),
    /// A region carries NaN or infinite coordinates.
    #[error("region {0} has non-finite center or bounds")]
    NonFiniteGeometry(RegionId),
}

/// Immutable description of one named area of the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    id: RegionId,
    name: String,
    center: Point,
    bounds: Bounds,
    outline: Vec<Point>,
}

impl Region {
    /// Creates a region without outline geometry.
    #[must_use]
    pub fn new(id: RegionId, name: impl Into<String>, center: Point, bounds: Bounds) -> Self {
        Self {
            id,
            name: name.into(),
            center,
            bounds,
            outline: Vec::new(),
        }
    }

    /// Attaches the outline polygon carried for renderers.
    #[must_use]
    pub fn with_outline(mut self, outline: Vec<Point>) -> Self {
        self.outline = outline;
        self
    }

    /// Stable identifier of the region.
    #[must_use]
    pub const fn id(&self) -> RegionId {
        self.id
    }

    /// Display name of the region.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometric centroid in map-data space.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Axis-aligned bounding box in map-data space.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Outline polygon in map-data space. Never evaluated by the engines.
    #[must_use]
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }
}

/// In-memory index of every region, preserving map file order.
#[derive(Clone, Debug, Default)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    index: BTreeMap<RegionId, usize>,
}

impl RegionCatalog {
    /// Builds a catalog from already constructed regions.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, region) in regions.iter().enumerate() {
            if !region.center.is_finite() || !region.bounds.is_finite() {
                return Err(CatalogError::NonFiniteGeometry(region.id));
            }
            if index.insert(region.id, position).is_some() {
                return Err(CatalogError::DuplicateRegion(region.id));
            }
        }
        Ok(Self { regions, index })
    }

    /// Parses a map document.
    ///
    /// Accepts either the pipeline's `{ "width", "height", "provinces": [...] }`
    /// envelope or a bare array of region records. Region identifiers may be
    /// spelled `id` or `adcode`; outline points are optional.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: MapDocument = serde_json::from_str(json)?;
        let records = match document {
            MapDocument::Envelope { provinces } => provinces,
            MapDocument::Regions(records) => records,
        };
        let regions = records
            .into_iter()
            .map(|record| {
                Region::new(record.id, record.name, record.center, record.bounds)
                    .with_outline(record.outline)
            })
            .collect();
        Self::from_regions(regions)
    }

    /// Looks up a region by identifier.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.index.get(&id).and_then(|&index| self.regions.get(index))
    }

    /// Iterator over regions in map file order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Number of regions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Reports whether the catalog holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Smallest box covering every region, or `None` for an empty catalog.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut regions = self.regions.iter();
        let first = regions.next()?.bounds;
        Some(regions.fold(first, |acc, region| acc.union(&region.bounds)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MapDocument {
    Envelope { provinces: Vec<RegionRecord> },
    Regions(Vec<RegionRecord>),
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    #[serde(alias = "adcode")]
    id: RegionId,
    name: String,
    center: Point,
    bounds: Bounds,
    #[serde(default, alias = "points")]
    outline: Vec<Point>,
}
