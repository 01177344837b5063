use super::SpatialRuleLookup;
use crate::constants::MAX_GRID_CELLS;
use crate::error::{Result, SpatialRuleError};
use crate::geometry::{BBox, Polygon};
use crate::rules::SpatialRule;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Grid-backed lookup over a fixed bounding box.
///
/// The box is split into `resolution`-degree cells; only cells touched by a
/// rule are stored.
/// - `exact = false`: a cell belongs to the first rule whose borders contain
///   the cell center. Cells no rule covers at the center keep the rules that
///   touch them; a point there resolves to the first of those containing it,
///   else to the first touching rule.
/// - `exact = true`: a cell lists every rule whose polygon extents overlap it
///   and points are tested against those polygons.
///
/// Cells are computed from the borders a rule has when it is added.
pub struct SpatialRuleLookupArray {
    bounds: BBox,
    resolution: f64,
    exact: bool,
    lat_cells: usize,
    lon_cells: usize,
    cells: HashMap<usize, Cell>,
    rules: Vec<Arc<SpatialRule>>,
}

/// Rule indices attached to one grid cell
#[derive(Debug, Default)]
struct Cell {
    /// First rule containing the cell center (non-exact mode only)
    owner: Option<usize>,
    /// Candidate rules in insertion order
    touching: Vec<usize>,
}

impl Cell {
    fn touch(&mut self, rule_idx: usize) {
        if self.touching.last() != Some(&rule_idx) {
            self.touching.push(rule_idx);
        }
    }
}

impl SpatialRuleLookupArray {
    /// # Errors
    /// - `InvalidBounds` if `bounds` spans no area
    /// - `InvalidResolution` if `resolution` is not a positive number or yields too many cells
    pub fn new(bounds: BBox, resolution: f64, exact: bool) -> Result<Self> {
        if !bounds.is_valid() {
            return Err(SpatialRuleError::InvalidBounds(bounds.to_string()));
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SpatialRuleError::InvalidResolution(resolution));
        }

        let lat_cells = ((bounds.height() / resolution).ceil() as usize).max(1);
        let lon_cells = ((bounds.width() / resolution).ceil() as usize).max(1);
        if (lat_cells as u64).saturating_mul(lon_cells as u64) > MAX_GRID_CELLS {
            return Err(SpatialRuleError::InvalidResolution(resolution));
        }

        Ok(Self {
            bounds,
            resolution,
            exact,
            lat_cells,
            lon_cells,
            cells: HashMap::new(),
            rules: Vec::new(),
        })
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// (lat cells, lon cells)
    pub fn grid_size(&self) -> (usize, usize) {
        (self.lat_cells, self.lon_cells)
    }

    /// Number of cells holding at least one rule
    pub fn filled_cells(&self) -> usize {
        self.cells.len()
    }

    fn lat_index(&self, lat: f64) -> usize {
        let idx = ((lat - self.bounds.min_lat) / self.resolution).floor();
        (idx.max(0.0) as usize).min(self.lat_cells - 1)
    }

    fn lon_index(&self, lon: f64) -> usize {
        let idx = ((lon - self.bounds.min_lon) / self.resolution).floor();
        (idx.max(0.0) as usize).min(self.lon_cells - 1)
    }

    fn cell_center(&self, lat_idx: usize, lon_idx: usize) -> (f64, f64) {
        let lat = self.bounds.min_lat + (lat_idx as f64 + 0.5) * self.resolution;
        let lon = self.bounds.min_lon + (lon_idx as f64 + 0.5) * self.resolution;
        (lat.min(self.bounds.max_lat), lon.min(self.bounds.max_lon))
    }

    fn cell_bbox(&self, lat_idx: usize, lon_idx: usize) -> BBox {
        let min_lat = self.bounds.min_lat + lat_idx as f64 * self.resolution;
        let min_lon = self.bounds.min_lon + lon_idx as f64 * self.resolution;
        BBox::new(
            min_lon,
            (min_lon + self.resolution).min(self.bounds.max_lon),
            min_lat,
            (min_lat + self.resolution).min(self.bounds.max_lat),
        )
    }

    fn index_polygon(&mut self, rule_idx: usize, polygon: &Polygon) {
        let Some(extent) = polygon.bbox().intersection(&self.bounds) else {
            return;
        };

        let lat_range = self.lat_index(extent.min_lat)..=self.lat_index(extent.max_lat);
        let lon_range = self.lon_index(extent.min_lon)..=self.lon_index(extent.max_lon);

        for lat_idx in lat_range {
            for lon_idx in lon_range.clone() {
                let key = lat_idx * self.lon_cells + lon_idx;
                if self.exact {
                    self.cells.entry(key).or_default().touch(rule_idx);
                    continue;
                }

                let owned = self.cells.get(&key).is_some_and(|c| c.owner.is_some());
                if owned {
                    continue;
                }
                let (lat, lon) = self.cell_center(lat_idx, lon_idx);
                if polygon.contains(lat, lon) {
                    self.cells.entry(key).or_default().owner = Some(rule_idx);
                } else if polygon.intersects(&self.cell_bbox(lat_idx, lon_idx)) {
                    self.cells.entry(key).or_default().touch(rule_idx);
                }
            }
        }
    }

    fn first_containing(&self, candidates: &[usize], lat: f64, lon: f64) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .find(|&idx| self.rules[idx].contains(lat, lon))
    }
}

impl SpatialRuleLookup for SpatialRuleLookupArray {
    fn add_rule(&mut self, rule: Arc<SpatialRule>) {
        let rule_idx = self.rules.len();
        {
            let borders = rule.borders();
            for polygon in borders.iter() {
                self.index_polygon(rule_idx, polygon);
            }
        }
        self.rules.push(rule);
    }

    fn lookup_rule(&self, lat: f64, lon: f64) -> Option<&Arc<SpatialRule>> {
        if !self.bounds.contains(lat, lon) {
            return None;
        }

        let key = self.lat_index(lat) * self.lon_cells + self.lon_index(lon);
        let cell = self.cells.get(&key)?;
        let idx = if self.exact {
            self.first_containing(&cell.touching, lat, lon)?
        } else {
            match cell.owner {
                Some(owner) => owner,
                None => self
                    .first_containing(&cell.touching, lat, lon)
                    .or_else(|| cell.touching.first().copied())?,
            }
        };
        Some(&self.rules[idx])
    }

    fn bounds(&self) -> &BBox {
        &self.bounds
    }

    fn rules(&self) -> &[Arc<SpatialRule>] {
        &self.rules
    }
}

impl fmt::Debug for SpatialRuleLookupArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialRuleLookupArray")
            .field("bounds", &self.bounds)
            .field("resolution", &self.resolution)
            .field("exact", &self.exact)
            .field("grid", &(self.lat_cells, self.lon_cells))
            .field("filled_cells", &self.cells.len())
            .field(
                "rules",
                &self.rules.iter().map(|r| r.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_rule(
        id: &str,
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    ) -> Arc<SpatialRule> {
        let polygon = Polygon::from_bbox(&BBox::new(min_lon, max_lon, min_lat, max_lat)).unwrap();
        Arc::new(SpatialRule::new(id, vec![polygon]))
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let bounds = BBox::new(0.0, 10.0, 0.0, 10.0);
        assert!(SpatialRuleLookupArray::new(BBox::inverse(), 0.1, false).is_err());
        assert!(SpatialRuleLookupArray::new(bounds, 0.0, false).is_err());
        assert!(SpatialRuleLookupArray::new(bounds, f64::NAN, false).is_err());
        assert!(SpatialRuleLookupArray::new(BBox::world(), 1e-5, false).is_err());
    }

    #[test]
    fn test_grid_size() {
        let lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 10.0, 0.0, 5.0), 0.5, false).unwrap();
        assert_eq!(lookup.grid_size(), (10, 20));
        assert_eq!(lookup.size(), 0);
    }

    #[test]
    fn test_lookup_non_exact() {
        let mut lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 10.0, 0.0, 10.0), 1.0, false).unwrap();
        lookup.add_rule(rect_rule("WEST", 0.0, 5.0, 0.0, 10.0));
        lookup.add_rule(rect_rule("EAST", 5.0, 10.0, 0.0, 10.0));

        assert_eq!(lookup.size(), 2);
        assert_eq!(lookup.lookup_rule(3.0, 2.5).unwrap().id(), "WEST");
        assert_eq!(lookup.lookup_rule(3.0, 7.5).unwrap().id(), "EAST");
        assert!(lookup.lookup_rule(11.0, 2.5).is_none());
        assert_eq!(lookup.filled_cells(), 100);
    }

    #[test]
    fn test_first_rule_wins_on_overlap() {
        let mut lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 4.0, 0.0, 4.0), 1.0, false).unwrap();
        lookup.add_rule(rect_rule("FIRST", 0.0, 4.0, 0.0, 4.0));
        lookup.add_rule(rect_rule("SECOND", 0.0, 4.0, 0.0, 4.0));
        assert_eq!(lookup.lookup_rule(2.0, 2.0).unwrap().id(), "FIRST");
    }

    #[test]
    fn test_lookup_exact_within_cell() {
        // one cell, two rules splitting it
        let mut lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 2.0, 0.0, 2.0), 2.0, true).unwrap();
        lookup.add_rule(rect_rule("LEFT", 0.0, 1.0, 0.0, 2.0));
        lookup.add_rule(rect_rule("RIGHT", 1.0, 2.0, 0.0, 2.0));

        assert_eq!(lookup.grid_size(), (1, 1));
        assert_eq!(lookup.lookup_rule(1.0, 0.5).unwrap().id(), "LEFT");
        assert_eq!(lookup.lookup_rule(1.0, 1.5).unwrap().id(), "RIGHT");
    }

    #[test]
    fn test_rule_outside_bounds_not_indexed() {
        let mut lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 2.0, 0.0, 2.0), 0.5, true).unwrap();
        lookup.add_rule(rect_rule("FAR", 50.0, 51.0, 50.0, 51.0));

        assert_eq!(lookup.size(), 1);
        assert_eq!(lookup.filled_cells(), 0);
        assert!(lookup.lookup_rule(1.0, 1.0).is_none());
    }

    #[test]
    fn test_rule_smaller_than_cell_is_found() {
        let mut lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 1.04, 0.0, 1.0), 0.1, false).unwrap();
        lookup.add_rule(rect_rule("A", 0.0, 1.0, 0.0, 1.0));
        lookup.add_rule(rect_rule("B", 1.01, 1.04, 0.01, 0.04));

        assert_eq!(lookup.lookup_rule(0.02, 1.02).unwrap().id(), "B");
        assert_eq!(lookup.lookup_rule(0.5, 0.5).unwrap().id(), "A");
        // same cell, outside both rules: first touching rule
        assert_eq!(lookup.lookup_rule(0.08, 1.02).unwrap().id(), "A");
    }

    #[test]
    fn test_center_owner_beats_earlier_touching_rule() {
        let mut lookup =
            SpatialRuleLookupArray::new(BBox::new(0.0, 4.0, 0.0, 4.0), 1.0, false).unwrap();
        // touches the cell lon 2..3 only along its western edge
        lookup.add_rule(rect_rule("WEST", 0.0, 2.0, 0.0, 4.0));
        lookup.add_rule(rect_rule("EAST", 2.0, 4.0, 0.0, 4.0));

        assert_eq!(lookup.lookup_rule(1.5, 2.2).unwrap().id(), "EAST");
        assert_eq!(lookup.lookup_rule(1.5, 1.8).unwrap().id(), "WEST");
    }
}
