//! Waypoint paths and the per-enemy progress tracker that walks them.

use tempo_defence_core::{HexCell, WorldPoint};
use thiserror::Error;

use crate::hex::HexGrid;

/// Smallest number of waypoints that forms a walkable path.
pub const MIN_WAYPOINTS: usize = 2;

/// Defects detected while building a path.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PathError {
    /// Fewer than [`MIN_WAYPOINTS`] waypoints were supplied.
    #[error("path needs at least {MIN_WAYPOINTS} waypoints, found {found}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        found: usize,
    },
    /// A path cell does not exist in the hex grid.
    #[error("path cell ({column}, {row}) lies outside the hex grid")]
    CellOutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
}

/// Ordered sequence of waypoint positions enemies walk from start to objective.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<WorldPoint>,
}

impl Path {
    /// Creates a path from explicit world positions.
    pub fn new(waypoints: Vec<WorldPoint>) -> Result<Self, PathError> {
        if waypoints.len() < MIN_WAYPOINTS {
            return Err(PathError::TooFewWaypoints {
                found: waypoints.len(),
            });
        }
        Ok(Self { waypoints })
    }

    /// Creates a path through the centres of the provided hex tiles.
    pub fn from_cells(grid: &HexGrid, cells: &[HexCell]) -> Result<Self, PathError> {
        let waypoints = cells
            .iter()
            .map(|cell| {
                grid.tile_position(*cell)
                    .ok_or(PathError::CellOutOfBounds {
                        column: cell.column(),
                        row: cell.row(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(waypoints)
    }

    /// Position of the waypoint at `index`, if it exists.
    #[must_use]
    pub fn waypoint(&self, index: u32) -> Option<WorldPoint> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.waypoints.get(index).copied())
    }

    /// Number of waypoints in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; a path holds at least two waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint, where the objective sits.
    #[must_use]
    pub fn last_index(&self) -> u32 {
        u32::try_from(self.waypoints.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Position where enemies enter the path.
    #[must_use]
    pub fn start(&self) -> WorldPoint {
        self.waypoints[0]
    }

    /// Position along the path after `progress` segments.
    #[must_use]
    pub fn position_at(&self, progress: f32) -> WorldPoint {
        let last = self.last_index();
        let clamped = progress.clamp(0.0, last as f32);
        let index = (clamped.floor() as u32).min(last);
        if index == last {
            return self.waypoints[self.waypoints.len() - 1];
        }

        let from = self.waypoints[index as usize];
        let to = self.waypoints[index as usize + 1];
        from.lerp(to, clamped - index as f32)
    }
}

/// Waypoints newly reached during a single [`PathTracker::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathAdvance {
    /// First waypoint index reached during the call.
    pub first: u32,
    /// Last waypoint index reached during the call.
    pub last: u32,
}

impl PathAdvance {
    /// Iterates over the reached waypoint indices in order.
    pub fn reached(self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

/// Fractional progress of a single enemy along a path.
///
/// Progress is measured in path segments: `1.0` means the enemy stands on
/// waypoint 1. Progress never decreases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathTracker {
    progress: f32,
    last_index: u32,
}

impl PathTracker {
    /// Creates a tracker positioned on the first waypoint of `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            progress: 0.0,
            last_index: path.last_index(),
        }
    }

    /// Fractional progress measured in segments.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Index of the last waypoint reached.
    #[must_use]
    pub fn waypoint_index(&self) -> u32 {
        (self.progress.floor() as u32).min(self.last_index)
    }

    /// Reports whether the final waypoint was reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= self.last_index as f32
    }

    /// Moves the tracker forward by `segments`, reporting newly reached waypoints.
    pub fn advance(&mut self, segments: f32) -> Option<PathAdvance> {
        if segments.is_nan() || segments <= 0.0 || self.is_finished() {
            return None;
        }

        let before = self.waypoint_index();
        self.progress = (self.progress + segments).min(self.last_index as f32);
        let after = self.waypoint_index();

        (after > before).then_some(PathAdvance {
            first: before + 1,
            last: after,
        })
    }

    /// Current position of the tracker on `path`.
    #[must_use]
    pub fn position(&self, path: &Path) -> WorldPoint {
        path.position_at(self.progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path(waypoints: u32) -> Path {
        Path::new(
            (0..waypoints)
                .map(|index| WorldPoint::new(index as f32, 0.0))
                .collect(),
        )
        .expect("valid path")
    }

    #[test]
    fn single_waypoint_path_fails_fast() {
        let error = Path::new(vec![WorldPoint::new(0.0, 0.0)]).unwrap_err();
        assert_eq!(error, PathError::TooFewWaypoints { found: 1 });
    }

    #[test]
    fn position_interpolates_within_segment() {
        let path = straight_path(3);
        assert_eq!(path.position_at(0.5), WorldPoint::new(0.5, 0.0));
        assert_eq!(path.position_at(2.0), WorldPoint::new(2.0, 0.0));
        assert_eq!(path.position_at(7.0), WorldPoint::new(2.0, 0.0));
    }

    #[test]
    fn tracker_reports_each_reached_waypoint() {
        let path = straight_path(5);
        let mut tracker = PathTracker::new(&path);

        assert_eq!(tracker.advance(0.5), None);
        assert_eq!(tracker.waypoint_index(), 0);

        let advance = tracker.advance(2.0).expect("crossed waypoints");
        assert_eq!(advance.reached().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(tracker.waypoint_index(), 2);
        assert!(!tracker.is_finished());
    }

    #[test]
    fn tracker_stops_at_final_waypoint() {
        let path = straight_path(3);
        let mut tracker = PathTracker::new(&path);

        let advance = tracker.advance(10.0).expect("reached end");
        assert_eq!(advance.last, 2);
        assert!(tracker.is_finished());
        assert_eq!(tracker.advance(1.0), None);
        assert_eq!(tracker.position(&path), WorldPoint::new(2.0, 0.0));
    }

    #[test]
    fn non_positive_advances_are_ignored() {
        let path = straight_path(3);
        let mut tracker = PathTracker::new(&path);
        assert_eq!(tracker.advance(0.0), None);
        assert_eq!(tracker.advance(-1.0), None);
        assert_eq!(tracker.advance(f32::NAN), None);
        assert_eq!(tracker.progress(), 0.0);
    }
}
