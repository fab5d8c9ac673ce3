//! World-space positions and tile-cell coordinates.
//!
//! The world is a unit tile grid with y pointing up. A cell `(x, y)` covers
//! the square `[x, x + 1) × [y, y + 1)` and its center sits at
//! `(x + 0.5, y + 0.5)`.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Integer coordinate of a tile cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    /// Column
    pub x: i32,
    /// Row (grows upward)
    pub y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the cell that contains a world position.
    #[must_use]
    pub fn from_world(position: Vec2) -> Self {
        Self {
            x: position.x.floor() as i32,
            y: position.y.floor() as i32,
        }
    }

    /// Returns the world-space center of this cell.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    /// Returns the world-space minimum corner of this cell.
    #[must_use]
    pub fn min_corner(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Snaps a world position to the center of the cell containing it.
#[must_use]
pub fn snap_to_cell_center(position: Vec2) -> Vec2 {
    CellCoord::from_world(position).center()
}

/// Snaps a world position to where a torch is mounted.
///
/// Torches hang centered in the column, a quarter tile below the top of the
/// cell the position rounds up into.
#[must_use]
pub fn snap_torch_position(position: Vec2) -> Vec2 {
    Vec2::new(position.x.floor() + 0.5, position.y.ceil() - 0.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_snap_to_cell_center() {
        assert_eq!(snap_to_cell_center(Vec2::new(2.01, 4.99)), Vec2::new(2.5, 4.5));
        assert_eq!(snap_to_cell_center(Vec2::new(-0.01, 0.0)), Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn test_snap_torch_position() {
        assert_eq!(snap_torch_position(Vec2::new(3.2, 1.1)), Vec2::new(3.5, 1.75));
        assert_eq!(snap_torch_position(Vec2::new(3.9, 2.0)), Vec2::new(3.5, 1.75));
    }

    #[test]
    fn test_min_corner() {
        assert_eq!(CellCoord::new(-2, 5).min_corner(), Vec2::new(-2.0, 5.0));
    }

    proptest! {
        #[test]
        fn snapped_point_stays_in_its_cell(x in -1000.0f32..1000.0, y in -1000.0f32..1000.0) {
            let p = Vec2::new(x, y);
            let snapped = snap_to_cell_center(p);
            prop_assert_eq!(CellCoord::from_world(snapped), CellCoord::from_world(p));
        }
    }
}
