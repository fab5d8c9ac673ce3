//! Physics probe interfaces and a tile-grid world that implements them.
//!
//! The controller never integrates collision itself; it asks a
//! [`PhysicsProbe`] whether ground or walls are nearby and where a ray hits.
//! [`GridWorld`] answers those questions over a unit tile grid and is what
//! the tests and the headless driver run against.

use std::collections::{BTreeMap, HashMap};

use louhos_common::{CellCoord, LayerMask, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box for collision detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new AABB from its corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from center and full size.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Checks if this AABB overlaps with another.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Checks if a point lies inside the AABB (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Nearest hit reported by a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub point: Vec2,
    /// Surface normal at the hit point
    pub normal: Vec2,
    /// Distance travelled along the ray
    pub distance: f32,
}

/// Collision probes answered by the physics world.
pub trait PhysicsProbe {
    /// Sweeps a box of `size` rotated by `angle` degrees from `origin` along
    /// `direction` for `distance`, reporting whether any collider on `mask`
    /// is touched. A box that starts overlapping counts as a hit.
    fn box_cast(
        &self,
        origin: Vec2,
        size: Vec2,
        angle: f32,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> bool;

    /// Casts a ray and returns the nearest hit on `mask` within `max_distance`.
    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

/// Tile lookup owned by the terrain system.
pub trait TerrainQuery {
    /// Checks whether a diggable tile occupies the cell containing `position`.
    fn cell_exists_at(&self, position: Vec2) -> bool;
}

/// Identifier of a placed torch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TorchId(u32);

impl TorchId {
    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Torches that exist in the world.
pub trait TorchField {
    /// Returns the torches whose mount point lies inside the box.
    fn torches_in(&self, center: Vec2, size: Vec2) -> Vec<TorchId>;

    /// Removes a torch, returning whether it existed.
    fn remove_torch(&mut self, id: TorchId) -> bool;

    /// Places a torch at a mount point.
    fn place_torch(&mut self, position: Vec2) -> TorchId;
}

/// Everything the controller asks of the surrounding world.
pub trait World: PhysicsProbe + TerrainQuery + TorchField {}

impl<T: PhysicsProbe + TerrainQuery + TorchField> World for T {}

/// Contacts produced by [`step_body`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyContact {
    /// Downward motion was stopped by ground
    pub hit_ground: bool,
    /// Upward motion was stopped by a ceiling
    pub hit_ceiling: bool,
    /// Horizontal motion was stopped by a wall
    pub hit_wall: bool,
}

/// Moves a box-shaped body by `velocity * dt`, one axis at a time, stopping
/// at colliders on `mask`. Blocked axes have their velocity zeroed; landing
/// snaps the body onto the top of the blocking row.
///
/// Assumes the body moves less than one tile per step.
pub fn step_body<P: PhysicsProbe + ?Sized>(
    probe: &P,
    position: &mut Vec2,
    velocity: &mut Vec2,
    size: Vec2,
    mask: LayerMask,
    dt: f32,
) -> BodyContact {
    let mut contact = BodyContact::default();
    let half = size.abs() * 0.5;

    let dx = velocity.x * dt;
    if dx != 0.0 {
        let moved = *position + Vec2::new(dx, 0.0);
        if probe.box_cast(moved, size, 0.0, Vec2::ZERO, 0.0, mask) {
            velocity.x = 0.0;
            contact.hit_wall = true;
        } else {
            *position = moved;
        }
    }

    let dy = velocity.y * dt;
    if dy != 0.0 {
        let moved = *position + Vec2::new(0.0, dy);
        if probe.box_cast(moved, size, 0.0, Vec2::ZERO, 0.0, mask) {
            if dy < 0.0 {
                let row = (moved.y - half.y).floor();
                position.y = row + 1.0 + half.y;
                contact.hit_ground = true;
            } else {
                contact.hit_ceiling = true;
            }
            velocity.y = 0.0;
        } else {
            *position = moved;
        }
    }

    contact
}

/// Sweep resolution for grid box casts, in tiles.
const SWEEP_STEP: f32 = 0.05;
/// Upper bound on ray length so grid traversal always terminates.
const MAX_RAY_DISTANCE: f32 = 4096.0;

/// Unit tile grid implementing every world-facing probe.
#[derive(Debug, Clone, Default)]
pub struct GridWorld {
    /// Occupied cells and the layers they belong to
    cells: HashMap<CellCoord, LayerMask>,
    /// Placed torches by ID
    torches: BTreeMap<TorchId, Vec2>,
    /// Next torch ID to hand out
    next_torch: u32,
}

impl GridWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell's layers, replacing anything there.
    pub fn set_cell(&mut self, cell: CellCoord, layers: LayerMask) {
        if layers.is_empty() {
            self.cells.remove(&cell);
        } else {
            self.cells.insert(cell, layers);
        }
    }

    /// Fills every cell in the inclusive rectangle with `layers`.
    pub fn fill_rect(&mut self, min: CellCoord, max: CellCoord, layers: LayerMask) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                self.set_cell(CellCoord::new(x, y), layers);
            }
        }
    }

    /// Removes a cell, returning whether anything was there.
    pub fn clear_cell(&mut self, cell: CellCoord) -> bool {
        self.cells.remove(&cell).is_some()
    }

    /// Returns the layers of a cell.
    #[must_use]
    pub fn layers_at(&self, cell: CellCoord) -> LayerMask {
        self.cells.get(&cell).copied().unwrap_or(LayerMask::NONE)
    }

    /// Checks if a cell collides with `mask`.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord, mask: LayerMask) -> bool {
        self.layers_at(cell).intersects(mask)
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of placed torches.
    #[must_use]
    pub fn torch_count(&self) -> usize {
        self.torches.len()
    }

    /// Returns the mount point of a torch.
    #[must_use]
    pub fn torch_position(&self, id: TorchId) -> Option<Vec2> {
        self.torches.get(&id).copied()
    }

    fn overlaps_solid(&self, aabb: &Aabb, mask: LayerMask) -> bool {
        let min = CellCoord::from_world(aabb.min);
        let max = CellCoord::from_world(aabb.max);
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let cell = CellCoord::new(x, y);
                if !self.is_solid(cell, mask) {
                    continue;
                }
                let bounds = Aabb::new(cell.min_corner(), cell.min_corner() + Vec2::ONE);
                if aabb.overlaps(&bounds) {
                    return true;
                }
            }
        }
        false
    }
}

impl PhysicsProbe for GridWorld {
    fn box_cast(
        &self,
        origin: Vec2,
        size: Vec2,
        angle: f32,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> bool {
        // Rotated boxes are approximated by their axis-aligned bounds.
        let (sin, cos) = angle.to_radians().sin_cos();
        let half = size.abs() * 0.5;
        let bounds = Vec2::new(
            cos.abs() * half.x + sin.abs() * half.y,
            sin.abs() * half.x + cos.abs() * half.y,
        ) * 2.0;

        let direction = direction.normalize_or_zero() * distance.signum();
        let distance = distance.abs();
        let steps = if direction == Vec2::ZERO {
            0
        } else {
            (distance / SWEEP_STEP).ceil() as u32
        };

        (0..=steps).any(|i| {
            let travelled = if steps == 0 {
                0.0
            } else {
                distance * i as f32 / steps as f32
            };
            let aabb = Aabb::from_center(origin + direction * travelled, bounds);
            self.overlaps_solid(&aabb, mask)
        })
    }

    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO || max_distance.is_nan() || max_distance < 0.0 {
            return None;
        }
        let max_distance = max_distance.min(MAX_RAY_DISTANCE);

        let mut cell = CellCoord::from_world(origin);
        if self.is_solid(cell, mask) {
            return Some(RayHit {
                point: origin,
                normal: -dir,
                distance: 0.0,
            });
        }

        let step_x: i32 = if dir.x > 0.0 { 1 } else { -1 };
        let step_y: i32 = if dir.y > 0.0 { 1 } else { -1 };
        let mut t_max_x = if dir.x > 0.0 {
            (cell.x as f32 + 1.0 - origin.x) / dir.x
        } else if dir.x < 0.0 {
            (origin.x - cell.x as f32) / -dir.x
        } else {
            f32::INFINITY
        };
        let mut t_max_y = if dir.y > 0.0 {
            (cell.y as f32 + 1.0 - origin.y) / dir.y
        } else if dir.y < 0.0 {
            (origin.y - cell.y as f32) / -dir.y
        } else {
            f32::INFINITY
        };
        let t_delta_x = if dir.x == 0.0 { f32::INFINITY } else { 1.0 / dir.x.abs() };
        let t_delta_y = if dir.y == 0.0 { f32::INFINITY } else { 1.0 / dir.y.abs() };

        loop {
            let (t, normal) = if t_max_x < t_max_y {
                cell.x += step_x;
                let t = t_max_x;
                t_max_x += t_delta_x;
                (t, Vec2::new(-step_x as f32, 0.0))
            } else {
                cell.y += step_y;
                let t = t_max_y;
                t_max_y += t_delta_y;
                (t, Vec2::new(0.0, -step_y as f32))
            };

            if t > max_distance {
                return None;
            }
            if self.is_solid(cell, mask) {
                return Some(RayHit {
                    point: origin + dir * t,
                    normal,
                    distance: t,
                });
            }
        }
    }
}

impl TerrainQuery for GridWorld {
    fn cell_exists_at(&self, position: Vec2) -> bool {
        self.is_solid(CellCoord::from_world(position), LayerMask::DIGGABLE)
    }
}

impl TorchField for GridWorld {
    fn torches_in(&self, center: Vec2, size: Vec2) -> Vec<TorchId> {
        let area = Aabb::from_center(center, size);
        self.torches
            .iter()
            .filter(|(_, position)| area.contains(**position))
            .map(|(&id, _)| id)
            .collect()
    }

    fn remove_torch(&mut self, id: TorchId) -> bool {
        self.torches.remove(&id).is_some()
    }

    fn place_torch(&mut self, position: Vec2) -> TorchId {
        let id = TorchId(self.next_torch);
        self.next_torch += 1;
        self.torches.insert(id, position);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_world() -> GridWorld {
        let mut world = GridWorld::new();
        world.fill_rect(
            CellCoord::new(-10, -3),
            CellCoord::new(10, -1),
            LayerMask::GROUND | LayerMask::DIGGABLE,
        );
        world
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(2.0));
        let b = Aabb::from_center(Vec2::new(1.5, 0.0), Vec2::splat(2.0));
        let c = Aabb::from_center(Vec2::new(2.0, 0.0), Vec2::splat(2.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // touching edges don't overlap
    }

    #[test]
    fn test_box_cast_hits_floor_below() {
        let world = floor_world();
        let hit = world.box_cast(
            Vec2::new(0.0, 0.5),
            Vec2::new(0.8, 0.8),
            0.0,
            Vec2::NEG_Y,
            0.2,
            LayerMask::GROUND,
        );
        assert!(hit);
    }

    #[test]
    fn test_box_cast_misses_out_of_reach() {
        let world = floor_world();
        let hit = world.box_cast(
            Vec2::new(0.0, 2.0),
            Vec2::new(0.8, 0.8),
            0.0,
            Vec2::NEG_Y,
            0.5,
            LayerMask::GROUND,
        );
        assert!(!hit);
    }

    #[test]
    fn test_box_cast_respects_mask() {
        let world = floor_world();
        let hit = world.box_cast(
            Vec2::new(0.0, 0.5),
            Vec2::new(0.8, 0.8),
            0.0,
            Vec2::NEG_Y,
            0.2,
            LayerMask::TORCH,
        );
        assert!(!hit);
    }

    #[test]
    fn test_box_cast_negative_distance_reverses() {
        let mut world = GridWorld::new();
        world.set_cell(CellCoord::new(-2, 0), LayerMask::GROUND);
        let hit = world.box_cast(
            Vec2::new(0.0, 0.5),
            Vec2::new(0.5, 0.5),
            0.0,
            Vec2::X,
            -1.5,
            LayerMask::GROUND,
        );
        assert!(hit);
    }

    #[test]
    fn test_ray_cast_hits_top_face() {
        let world = floor_world();
        let hit = world
            .ray_cast(Vec2::new(0.5, 2.0), Vec2::NEG_Y, 5.0, LayerMask::DIGGABLE)
            .expect("ray should hit the floor");
        assert!((hit.point.y - 0.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::Y);
        assert!((hit.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_cast_side_face() {
        let mut world = GridWorld::new();
        world.set_cell(CellCoord::new(3, 0), LayerMask::DIGGABLE);
        let hit = world
            .ray_cast(Vec2::new(0.5, 0.5), Vec2::X, 5.0, LayerMask::DIGGABLE)
            .expect("ray should hit the wall");
        assert_eq!(hit.normal, Vec2::NEG_X);
        assert!((hit.point.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_cast_out_of_range() {
        let world = floor_world();
        assert!(world
            .ray_cast(Vec2::new(0.5, 5.0), Vec2::NEG_Y, 2.0, LayerMask::DIGGABLE)
            .is_none());
    }

    #[test]
    fn test_ray_cast_zero_direction() {
        let world = floor_world();
        assert!(world
            .ray_cast(Vec2::new(0.5, 5.0), Vec2::ZERO, 20.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn test_ray_cast_starting_inside() {
        let world = floor_world();
        let hit = world
            .ray_cast(Vec2::new(0.5, -0.5), Vec2::X, 2.0, LayerMask::GROUND)
            .expect("ray starting inside a tile hits immediately");
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, Vec2::NEG_X);
    }

    #[test]
    fn test_terrain_query() {
        let mut world = floor_world();
        assert!(world.cell_exists_at(Vec2::new(0.5, -0.5)));
        assert!(!world.cell_exists_at(Vec2::new(0.5, 0.5)));

        world.set_cell(CellCoord::new(0, 0), LayerMask::GROUND);
        assert!(!world.cell_exists_at(Vec2::new(0.5, 0.5))); // ground only, not diggable
    }

    #[test]
    fn test_torch_field() {
        let mut world = GridWorld::new();
        let near = world.place_torch(Vec2::new(0.5, 0.75));
        let far = world.place_torch(Vec2::new(5.5, 0.75));

        let found = world.torches_in(Vec2::new(0.0, 0.5), Vec2::splat(2.0));
        assert_eq!(found, vec![near]);

        assert!(world.remove_torch(near));
        assert!(!world.remove_torch(near));
        assert_eq!(world.torch_count(), 1);
        assert_eq!(world.torch_position(far), Some(Vec2::new(5.5, 0.75)));
    }

    #[test]
    fn test_step_body_lands_on_floor() {
        let world = floor_world();
        let size = Vec2::new(0.8, 1.8);
        let mut position = Vec2::new(0.5, 0.95);
        let mut velocity = Vec2::new(0.0, -6.0);

        let contact = step_body(&world, &mut position, &mut velocity, size, LayerMask::GROUND, 0.1);

        assert!(contact.hit_ground);
        assert_eq!(velocity.y, 0.0);
        assert!((position.y - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_step_body_blocked_by_wall() {
        let mut world = floor_world();
        world.set_cell(CellCoord::new(1, 0), LayerMask::GROUND);
        let size = Vec2::new(0.8, 1.8);
        let mut position = Vec2::new(0.5, 0.9);
        let mut velocity = Vec2::new(5.0, 0.0);

        let contact = step_body(&world, &mut position, &mut velocity, size, LayerMask::GROUND, 0.1);

        assert!(contact.hit_wall);
        assert_eq!(velocity.x, 0.0);
        assert_eq!(position.x, 0.5);
    }

    #[test]
    fn test_step_body_free_fall() {
        let world = GridWorld::new();
        let mut position = Vec2::new(0.0, 10.0);
        let mut velocity = Vec2::new(1.0, -2.0);

        let contact = step_body(
            &world,
            &mut position,
            &mut velocity,
            Vec2::ONE,
            LayerMask::GROUND,
            0.5,
        );

        assert_eq!(contact, BodyContact::default());
        assert_eq!(position, Vec2::new(0.5, 9.0));
    }
}
