//! Axis-aligned bounding boxes and axis-separated collision against the grid.
//!
//! Shared by every moving body. Horizontal movement is always resolved before
//! vertical movement so corner contacts resolve the same way every tick.

use crate::block::{grid_to_world, world_to_grid, GridPos};

/// Amount the max edges of a box are pulled in before flooring, so a box
/// resting exactly on a cell face does not count as overlapping that cell.
pub const EDGE_EPSILON: f64 = 0.001;

/// Read-only "is there a block here" capability used by moving bodies.
pub trait BlockQuery {
    fn is_block_at(&self, x: i32, y: i32) -> bool;
}

impl<T: BlockQuery + ?Sized> BlockQuery for &T {
    fn is_block_at(&self, x: i32, y: i32) -> bool {
        (**self).is_block_at(x, y)
    }
}

/// Axis-aligned bounding box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Aabb {
    /// Box of half-size `half` centred on (x, y).
    pub fn around(x: f64, y: f64, half: f64) -> Self {
        Self {
            min_x: x - half,
            max_x: x + half,
            min_y: y - half,
            max_y: y + half,
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Inclusive range of grid columns this box overlaps.
    pub fn columns(&self) -> (i32, i32) {
        (
            world_to_grid(self.min_x),
            world_to_grid(self.max_x - EDGE_EPSILON),
        )
    }

    /// Inclusive range of grid rows this box overlaps.
    pub fn rows(&self) -> (i32, i32) {
        (
            world_to_grid(self.min_y),
            world_to_grid(self.max_y - EDGE_EPSILON),
        )
    }

    /// Every grid cell that intersects this box.
    pub fn intersecting_cells(&self) -> impl Iterator<Item = GridPos> {
        let (left, right) = self.columns();
        let (top, bottom) = self.rows();
        (left..=right).flat_map(move |x| (top..=bottom).map(move |y| GridPos::new(x, y)))
    }

    /// Whether any overlapped cell is occupied.
    pub fn overlaps_any<W: BlockQuery + ?Sized>(&self, world: &W) -> bool {
        self.intersecting_cells()
            .any(|cell| world.is_block_at(cell.x, cell.y))
    }
}

/// Result of the vertical half of a physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalContact {
    #[default]
    None,
    /// Moved down into a block and now rests on top of it.
    Landed,
    /// Moved up into a block and now sits just below it.
    HitCeiling,
}

/// Contacts produced by one full integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contact {
    pub hit_wall: bool,
    pub vertical: VerticalContact,
}

impl Contact {
    pub fn landed(&self) -> bool {
        self.vertical == VerticalContact::Landed
    }
}

/// Position, velocity and square extent of a moving entity.
///
/// The position is the centre of the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub half_extent: f64,
}

impl Body {
    pub fn new(x: f64, y: f64, half_extent: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            half_extent,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::around(self.x, self.y, self.half_extent)
    }

    /// Apply `gravity` to the vertical velocity, clamped to `max_fall`.
    pub fn apply_gravity(&mut self, gravity: f64, max_fall: f64) {
        self.vy = (self.vy + gravity).min(max_fall);
    }

    /// Move along X by `vx`.
    ///
    /// If the leading column of the moved box holds a block, the box is
    /// snapped flush against that block's face and `vx` is zeroed. Returns
    /// whether a wall was hit.
    pub fn step_x<W: BlockQuery + ?Sized>(&mut self, world: &W) -> bool {
        if self.vx == 0.0 {
            return false;
        }
        let old_x = self.x;
        self.x += self.vx;

        let aabb = self.aabb();
        let (top, bottom) = aabb.rows();
        let (left, right) = aabb.columns();
        let leading = if self.vx > 0.0 { right } else { left };

        if !(top..=bottom).any(|row| world.is_block_at(leading, row)) {
            return false;
        }

        // Never snap behind the start position.
        self.x = if self.vx > 0.0 {
            (grid_to_world(leading) - self.half_extent).max(old_x)
        } else {
            (grid_to_world(leading + 1) + self.half_extent).min(old_x)
        };
        self.vx = 0.0;
        true
    }

    /// Move along Y by `vy` (positive is down).
    ///
    /// A downward hit rests the box on top of the block; an upward hit puts it
    /// just below. Either way `vy` becomes exactly zero.
    pub fn step_y<W: BlockQuery + ?Sized>(&mut self, world: &W) -> VerticalContact {
        if self.vy == 0.0 {
            return VerticalContact::None;
        }
        let old_y = self.y;
        self.y += self.vy;

        let aabb = self.aabb();
        let (left, right) = aabb.columns();
        let (top, bottom) = aabb.rows();
        let falling = self.vy > 0.0;
        let leading = if falling { bottom } else { top };

        if !(left..=right).any(|col| world.is_block_at(col, leading)) {
            return VerticalContact::None;
        }

        self.vy = 0.0;
        if falling {
            self.y = (grid_to_world(leading) - self.half_extent).max(old_y);
            VerticalContact::Landed
        } else {
            self.y = (grid_to_world(leading + 1) + self.half_extent).min(old_y);
            VerticalContact::HitCeiling
        }
    }

    /// Axis-separated integration: X first, then Y.
    pub fn integrate<W: BlockQuery + ?Sized>(&mut self, world: &W) -> Contact {
        let hit_wall = self.step_x(world);
        let vertical = self.step_y(world);
        Contact { hit_wall, vertical }
    }

    /// Whether the box swept from `(from_x, from_y)` to the current position
    /// touches any block.
    pub fn swept_overlaps<W: BlockQuery + ?Sized>(
        &self,
        world: &W,
        from_x: f64,
        from_y: f64,
    ) -> bool {
        Aabb::around(from_x, from_y, self.half_extent)
            .union(&self.aabb())
            .overlaps_any(world)
    }

    /// Whether a block sits directly under the bottom face of the box.
    pub fn is_supported<W: BlockQuery + ?Sized>(&self, world: &W) -> bool {
        let aabb = self.aabb();
        Aabb {
            min_y: aabb.max_y,
            max_y: aabb.max_y + 1.0,
            ..aabb
        }
        .overlaps_any(world)
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Minimal block set for physics tests.
    #[derive(Default)]
    pub(crate) struct Cells(pub HashSet<(i32, i32)>);

    impl Cells {
        pub(crate) fn with(cells: &[(i32, i32)]) -> Self {
            Self(cells.iter().copied().collect())
        }
    }

    impl BlockQuery for Cells {
        fn is_block_at(&self, x: i32, y: i32) -> bool {
            self.0.contains(&(x, y))
        }
    }

    #[test]
    fn aabb_centered_in_cell_covers_one_cell() {
        let aabb = Aabb::around(16.0, 16.0, 16.0);
        let cells: Vec<_> = aabb.intersecting_cells().collect();
        assert_eq!(cells, vec![GridPos::new(0, 0)]);
    }

    #[test]
    fn aabb_straddling_covers_four_cells() {
        let aabb = Aabb::around(32.0, 32.0, 8.0);
        let cells: HashSet<_> = aabb.intersecting_cells().collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&GridPos::new(0, 0)));
        assert!(cells.contains(&GridPos::new(1, 1)));
    }

    #[test]
    fn aabb_negative_coordinates() {
        let aabb = Aabb::around(-16.0, -16.0, 8.0);
        assert!(aabb.intersecting_cells().all(|c| c == GridPos::new(-1, -1)));
    }

    #[test]
    fn union_spans_both_boxes() {
        let a = Aabb::around(0.0, 0.0, 1.0);
        let b = Aabb::around(10.0, -5.0, 1.0);
        let u = a.union(&b);
        assert_eq!((u.min_x, u.max_x, u.min_y, u.max_y), (-1.0, 11.0, -6.0, 1.0));
    }

    #[test]
    fn wall_stops_body_flush_regardless_of_speed() {
        let world = Cells::with(&[(2, 0)]);
        for speed in [1.0, 3.5, 7.0, 15.0, 24.0] {
            let mut body = Body::new(40.0, 16.0, 8.0);
            body.vx = speed;
            let mut hit = false;
            for _ in 0..20 {
                body.vx = speed;
                hit |= body.step_x(&world);
            }
            assert!(hit, "speed {speed} never hit the wall");
            assert_eq!(body.aabb().max_x, 64.0, "speed {speed}");
            assert_eq!(body.vx, 0.0);
            assert!(!body.aabb().overlaps_any(&world));
        }
    }

    #[test]
    fn wall_stops_body_moving_left() {
        let world = Cells::with(&[(-1, 0)]);
        let mut body = Body::new(20.0, 16.0, 8.0);
        for _ in 0..10 {
            body.vx = -5.0;
            body.step_x(&world);
        }
        assert_eq!(body.aabb().min_x, 0.0);
        assert_eq!(body.vx, 0.0);
    }

    #[test]
    fn landing_snaps_on_top_and_zeroes_vy() {
        let world = Cells::with(&[(0, 5)]);
        let mut body = Body::new(16.0, 140.0, 16.0);
        body.vy = 10.0;
        let contact = body.step_y(&world);
        assert_eq!(contact, VerticalContact::Landed);
        assert_eq!(body.vy, 0.0);
        assert_eq!(body.y, 144.0);
        assert_eq!(body.aabb().max_y, 160.0);
    }

    #[test]
    fn resting_body_lands_again_each_tick() {
        let world = Cells::with(&[(0, 5)]);
        let mut body = Body::new(16.0, 144.0, 16.0);
        for _ in 0..5 {
            body.apply_gravity(0.5, 16.0);
            assert!(body.integrate(&world).landed());
            assert_eq!(body.y, 144.0);
            assert_eq!(body.vy, 0.0);
        }
    }

    #[test]
    fn ceiling_snaps_below_without_landing() {
        let world = Cells::with(&[(0, -1)]);
        let mut body = Body::new(16.0, 20.0, 16.0);
        body.vy = -12.0;
        let contact = body.step_y(&world);
        assert_eq!(contact, VerticalContact::HitCeiling);
        assert_eq!(body.vy, 0.0);
        assert_eq!(body.aabb().min_y, 0.0);
    }

    #[test]
    fn horizontal_resolves_before_vertical() {
        // Block diagonally down-right: X movement alone is clear, Y then lands.
        let world = Cells::with(&[(1, 1)]);
        let mut body = Body::new(16.0, 16.0, 16.0);
        body.vx = 8.0;
        body.vy = 8.0;
        let contact = body.integrate(&world);
        assert!(!contact.hit_wall);
        assert!(contact.landed());
        assert_eq!(body.x, 24.0);
        assert_eq!(body.y, 16.0);
    }

    #[test]
    fn gravity_clamped_to_max_fall() {
        let mut body = Body::new(0.0, 0.0, 8.0);
        for _ in 0..100 {
            body.apply_gravity(0.5, 8.0);
        }
        assert_eq!(body.vy, 8.0);
    }

    #[test]
    fn swept_box_catches_thin_obstacles() {
        // Moving 64 units right jumps clean over column 1 but the sweep does not.
        let world = Cells::with(&[(1, 0)]);
        let mut body = Body::new(8.0, 16.0, 8.0);
        body.x += 64.0;
        assert!(!body.aabb().overlaps_any(&world));
        assert!(body.swept_overlaps(&world, 8.0, 16.0));
        assert!(!body.swept_overlaps(&Cells::default(), 8.0, 16.0));
    }

    #[test]
    fn supported_only_when_flush_on_a_block() {
        let world = Cells::with(&[(0, 1)]);
        assert!(Body::new(16.0, 24.0, 8.0).is_supported(&world));
        // four units above the block face
        assert!(!Body::new(16.0, 20.0, 8.0).is_supported(&world));
        // flush, but over the neighbouring empty column
        assert!(!Body::new(48.0, 24.0, 8.0).is_supported(&world));
    }

    #[test]
    fn free_fall_without_blocks() {
        let world = Cells::default();
        let mut body = Body::new(0.0, 0.0, 8.0);
        body.vx = 1.0;
        body.vy = 2.0;
        let contact = body.integrate(&world);
        assert_eq!(contact, Contact::default());
        assert_eq!((body.x, body.y), (1.0, 2.0));
    }
}
