//! Block types, grid coordinates, and world/grid unit conversion.

use serde::Serialize;

/// Edge length of one grid cell in world units.
pub const BLOCK_SIZE: f64 = 32.0;

/// Sprite sheet index reserved for the player.
pub const PLAYER_SPRITE: u32 = 0;

/// Convert a world coordinate to the grid cell containing it.
///
/// Floored, so `-0.5` lands in cell `-1` rather than `0`.
#[inline]
pub fn world_to_grid(world: f64) -> i32 {
    (world / BLOCK_SIZE).floor() as i32
}

/// World coordinate of a grid cell's top-left corner.
#[inline]
pub fn grid_to_world(grid: i32) -> f64 {
    grid as f64 * BLOCK_SIZE
}

/// World coordinate of a grid cell's centre.
#[inline]
pub fn grid_center(grid: i32) -> f64 {
    grid_to_world(grid) + BLOCK_SIZE / 2.0
}

/// Integer grid coordinate. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell containing a world-space point.
    pub fn from_world(x: f64, y: f64) -> Self {
        Self::new(world_to_grid(x), world_to_grid(y))
    }

    /// World-space centre of this cell.
    pub fn center(self) -> (f64, f64) {
        (grid_center(self.x), grid_center(self.y))
    }
}

/// Storage material of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BlockKind {
    Stone,
    Dirt,
    Wood,
    Leaves,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::Stone,
        BlockKind::Dirt,
        BlockKind::Wood,
        BlockKind::Leaves,
    ];

    /// Sprite sheet index for this material.
    pub fn sprite_index(self) -> u32 {
        match self {
            BlockKind::Stone => 1,
            BlockKind::Dirt => 2,
            BlockKind::Wood => 3,
            BlockKind::Leaves => 4,
        }
    }
}

/// Display-only variation of a block. Never affects storage or drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RenderTag {
    /// Grass-topped dirt.
    Grass,
}

/// One occupied cell of the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub pos: GridPos,
    pub kind: BlockKind,
    pub tag: Option<RenderTag>,
}

impl Block {
    pub fn new(x: i32, y: i32, kind: BlockKind) -> Self {
        Self {
            pos: GridPos::new(x, y),
            kind,
            tag: None,
        }
    }

    pub fn with_tag(x: i32, y: i32, kind: BlockKind, tag: RenderTag) -> Self {
        Self {
            pos: GridPos::new(x, y),
            kind,
            tag: Some(tag),
        }
    }

    /// World position of the block's top-left corner.
    pub fn world_position(&self) -> (f64, f64) {
        (grid_to_world(self.pos.x), grid_to_world(self.pos.y))
    }

    /// Sprite sheet index. Grass-tagged dirt shares the dirt sprite.
    pub fn sprite_index(&self) -> u32 {
        self.kind.sprite_index()
    }

    pub fn is_grass(&self) -> bool {
        self.tag == Some(RenderTag::Grass)
    }
}
