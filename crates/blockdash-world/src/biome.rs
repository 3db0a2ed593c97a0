//! Biome selection for terrain columns.
//!
//! A column's biome comes from a coarse noise value. Only the surface block
//! and the decoration placed on top depend on it; everything below the
//! surface is the same everywhere.

use serde::Serialize;

use crate::block::{BlockKind, RenderTag};

/// Biome noise above this is arid.
pub const ARID_THRESHOLD: f64 = 0.5;

/// Biome noise below this is cold.
pub const COLD_THRESHOLD: f64 = -0.5;

/// Decoration placed on a column besides the regular tree pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flora {
    /// Single-block-wide column of wood, every `spacing` columns.
    Cactus { spacing: i32 },
    /// Tall trunk with a diamond-shaped canopy, every `spacing` columns.
    Spruce { spacing: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Biome {
    /// Grass-topped dirt; the default.
    Temperate,
    /// Bare dirt surface with cacti.
    Arid,
    /// Stone surface with spruces.
    Cold,
}

impl Biome {
    /// Pick a biome from the column's biome noise value.
    pub fn from_noise(value: f64) -> Self {
        if value > ARID_THRESHOLD {
            Biome::Arid
        } else if value < COLD_THRESHOLD {
            Biome::Cold
        } else {
            Biome::Temperate
        }
    }

    /// The block placed on the column's surface row.
    pub fn surface_block(self) -> (BlockKind, Option<RenderTag>) {
        match self {
            Biome::Temperate => (BlockKind::Dirt, Some(RenderTag::Grass)),
            Biome::Arid => (BlockKind::Dirt, None),
            Biome::Cold => (BlockKind::Stone, None),
        }
    }

    pub fn flora(self) -> Option<Flora> {
        match self {
            Biome::Temperate => None,
            Biome::Arid => Some(Flora::Cactus { spacing: 8 }),
            Biome::Cold => Some(Flora::Spruce { spacing: 10 }),
        }
    }
}
