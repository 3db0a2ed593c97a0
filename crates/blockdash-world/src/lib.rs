//! World model: blocks, items, noise, terrain generation and grid physics.

pub mod biome;
pub mod block;
pub mod grid;
pub mod item;
pub mod noise;
pub mod physics;
pub mod terrain;

pub use block::{Block, BlockKind, GridPos, RenderTag, BLOCK_SIZE};
pub use grid::WorldGrid;
pub use item::{ItemStack, ItemType};
pub use physics::{BlockQuery, Body};
pub use terrain::{GenerationStats, TerrainGenerator};
