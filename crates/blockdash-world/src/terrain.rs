//! Terrain generator.
//!
//! Populates a [`WorldGrid`] from a single seeded noise field: layered
//! ground, biome surfaces, caves, trees and flora per column, then large
//! caves, lakes, mountains and a cleared spawn area as post-passes. Later
//! passes overwrite or remove what earlier ones placed, so the order of the
//! phases in [`TerrainGenerator::generate`] matters.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::biome::{Biome, Flora};
use crate::block::{BlockKind, BLOCK_SIZE};
use crate::grid::WorldGrid;
use crate::noise::NoiseField;

/// Columns generated by the per-column pass.
pub const TERRAIN_SPAN: Range<i32> = -300..300;

/// Underground stone stops above this row.
pub const UNDERGROUND_FLOOR: i32 = 50;

/// Rows from the surface down that hold soil and stone strata.
const STRATA_DEPTH: i32 = 8;

/// Rows below the surface that stay dirt before turning to stone.
const DIRT_DEPTH: i32 = 3;

/// Cave noise at or below this carves a void underground.
const CAVE_THRESHOLD: f64 = -0.1;

const TREE_SPACING: i32 = 12;
const TREE_THRESHOLD: f64 = 0.3;
const CANOPY_RADIUS: f64 = 3.5;
const CANOPY_SPARSITY: f64 = -0.3;

const LARGE_CAVE_COUNT: usize = 5;
/// Mixed into the seed for the large-cave RNG so it does not mirror the
/// noise permutation shuffle.
const LARGE_CAVE_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

const LAKE_SPAN: Range<i32> = -150..150;
const LAKE_THRESHOLD: f64 = -0.4;

const MOUNTAIN_SPAN: Range<i32> = -200..200;
const MOUNTAIN_THRESHOLD: f64 = 0.6;
const MOUNTAIN_SCALE: f64 = 25.0;

/// Cleared rectangle around the origin, in grid cells.
pub const SPAWN_CLEAR_X: (i32, i32) = (-5, 5);
pub const SPAWN_CLEAR_Y: (i32, i32) = (-12, 6);

/// Grid row the player spawns on, above the cleared area.
const SPAWN_ROW: i32 = -10;

/// Block counts per generation phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub strata: usize,
    pub underground: usize,
    pub trees: usize,
    pub flora: usize,
    pub large_cave_removed: usize,
    pub lake_removed: usize,
    pub mountain: usize,
    pub spawn_cleared: usize,
    pub total: usize,
}

/// Seeded terrain generator.
pub struct TerrainGenerator {
    seed: u64,
    noise: NoiseField,
}

impl TerrainGenerator {
    /// Create a generator for the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            noise: NoiseField::new(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Columns covered by the per-column pass.
    pub fn span(&self) -> Range<i32> {
        TERRAIN_SPAN
    }

    /// Surface row of column `x` before post-passes.
    pub fn ground_height(&self, x: i32) -> i32 {
        let terrain = self.noise.fbm(x as f64 * 0.02, 0.0, 1.0, 1.0, 6);
        (4.0 + terrain * 12.0) as i32
    }

    pub fn biome_at(&self, x: i32) -> Biome {
        Biome::from_noise(self.noise.fbm(x as f64 * 0.005, 300.0, 1.0, 1.0, 3))
    }

    /// World-space spawn position, above the cleared spawn area.
    pub fn spawn_point(&self) -> (f64, f64) {
        (0.0, SPAWN_ROW as f64 * BLOCK_SIZE)
    }

    /// Run every phase into `grid`.
    pub fn generate(&self, grid: &mut WorldGrid) -> GenerationStats {
        let mut stats = GenerationStats::default();

        // Phase 1: per-column ground, caves, trees and flora
        for x in TERRAIN_SPAN {
            self.generate_column(grid, x, &mut stats);
        }

        // Phase 2: large elliptical caves
        stats.large_cave_removed = self.carve_large_caves(grid);

        // Phase 3: lakes
        stats.lake_removed = self.carve_lakes(grid);

        // Phase 4: mountains
        stats.mountain = self.raise_mountains(grid);

        // Phase 5: spawn safety
        stats.spawn_cleared = grid.clear_rect(
            SPAWN_CLEAR_X.0..=SPAWN_CLEAR_X.1,
            SPAWN_CLEAR_Y.0..=SPAWN_CLEAR_Y.1,
        );

        stats.total = grid.len();
        debug!(seed = self.seed, ?stats, "terrain generated");
        stats
    }

    /// Ground strata, underground stone, trees and biome flora for column `x`.
    pub fn generate_column(&self, grid: &mut WorldGrid, x: i32, stats: &mut GenerationStats) {
        let ground = self.ground_height(x);
        let biome = self.biome_at(x);

        stats.strata += self.fill_strata(grid, x, ground, biome);
        stats.underground += self.fill_underground(grid, x, ground);
        stats.trees += self.place_tree(grid, x, ground);

        if let Some(flora) = biome.flora() {
            stats.flora += self.place_flora(grid, x, ground, flora);
        }
    }

    fn fill_strata(&self, grid: &mut WorldGrid, x: i32, ground: i32, biome: Biome) -> usize {
        let mut placed = 0;
        for y in ground..ground + STRATA_DEPTH {
            let inserted = if y == ground {
                match biome.surface_block() {
                    (kind, Some(tag)) => grid.add_tagged_block_if_absent(x, y, kind, tag),
                    (kind, None) => grid.add_block_if_absent(x, y, kind),
                }
            } else if y > ground + DIRT_DEPTH {
                grid.add_block_if_absent(x, y, BlockKind::Stone)
            } else {
                grid.add_block_if_absent(x, y, BlockKind::Dirt)
            };
            placed += inserted as usize;
        }
        placed
    }

    /// Whether underground cell (x, y) is carved out by cave noise.
    pub fn is_cave(&self, x: i32, y: i32) -> bool {
        self.noise
            .fbm(x as f64 * 0.05, y as f64 * 0.05, 1.0, 1.0, 5)
            <= CAVE_THRESHOLD
    }

    fn fill_underground(&self, grid: &mut WorldGrid, x: i32, ground: i32) -> usize {
        let mut placed = 0;
        for y in ground + STRATA_DEPTH..UNDERGROUND_FLOOR {
            if !self.is_cave(x, y) {
                placed += grid.add_block_if_absent(x, y, BlockKind::Stone) as usize;
            }
        }
        placed
    }

    /// Whether column `x` grows a regular tree.
    pub fn has_tree(&self, x: i32) -> bool {
        x % TREE_SPACING == 0 && self.noise.noise(x as f64 * 0.05, 10.0) > TREE_THRESHOLD
    }

    fn place_tree(&self, grid: &mut WorldGrid, x: i32, ground: i32) -> usize {
        if !self.has_tree(x) {
            return 0;
        }
        let height = 4 + (self.noise.noise(x as f64, 20.0) * 4.0).abs() as i32;
        let top = ground - height;
        let mut placed = 0;

        for y in top..ground {
            placed += grid.add_block_if_absent(x, y, BlockKind::Wood) as usize;
        }

        // Round canopy, thinner towards the edges.
        for lx in x - 3..=x + 3 {
            for ly in top - 4..=top + 1 {
                let dx = (lx - x) as f64;
                let dy = (ly - top) as f64;
                if (dx * dx + dy * dy).sqrt() > CANOPY_RADIUS || grid.has_block_at(lx, ly) {
                    continue;
                }
                if self.noise.noise(lx as f64 * 0.4, ly as f64 * 0.4) > CANOPY_SPARSITY {
                    placed += grid.add_block_if_absent(lx, ly, BlockKind::Leaves) as usize;
                }
            }
        }
        placed
    }

    fn place_flora(&self, grid: &mut WorldGrid, x: i32, ground: i32, flora: Flora) -> usize {
        let mut placed = 0;
        match flora {
            Flora::Cactus { spacing } => {
                if x % spacing != 0 {
                    return 0;
                }
                let height = 3 + (self.noise.noise(x as f64, 40.0) * 3.0).abs() as i32;
                for y in ground - height..ground {
                    placed += grid.add_block_if_absent(x, y, BlockKind::Wood) as usize;
                }
            }
            Flora::Spruce { spacing } => {
                if x % spacing != 0 {
                    return 0;
                }
                let height = 5 + (self.noise.noise(x as f64, 50.0) * 5.0).abs() as i32;
                let top = ground - height;
                for y in top..ground {
                    placed += grid.add_block_if_absent(x, y, BlockKind::Wood) as usize;
                }
                // Diamond canopy centred one row below the trunk top.
                let center_y = top + 1;
                for ly in top - 3..=top + 1 {
                    for lx in x - 2..=x + 2 {
                        let manhattan = ((lx - x).abs() + (ly - center_y).abs()) as f64;
                        if manhattan <= 2.5 {
                            placed += grid.add_block_if_absent(lx, ly, BlockKind::Leaves) as usize;
                        }
                    }
                }
            }
        }
        placed
    }

    /// The elliptical voids carved by the large-cave pass.
    ///
    /// The RNG is derived from the generator seed, so this pass is as
    /// deterministic as the noise-driven ones.
    pub fn large_caves(&self) -> Vec<CaveEllipse> {
        let mut rng = StdRng::seed_from_u64(self.seed ^ LARGE_CAVE_SALT);
        (0..LARGE_CAVE_COUNT)
            .map(|_| CaveEllipse {
                center_x: rng.gen_range(TERRAIN_SPAN),
                center_y: rng.gen_range(10..40),
                size: rng.gen_range(10..30),
            })
            .collect()
    }

    fn carve_large_caves(&self, grid: &mut WorldGrid) -> usize {
        self.large_caves()
            .iter()
            .flat_map(CaveEllipse::cells)
            .filter(|&(x, y)| grid.remove_block(x, y).is_some())
            .count()
    }

    /// Lake noise for column `x`, if the column holds a lake.
    pub fn lake_at(&self, x: i32) -> Option<f64> {
        let lake = self.noise.fbm(x as f64 * 0.04, 100.0, 1.0, 1.0, 3);
        (lake < LAKE_THRESHOLD).then_some(lake)
    }

    fn carve_lakes(&self, grid: &mut WorldGrid) -> usize {
        LAKE_SPAN
            .filter_map(|x| self.lake_at(x).map(|lake| (x, lake)))
            .map(|(x, lake)| carve_lake_column(grid, x, self.ground_height(x), lake))
            .sum()
    }

    /// Mountain noise for column `x`, if the column holds a mountain.
    pub fn mountain_at(&self, x: i32) -> Option<f64> {
        let mountain = self.noise.fbm(x as f64 * 0.01, 200.0, 1.0, 1.0, 4);
        (mountain > MOUNTAIN_THRESHOLD).then_some(mountain)
    }

    fn raise_mountains(&self, grid: &mut WorldGrid) -> usize {
        MOUNTAIN_SPAN
            .filter_map(|x| self.mountain_at(x).map(|mountain| (x, mountain)))
            .map(|(x, mountain)| raise_mountain_column(grid, x, self.ground_height(x), mountain))
            .sum()
    }
}

/// An axis-aligned ellipse of grid cells, `size` wide in each direction and
/// half as tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaveEllipse {
    pub center_x: i32,
    pub center_y: i32,
    pub size: i32,
}

impl CaveEllipse {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let a = self.size as f64;
        let b = (self.size / 2) as f64;
        let dx = (x - self.center_x) as f64;
        let dy = (y - self.center_y) as f64;
        (dx * dx) / (a * a) + (dy * dy) / (b * b) <= 1.0
    }

    /// Every cell inside the ellipse.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let ellipse = *self;
        let half = ellipse.size / 2;
        (ellipse.center_x - ellipse.size..=ellipse.center_x + ellipse.size)
            .flat_map(move |x| {
                (ellipse.center_y - half..=ellipse.center_y + half).map(move |y| (x, y))
            })
            .filter(move |&(x, y)| ellipse.contains(x, y))
    }
}

/// Empty `depth` rows above and including `ground`, then lay a dirt bed
/// under them. Returns the number of blocks removed.
fn carve_lake_column(grid: &mut WorldGrid, x: i32, ground: i32, lake: f64) -> usize {
    let depth = (2.0 + lake.abs() * 5.0) as i32;
    let removed = (ground - depth..=ground)
        .filter(|&y| grid.remove_block(x, y).is_some())
        .count();
    grid.add_block_if_absent(x, ground + 1, BlockKind::Dirt);
    removed
}

/// Stack stone on top of `base`, never replacing existing blocks.
fn raise_mountain_column(grid: &mut WorldGrid, x: i32, base: i32, mountain: f64) -> usize {
    let height = (mountain * MOUNTAIN_SCALE) as i32;
    (base - height..base)
        .filter(|&y| grid.add_block_if_absent(x, y, BlockKind::Stone))
        .count()
}
