//! Top-level game state: world grid, player, dropped items and the tick loop.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use blockdash_world::block::{BlockKind, GridPos, PLAYER_SPRITE};
use blockdash_world::grid::WorldGrid;
use blockdash_world::item::{ItemStack, ItemType};
use blockdash_world::terrain::{GenerationStats, TerrainGenerator};

use crate::drops::{DropManager, DropTickReport};
use crate::player::{Player, PLAYER_SIZE};

/// Mixed into the world seed for the drop-velocity RNG.
const DROP_RNG_SALT: u64 = 0x5eed_d20b_0000_0001;

// ---------------------------------------------------------------------------
// Render snapshot
// ---------------------------------------------------------------------------

/// A block as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockView {
    pub x: i32,
    pub y: i32,
    pub kind: BlockKind,
    pub grass: bool,
    pub sprite: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemView {
    pub x: f64,
    pub y: f64,
    pub item: ItemType,
    pub count: u32,
    pub sprite: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailView {
    pub x: f64,
    pub y: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub sprite: u32,
    pub grounded: bool,
    pub dashing: bool,
}

/// Read-only view of everything the renderer draws in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub blocks: Vec<BlockView>,
    pub items: Vec<ItemView>,
    pub player: PlayerView,
    pub trails: Vec<TrailView>,
    pub slots: Vec<ItemStack>,
    pub selected_slot: usize,
    pub inventory_open: bool,
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

pub struct Game {
    seed: u64,
    world: WorldGrid,
    player: Player,
    drops: DropManager,
    drop_rng: StdRng,
    tick: u64,
    generation: GenerationStats,
    /// Last cell acted on per pointer action; repeats on it are ignored.
    last_place: Option<GridPos>,
    last_destroy: Option<GridPos>,
}

impl Game {
    /// Generate a world for `seed` and put the player at its spawn point.
    pub fn new(seed: u64) -> Self {
        let generator = TerrainGenerator::new(seed);
        let mut world = WorldGrid::new();
        let generation = generator.generate(&mut world);
        let (spawn_x, spawn_y) = generator.spawn_point();

        info!(seed, blocks = world.len(), spawn_x, spawn_y, "world ready");

        Self {
            seed,
            world,
            player: Player::new(spawn_x, spawn_y),
            drops: DropManager::new(),
            drop_rng: StdRng::seed_from_u64(seed ^ DROP_RNG_SALT),
            tick: 0,
            generation,
            last_place: None,
            last_destroy: None,
        }
    }

    /// Run one tick: player physics, then dropped items against the
    /// player's new position.
    pub fn tick(&mut self) -> DropTickReport {
        self.tick += 1;
        self.player.update(&self.world);

        let position = self.player.position();
        self.drops
            .update(&self.world, position, self.player.inventory_mut())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn generation_stats(&self) -> GenerationStats {
        self.generation
    }

    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldGrid {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn drops(&self) -> &DropManager {
        &self.drops
    }

    /// Movement and block edits are ignored while the inventory is open.
    fn input_locked(&self) -> bool {
        self.player.inventory().is_open()
    }

    // -- Movement -----------------------------------------------------------

    pub fn move_horizontal(&mut self, direction: i32) {
        if !self.input_locked() {
            self.player.move_horizontal(direction);
        }
    }

    pub fn jump(&mut self) {
        if !self.input_locked() {
            self.player.jump();
        }
    }

    /// Dash towards a world-space target.
    pub fn dash(&mut self, target_x: f64, target_y: f64) {
        if !self.input_locked() {
            self.player.dash(target_x, target_y);
        }
    }

    // -- Block edits --------------------------------------------------------

    /// Place the selected item's block at (gx, gy).
    ///
    /// Returns whether a block was placed. No-op on an occupied cell, an
    /// empty selected slot, or the same cell as the previous placement.
    pub fn place_block(&mut self, gx: i32, gy: i32) -> bool {
        if self.input_locked() {
            return false;
        }
        let pos = GridPos::new(gx, gy);
        if self.last_place == Some(pos) {
            return false;
        }
        self.last_place = Some(pos);

        if self.world.has_block_at(gx, gy) {
            return false;
        }
        let Some(kind) = self.player.inventory().selected_item().item.block_kind() else {
            return false;
        };
        self.world.add_block_if_absent(gx, gy, kind);
        self.player.inventory_mut().consume_selected();
        debug!(gx, gy, ?kind, "block placed");
        true
    }

    /// Remove the block at (gx, gy) and drop its item at the block centre.
    ///
    /// Returns whether a block was removed.
    pub fn destroy_block(&mut self, gx: i32, gy: i32) -> bool {
        if self.input_locked() {
            return false;
        }
        let pos = GridPos::new(gx, gy);
        if self.last_destroy == Some(pos) {
            return false;
        }
        self.last_destroy = Some(pos);

        let Some(block) = self.world.remove_block(gx, gy) else {
            return false;
        };
        self.drops.spawn_from_block(&block, &mut self.drop_rng);
        debug!(gx, gy, kind = ?block.kind, "block destroyed");
        true
    }

    /// Forget the last acted cells, so the next edit on the same cell runs.
    pub fn release_pointer(&mut self) {
        self.last_place = None;
        self.last_destroy = None;
    }

    // -- Inventory ----------------------------------------------------------

    pub fn select_slot(&mut self, index: usize) {
        self.player.inventory_mut().select_slot(index);
    }

    pub fn scroll_hotbar(&mut self, delta: i32) {
        self.player.inventory_mut().scroll(delta);
    }

    pub fn toggle_inventory(&mut self) {
        self.player.inventory_mut().toggle_open();
    }

    pub fn close_inventory(&mut self) {
        self.player.inventory_mut().close();
    }

    // -- Rendering ----------------------------------------------------------

    pub fn snapshot(&self) -> RenderSnapshot {
        let mut blocks: Vec<BlockView> = self
            .world
            .all_blocks()
            .into_iter()
            .map(|b| BlockView {
                x: b.pos.x,
                y: b.pos.y,
                kind: b.kind,
                grass: b.is_grass(),
                sprite: b.sprite_index(),
            })
            .collect();
        blocks.sort_by_key(|b| (b.y, b.x));

        let items = self
            .drops
            .items()
            .iter()
            .map(|item| {
                let (x, y) = item.position();
                ItemView {
                    x,
                    y,
                    item: item.item(),
                    count: item.count(),
                    sprite: item.sprite_index(),
                }
            })
            .collect();

        let trails = self
            .player
            .trails()
            .iter()
            .map(|t| TrailView {
                x: t.x,
                y: t.y,
                alpha: t.alpha(),
            })
            .collect();

        let (x, y) = self.player.position();
        let inventory = self.player.inventory();

        RenderSnapshot {
            tick: self.tick,
            blocks,
            items,
            player: PlayerView {
                x,
                y,
                size: PLAYER_SIZE,
                sprite: PLAYER_SPRITE,
                grounded: self.player.is_grounded(),
                dashing: self.player.is_dashing(),
            },
            trails,
            slots: inventory.slots().to_vec(),
            selected_slot: inventory.selected_slot(),
            inventory_open: inventory.is_open(),
        }
    }
}
