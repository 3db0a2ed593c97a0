//! Item entities lying in the world after a block is destroyed.
//!
//! Dropped items use the settle collision policy: a downward hit rests the
//! item on top of the block with zero vertical speed, and resting items lose
//! extra horizontal speed to ground friction. Items never bounce.

use std::f64::consts::TAU;

use rand::Rng;

use blockdash_world::block::BlockKind;
use blockdash_world::item::ItemType;
use blockdash_world::physics::{BlockQuery, Body};

/// Side length of the item's square box.
pub const ITEM_SIZE: f64 = 16.0;
pub const ITEM_GRAVITY: f64 = 0.2;
pub const ITEM_MAX_FALL_SPEED: f64 = 8.0;
/// Horizontal speed multiplier applied every tick.
pub const ITEM_FRICTION: f64 = 0.85;
/// Extra multiplier while resting on a block.
pub const ITEM_RESTING_FRICTION: f64 = 0.5;
/// Ticks an item lives before it despawns (10 s at 60 ticks/s).
pub const ITEM_LIFETIME: i32 = 600;
/// Inclusive pickup distance from the player's centre.
pub const PICKUP_RADIUS: f64 = 32.0;
pub const LAUNCH_SPEED_MIN: f64 = 2.0;
pub const LAUNCH_SPEED_RANGE: f64 = 2.0;
pub const LAUNCH_UPWARD_BIAS: f64 = 2.0;
/// Horizontal speeds below this snap to zero.
pub const STOP_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedItem {
    body: Body,
    item: ItemType,
    source: BlockKind,
    count: u32,
    lifetime: i32,
    resting: bool,
}

impl DroppedItem {
    /// Spawn `count` of `item` at (x, y) with a random launch velocity.
    pub fn new<R: Rng + ?Sized>(x: f64, y: f64, item: ItemType, count: u32, rng: &mut R) -> Self {
        let source = item.block_kind().unwrap_or(BlockKind::Stone);
        Self::launch(x, y, item, source, count, rng)
    }

    /// Spawn the drop for a destroyed block of `kind`.
    pub fn from_block<R: Rng + ?Sized>(
        x: f64,
        y: f64,
        kind: BlockKind,
        count: u32,
        rng: &mut R,
    ) -> Self {
        Self::launch(x, y, ItemType::from_block(kind), kind, count, rng)
    }

    fn launch<R: Rng + ?Sized>(
        x: f64,
        y: f64,
        item: ItemType,
        source: BlockKind,
        count: u32,
        rng: &mut R,
    ) -> Self {
        let angle = rng.gen::<f64>() * TAU;
        let speed = LAUNCH_SPEED_MIN + rng.gen::<f64>() * LAUNCH_SPEED_RANGE;

        let mut body = Body::new(x, y, ITEM_SIZE / 2.0);
        body.vx = angle.cos() * speed;
        body.vy = angle.sin() * speed - LAUNCH_UPWARD_BIAS;

        Self {
            body,
            item,
            source,
            count: count.max(1),
            lifetime: ITEM_LIFETIME,
            resting: false,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.body.x, self.body.y)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.body.vx, self.body.vy)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn item(&self) -> ItemType {
        self.item
    }

    /// Block the item came from; drives its sprite.
    pub fn source(&self) -> BlockKind {
        self.source
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn set_count(&mut self, count: u32) {
        self.count = count;
    }

    pub fn lifetime(&self) -> i32 {
        self.lifetime
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    pub fn sprite_index(&self) -> u32 {
        self.source.sprite_index()
    }

    /// Advance one tick.
    pub fn update<W: BlockQuery + ?Sized>(&mut self, world: &W) {
        self.lifetime -= 1;

        self.body.apply_gravity(ITEM_GRAVITY, ITEM_MAX_FALL_SPEED);
        self.body.vx *= ITEM_FRICTION;
        if self.resting {
            self.body.vx *= ITEM_RESTING_FRICTION;
        }

        let contact = self.body.integrate(world);
        self.resting = contact.landed();

        if self.body.vx.abs() < STOP_THRESHOLD {
            self.body.vx = 0.0;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0
    }

    /// Whether a player centred at (x, y) is close enough to pick this up.
    pub fn try_pickup(&self, player_x: f64, player_y: f64) -> bool {
        self.body.distance_to(player_x, player_y) <= PICKUP_RADIUS
    }
}
