//! Player movement: walking, double jump, dash and dash trails.

use serde::Serialize;

use blockdash_world::physics::{BlockQuery, Body};

use crate::inventory::Inventory;

/// Side length of the player's square box.
pub const PLAYER_SIZE: f64 = 32.0;
pub const PLAYER_SPEED: f64 = 4.0;
pub const JUMP_POWER: f64 = 12.0;
pub const GRAVITY: f64 = 0.5;
pub const MAX_FALL_SPEED: f64 = 16.0;
/// Horizontal speed lost per tick, towards zero.
pub const AIR_RESISTANCE: f64 = 0.1;
pub const DOUBLE_JUMP_MAX: u8 = 2;
/// Distance covered per dash tick.
pub const DASH_DISTANCE: f64 = 15.0;
/// Dash length in ticks.
pub const DASH_DURATION: i32 = 25;
/// Above this horizontal speed a dash follows the movement direction.
pub const DASH_VELOCITY_THRESHOLD: f64 = 0.1;
pub const TRAIL_MAX_AGE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum DashDirection {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

impl DashDirection {
    /// Unit offset in world axes (Y down).
    pub fn offset(self) -> (f64, f64) {
        match self {
            DashDirection::Right => (1.0, 0.0),
            DashDirection::Left => (-1.0, 0.0),
            DashDirection::Up => (0.0, -1.0),
            DashDirection::Down => (0.0, 1.0),
        }
    }
}

/// Fading afterimage left behind while dashing. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashTrail {
    pub x: f64,
    pub y: f64,
    pub age: u32,
    pub max_age: u32,
}

impl DashTrail {
    fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            age: 0,
            max_age: TRAIL_MAX_AGE,
        }
    }

    /// Opacity in `[0, 1]`, fading linearly with age.
    pub fn alpha(&self) -> f64 {
        (1.0 - self.age as f64 / self.max_age as f64).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.max_age
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    grounded: bool,
    double_jumps: u8,
    dashing: bool,
    dash_timer: i32,
    dash_direction: DashDirection,
    trails: Vec<DashTrail>,
    inventory: Inventory,
}

impl Player {
    /// Player at (x, y) with the starter inventory.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_SIZE / 2.0),
            grounded: true,
            double_jumps: DOUBLE_JUMP_MAX,
            dashing: false,
            dash_timer: 0,
            dash_direction: DashDirection::default(),
            trails: Vec::new(),
            inventory: Inventory::new(),
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.body.x, self.body.y)
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.body.x = x;
        self.body.y = y;
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.body.vx, self.body.vy)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn double_jumps(&self) -> u8 {
        self.double_jumps
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    pub fn dash_direction(&self) -> DashDirection {
        self.dash_direction
    }

    pub fn dash_timer(&self) -> i32 {
        self.dash_timer
    }

    pub fn trails(&self) -> &[DashTrail] {
        &self.trails
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Set horizontal speed from a direction in {-1, 0, 1}.
    pub fn move_horizontal(&mut self, direction: i32) {
        self.body.vx = direction.clamp(-1, 1) as f64 * PLAYER_SPEED;
    }

    /// Jump from the ground, or spend a double-jump charge in the air.
    pub fn jump(&mut self) {
        if self.grounded {
            self.body.vy = -JUMP_POWER;
            self.grounded = false;
            self.double_jumps = DOUBLE_JUMP_MAX - 1;
        } else if self.double_jumps > 0 {
            self.body.vy = -JUMP_POWER;
            self.double_jumps -= 1;
        }
    }

    /// Start a dash towards the movement direction, or towards
    /// (target_x, target_y) when standing still. No-op while dashing.
    pub fn dash(&mut self, target_x: f64, target_y: f64) {
        if self.dashing {
            return;
        }
        self.dash_direction = if self.body.vx.abs() > DASH_VELOCITY_THRESHOLD {
            if self.body.vx > 0.0 {
                DashDirection::Right
            } else {
                DashDirection::Left
            }
        } else {
            let dx = target_x - self.body.x;
            let dy = target_y - self.body.y;
            if dx.abs() > dy.abs() {
                if dx > 0.0 {
                    DashDirection::Right
                } else {
                    DashDirection::Left
                }
            } else if dy > 0.0 {
                DashDirection::Down
            } else {
                DashDirection::Up
            }
        };
        self.dashing = true;
        self.dash_timer = DASH_DURATION;
        self.body.vy = 0.0;
        self.push_trail();
    }

    /// Advance one tick.
    pub fn update<W: BlockQuery + ?Sized>(&mut self, world: &W) {
        if self.dashing {
            self.update_dash(world);
        } else {
            self.update_physics(world);
        }
        self.age_trails();
    }

    fn update_physics<W: BlockQuery + ?Sized>(&mut self, world: &W) {
        self.body.apply_gravity(GRAVITY, MAX_FALL_SPEED);

        let vx = self.body.vx;
        self.body.vx = if vx > 0.0 {
            (vx - AIR_RESISTANCE).max(0.0)
        } else {
            (vx + AIR_RESISTANCE).min(0.0)
        };

        let contact = self.body.integrate(world);
        let landed = contact.landed();
        if landed && !self.grounded {
            self.double_jumps = DOUBLE_JUMP_MAX;
        }
        self.grounded = landed;
    }

    fn update_dash<W: BlockQuery + ?Sized>(&mut self, world: &W) {
        self.dash_timer -= 1;
        if self.dash_timer % 2 == 0 {
            self.push_trail();
        }

        let (old_x, old_y) = self.position();
        let (dx, dy) = self.dash_direction.offset();
        self.body.x += dx * DASH_DISTANCE;
        self.body.y += dy * DASH_DISTANCE;

        if self.body.swept_overlaps(world, old_x, old_y) {
            self.set_position(old_x, old_y);
            self.dashing = false;
        } else if self.dash_timer <= 0 {
            self.dashing = false;
        }
        self.grounded = self.body.is_supported(world);
    }

    fn push_trail(&mut self) {
        self.trails.push(DashTrail::new(self.body.x, self.body.y));
    }

    fn age_trails(&mut self) {
        self.trails.retain_mut(|trail| {
            trail.age += 1;
            !trail.is_expired()
        });
    }
}
