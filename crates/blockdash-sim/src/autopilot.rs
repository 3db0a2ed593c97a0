//! Scripted input driver standing in for keyboard and mouse.
//!
//! Each script is a pure function of the tick number and the game state, so
//! a run with the same seed and script is reproducible.

use std::fmt;
use std::str::FromStr;

use blockdash_game::Game;
use blockdash_world::block::{world_to_grid, GridPos};

use crate::error::SimError;

/// Height of the tower the builder script stacks and tears down.
const TOWER_HEIGHT: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// No input; the player just falls and settles.
    Idle,
    /// Walk, jump, dash, mine ahead and build behind.
    Explore,
    /// Stand still and repeatedly build and demolish a small tower.
    Builder,
}

impl FromStr for Script {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(Script::Idle),
            "explore" => Ok(Script::Explore),
            "builder" => Ok(Script::Builder),
            other => Err(SimError::InvalidConfig(format!(
                "unknown script '{other}' (expected idle, explore or builder)"
            ))),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Script::Idle => "idle",
            Script::Explore => "explore",
            Script::Builder => "builder",
        };
        f.write_str(name)
    }
}

/// Successful actions issued so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActionCounts {
    pub jumps: u64,
    pub dashes: u64,
    pub placed: u64,
    pub destroyed: u64,
}

pub struct Autopilot {
    script: Script,
    direction: i32,
    anchor: Option<GridPos>,
    counts: ActionCounts,
}

impl Autopilot {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            direction: 1,
            anchor: None,
            counts: ActionCounts::default(),
        }
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn counts(&self) -> ActionCounts {
        self.counts
    }

    /// Issue this tick's input. Call before [`Game::tick`].
    pub fn drive(&mut self, game: &mut Game) {
        let tick = game.current_tick();
        match self.script {
            Script::Idle => {}
            Script::Explore => self.explore(game, tick),
            Script::Builder => self.build(game, tick),
        }
    }

    fn player_cell(game: &Game) -> GridPos {
        let (x, y) = game.player().position();
        GridPos::new(world_to_grid(x), world_to_grid(y))
    }

    fn explore(&mut self, game: &mut Game, tick: u64) {
        if tick > 0 && tick % 600 == 0 {
            self.direction = -self.direction;
        }
        game.move_horizontal(self.direction);

        if tick % 45 == 0 {
            let before = game.player().double_jumps();
            game.jump();
            if game.player().double_jumps() != before {
                self.counts.jumps += 1;
            }
        }

        if tick % 120 == 60 && !game.player().is_dashing() {
            let (x, y) = game.player().position();
            game.dash(x + self.direction as f64 * 100.0, y);
            if game.player().is_dashing() {
                self.counts.dashes += 1;
            }
        }

        let cell = Self::player_cell(game);
        match tick % 20 {
            10 => {
                if game.destroy_block(cell.x + self.direction, cell.y) {
                    self.counts.destroyed += 1;
                }
                game.release_pointer();
            }
            15 => {
                if game.place_block(cell.x - self.direction, cell.y + 1) {
                    self.counts.placed += 1;
                }
                game.release_pointer();
            }
            _ => {}
        }

        if tick > 0 && tick % 300 == 0 {
            game.scroll_hotbar(1);
        }
    }

    fn build(&mut self, game: &mut Game, tick: u64) {
        let anchor = *self.anchor.get_or_insert_with(|| Self::player_cell(game));
        if tick % 10 != 0 {
            return;
        }
        let step = ((tick / 10) % (2 * TOWER_HEIGHT as u64)) as i32;
        let x = anchor.x + 2;

        if step < TOWER_HEIGHT {
            if game.place_block(x, anchor.y - step) {
                self.counts.placed += 1;
            }
        } else {
            let level = 2 * TOWER_HEIGHT - 1 - step;
            if game.destroy_block(x, anchor.y - level) {
                self.counts.destroyed += 1;
            }
        }
        game.release_pointer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_script_names() {
        assert_eq!("explore".parse::<Script>().unwrap(), Script::Explore);
        assert_eq!("Builder".parse::<Script>().unwrap(), Script::Builder);
        assert_eq!("idle".parse::<Script>().unwrap(), Script::Idle);
        assert!(matches!(
            "sprint".parse::<Script>(),
            Err(SimError::InvalidConfig(_))
        ));
        assert_eq!(Script::Builder.to_string(), "builder");
        assert_eq!(Autopilot::new(Script::Builder).script(), Script::Builder);
    }

    #[test]
    fn idle_issues_no_actions() {
        let mut game = Game::new(3);
        let mut pilot = Autopilot::new(Script::Idle);
        for _ in 0..50 {
            pilot.drive(&mut game);
            game.tick();
        }
        assert_eq!(pilot.counts(), ActionCounts::default());
        assert_eq!(game.player().velocity().0, 0.0);
    }

    #[test]
    fn builder_places_and_demolishes() {
        let mut game = Game::new(3);
        let mut pilot = Autopilot::new(Script::Builder);
        for _ in 0..80 {
            pilot.drive(&mut game);
            game.tick();
        }
        let counts = pilot.counts();
        assert!(counts.placed > 0);
        assert!(counts.destroyed > 0);
    }

    #[test]
    fn explore_moves_and_jumps() {
        let mut game = Game::new(11);
        let mut pilot = Autopilot::new(Script::Explore);
        let start = game.player().position();
        for _ in 0..200 {
            pilot.drive(&mut game);
            game.tick();
        }
        assert_eq!(game.current_tick(), 200);
        assert!(pilot.counts().jumps > 0);
        assert!(pilot.counts().dashes > 0);
        assert_ne!(game.player().position(), start);
    }
}
