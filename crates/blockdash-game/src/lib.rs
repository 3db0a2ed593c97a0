//! Game logic: player, inventory, dropped items and the top-level tick.

pub mod dropped_item;
pub mod drops;
pub mod game_world;
pub mod inventory;
pub mod player;

pub use drops::{DropManager, DropTickReport};
pub use game_world::{Game, RenderSnapshot};
pub use inventory::Inventory;
pub use player::Player;
