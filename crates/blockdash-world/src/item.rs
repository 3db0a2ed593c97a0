//! Item types and their mapping to and from block materials.

use serde::Serialize;

use crate::block::BlockKind;

/// Maximum number of items in one inventory stack.
pub const MAX_STACK_SIZE: u32 = 64;

/// Item carried in an inventory or lying in the world.
///
/// `Air` marks an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
pub enum ItemType {
    #[default]
    Air,
    Stone,
    Dirt,
    Wood,
    Leaves,
}

impl ItemType {
    /// The item dropped when a block of `kind` is destroyed.
    pub fn from_block(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Stone => ItemType::Stone,
            BlockKind::Dirt => ItemType::Dirt,
            BlockKind::Wood => ItemType::Wood,
            BlockKind::Leaves => ItemType::Leaves,
        }
    }

    /// The block placed by this item, if any.
    pub fn block_kind(self) -> Option<BlockKind> {
        match self {
            ItemType::Air => None,
            ItemType::Stone => Some(BlockKind::Stone),
            ItemType::Dirt => Some(BlockKind::Dirt),
            ItemType::Wood => Some(BlockKind::Wood),
            ItemType::Leaves => Some(BlockKind::Leaves),
        }
    }

    pub fn is_air(self) -> bool {
        self == ItemType::Air
    }

    pub fn max_stack_size(self) -> u32 {
        match self {
            ItemType::Air => 0,
            _ => MAX_STACK_SIZE,
        }
    }

    /// Sprite sheet index; item sprites reuse their block's sprite.
    pub fn sprite_index(self) -> Option<u32> {
        self.block_kind().map(BlockKind::sprite_index)
    }
}

/// A stack of identical items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ItemStack {
    pub item: ItemType,
    pub count: u32,
}

impl ItemStack {
    pub const EMPTY: ItemStack = ItemStack {
        item: ItemType::Air,
        count: 0,
    };

    pub fn new(item: ItemType, count: u32) -> Self {
        if item.is_air() || count == 0 {
            return Self::EMPTY;
        }
        Self { item, count }
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_air() || self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_item_mapping_roundtrips() {
        for kind in BlockKind::ALL {
            assert_eq!(ItemType::from_block(kind).block_kind(), Some(kind));
        }
        assert_eq!(ItemType::Air.block_kind(), None);
    }

    #[test]
    fn air_has_no_sprite_or_stack() {
        assert_eq!(ItemType::Air.sprite_index(), None);
        assert_eq!(ItemType::Air.max_stack_size(), 0);
        assert_eq!(ItemType::Dirt.sprite_index(), Some(BlockKind::Dirt.sprite_index()));
    }

    #[test]
    fn stack_new_normalizes_empty() {
        assert_eq!(ItemStack::new(ItemType::Stone, 0), ItemStack::EMPTY);
        assert_eq!(ItemStack::new(ItemType::Air, 5), ItemStack::EMPTY);
        assert!(!ItemStack::new(ItemType::Wood, 1).is_empty());
    }
}
