//! Dropped-item lifecycle: physics, pickup and expiry.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use blockdash_world::block::Block;
use blockdash_world::item::ItemStack;
use blockdash_world::physics::BlockQuery;

use crate::dropped_item::DroppedItem;
use crate::inventory::Inventory;

/// What happened to dropped items during one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DropTickReport {
    /// Stacks moved into the inventory.
    pub picked_up: Vec<ItemStack>,
    /// Items removed because their lifetime ran out.
    pub expired: usize,
}

/// Owns every dropped item in the world.
#[derive(Debug, Default, Clone)]
pub struct DropManager {
    items: Vec<DroppedItem>,
}

impl DropManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, item: DroppedItem) {
        self.items.push(item);
    }

    /// Spawn one unit of `block`'s item at the block's centre.
    pub fn spawn_from_block<R: Rng + ?Sized>(&mut self, block: &Block, rng: &mut R) {
        let (x, y) = block.pos.center();
        self.spawn(DroppedItem::from_block(x, y, block.kind, 1, rng));
    }

    pub fn items(&self) -> &[DroppedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Advance every item one tick.
    ///
    /// Each item is updated exactly once. Items within pickup range of the
    /// player move into `inventory`; whatever does not fit stays in the
    /// world. Expired items are removed.
    pub fn update<W: BlockQuery + ?Sized>(
        &mut self,
        world: &W,
        player_pos: (f64, f64),
        inventory: &mut Inventory,
    ) -> DropTickReport {
        let mut report = DropTickReport::default();
        let (px, py) = player_pos;

        self.items.retain_mut(|item| {
            item.update(world);

            if item.try_pickup(px, py) {
                let leftover = inventory.add_item(item.item(), item.count());
                let taken = item.count() - leftover;
                if taken > 0 {
                    report.picked_up.push(ItemStack::new(item.item(), taken));
                }
                if leftover == 0 {
                    return false;
                }
                item.set_count(leftover);
            }

            if item.is_expired() {
                report.expired += 1;
                return false;
            }
            true
        });

        if !report.picked_up.is_empty() || report.expired > 0 {
            debug!(
                picked_up = report.picked_up.len(),
                expired = report.expired,
                remaining = self.items.len(),
                "drops updated"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockdash_world::block::{BlockKind, GridPos};
    use blockdash_world::grid::WorldGrid;
    use blockdash_world::item::{ItemType, MAX_STACK_SIZE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::dropped_item::ITEM_LIFETIME;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    const FAR: (f64, f64) = (10_000.0, 10_000.0);

    #[test]
    fn spawn_from_block_uses_block_centre() {
        let mut drops = DropManager::new();
        let block = Block::new(2, 2, BlockKind::Wood);
        drops.spawn_from_block(&block, &mut rng());
        assert_eq!(drops.len(), 1);
        let item = &drops.items()[0];
        assert_eq!(item.position(), GridPos::new(2, 2).center());
        assert_eq!(item.position(), (80.0, 80.0));
        assert_eq!(item.item(), ItemType::Wood);
        assert_eq!(item.count(), 1);
    }

    #[test]
    fn pickup_moves_item_into_inventory() {
        let world = WorldGrid::new();
        let mut drops = DropManager::new();
        let mut inv = Inventory::empty();
        let mut rng = rng();
        drops.spawn(DroppedItem::new(0.0, 0.0, ItemType::Dirt, 3, &mut rng));

        let report = drops.update(&world, (0.0, 0.0), &mut inv);
        assert!(drops.is_empty());
        assert_eq!(report.picked_up, vec![ItemStack::new(ItemType::Dirt, 3)]);
        assert_eq!(inv.count_of(ItemType::Dirt), 3);
    }

    #[test]
    fn far_items_are_untouched_until_expiry() {
        let world = WorldGrid::new();
        let mut drops = DropManager::new();
        let mut inv = Inventory::empty();
        let mut rng = rng();
        for _ in 0..3 {
            drops.spawn(DroppedItem::new(0.0, 0.0, ItemType::Stone, 1, &mut rng));
        }

        for _ in 1..ITEM_LIFETIME {
            let report = drops.update(&world, FAR, &mut inv);
            assert_eq!(report, DropTickReport::default());
        }
        assert_eq!(drops.len(), 3);

        let report = drops.update(&world, FAR, &mut inv);
        assert_eq!(report.expired, 3);
        assert!(drops.is_empty());
        assert_eq!(inv.count_of(ItemType::Stone), 0);
    }

    #[test]
    fn every_item_updated_once_with_removals() {
        let world = WorldGrid::new();
        let mut drops = DropManager::new();
        let mut inv = Inventory::empty();
        let mut rng = rng();
        // Alternate near and far items so removals interleave with survivors.
        for i in 0..6 {
            let x = if i % 2 == 0 { 0.0 } else { 5_000.0 };
            drops.spawn(DroppedItem::new(x, 0.0, ItemType::Leaves, 1, &mut rng));
        }

        let report = drops.update(&world, (0.0, 0.0), &mut inv);
        assert_eq!(report.picked_up.len(), 3);
        assert_eq!(drops.len(), 3);
        assert!(drops
            .items()
            .iter()
            .all(|item| item.lifetime() == ITEM_LIFETIME - 1));
        assert_eq!(inv.count_of(ItemType::Leaves), 3);
    }

    #[test]
    fn leftover_stays_in_world_when_inventory_full() {
        let world = WorldGrid::new();
        let mut drops = DropManager::new();
        let mut inv = Inventory::empty();
        for i in 0..inv.slots().len() {
            inv.set_slot(i, ItemStack::new(ItemType::Stone, MAX_STACK_SIZE));
        }
        inv.set_slot(0, ItemStack::new(ItemType::Dirt, 62));
        drops.spawn(DroppedItem::new(0.0, 0.0, ItemType::Dirt, 5, &mut rng()));

        let report = drops.update(&world, (0.0, 0.0), &mut inv);
        assert_eq!(report.picked_up, vec![ItemStack::new(ItemType::Dirt, 2)]);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops.items()[0].count(), 3);
        assert_eq!(inv.slot(0).count, 64);
    }
}
