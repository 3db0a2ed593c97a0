//! Player inventory.
//!
//! 36 slots: 0-8 are the hotbar, 9-35 are storage. Slot access never fails;
//! out-of-range reads return an empty stack and out-of-range writes are
//! ignored.

use serde::Serialize;
use tracing::debug;

use blockdash_world::item::{ItemStack, ItemType};

pub const HOTBAR_SIZE: usize = 9;
pub const STORAGE_SIZE: usize = 27;
pub const INVENTORY_SIZE: usize = HOTBAR_SIZE + STORAGE_SIZE;

/// Slots filled by [`Inventory::new`].
const STARTER_KIT: [(usize, ItemType, u32); 4] = [
    (0, ItemType::Stone, 64),
    (1, ItemType::Dirt, 64),
    (2, ItemType::Wood, 64),
    (3, ItemType::Leaves, 64),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    slots: Vec<ItemStack>,
    selected: usize,
    open: bool,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// Inventory with the starter kit in the first hotbar slots.
    pub fn new() -> Self {
        let mut inv = Self::empty();
        for (slot, item, count) in STARTER_KIT {
            inv.set_slot(slot, ItemStack::new(item, count));
        }
        inv
    }

    pub fn empty() -> Self {
        Self {
            slots: vec![ItemStack::EMPTY; INVENTORY_SIZE],
            selected: 0,
            open: false,
        }
    }

    pub fn slot(&self, index: usize) -> ItemStack {
        self.slots.get(index).copied().unwrap_or(ItemStack::EMPTY)
    }

    /// Hotbar slot `index` (0-8).
    pub fn hotbar_slot(&self, index: usize) -> ItemStack {
        if index < HOTBAR_SIZE {
            self.slot(index)
        } else {
            ItemStack::EMPTY
        }
    }

    pub fn set_slot(&mut self, index: usize, stack: ItemStack) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = ItemStack::new(stack.item, stack.count);
        }
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn hotbar(&self) -> &[ItemStack] {
        &self.slots[..HOTBAR_SIZE]
    }

    pub fn storage(&self) -> &[ItemStack] {
        &self.slots[HOTBAR_SIZE..]
    }

    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    /// Select a hotbar slot. Indices outside the hotbar are ignored.
    pub fn select_slot(&mut self, index: usize) {
        if index < HOTBAR_SIZE {
            self.selected = index;
        }
    }

    /// Move the selection by `delta` slots, wrapping around the hotbar.
    pub fn scroll(&mut self, delta: i32) {
        let size = HOTBAR_SIZE as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(size) as usize;
    }

    pub fn selected_item(&self) -> ItemStack {
        self.slot(self.selected)
    }

    /// Take one unit from the selected slot.
    ///
    /// Returns the consumed item type, or `None` if the slot was empty. A
    /// stack that reaches zero becomes empty.
    pub fn consume_selected(&mut self) -> Option<ItemType> {
        let slot = &mut self.slots[self.selected];
        if slot.is_empty() {
            return None;
        }
        let item = slot.item;
        slot.count -= 1;
        if slot.count == 0 {
            *slot = ItemStack::EMPTY;
        }
        Some(item)
    }

    /// Add `count` items, merging into existing stacks first and then
    /// filling empty slots, hotbar before storage in both passes.
    ///
    /// Returns how many items did not fit.
    pub fn add_item(&mut self, item: ItemType, count: u32) -> u32 {
        if item.is_air() || count == 0 {
            return 0;
        }
        let max = item.max_stack_size();
        let mut remaining = count;

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.item == item && slot.count < max {
                let moved = (max - slot.count).min(remaining);
                slot.count += moved;
                remaining -= moved;
            }
        }

        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                let moved = max.min(remaining);
                *slot = ItemStack::new(item, moved);
                remaining -= moved;
            }
        }

        if remaining > 0 {
            debug!(?item, count, leftover = remaining, "inventory full");
        }
        remaining
    }

    /// Total number of `item` across all slots.
    pub fn count_of(&self, item: ItemType) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.item == item)
            .map(|s| s.count)
            .sum()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_kit() {
        let inv = Inventory::new();
        assert_eq!(inv.slots().len(), INVENTORY_SIZE);
        assert_eq!(inv.slot(0), ItemStack::new(ItemType::Stone, 64));
        assert_eq!(inv.slot(1), ItemStack::new(ItemType::Dirt, 64));
        assert_eq!(inv.slot(2), ItemStack::new(ItemType::Wood, 64));
        assert_eq!(inv.slot(3), ItemStack::new(ItemType::Leaves, 64));
        assert!(inv.slots()[4..].iter().all(|s| s.is_empty()));
        assert_eq!(inv.selected_slot(), 0);
        assert!(!inv.is_open());
    }

    #[test]
    fn empty_inventory_is_empty() {
        let inv = Inventory::empty();
        assert!(inv.slots().iter().all(|s| s.is_empty()));
        assert_eq!(inv.hotbar().len(), HOTBAR_SIZE);
        assert_eq!(inv.storage().len(), STORAGE_SIZE);
    }

    #[test]
    fn out_of_range_access_is_harmless() {
        let mut inv = Inventory::new();
        assert_eq!(inv.slot(36), ItemStack::EMPTY);
        assert_eq!(inv.slot(usize::MAX), ItemStack::EMPTY);
        assert_eq!(inv.hotbar_slot(9), ItemStack::EMPTY);
        let before = inv.clone();
        inv.set_slot(100, ItemStack::new(ItemType::Dirt, 3));
        assert_eq!(inv, before);
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut inv = Inventory::new();
        inv.select_slot(4);
        assert_eq!(inv.selected_slot(), 4);
        inv.select_slot(9);
        assert_eq!(inv.selected_slot(), 4);
    }

    #[test]
    fn scroll_wraps() {
        let mut inv = Inventory::new();
        inv.scroll(-1);
        assert_eq!(inv.selected_slot(), 8);
        inv.scroll(1);
        assert_eq!(inv.selected_slot(), 0);
        inv.scroll(20);
        assert_eq!(inv.selected_slot(), 2);
    }

    #[test]
    fn consume_until_empty() {
        let mut inv = Inventory::empty();
        inv.set_slot(0, ItemStack::new(ItemType::Wood, 2));
        assert_eq!(inv.consume_selected(), Some(ItemType::Wood));
        assert_eq!(inv.selected_item().count, 1);
        assert_eq!(inv.consume_selected(), Some(ItemType::Wood));
        assert_eq!(inv.selected_item(), ItemStack::EMPTY);
        assert_eq!(inv.consume_selected(), None);
    }

    #[test]
    fn add_merges_before_filling_empty_slots() {
        let mut inv = Inventory::empty();
        inv.set_slot(5, ItemStack::new(ItemType::Dirt, 60));
        assert_eq!(inv.add_item(ItemType::Dirt, 10), 0);
        assert_eq!(inv.slot(5).count, 64);
        // The rest lands in the first empty slot.
        assert_eq!(inv.slot(0), ItemStack::new(ItemType::Dirt, 6));
        assert_eq!(inv.count_of(ItemType::Dirt), 70);
    }

    #[test]
    fn add_spills_into_storage() {
        let mut inv = Inventory::empty();
        for i in 0..HOTBAR_SIZE {
            inv.set_slot(i, ItemStack::new(ItemType::Stone, 64));
        }
        assert_eq!(inv.add_item(ItemType::Leaves, 5), 0);
        assert_eq!(inv.slot(HOTBAR_SIZE), ItemStack::new(ItemType::Leaves, 5));
    }

    #[test]
    fn add_reports_leftover_when_full() {
        let mut inv = Inventory::empty();
        for i in 0..INVENTORY_SIZE {
            inv.set_slot(i, ItemStack::new(ItemType::Stone, 64));
        }
        inv.set_slot(7, ItemStack::new(ItemType::Wood, 62));
        assert_eq!(inv.add_item(ItemType::Wood, 5), 3);
        assert_eq!(inv.slot(7).count, 64);
        assert_eq!(inv.add_item(ItemType::Dirt, 1), 1);
    }

    #[test]
    fn add_nothing() {
        let mut inv = Inventory::empty();
        assert_eq!(inv.add_item(ItemType::Air, 5), 0);
        assert_eq!(inv.add_item(ItemType::Stone, 0), 0);
        assert!(inv.slots().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn open_close_toggle() {
        let mut inv = Inventory::new();
        inv.toggle_open();
        assert!(inv.is_open());
        inv.toggle_open();
        assert!(!inv.is_open());
        inv.open();
        inv.close();
        assert!(!inv.is_open());
    }
}
