//! Sparse block storage keyed by grid coordinate.

use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

use crate::block::{Block, BlockKind, GridPos, RenderTag};
use crate::physics::BlockQuery;

/// The world's blocks. At most one block per coordinate; any `i32` pair is valid.
#[derive(Debug, Default, Clone)]
pub struct WorldGrid {
    blocks: HashMap<GridPos, Block>,
}

impl WorldGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block unless the cell is already occupied. Returns whether
    /// a block was inserted.
    pub fn add_block_if_absent(&mut self, x: i32, y: i32, kind: BlockKind) -> bool {
        self.insert_if_absent(Block::new(x, y, kind))
    }

    /// Same as [`add_block_if_absent`](Self::add_block_if_absent) with a render tag.
    pub fn add_tagged_block_if_absent(
        &mut self,
        x: i32,
        y: i32,
        kind: BlockKind,
        tag: RenderTag,
    ) -> bool {
        self.insert_if_absent(Block::with_tag(x, y, kind, tag))
    }

    fn insert_if_absent(&mut self, block: Block) -> bool {
        match self.blocks.entry(block.pos) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(block);
                true
            }
        }
    }

    /// Remove the block at (x, y), returning it.
    ///
    /// The grid never spawns drops; that is the caller's job.
    pub fn remove_block(&mut self, x: i32, y: i32) -> Option<Block> {
        self.blocks.remove(&GridPos::new(x, y))
    }

    pub fn block_at(&self, x: i32, y: i32) -> Option<&Block> {
        self.blocks.get(&GridPos::new(x, y))
    }

    pub fn has_block_at(&self, x: i32, y: i32) -> bool {
        self.blocks.contains_key(&GridPos::new(x, y))
    }

    /// Snapshot of every block, in no particular order.
    ///
    /// For rendering and tests; physics uses point queries.
    pub fn all_blocks(&self) -> Vec<Block> {
        self.blocks.values().copied().collect()
    }

    /// Remove every block inside the inclusive rectangle. Returns how many
    /// blocks were removed.
    pub fn clear_rect(&mut self, xs: RangeInclusive<i32>, ys: RangeInclusive<i32>) -> usize {
        let before = self.blocks.len();
        self.blocks
            .retain(|pos, _| !(xs.contains(&pos.x) && ys.contains(&pos.y)));
        before - self.blocks.len()
    }

    /// Distinct block kinds currently stored.
    pub fn kinds(&self) -> BTreeSet<BlockKind> {
        self.blocks.values().map(|b| b.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockQuery for WorldGrid {
    fn is_block_at(&self, x: i32, y: i32) -> bool {
        self.has_block_at(x, y)
    }
}
