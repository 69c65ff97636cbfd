//! View state of the flowgraph editor tab: where each block is drawn, which
//! one is selected, and the dashboard the view is bound to.

use crate::dashboard::Dashboard;
use crate::style::Style;
use flowgraph::order_blocks_for_execution;
use std::collections::HashMap;

const COLUMN_SPACING: f32 = 220.0;
const ROW_SPACING: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Default, Clone)]
pub struct FlowgraphItem {
    style: Style,
    bound: Option<String>,
    positions: HashMap<u64, BlockPosition>,
    selected: Option<u64>,
}

impl FlowgraphItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Forgets everything tied to the bound dashboard. Style is kept.
    pub fn clear(&mut self) {
        self.bound = None;
        self.positions.clear();
        self.selected = None;
    }

    pub fn bound_dashboard(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Binds the view to `dashboard`. Blocks that already have a position keep
    /// it, new blocks are laid out in columns by their distance from a source,
    /// and positions of removed blocks are dropped.
    pub fn bind(&mut self, dashboard: &Dashboard) {
        let definition = &dashboard.definition().flowgraph;
        let ordered = order_blocks_for_execution(&definition.blocks, &definition.connections);

        let mut depth: HashMap<u64, usize> = HashMap::new();
        for block in &ordered {
            let level = definition
                .connections
                .iter()
                .filter(|conn| conn.to_block == block.id)
                .filter_map(|conn| depth.get(&conn.from_block))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(block.id, level);
        }

        self.positions.retain(|id, _| depth.contains_key(id));
        let mut rows: HashMap<usize, usize> = HashMap::new();
        for block in &ordered {
            let column = depth.get(&block.id).copied().unwrap_or(0);
            let row = rows.entry(column).or_insert(0);
            self.positions.entry(block.id).or_insert(BlockPosition {
                x: column as f32 * COLUMN_SPACING,
                y: *row as f32 * ROW_SPACING,
            });
            *row += 1;
        }

        if self
            .selected
            .is_some_and(|id| !self.positions.contains_key(&id))
        {
            self.selected = None;
        }
        self.bound = Some(dashboard.name().to_string());
    }

    pub fn position(&self, block_id: u64) -> Option<BlockPosition> {
        self.positions.get(&block_id).copied()
    }

    pub fn set_position(&mut self, block_id: u64, position: BlockPosition) {
        if let Some(slot) = self.positions.get_mut(&block_id) {
            *slot = position;
        }
    }

    pub fn positions(&self) -> &HashMap<u64, BlockPosition> {
        &self.positions
    }

    pub fn select(&mut self, block_id: Option<u64>) {
        self.selected = block_id.filter(|id| self.positions.contains_key(id));
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }
}
