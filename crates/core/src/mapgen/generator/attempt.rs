//! One generation attempt: node placement and forward branching.

use slotmap::SlotMap;

use crate::config::{FloorTarget, MapConfig, ResolvedCounts};
use crate::error::MapGenError;
use crate::types::{GridPos, NodeId};

use super::super::grid::{FloorGrid, Look, shuffled_columns};
use super::super::layout::LayoutProjector;
use super::super::model::MapNode;
use super::super::rng::MapRng;
use super::super::seed::derive_node_seed;

/// Attempt-local state threaded through the recursive construction calls.
pub(super) struct Attempt<'a> {
    pub(super) config: &'a MapConfig,
    pub(super) projector: &'a LayoutProjector,
    pub(super) rng: &'a mut MapRng,
    pub(super) chapter_seed: i32,
    pub(super) targets: Vec<FloorTarget>,
    pub(super) placed: Vec<usize>,
    pub(super) connections: usize,
    pub(super) grid: FloorGrid,
    pub(super) nodes: SlotMap<NodeId, MapNode>,
}

pub(super) struct AttemptOutcome {
    pub(super) connections: usize,
    pub(super) targets: Vec<FloorTarget>,
    pub(super) grid: FloorGrid,
    pub(super) nodes: SlotMap<NodeId, MapNode>,
}

impl<'a> Attempt<'a> {
    /// Clears the count cache and rolls fresh floor targets from `rng`, which
    /// the caller has already reseeded for this attempt.
    pub(super) fn new(
        config: &'a MapConfig,
        projector: &'a LayoutProjector,
        rng: &'a mut MapRng,
        counts: &mut ResolvedCounts,
        chapter_seed: i32,
    ) -> Self {
        counts.clear();
        let targets = counts.resolve_all(config, rng);
        let floor_count = config.floor_count();

        Self {
            config,
            projector,
            rng,
            chapter_seed,
            targets,
            placed: vec![0; floor_count],
            connections: 0,
            grid: FloorGrid::new(floor_count, config.max_width),
            nodes: SlotMap::with_key(),
        }
    }

    pub(super) fn run(mut self) -> Result<AttemptOutcome, MapGenError> {
        self.seed_first_floor()?;
        self.fill_floors()?;
        self.converge_boss_floors()?;

        Ok(AttemptOutcome {
            connections: self.connections,
            targets: self.targets,
            grid: self.grid,
            nodes: self.nodes,
        })
    }

    fn seed_first_floor(&mut self) -> Result<(), MapGenError> {
        let count = self.targets[0].fill_to();
        for column in shuffled_columns(self.config.max_width, count, self.rng) {
            self.instantiate(0, column)?;
        }
        Ok(())
    }

    /// Returns the node at `(floor, column)`, creating it and its forward
    /// branches when the slot is empty and the floor still has budget.
    pub(super) fn instantiate(
        &mut self,
        floor: usize,
        column: usize,
    ) -> Result<NodeId, MapGenError> {
        let config = self.config;
        let is_boss_floor = config.is_boss_floor(floor);

        // Boss floors place by ordinal, so the requested slot says nothing.
        if !is_boss_floor && let Some(existing) = self.grid.get(floor, column) {
            return Ok(existing);
        }

        if self.targets[floor].is_reached(self.placed[floor]) {
            return self.closest(floor, column, Look::Same);
        }

        let layer = &config.layers[floor];
        let mut column = column;
        let mut position = self.projector.grid_position(floor, column);

        if is_boss_floor {
            let boss_count = self.targets[floor].fill_to();
            let ordinal = self.placed[floor];
            position.x = self.projector.boss_offset(ordinal, boss_count);
            column = self.projector.boss_column(ordinal, boss_count);
        }

        let jitter = self.projector.jitter_extent();
        position.x += self.rng.range_f32(-jitter.x, jitter.x) * layer.jitter;
        position.y += self.rng.range_f32(-jitter.y, jitter.y) * layer.jitter;

        let variant = config.catalog.pick(&layer.category, self.rng)?;
        let node = MapNode {
            pos: GridPos { floor, column },
            category: layer.category.clone(),
            variant: variant.name.clone(),
            weight: variant.weight,
            seed: derive_node_seed(self.chapter_seed, floor, column),
            position,
            next: Vec::new(),
        };

        let id = self.nodes.insert(node);
        self.placed[floor] += 1;
        self.grid.set(floor, column, id);

        self.branch_forward(id, floor, column)?;
        Ok(id)
    }

    /// Rolls side and middle branches until at least one lands.
    fn branch_forward(
        &mut self,
        from: NodeId,
        floor: usize,
        column: usize,
    ) -> Result<(), MapGenError> {
        let last_floor = self.config.floor_count() - 1;
        let last_column = self.config.max_width - 1;
        let side = self.config.chance_path_side;
        let middle = self.config.chance_path_middle;

        let mut created = 0;
        while created == 0 && floor < last_floor {
            if column > 0 && self.rng.chance(side) && self.may_branch_sideways(floor, column) {
                self.connect_forward(from, floor + 1, column - 1)?;
                created += 1;
            }

            if column < last_column
                && self.rng.chance(side)
                && self.may_branch_sideways(floor, column)
            {
                self.connect_forward(from, floor + 1, column + 1)?;
                created += 1;
            }

            if self.rng.chance(middle) {
                self.connect_forward(from, floor + 1, column)?;
                created += 1;
            }
        }

        Ok(())
    }

    /// Side branches are blocked by a node straight ahead unless crossing is allowed.
    fn may_branch_sideways(&self, floor: usize, column: usize) -> bool {
        self.config.allow_path_crossing || !self.grid.is_occupied(floor + 1, column)
    }

    fn connect_forward(
        &mut self,
        from: NodeId,
        floor: usize,
        column: usize,
    ) -> Result<(), MapGenError> {
        let next = self.instantiate(floor, column)?;

        // Boss floors wire their incoming edges in the convergence pass.
        if !self.config.is_boss_floor(floor) {
            self.link(from, next);
        }
        self.connections += 1;
        Ok(())
    }

    /// Adds `from -> to` unless that edge already exists.
    pub(super) fn link(&mut self, from: NodeId, to: NodeId) -> bool {
        let next = &mut self.nodes[from].next;
        if next.contains(&to) {
            return false;
        }
        next.push(to);
        true
    }

    pub(super) fn closest(
        &self,
        floor: usize,
        column: usize,
        look: Look,
    ) -> Result<NodeId, MapGenError> {
        self.grid.closest(floor, column, look).ok_or(MapGenError::NoOccupiedRow {
            floor: match look {
                Look::Behind => floor.saturating_sub(1),
                Look::Same => floor,
                Look::Ahead => floor + 1,
            },
        })
    }
}
