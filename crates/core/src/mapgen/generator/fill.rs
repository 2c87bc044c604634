//! Capacity fill and boss convergence passes run after the branching pass.

use crate::error::MapGenError;

use super::super::grid::Look;
use super::attempt::Attempt;

impl Attempt<'_> {
    /// Tops every floor up to its target at random free columns, hooking each
    /// filler onto the nearest node of the floor before it.
    pub(super) fn fill_floors(&mut self) -> Result<(), MapGenError> {
        for floor in 0..self.config.floor_count() {
            let target = self.targets[floor].fill_to();

            while self.placed[floor] < target {
                let free = self.grid.free_columns(floor);
                if free.is_empty() {
                    return Err(MapGenError::NoFreeColumn {
                        floor,
                        missing: target - self.placed[floor],
                    });
                }

                let column = free[self.rng.range_usize(0, free.len())];
                let node = self.instantiate(floor, column)?;
                if floor == 0 {
                    continue;
                }

                let previous = self.closest(floor, column, Look::Behind)?;
                self.link(previous, node);
            }
        }
        Ok(())
    }

    /// Gives every boss an incoming edge and every node right before a boss
    /// floor an edge into that floor.
    pub(super) fn converge_boss_floors(&mut self) -> Result<(), MapGenError> {
        for boss_floor in self.config.boss_floors() {
            let before = boss_floor - 1;

            for (column, boss) in self.grid.occupied(boss_floor) {
                let closest = self.closest(boss_floor, column, Look::Behind)?;
                self.link(closest, boss);
            }

            for (column, node) in self.grid.occupied(before) {
                let closest_boss = self.closest(before, column, Look::Ahead)?;
                self.link(node, closest_boss);
            }
        }
        Ok(())
    }
}
