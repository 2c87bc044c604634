//! Floor-by-column slot grid and the searches run over it.

use crate::types::NodeId;

use super::rng::MapRng;

/// Which row a closest-node search inspects, relative to the searching floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Look {
    Behind,
    Same,
    Ahead,
}

impl Look {
    fn target_floor(self, floor: usize) -> Option<usize> {
        match self {
            Self::Behind => floor.checked_sub(1),
            Self::Same => Some(floor),
            Self::Ahead => floor.checked_add(1),
        }
    }
}

/// `floor -> column -> node` occupancy for one generated map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorGrid {
    width: usize,
    rows: Vec<Vec<Option<NodeId>>>,
}

impl FloorGrid {
    pub fn new(floor_count: usize, width: usize) -> Self {
        Self { width, rows: vec![vec![None; width]; floor_count] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn floor_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, floor: usize) -> &[Option<NodeId>] {
        &self.rows[floor]
    }

    pub fn get(&self, floor: usize, column: usize) -> Option<NodeId> {
        self.rows.get(floor).and_then(|row| row.get(column).copied().flatten())
    }

    pub fn is_occupied(&self, floor: usize, column: usize) -> bool {
        self.get(floor, column).is_some()
    }

    pub(crate) fn set(&mut self, floor: usize, column: usize, node: NodeId) {
        self.rows[floor][column] = Some(node);
    }

    /// Occupied `(column, node)` pairs of a floor, left to right.
    pub fn occupied(&self, floor: usize) -> Vec<(usize, NodeId)> {
        self.rows[floor]
            .iter()
            .enumerate()
            .filter_map(|(column, slot)| slot.map(|node| (column, node)))
            .collect()
    }

    pub fn occupied_count(&self, floor: usize) -> usize {
        self.rows[floor].iter().filter(|slot| slot.is_some()).count()
    }

    pub fn free_columns(&self, floor: usize) -> Vec<usize> {
        self.rows[floor]
            .iter()
            .enumerate()
            .filter_map(|(column, slot)| slot.is_none().then_some(column))
            .collect()
    }

    /// Nearest occupied slot to `column` on the row selected by `look`.
    ///
    /// Scans outward one column at a time, left before right, so the left
    /// candidate wins ties.
    pub fn closest(&self, floor: usize, column: usize, look: Look) -> Option<NodeId> {
        let row = self.rows.get(look.target_floor(floor)?)?;
        closest_in_row(row, column).map(|(_, node)| node)
    }
}

pub fn closest_in_row(row: &[Option<NodeId>], column: usize) -> Option<(usize, NodeId)> {
    for distance in 0..row.len() {
        if let Some(left) = column.checked_sub(distance)
            && let Some(Some(node)) = row.get(left)
        {
            return Some((left, *node));
        }

        let right = column + distance;
        if distance != 0
            && let Some(Some(node)) = row.get(right)
        {
            return Some((right, *node));
        }
    }
    None
}

/// First `count` entries of a Fisher-Yates shuffle of `0..width`.
///
/// Walks `i` from the top down, swapping with a uniform index in `[0, i]`.
pub fn shuffled_columns(width: usize, count: usize, rng: &mut MapRng) -> Vec<usize> {
    let mut columns: Vec<usize> = (0..width).collect();
    for i in (1..width).rev() {
        let j = rng.range_usize(0, i + 1);
        columns.swap(i, j);
    }
    columns.truncate(count);
    columns
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids(count: usize) -> Vec<NodeId> {
        let mut arena = SlotMap::<NodeId, ()>::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn closest_prefers_left_on_equal_distance() {
        let nodes = ids(2);
        let mut grid = FloorGrid::new(2, 7);
        grid.set(1, 1, nodes[0]);
        grid.set(1, 5, nodes[1]);

        assert_eq!(grid.closest(0, 3, Look::Ahead), Some(nodes[0]));
        assert_eq!(grid.closest(0, 4, Look::Ahead), Some(nodes[1]));
        assert_eq!(grid.closest(1, 3, Look::Same), Some(nodes[0]));
    }

    #[test]
    fn closest_checks_exact_column_first() {
        let nodes = ids(2);
        let mut grid = FloorGrid::new(2, 5);
        grid.set(0, 2, nodes[0]);
        grid.set(0, 1, nodes[1]);
        assert_eq!(grid.closest(1, 2, Look::Behind), Some(nodes[0]));
    }

    #[test]
    fn closest_returns_none_for_empty_or_missing_rows() {
        let grid = FloorGrid::new(2, 4);
        assert_eq!(grid.closest(0, 2, Look::Ahead), None);
        assert_eq!(grid.closest(0, 2, Look::Behind), None);
        assert_eq!(grid.closest(1, 2, Look::Ahead), None);
    }

    #[test]
    fn free_and_occupied_columns_partition_the_row() {
        let nodes = ids(2);
        let mut grid = FloorGrid::new(1, 4);
        grid.set(0, 0, nodes[0]);
        grid.set(0, 3, nodes[1]);
        assert_eq!(grid.free_columns(0), vec![1, 2]);
        assert_eq!(grid.occupied(0), vec![(0, nodes[0]), (3, nodes[1])]);
        assert_eq!(grid.occupied_count(0), 2);
    }

    #[test]
    fn shuffled_columns_are_distinct_and_reproducible() {
        let mut rng = MapRng::new(99);
        let first = shuffled_columns(7, 4, &mut rng);
        rng.reseed(99);
        let second = shuffled_columns(7, 4, &mut rng);

        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        let mut sorted = first.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
        assert!(first.iter().all(|&column| column < 7));
    }

    #[test]
    fn shuffling_everything_is_a_permutation() {
        let mut rng = MapRng::new(1);
        let mut columns = shuffled_columns(6, 6, &mut rng);
        columns.sort_unstable();
        assert_eq!(columns, (0..6).collect::<Vec<_>>());
    }
}
