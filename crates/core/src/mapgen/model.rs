//! Public data models for a generated chapter map.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::FloorTarget;
use crate::types::{Category, GridPos, NodeId, Vec2};

use super::grid::FloorGrid;
use super::layout::{EdgeSegments, LayoutProjector};
use super::rng::MapRng;

#[derive(Clone, Debug, PartialEq)]
pub struct MapNode {
    pub pos: GridPos,
    pub category: Category,
    /// Catalog variant chosen for this node.
    pub variant: String,
    pub weight: u32,
    pub seed: i32,
    pub position: Vec2,
    pub next: Vec<NodeId>,
}

impl MapNode {
    pub fn floor(&self) -> usize {
        self.pos.floor
    }

    pub fn column(&self) -> usize {
        self.pos.column
    }

    /// Stream for content rolls on this node, independent of the map's own RNG.
    pub fn rng(&self) -> MapRng {
        MapRng::new(u64::from(self.seed as u32))
    }
}

/// A fully connected chapter map. Nodes live in an arena and are addressed by
/// [`NodeId`]; the grid maps `(floor, column)` slots onto those ids.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub(crate) chapter: usize,
    pub(crate) chapter_seed: i32,
    pub(crate) attempts: usize,
    pub(crate) connections: usize,
    pub(crate) boss_floors: Vec<usize>,
    pub(crate) targets: Vec<FloorTarget>,
    pub(crate) grid: FloorGrid,
    pub(crate) nodes: SlotMap<NodeId, MapNode>,
}

impl GeneratedMap {
    pub fn chapter(&self) -> usize {
        self.chapter
    }

    pub fn chapter_seed(&self) -> i32 {
        self.chapter_seed
    }

    /// Attempts it took to pass the connectivity threshold, at least one.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Branch connections made by the accepted attempt.
    pub fn connections(&self) -> usize {
        self.connections
    }

    pub fn boss_floors(&self) -> &[usize] {
        &self.boss_floors
    }

    /// Node count the accepted attempt resolved for `floor`.
    pub fn floor_target(&self, floor: usize) -> Option<FloorTarget> {
        self.targets.get(floor).copied()
    }

    pub fn grid(&self) -> &FloorGrid {
        &self.grid
    }

    pub fn floor_count(&self) -> usize {
        self.grid.floor_count()
    }

    pub fn max_width(&self) -> usize {
        self.grid.width()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&MapNode> {
        self.nodes.get(id)
    }

    pub fn node_at(&self, floor: usize, column: usize) -> Option<&MapNode> {
        self.grid.get(floor, column).and_then(|id| self.nodes.get(id))
    }

    pub fn id_at(&self, floor: usize, column: usize) -> Option<NodeId> {
        self.grid.get(floor, column)
    }

    /// Nodes of one floor, left to right.
    pub fn floor(&self, floor: usize) -> Vec<(NodeId, &MapNode)> {
        self.grid.occupied(floor).into_iter().map(|(_, id)| (id, &self.nodes[id])).collect()
    }

    /// Every node in grid order: floor by floor, left to right.
    pub fn nodes(&self) -> Vec<(NodeId, &MapNode)> {
        (0..self.floor_count()).flat_map(|floor| self.floor(floor)).collect()
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |node| node.next.as_slice())
    }

    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes()
            .into_iter()
            .filter(|(_, node)| node.next.contains(&id))
            .map(|(from, _)| from)
            .collect()
    }

    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes()
            .into_iter()
            .flat_map(|(from, node)| node.next.iter().map(move |&to| (from, to)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.next.len()).sum()
    }

    pub fn edge_segments(
        &self,
        projector: &LayoutProjector,
        from: NodeId,
        to: NodeId,
    ) -> Option<EdgeSegments> {
        let from = self.nodes.get(from)?;
        let to = self.nodes.get(to)?;
        Some(projector.edge_segments(from.position, to.position))
    }

    /// Stable little-endian encoding of the whole map, grid order.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.chapter as u32).to_le_bytes());
        bytes.extend(self.chapter_seed.to_le_bytes());
        bytes.extend((self.floor_count() as u32).to_le_bytes());
        bytes.extend((self.max_width() as u32).to_le_bytes());

        for floor in 0..self.floor_count() {
            for slot in self.grid.row(floor) {
                let Some(id) = slot else {
                    bytes.push(0);
                    continue;
                };
                let node = &self.nodes[*id];
                bytes.push(1);
                push_str(&mut bytes, node.category.name());
                push_str(&mut bytes, &node.variant);
                bytes.extend(node.weight.to_le_bytes());
                bytes.extend(node.seed.to_le_bytes());
                bytes.extend(node.position.x.to_bits().to_le_bytes());
                bytes.extend(node.position.y.to_bits().to_le_bytes());
                bytes.extend((node.next.len() as u32).to_le_bytes());
                for next in &node.next {
                    let target = self.nodes[*next].pos;
                    bytes.extend((target.floor as u32).to_le_bytes());
                    bytes.extend((target.column as u32).to_le_bytes());
                }
            }
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn export(&self) -> MapExport {
        let floors = (0..self.floor_count())
            .map(|floor| FloorExport {
                floor,
                nodes: self
                    .floor(floor)
                    .into_iter()
                    .map(|(_, node)| NodeExport {
                        column: node.column(),
                        category: node.category.clone(),
                        variant: node.variant.clone(),
                        weight: node.weight,
                        seed: node.seed,
                        position: node.position,
                        next: node.next.iter().map(|&next| self.nodes[next].pos).collect(),
                    })
                    .collect(),
            })
            .collect();

        MapExport {
            chapter: self.chapter,
            chapter_seed: self.chapter_seed,
            attempts: self.attempts,
            connections: self.connections,
            max_width: self.max_width(),
            boss_floors: self.boss_floors.clone(),
            floors,
        }
    }
}

fn push_str(bytes: &mut Vec<u8>, value: &str) {
    bytes.extend((value.len() as u32).to_le_bytes());
    bytes.extend(value.as_bytes());
}

/// Serializable snapshot of a [`GeneratedMap`] with edges addressed by grid slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapExport {
    pub chapter: usize,
    pub chapter_seed: i32,
    pub attempts: usize,
    pub connections: usize,
    pub max_width: usize,
    pub boss_floors: Vec<usize>,
    pub floors: Vec<FloorExport>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorExport {
    pub floor: usize,
    pub nodes: Vec<NodeExport>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeExport {
    pub column: usize,
    pub category: Category,
    pub variant: String,
    pub weight: u32,
    pub seed: i32,
    pub position: Vec2,
    pub next: Vec<GridPos>,
}
