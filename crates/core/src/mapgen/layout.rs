//! Grid-to-plane projection and edge segment placement.

use serde::{Deserialize, Serialize};

use crate::config::{LayoutSettings, MapConfig};
use crate::types::Vec2;

/// Share of a column width (or of the reference spacing) nodes may drift by.
const JITTER_SHARE: f32 = 0.25;

/// Stateless geometry over one config. Floor `y` grows with floor index.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutProjector {
    settings: LayoutSettings,
    max_width: usize,
    floor_offsets: Vec<f32>,
    jitter_spacing: f32,
    segment_multiplier: f32,
}

impl LayoutProjector {
    pub fn new(config: &MapConfig) -> Self {
        let floor_offsets = config
            .layers
            .iter()
            .scan(0.0_f32, |total, layer| {
                *total += layer.spacing;
                Some(*total)
            })
            .collect();

        Self {
            settings: config.layout,
            max_width: config.max_width,
            floor_offsets,
            // Every floor jitters vertically by the spacing of layer 1.
            jitter_spacing: config.layers.get(1).map_or(0.0, |layer| layer.spacing),
            segment_multiplier: config.space_between_segments_multiplier,
        }
    }

    pub fn column_width(&self) -> f32 {
        self.settings.usable_width() / self.max_width as f32
    }

    /// Centre of the `(floor, column)` slot before jitter.
    pub fn grid_position(&self, floor: usize, column: usize) -> Vec2 {
        let column_width = self.column_width();
        let x = column_width * column as f32 + column_width * 0.5
            - self.settings.usable_width() * 0.5;
        let y = self.floor_offsets[floor] + self.settings.edge_y_offset;
        Vec2::new(x, y)
    }

    /// Horizontal position of the `ordinal`-th boss out of `boss_count`,
    /// spread across the board inset by four paddings.
    pub fn boss_offset(&self, ordinal: usize, boss_count: usize) -> f32 {
        if boss_count <= 1 {
            return 0.0;
        }
        let span = self.settings.usable_width() - self.settings.x_padding * 4.0;
        let t = ordinal as f32 / (boss_count - 1) as f32;
        span * t - span * 0.5
    }

    /// Grid column recorded for the `ordinal`-th boss, rounded half to even.
    pub fn boss_column(&self, ordinal: usize, boss_count: usize) -> usize {
        let last_column = self.max_width.saturating_sub(1);
        let column = if boss_count <= 1 {
            (last_column as f32 * 0.5).round_ties_even()
        } else {
            ((ordinal * last_column) as f32 / (boss_count - 1) as f32).round_ties_even()
        };
        (column as usize).min(last_column)
    }

    /// Half-extent of the uniform jitter box, before the layer factor is applied.
    pub fn jitter_extent(&self) -> Vec2 {
        Vec2::new(self.column_width() * JITTER_SHARE, self.jitter_spacing * JITTER_SHARE)
    }

    pub fn edge_segments(&self, from: Vec2, to: Vec2) -> EdgeSegments {
        EdgeSegments::between(
            from,
            to,
            self.settings.segment_length,
            self.settings.segment_height,
            self.segment_multiplier,
        )
    }
}

/// Fixed-length dashes laid out evenly along one edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeSegments {
    pub count: usize,
    /// Gap before, between and after the segments.
    pub padding: f32,
    pub angle_degrees: f32,
    pub centers: Vec<Vec2>,
}

impl EdgeSegments {
    pub fn between(
        from: Vec2,
        to: Vec2,
        segment_length: f32,
        segment_height: f32,
        multiplier: f32,
    ) -> Self {
        let delta = to - from;
        let direction = delta.normalized();
        let distance = delta.length();

        let count = segment_count(distance, segment_length, multiplier);
        let padding = segment_padding(distance, segment_length, count);
        let angle_degrees = delta.y.atan2(delta.x).to_degrees();

        let first = from + direction * (padding + segment_length * 0.5);
        let centers = (0..count)
            .map(|index| {
                let center = first + direction * ((segment_length + padding) * index as f32);
                Vec2::new(center.x, center.y - segment_height * 0.5)
            })
            .collect();

        Self { count, padding, angle_degrees, centers }
    }
}

/// `floor(distance / (length * multiplier))`, at least one.
pub fn segment_count(distance: f32, segment_length: f32, multiplier: f32) -> usize {
    let fitted = (distance / (segment_length * multiplier)).floor();
    if fitted.is_finite() && fitted >= 1.0 { fitted as usize } else { 1 }
}

pub fn segment_padding(distance: f32, segment_length: f32, count: usize) -> f32 {
    (distance - count as f32 * segment_length) / (count + 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayerSpec, NodeCount};
    use crate::types::Category;

    fn config(max_width: usize) -> MapConfig {
        MapConfig {
            layers: vec![
                LayerSpec::new(Category::ORDINARY, NodeCount::Fixed(2)).with_spacing(50.0),
                LayerSpec::new(Category::ORDINARY, NodeCount::Fixed(2)).with_spacing(200.0),
                LayerSpec::new(Category::BOSS, NodeCount::Fixed(1)).with_spacing(300.0),
            ],
            max_width,
            ..MapConfig::default()
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn grid_positions_are_centred_columns_on_cumulative_floors() {
        // usable width 950 over 5 columns -> 190 each.
        let projector = LayoutProjector::new(&config(5));
        let left = projector.grid_position(0, 0);
        let middle = projector.grid_position(1, 2);
        let right = projector.grid_position(2, 4);

        assert!(close(left.x, -380.0));
        assert!(close(middle.x, 0.0));
        assert!(close(right.x, 380.0));
        assert!(close(left.y, 150.0));
        assert!(close(middle.y, 350.0));
        assert!(close(right.y, 650.0));
    }

    #[test]
    fn boss_columns_spread_and_round_half_to_even() {
        let projector = LayoutProjector::new(&config(5));
        assert_eq!(projector.boss_column(0, 1), 2);
        assert_eq!(projector.boss_column(0, 3), 0);
        assert_eq!(projector.boss_column(1, 3), 2);
        assert_eq!(projector.boss_column(2, 3), 4);

        // 2.5 and 1.5 both round to 2.
        assert_eq!(LayoutProjector::new(&config(6)).boss_column(0, 1), 2);
        assert_eq!(LayoutProjector::new(&config(4)).boss_column(0, 1), 2);
    }

    #[test]
    fn boss_offsets_span_inset_board() {
        // span = 950 - 200 = 750.
        let projector = LayoutProjector::new(&config(5));
        assert!(close(projector.boss_offset(0, 1), 0.0));
        assert!(close(projector.boss_offset(0, 2), -375.0));
        assert!(close(projector.boss_offset(1, 2), 375.0));
    }

    #[test]
    fn jitter_uses_layer_one_spacing() {
        let projector = LayoutProjector::new(&config(5));
        let extent = projector.jitter_extent();
        assert!(close(extent.x, 47.5));
        assert!(close(extent.y, 50.0));

        let single = MapConfig {
            layers: vec![LayerSpec::new(Category::ORDINARY, NodeCount::Fixed(1))],
            ..MapConfig::default()
        };
        assert!(close(LayoutProjector::new(&single).jitter_extent().y, 0.0));
    }

    #[test]
    fn segments_fit_distance_with_even_padding() {
        // 100 / (10 * 2) = 5 segments, (100 - 50) / 6 padding.
        let segments =
            EdgeSegments::between(Vec2::ZERO, Vec2::new(0.0, 100.0), 10.0, 0.0, 2.0);
        assert_eq!(segments.count, 5);
        assert!(close(segments.padding, 50.0 / 6.0));
        assert!(close(segments.angle_degrees, 90.0));
        assert_eq!(segments.centers.len(), 5);
        assert!(close(segments.centers[0].y, 50.0 / 6.0 + 5.0));
    }

    #[test]
    fn short_or_degenerate_edges_still_get_one_segment() {
        assert_eq!(segment_count(3.0, 10.0, 2.5), 1);
        assert_eq!(segment_count(0.0, 10.0, 2.5), 1);
        let segments = EdgeSegments::between(Vec2::ZERO, Vec2::ZERO, 10.0, 4.0, 1.0);
        assert_eq!(segments.count, 1);
        assert!(close(segments.angle_degrees, 0.0));
    }
}
