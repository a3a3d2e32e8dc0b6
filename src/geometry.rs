pub mod sector;

use self::sector::{annular_sector_path, polar};
use crate::report::{DualRingLayout, RankedItem};
use serde::{Deserialize, Serialize};

/// Share of each item's equal slice that is guaranteed regardless of score.
const BASE_SHARE: f64 = 0.7;
/// Share of each slice distributed by score.
const BONUS_SHARE: f64 = 0.3;
/// Minimum fraction of the bonus every item receives.
const BONUS_FLOOR: f64 = 0.3;

/// (gradient id, start colour, end colour)
pub const OUTER_GRADIENTS: [(&str, &str, &str); 3] = [
    ("outerGrad1", "#4A90E2", "#7B68EE"),
    ("outerGrad2", "#5AC8FA", "#007AFF"),
    ("outerGrad3", "#AF52DE", "#5856D6"),
];

pub const INNER_GRADIENTS: [(&str, &str, &str); 3] = [
    ("innerGrad1", "#9F7AEA", "#D946EF"),
    ("innerGrad2", "#60A5FA", "#3B82F6"),
    ("innerGrad3", "#8B5CF6", "#6366F1"),
];

/// Fixed constants of the dual-ring chart, in a 400x400 view box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingGeometry {
    pub center_x: f64,
    pub center_y: f64,

    // Outer ring: radius grows with thickness
    pub outer_inner_radius: f64,
    pub thickness_multiplier: f64,
    pub outer_start_angle: f64,
    pub outer_label_fraction: f64,

    // Inner ring: radius grows with rank
    pub inner_base_radius: f64,
    pub inner_base_extension: f64,
    pub inner_rank_step: f64,
    pub inner_start_angle: f64,
    pub inner_label_fraction: f64,

    pub hub_radius: f64,
}

impl RingGeometry {
    pub fn standard() -> Self {
        Self {
            center_x: 200.0,
            center_y: 200.0,
            outer_inner_radius: 115.0,
            thickness_multiplier: 2.2,
            outer_start_angle: -90.0,
            outer_label_fraction: 0.4,
            inner_base_radius: 45.0,
            inner_base_extension: 20.0,
            inner_rank_step: 15.0,
            inner_start_angle: -35.0,
            inner_label_fraction: 0.5,
            hub_radius: 40.0,
        }
    }

    fn outer_radius_for(&self, item: &RankedItem) -> f64 {
        self.outer_inner_radius + item.thickness as f64 * self.thickness_multiplier
    }

    fn inner_radius_for(&self, item: &RankedItem) -> f64 {
        let rank_bonus = (4.0 - item.rank as f64) * self.inner_rank_step;
        self.inner_base_radius + self.inner_base_extension + rank_bonus
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ring {
    Outer,
    Inner,
}

/// One drawable slice of a ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub label: String,
    pub value: f64,
    pub rank: u32,
    pub start_angle: f64,
    pub sweep: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub path: String,
    pub fill: String,
    pub label_x: f64,
    pub label_y: f64,
    pub label_rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingLayout {
    pub outer: Vec<Sector>,
    pub inner: Vec<Sector>,
}

/// Un-normalized angles: each item keeps 70% of an equal slice and earns up to
/// the remaining 30% by score, with a 30% floor on the earned part.
fn raw_angles(items: &[RankedItem]) -> Vec<f64> {
    if items.is_empty() {
        return Vec::new();
    }

    let slice = 360.0 / items.len() as f64;
    let base = slice * BASE_SHARE;
    let bonus = slice * BONUS_SHARE;

    let max = items.iter().map(|i| i.value).fold(f64::NEG_INFINITY, f64::max);
    let min = items.iter().map(|i| i.value).fold(f64::INFINITY, f64::min);
    let range = max - min;

    items
        .iter()
        .map(|item| {
            if range == 0.0 {
                return slice;
            }
            let ratio = (item.value - min) / range;
            base + bonus * (BONUS_FLOOR + ratio * (1.0 - BONUS_FLOOR))
        })
        .collect()
}

/// Score-weighted angles scaled so the group covers exactly 360 degrees.
pub fn dynamic_angles(items: &[RankedItem]) -> Vec<f64> {
    let raw = raw_angles(items);
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|a| a / total * 360.0).collect()
}

/// Tangential label rotation, flipped on the half of the circle where the
/// text would otherwise read upside down.
pub fn label_rotation(mid_angle: f64) -> f64 {
    let normalized = mid_angle.rem_euclid(360.0);
    let rotation = mid_angle - 90.0;
    if (180.0..360.0).contains(&normalized) {
        rotation + 180.0
    } else {
        rotation
    }
}

fn layout_ring(items: &[RankedItem], ring: Ring, geom: &RingGeometry) -> Vec<Sector> {
    let angles = dynamic_angles(items);
    let (mut start, gradients, label_fraction) = match ring {
        Ring::Outer => (geom.outer_start_angle, &OUTER_GRADIENTS, geom.outer_label_fraction),
        Ring::Inner => (geom.inner_start_angle, &INNER_GRADIENTS, geom.inner_label_fraction),
    };

    let mut sectors = Vec::with_capacity(items.len());

    for (index, (item, sweep)) in items.iter().zip(angles).enumerate() {
        let (inner_radius, outer_radius) = match ring {
            Ring::Outer => (geom.outer_inner_radius, geom.outer_radius_for(item)),
            Ring::Inner => (geom.inner_base_radius, geom.inner_radius_for(item)),
        };

        let mid = start + sweep / 2.0;
        let label_radius = inner_radius + (outer_radius - inner_radius) * label_fraction;
        let (label_x, label_y) = polar(geom.center_x, geom.center_y, label_radius, mid);

        sectors.push(Sector {
            label: item.label.clone(),
            value: item.value,
            rank: item.rank,
            start_angle: start,
            sweep,
            inner_radius,
            outer_radius,
            path: annular_sector_path(
                geom.center_x,
                geom.center_y,
                inner_radius,
                outer_radius,
                start,
                sweep,
            ),
            fill: format!("url(#{})", gradients[index % gradients.len()].0),
            label_x,
            label_y,
            label_rotation: label_rotation(mid),
        });

        start += sweep;
    }

    sectors
}

/// Computes both rings. Pure function of the ranked input and the constants.
pub fn layout_dual_ring(data: &DualRingLayout, geom: &RingGeometry) -> RingLayout {
    RingLayout {
        outer: layout_ring(&data.outer, Ring::Outer, geom),
        inner: layout_ring(&data.inner, Ring::Inner, geom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{rank_items, MetricItem};

    fn ranked(values: [f64; 3]) -> Vec<RankedItem> {
        rank_items(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| MetricItem::new(&format!("m{}", i), *v))
                .collect(),
        )
    }

    #[test]
    fn test_equal_values_split_evenly() {
        for angle in dynamic_angles(&ranked([50.0, 50.0, 50.0])) {
            assert!((angle - 120.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_top_scorer_gets_largest_slice() {
        let items = ranked([70.0, 90.0, 80.0]);
        let angles = dynamic_angles(&items);
        assert_eq!(items[0].value, 90.0);
        assert!(angles[0] > angles[1] && angles[1] > angles[2]);
        assert!((angles.iter().sum::<f64>() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_raw_angles_formula() {
        // max 90 -> 84 + 36, mid 80 -> 84 + 36 * 0.65, min 70 -> 84 + 36 * 0.3
        let raw = raw_angles(&ranked([90.0, 80.0, 70.0]));
        assert!((raw[0] - 120.0).abs() < 1e-9);
        assert!((raw[1] - 107.4).abs() < 1e-9);
        assert!((raw[2] - 94.8).abs() < 1e-9);
    }

    #[test]
    fn test_label_rotation_flip() {
        assert_eq!(label_rotation(0.0), -90.0);
        assert_eq!(label_rotation(90.0), 0.0);
        assert_eq!(label_rotation(-30.0), 60.0);
        assert_eq!(label_rotation(200.0), 290.0);
        assert_eq!(label_rotation(179.0), 89.0);
    }

    #[test]
    fn test_sector_radii() {
        let data = DualRingLayout {
            outer: ranked([90.0, 80.0, 70.0]),
            inner: ranked([10.0, 30.0, 20.0]),
            outer_total: 240.0,
            inner_total: 60.0,
        };
        let layout = layout_dual_ring(&data, &RingGeometry::standard());

        let outer_radii: Vec<f64> = layout.outer.iter().map(|s| s.outer_radius).collect();
        assert!((outer_radii[0] - 181.0).abs() < 1e-9);
        assert!((outer_radii[1] - 159.0).abs() < 1e-9);
        assert!((outer_radii[2] - 137.0).abs() < 1e-9);

        let inner_radii: Vec<f64> = layout.inner.iter().map(|s| s.outer_radius).collect();
        assert_eq!(inner_radii, vec![110.0, 95.0, 80.0]);
        assert!(layout.inner.iter().all(|s| s.inner_radius == 45.0));

        assert_eq!(layout.outer[0].start_angle, -90.0);
        assert_eq!(layout.inner[0].start_angle, -35.0);
        assert_eq!(layout.outer[2].fill, "url(#outerGrad3)");
        assert_eq!(layout.inner[0].fill, "url(#innerGrad1)");
    }

    #[test]
    fn test_sectors_are_contiguous() {
        let data = DualRingLayout {
            outer: ranked([12.0, 99.0, 47.0]),
            inner: ranked([5.0, 5.0, 80.0]),
            outer_total: 0.0,
            inner_total: 0.0,
        };
        let layout = layout_dual_ring(&data, &RingGeometry::standard());
        for ring in [&layout.outer, &layout.inner] {
            for pair in ring.windows(2) {
                assert!((pair[0].start_angle + pair[0].sweep - pair[1].start_angle).abs() < 1e-9);
            }
            let last = ring.last().unwrap();
            assert!((last.start_angle + last.sweep - ring[0].start_angle - 360.0).abs() < 1e-9);
        }
    }
}
