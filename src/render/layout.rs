//! Deterministic canvas geometry.
//!
//! All geometry derives from the layout constants and the per-tier item
//! counts, never from decoded image sizes. The canvas width in particular
//! uses an estimated item width computed from the Steam header aspect ratio
//! (460x215): rows whose real images are wider or narrower than the
//! estimate may visually overflow or underflow the estimated column width.
//! That is a deliberate, reproducible approximation.

use crate::tier::{RankedList, Tier};

/// Layout constants, TierMaker-style.
#[derive(Clone, Copy, Debug)]
pub struct LayoutSpec {
    /// Target height of every item image, px.
    pub item_height: u32,
    /// Width of the tier-letter label column, px.
    pub label_width: u32,
    /// Items per row before wrapping.
    pub max_per_row: usize,
    /// Vertical spacing between rows inside one tier band, px.
    pub row_spacing: u32,
    /// Assumed source image size used for the width estimate.
    pub assumed_source: (u32, u32),
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec {
            item_height: 120,
            label_width: 100,
            max_per_row: 9,
            row_spacing: 10,
            assumed_source: (460, 215),
        }
    }
}

impl LayoutSpec {
    /// Estimated item width after scaling the assumed source to
    /// `item_height`, truncated like the reference geometry.
    pub fn estimated_item_width(&self) -> u32 {
        let (w, h) = self.assumed_source;
        (f64::from(w) / f64::from(h) * f64::from(self.item_height)) as u32
    }

    /// Planning canvas width: label column plus a full row of estimated
    /// item widths, independent of actual image sizes.
    pub fn canvas_width(&self) -> u32 {
        self.label_width + self.max_per_row as u32 * self.estimated_item_width()
    }

    /// Number of rows a tier with `count` items occupies.
    pub fn rows_for(&self, count: usize) -> u32 {
        count.div_ceil(self.max_per_row) as u32
    }

    /// Height of a band holding `count` items.
    pub fn band_height(&self, count: usize) -> u32 {
        let rows = self.rows_for(count);
        rows * self.item_height + rows.saturating_sub(1) * self.row_spacing
    }

    /// Tier-letter font size scales with item height, clamped to a
    /// readable range.
    pub fn label_font_px(&self) -> f32 {
        (self.item_height as f32 * 0.25).clamp(16.0, 36.0)
    }
}

/// One rendered tier band's placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandPlan {
    pub tier: Tier,
    pub y: u32,
    pub height: u32,
    pub item_count: usize,
}

/// Full canvas plan for a filtered ranked list.
#[derive(Clone, Debug)]
pub struct CanvasPlan {
    pub width: u32,
    pub height: u32,
    pub bands: Vec<BandPlan>,
}

/// Compute band placements and total canvas size.
///
/// Tiers absent from the list contribute nothing: they are skipped rather
/// than rendered as empty bands.
pub fn plan(list: &RankedList, spec: &LayoutSpec) -> CanvasPlan {
    let mut bands = Vec::with_capacity(list.len());
    let mut y = 0u32;

    for (tier, games) in list {
        if games.is_empty() {
            continue;
        }
        let height = spec.band_height(games.len());
        bands.push(BandPlan {
            tier: *tier,
            y,
            height,
            item_count: games.len(),
        });
        y += height;
    }

    CanvasPlan {
        width: spec.canvas_width(),
        height: y,
        bands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(counts: &[(Tier, usize)]) -> RankedList {
        let mut list = RankedList::new();
        for (tier, count) in counts {
            list.insert(
                *tier,
                (0..*count).map(|i| format!("Game {i}")).collect(),
            );
        }
        list
    }

    #[test]
    fn estimated_width_truncates_like_reference() {
        let spec = LayoutSpec::default();
        // 460/215 * 120 = 256.74..., truncated.
        assert_eq!(spec.estimated_item_width(), 256);
        assert_eq!(spec.canvas_width(), 100 + 9 * 256);
    }

    #[test]
    fn full_row_stays_on_one_row() {
        let spec = LayoutSpec::default();
        assert_eq!(spec.rows_for(9), 1);
        assert_eq!(spec.band_height(9), 120);
    }

    #[test]
    fn one_extra_item_wraps_to_a_second_row() {
        let spec = LayoutSpec::default();
        assert_eq!(spec.rows_for(10), 2);
        assert_eq!(spec.band_height(10), 2 * 120 + 10);
    }

    #[test]
    fn fourteen_items_band_height_is_250() {
        let spec = LayoutSpec::default();
        assert_eq!(spec.band_height(14), 250);
    }

    #[test]
    fn canvas_height_is_sum_of_present_bands() {
        let spec = LayoutSpec::default();
        let list = list_with(&[(Tier::S, 3), (Tier::B, 14), (Tier::F, 1)]);
        let plan = plan(&list, &spec);

        assert_eq!(plan.height, 120 + 250 + 120);
        assert_eq!(plan.bands.len(), 3);
        // Bands stack in precedence order with no gaps.
        assert_eq!(plan.bands[0].tier, Tier::S);
        assert_eq!(plan.bands[0].y, 0);
        assert_eq!(plan.bands[1].y, 120);
        assert_eq!(plan.bands[2].y, 370);
    }

    #[test]
    fn absent_tiers_contribute_zero_height() {
        let spec = LayoutSpec::default();
        let with_a = plan(&list_with(&[(Tier::S, 2), (Tier::A, 2)]), &spec);
        let without_a = plan(&list_with(&[(Tier::S, 2)]), &spec);
        assert_eq!(with_a.height - without_a.height, 120);
    }

    #[test]
    fn label_font_px_is_clamped() {
        let spec = LayoutSpec::default();
        assert_eq!(spec.label_font_px(), 30.0);

        let tiny = LayoutSpec {
            item_height: 40,
            ..spec
        };
        assert_eq!(tiny.label_font_px(), 16.0);

        let huge = LayoutSpec {
            item_height: 400,
            ..spec
        };
        assert_eq!(huge.label_font_px(), 36.0);
    }
}
