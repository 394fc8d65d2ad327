//! Tier-list composition.
//!
//! The layout engine scales every resolved image to a fixed height, packs
//! items left-to-right with zero gap, wraps rows after a fixed item count,
//! and stacks tier bands in precedence order on a dark canvas. Geometry
//! lives in [`layout`]; this module only paints.

pub mod font;
pub mod layout;
pub mod placeholder;

use image::{imageops, DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::tier::RankedList;

use font::TierFont;
use layout::{plan, LayoutSpec};

const CANVAS_BACKGROUND: Rgb<u8> = Rgb([0x1a, 0x1a, 0x1a]);
const SEPARATOR_COLOR: Rgb<u8> = Rgb([0x44, 0x44, 0x44]);
const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

/// Per-item image provider. The production implementation is
/// [`crate::resolve::ImageResolver`]; tests substitute fakes.
pub trait ResolveImage {
    /// Produce a renderable image for a display name. Must not fail;
    /// implementations degrade to a placeholder instead.
    fn resolve(&mut self, name: &str) -> DynamicImage;
}

/// Scale an image to the target height, preserving aspect ratio with the
/// width truncated like the reference geometry.
fn scale_to_height(image: &DynamicImage, target_height: u32) -> DynamicImage {
    let aspect = f64::from(image.width()) / f64::from(image.height().max(1));
    let new_width = ((f64::from(target_height) * aspect) as u32).max(1);
    image.resize_exact(new_width, target_height, imageops::FilterType::Lanczos3)
}

/// Compose the filtered ranked list into a single raster.
///
/// Bands are painted top to bottom; the 1-px separator drawn after each
/// band lands on the next band's first row and is partially painted over by
/// it, exactly as the reference renderer does.
pub fn render(list: &RankedList, resolver: &mut dyn ResolveImage, spec: &LayoutSpec) -> RgbImage {
    let canvas_plan = plan(list, spec);
    log::info!(
        "canvas size: {}x{} (max {} games per row)",
        canvas_plan.width,
        canvas_plan.height,
        spec.max_per_row
    );

    let mut canvas =
        RgbImage::from_pixel(canvas_plan.width, canvas_plan.height, CANVAS_BACKGROUND);
    let tier_font = TierFont::load();
    let label_px = spec.label_font_px();

    for (band_index, band) in canvas_plan.bands.iter().enumerate() {
        // Label column spans every row of the band.
        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(0, band.y as i32).of_size(spec.label_width, band.height),
            band.tier.color(),
        );

        let letter = band.tier.letter();
        let (text_w, text_h) = tier_font.measure(letter, label_px);
        let text_x = (spec.label_width.saturating_sub(text_w)) / 2;
        let text_y = band.y + (band.height.saturating_sub(text_h)) / 2;
        tier_font.draw(
            &mut canvas,
            LABEL_TEXT_COLOR,
            text_x as i32,
            text_y as i32,
            label_px,
            letter,
        );

        let games = &list[&band.tier];
        let mut item_x = spec.label_width;
        let mut item_y = band.y;

        for (index, game) in games.iter().enumerate() {
            if index > 0 && index % spec.max_per_row == 0 {
                item_x = spec.label_width;
                item_y += spec.item_height + spec.row_spacing;
            }

            log::info!("processing {game}...");
            let image = resolver.resolve(game);
            let scaled = scale_to_height(&image, spec.item_height).to_rgb8();
            imageops::overlay(&mut canvas, &scaled, i64::from(item_x), i64::from(item_y));

            // Zero horizontal gap between adjacent images.
            item_x += scaled.width();
        }

        if band_index < canvas_plan.bands.len() - 1 {
            let line_y = band.y + band.height;
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(0, line_y as i32).of_size(canvas_plan.width, 1),
                SEPARATOR_COLOR,
            );
        }
    }

    canvas
}
