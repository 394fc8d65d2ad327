//! Synthetic placeholder for games with no obtainable image.

use image::{DynamicImage, Rgb, RgbImage};

use super::font::TierFont;

/// Placeholder matches the assumed Steam header size so layout estimates
/// hold for it exactly.
pub const PLACEHOLDER_WIDTH: u32 = 460;
pub const PLACEHOLDER_HEIGHT: u32 = 215;

const BACKGROUND: Rgb<u8> = Rgb([0x2a, 0x2a, 0x2a]);
const TEXT_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const TEXT_PX: f32 = 24.0;
const SIDE_MARGIN: u32 = 16;
const LINE_LEADING: u32 = 4;

/// Render the display name centered and word-wrapped on a dark card.
///
/// Placeholders are synthesized per call and never written to the cache.
pub fn placeholder_image(name: &str, font: &TierFont) -> DynamicImage {
    let mut canvas = RgbImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, BACKGROUND);

    let max_text_width = PLACEHOLDER_WIDTH - 2 * SIDE_MARGIN;
    let lines = wrap_words(name, font, TEXT_PX, max_text_width);

    let line_height = font.measure("Ag", TEXT_PX).1 + LINE_LEADING;
    let block_height = line_height * lines.len() as u32;
    let mut y = (PLACEHOLDER_HEIGHT.saturating_sub(block_height)) / 2;

    for line in &lines {
        let (line_width, _) = font.measure(line, TEXT_PX);
        let x = (PLACEHOLDER_WIDTH.saturating_sub(line_width)) / 2;
        font.draw(&mut canvas, TEXT_COLOR, x as i32, y as i32, TEXT_PX, line);
        y += line_height;
    }

    DynamicImage::ImageRgb8(canvas)
}

/// Greedy word wrap against the measured line width. A single word longer
/// than the limit gets its own (overflowing) line.
fn wrap_words(text: &str, font: &TierFont, px: f32, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let attempt = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if font.measure(&attempt, px).0 <= max_width || current.is_empty() {
            current = attempt;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_fixed_size_and_background() {
        let font = TierFont::Bitmap;
        let img = placeholder_image("Hades", &font).to_rgb8();
        assert_eq!(img.width(), PLACEHOLDER_WIDTH);
        assert_eq!(img.height(), PLACEHOLDER_HEIGHT);
        assert_eq!(img.get_pixel(0, 0), &BACKGROUND);
        // Some text pixels were painted.
        assert!(img.pixels().any(|p| p == &TEXT_COLOR));
    }

    #[test]
    fn wrap_words_splits_long_names() {
        let font = TierFont::Bitmap;
        let lines = wrap_words("Crypt of the NecroDancer", &font, 24.0, 120);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(!line.is_empty());
        }
    }

    #[test]
    fn wrap_words_keeps_short_names_on_one_line() {
        let font = TierFont::Bitmap;
        let lines = wrap_words("Noita", &font, 24.0, 400);
        assert_eq!(lines, vec!["Noita".to_string()]);
    }

    #[test]
    fn wrap_words_handles_empty_input() {
        let font = TierFont::Bitmap;
        assert_eq!(wrap_words("", &font, 24.0, 100), vec![String::new()]);
    }

    #[test]
    fn oversized_single_word_still_gets_a_line() {
        let font = TierFont::Bitmap;
        let lines = wrap_words("Antidisestablishmentarianism", &font, 24.0, 30);
        assert_eq!(lines.len(), 1);
    }
}
