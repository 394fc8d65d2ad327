//! Font resolution with a guaranteed fallback.
//!
//! Rendering tries an ordered list of platform TrueType fonts and, when
//! none resolve, degrades to a small built-in 5x7 bitmap face. Loading
//! never fails; the worst case is blockier text.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

/// TrueType candidates tried in order.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A resolved text face: a loaded TrueType font or the built-in bitmap.
pub enum TierFont {
    TrueType(FontVec),
    Bitmap,
}

impl TierFont {
    /// Resolve the best available font. Never fails.
    pub fn load() -> TierFont {
        for candidate in FONT_CANDIDATES {
            if let Ok(bytes) = std::fs::read(candidate) {
                if let Ok(font) = FontVec::try_from_vec(bytes) {
                    log::debug!("using TrueType font {candidate}");
                    return TierFont::TrueType(font);
                }
            }
        }
        log::warn!("no TrueType font found, using built-in bitmap font");
        TierFont::Bitmap
    }

    /// Bounding-box size of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        match self {
            TierFont::TrueType(font) => text_size(PxScale::from(px), font, text),
            TierFont::Bitmap => bitmap_measure(text, px),
        }
    }

    /// Draw `text` with its bounding box's top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, px: f32, text: &str) {
        match self {
            TierFont::TrueType(font) => {
                draw_text_mut(canvas, color, x, y, PxScale::from(px), font, text);
            }
            TierFont::Bitmap => bitmap_draw(canvas, color, x, y, px, text),
        }
    }
}

// Built-in 5x7 face. One entry per glyph, five low bits per row, MSB on the
// left. Lowercase input maps to uppercase; anything unknown draws a box.

const GLYPH_ROWS: u32 = 7;
const GLYPH_COLS: u32 = 5;
const GLYPH_ADVANCE: u32 = GLYPH_COLS + 1;

const UNKNOWN_GLYPH: [u8; 7] = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x0A, 0x04, 0x04, 0x04, 0x0A, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x06, 0x08, 0x10, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x06, 0x06, 0x00, 0x06, 0x06, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x06],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x06, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '\'' => [0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00],
        '&' => [0x08, 0x14, 0x14, 0x08, 0x15, 0x12, 0x0D],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        _ => UNKNOWN_GLYPH,
    }
}

fn bitmap_factor(px: f32) -> u32 {
    ((px / 8.0).round() as u32).max(1)
}

fn bitmap_measure(text: &str, px: f32) -> (u32, u32) {
    let factor = bitmap_factor(px);
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return (0, GLYPH_ROWS * factor);
    }
    // Drop the trailing inter-glyph gap so centering is exact.
    (
        chars * GLYPH_ADVANCE * factor - factor,
        GLYPH_ROWS * factor,
    )
}

fn bitmap_draw(canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, px: f32, text: &str) {
    let factor = bitmap_factor(px) as i32;
    let mut pen_x = x;

    for c in text.chars() {
        let rows = glyph(c);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                    continue;
                }
                let px0 = pen_x + col as i32 * factor;
                let py0 = y + row as i32 * factor;
                for dy in 0..factor {
                    for dx in 0..factor {
                        let (tx, ty) = (px0 + dx, py0 + dy);
                        if tx >= 0
                            && ty >= 0
                            && (tx as u32) < canvas.width()
                            && (ty as u32) < canvas.height()
                        {
                            canvas.put_pixel(tx as u32, ty as u32, color);
                        }
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE as i32 * factor;
    }
}
