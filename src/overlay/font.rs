//! Built-in 5x7 bitmap font, drawn as solid quads.
//!
//! Lowercase letters render with the uppercase glyphs. Characters without a
//! glyph render as `?`.

use glam::Vec2;

use super::layout::Rect;
use super::Quad;

/// Glyph cell width in font pixels.
pub const GLYPH_WIDTH: u32 = 5;
/// Glyph cell height in font pixels.
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance in font pixels (one column of spacing).
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Row bitmaps, top row first, bit 4 is the leftmost column.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0; 7],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '<' => [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
        '>' => [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '°' => [0x0C, 0x12, 0x12, 0x0C, 0x00, 0x00, 0x00],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

/// Width in screen pixels of `text` drawn at `scale`.
#[must_use]
pub fn text_width(text: &str, scale: f32) -> f32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0.0;
    }
    (n * ADVANCE - 1) as f32 * scale
}

/// Append quads for `text` with its top-left corner at `origin`.
///
/// Horizontal runs of lit pixels within a glyph row share one quad.
pub fn push_text(
    out: &mut Vec<Quad>,
    text: &str,
    origin: Vec2,
    scale: f32,
    color: [f32; 4],
) {
    for (i, c) in text.chars().enumerate() {
        let gx = origin.x + (i as u32 * ADVANCE) as f32 * scale;
        for (row, bits) in glyph(c).into_iter().enumerate() {
            let y = origin.y + row as f32 * scale;
            let mut col = 0;
            while col < GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GLYPH_WIDTH && bits & (0x10 >> col) != 0 {
                    col += 1;
                }
                out.push(Quad {
                    rect: Rect::new(
                        gx + start as f32 * scale,
                        y,
                        (col - start) as f32 * scale,
                        scale,
                    ),
                    color,
                });
            }
        }
    }
}

/// [`push_text`] centred inside `rect`.
pub fn push_text_centered(
    out: &mut Vec<Quad>,
    text: &str,
    rect: Rect,
    scale: f32,
    color: [f32; 4],
) {
    let w = text_width(text, scale);
    let h = GLYPH_HEIGHT as f32 * scale;
    let origin = Vec2::new(
        (rect.x + (rect.w - w) * 0.5).round(),
        (rect.y + (rect.h - h) * 0.5).round(),
    );
    push_text(out, text, origin, scale, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn space_draws_nothing() {
        let mut out = Vec::new();
        push_text(&mut out, "   ", Vec2::ZERO, 2.0, WHITE);
        assert!(out.is_empty());
    }

    #[test]
    fn runs_are_merged() {
        // Top row of 'T' is one five-pixel run.
        let mut out = Vec::new();
        push_text(&mut out, "T", Vec2::new(10.0, 20.0), 2.0, WHITE);
        assert_eq!(out[0].rect, Rect::new(10.0, 20.0, 10.0, 2.0));
        // Then six single-pixel stem rows.
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn lowercase_matches_uppercase() {
        assert_eq!(glyph('q'), glyph('Q'));
        assert_eq!(glyph('~'), glyph('?'));
    }

    #[test]
    fn quads_stay_inside_text_box() {
        let text = "Zoom: 5.0";
        let mut out = Vec::new();
        push_text(&mut out, text, Vec2::ZERO, 2.0, WHITE);
        let w = text_width(text, 2.0);
        for q in &out {
            assert!(q.rect.x + q.rect.w <= w + 1e-3);
            assert!(q.rect.y + q.rect.h <= 14.0 + 1e-3);
        }
    }
}
