//! Planet name labels rasterized into RGBA canvases with the bitmap font.

use engine_core::font;
use image::{imageops, Rgba, RgbaImage};

/// Label canvas width in pixels.
pub const LABEL_WIDTH: u32 = 512;
/// Label canvas height in pixels.
pub const LABEL_HEIGHT: u32 = 128;

/// Left margin of the text.
const TEXT_LEFT: u32 = 20;
/// Text baseline (bottom of the glyph cell).
const TEXT_BASELINE: u32 = 90;
/// Largest glyph scale; 7 rows * 12 = 84px, close to the cap height of a 120px font.
const MAX_SCALE: u32 = 12;

const INK: Rgba<u8> = Rgba([255, 255, 255, 255]);
// White at zero alpha so filtered edges don't darken.
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Glyph scale that fits `text` inside the canvas margins.
fn scale_for(text: &str) -> u32 {
    let chars = text.chars().count().max(1) as u32;
    let room = LABEL_WIDTH - 2 * TEXT_LEFT;
    (room / (chars * font::ADVANCE_X)).clamp(1, MAX_SCALE)
}

/// Render `text` white on a transparent `LABEL_WIDTH` x `LABEL_HEIGHT` canvas.
/// Characters outside printable ASCII leave a blank cell.
pub fn rasterize_label(text: &str) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(LABEL_WIDTH, LABEL_HEIGHT, PAPER);
    let scale = scale_for(text);
    let top = TEXT_BASELINE.saturating_sub(font::GLYPH_H * scale);

    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = font::glyph(ch) else {
            continue;
        };
        let cell_x = TEXT_LEFT + i as u32 * font::ADVANCE_X * scale;
        for gy in 0..font::GLYPH_H {
            for gx in 0..font::GLYPH_W {
                if !font::pixel(&rows, gx, gy) {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = cell_x + gx * scale + dx;
                        let py = top + gy * scale + dy;
                        if px < LABEL_WIDTH && py < LABEL_HEIGHT {
                            canvas.put_pixel(px, py, INK);
                        }
                    }
                }
            }
        }
    }

    canvas
}

/// All labels stacked vertically into one texture, one `LABEL_HEIGHT` row per slot.
pub struct LabelAtlas {
    pub image: RgbaImage,
    slots: usize,
}

impl LabelAtlas {
    /// Rasterize `names` into consecutive slots, in order.
    pub fn build<S: AsRef<str>>(names: &[S]) -> Self {
        let slots = names.len().max(1);
        let mut image = RgbaImage::from_pixel(LABEL_WIDTH, LABEL_HEIGHT * slots as u32, PAPER);
        for (slot, name) in names.iter().enumerate() {
            let label = rasterize_label(name.as_ref());
            imageops::replace(&mut image, &label, 0, (slot as u32 * LABEL_HEIGHT) as i64);
        }
        log::debug!("Label atlas: {} slots, {}x{}", names.len(), image.width(), image.height());
        Self { image, slots }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Texture coordinates `[u0, v0, u1, v1]` of a slot.
    pub fn uv_rect(&self, slot: usize) -> [f32; 4] {
        let h = 1.0 / self.slots as f32;
        [0.0, slot as f32 * h, 1.0, (slot + 1) as f32 * h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_columns(img: &RgbaImage) -> (u32, u32) {
        let mut min = u32::MAX;
        let mut max = 0;
        for (x, _, p) in img.enumerate_pixels() {
            if p.0[3] == 255 {
                min = min.min(x);
                max = max.max(x);
            }
        }
        (min, max)
    }

    #[test]
    fn label_has_ink_inside_margins() {
        let img = rasterize_label("Mercury");
        assert_eq!(img.dimensions(), (LABEL_WIDTH, LABEL_HEIGHT));
        let (min, max) = ink_columns(&img);
        assert!(min >= TEXT_LEFT);
        assert!(max < LABEL_WIDTH - TEXT_LEFT);
    }

    #[test]
    fn ink_ends_on_baseline() {
        let img = rasterize_label("Earth");
        let lowest = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] == 255)
            .map(|(_, y, _)| y)
            .max()
            .expect("label has ink");
        assert_eq!(lowest, TEXT_BASELINE - 1);
    }

    #[test]
    fn short_names_use_max_scale() {
        assert_eq!(scale_for("Mars"), MAX_SCALE);
        assert!(scale_for("Mercury") < MAX_SCALE);
        assert_eq!(scale_for(&"X".repeat(500)), 1);
    }

    #[test]
    fn atlas_slots_are_stacked() {
        let atlas = LabelAtlas::build(&["Earth", "Mars"]);
        assert_eq!(atlas.slots(), 2);
        assert_eq!(atlas.image.dimensions(), (LABEL_WIDTH, LABEL_HEIGHT * 2));
        assert_eq!(atlas.uv_rect(1), [0.0, 0.5, 1.0, 1.0]);
        let row_has_ink = |slot: u32| {
            (slot * LABEL_HEIGHT..(slot + 1) * LABEL_HEIGHT)
                .any(|y| (0..LABEL_WIDTH).any(|x| atlas.image.get_pixel(x, y).0[3] == 255))
        };
        assert!(row_has_ink(0));
        assert!(row_has_ink(1));
    }
}
