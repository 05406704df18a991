use {
    font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS},
    image::{Rgba, RgbaImage},
};

pub const GLYPH_SIZE: u32 = 8;

/// Monochrome bitmap of a piece of text, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

pub fn glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

pub fn is_renderable(text: &str) -> bool {
    text.chars().all(|c| glyph(c).is_some())
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

impl Mask {
    /// Characters without a glyph leave a blank cell.
    pub fn from_text(text: &str, scale: u32) -> Self {
        let scale = scale.max(1);
        let width = text_width(text, scale);
        let height = GLYPH_SIZE * scale;
        let mut bits = vec![false; (width * height) as usize];

        for (index, c) in text.chars().enumerate() {
            let rows = match glyph(c) {
                Some(v) => v,
                None => continue,
            };
            let origin_x = index as u32 * GLYPH_SIZE * scale;

            for (row, line) in rows.iter().enumerate() {
                for column in 0..GLYPH_SIZE {
                    // least significant bit is the leftmost pixel
                    if line & (1 << column) == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let x = origin_x + column * scale + dx;
                            let y = row as u32 * scale + dy;
                            bits[(y * width + x) as usize] = true;
                        }
                    }
                }
            }
        }

        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    /// Quarter turn counter-clockwise, so vertical words read bottom to top.
    pub fn rotated(&self) -> Self {
        let width = self.height;
        let height = self.width;
        let mut bits = vec![false; self.bits.len()];

        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    let new_x = y;
                    let new_y = self.width - 1 - x;
                    bits[(new_y * width + new_x) as usize] = true;
                }
            }
        }

        Self {
            width,
            height,
            bits,
        }
    }

    /// Paints set bits at `(x, y)`, clipping anything outside the image.
    pub fn draw(&self, image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
        for my in 0..self.height {
            for mx in 0..self.width {
                if !self.get(mx, my) {
                    continue;
                }
                let px = x + mx as i64;
                let py = y + my as i64;
                if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                    image.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

pub fn draw_text(image: &mut RgbaImage, text: &str, x: i64, y: i64, scale: u32, color: Rgba<u8>) {
    Mask::from_text(text, scale).draw(image, x, y, color);
}
