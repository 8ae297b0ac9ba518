use linemaze::Color;
use unicode_width::UnicodeWidthChar;

use crate::helpers::Dims;

/// Character that shows two stacked pixels, foreground on top.
pub const HALF_BLOCK: char = '▀';

/// Pixel buffer, every terminal character holds two pixels above each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    size: Dims,
    background: Color,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(size: Dims, background: Color) -> Self {
        Canvas {
            size,
            background,
            pixels: vec![background; size.area()],
        }
    }

    /// Canvas covering a terminal of `term` characters.
    pub fn for_terminal(term: Dims, background: Color) -> Self {
        Self::new(Dims(term.0, term.1 * 2), background)
    }

    pub fn size(&self) -> Dims {
        self.size
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Resizing throws the picture away.
    pub fn resize(&mut self, size: Dims) {
        self.size = size;
        self.pixels = vec![self.background; size.area()];
    }

    fn index(&self, pos: Dims) -> Option<usize> {
        if pos.0 < 0 || pos.1 < 0 || pos.0 >= self.size.0 || pos.1 >= self.size.1 {
            return None;
        }
        Some((pos.1 * self.size.0 + pos.0) as usize)
    }

    pub fn get(&self, pos: Dims) -> Option<Color> {
        self.index(pos).map(|i| self.pixels[i])
    }

    /// Pixels outside of the canvas are dropped.
    pub fn put(&mut self, pos: Dims, color: Color) {
        if let Some(i) = self.index(pos) {
            self.pixels[i] = color;
        }
    }

    /// Bresenham line, both ends included.
    pub fn line(&mut self, from: Dims, to: Dims, color: Color) {
        let Dims(mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(Dims(x, y), color);
            if x == to.0 && y == to.1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Pixels { top: Color, bottom: Color },
    Text { ch: char, fg: Color, bg: Color },
    /// Covered by the wide character to the left.
    Placeholder,
}

/// One screenful of terminal characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub size: Dims,
    glyphs: Vec<Glyph>,
}

impl Frame {
    pub fn compose(canvas: &Canvas) -> Self {
        let size = Dims(canvas.size().0, (canvas.size().1 + 1) / 2);
        let bg = canvas.background();

        let mut glyphs = Vec::with_capacity(size.area());
        for y in 0..size.1 {
            for x in 0..size.0 {
                glyphs.push(Glyph::Pixels {
                    top: canvas.get(Dims(x, y * 2)).unwrap_or(bg),
                    bottom: canvas.get(Dims(x, y * 2 + 1)).unwrap_or(bg),
                });
            }
        }

        Frame { size, glyphs }
    }

    pub fn row(&self, y: i32) -> &[Glyph] {
        let w = self.size.0 as usize;
        let start = y as usize * w;
        &self.glyphs[start..start + w]
    }

    pub fn get(&self, pos: Dims) -> Option<Glyph> {
        if pos.0 < 0 || pos.1 < 0 || pos.0 >= self.size.0 || pos.1 >= self.size.1 {
            return None;
        }
        Some(self.glyphs[(pos.1 * self.size.0 + pos.0) as usize])
    }

    fn set(&mut self, pos: Dims, glyph: Glyph) {
        if pos.0 < 0 || pos.1 < 0 || pos.0 >= self.size.0 || pos.1 >= self.size.1 {
            return;
        }
        self.glyphs[(pos.1 * self.size.0 + pos.0) as usize] = glyph;
    }

    /// Writes text on top of the picture, clipped at the frame edges.
    pub fn put_str(&mut self, pos: Dims, text: &str, fg: Color, bg: Color) {
        let mut x = pos.0;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(1) as i32;
            if width == 0 {
                continue;
            }
            if x + width > self.size.0 {
                break;
            }
            if x >= 0 {
                self.set(Dims(x, pos.1), Glyph::Text { ch, fg, bg });
                for i in 1..width {
                    self.set(Dims(x + i, pos.1), Glyph::Placeholder);
                }
            }
            x += width;
        }
    }
}
