use crate::color::Rgb;
use crate::surface::Surface;
use std::io::Write;

/// Where a caption sits on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Horizontally centred, at a fraction of the screen height.
    Center(f32),
    /// First row, flush right.
    TopRight,
}

/// A line of text drawn over the raster.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    pub text: String,
    pub anchor: Anchor,
    pub color: Rgb,
}

impl Caption {
    pub fn centered(text: impl Into<String>, at: f32, color: Rgb) -> Self {
        Self { text: text.into(), anchor: Anchor::Center(at), color }
    }

    pub fn top_right(text: impl Into<String>, color: Rgb) -> Self {
        Self { text: text.into(), anchor: Anchor::TopRight, color }
    }
}

/// Terminal-backed drawing surface.
///
/// Each terminal cell holds two vertical pixels rendered with the lower
/// half-block glyph. Drawing happens in logical coordinates, `pixel_scale`
/// logical pixels per raster pixel, so the scene keeps its proportions
/// whatever the terminal size.
pub struct Canvas {
    cols: usize,
    rows: usize,
    scale: f32,
    background: Rgb,
    pixels: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl Canvas {
    /// `rows` counts raster pixels, i.e. twice the terminal rows.
    pub fn new(cols: usize, rows: usize, scale: f32, background: Rgb) -> Self {
        let mut canvas = Self {
            cols: 0,
            rows: 0,
            scale: scale.max(1.0),
            background,
            pixels: Vec::new(),
            output_buf: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    /// Reallocates the raster. Scene state lives elsewhere and is untouched.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols.max(1);
        self.rows = rows.max(2);
        let bg = Self::to_float(self.background);
        self.pixels = vec![bg; self.cols * self.rows];
        self.output_buf = Vec::with_capacity(self.cols * self.rows * 25);
    }

    pub fn pixel(&self, col: usize, row: usize) -> Rgb {
        let [r, g, b] = self.pixels[row * self.cols + col];
        Rgb(r.round() as u8, g.round() as u8, b.round() as u8)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn to_float(c: Rgb) -> [f32; 3] {
        [c.0 as f32, c.1 as f32, c.2 as f32]
    }

    fn blend(&mut self, col: usize, row: usize, color: [f32; 3], alpha: f32) {
        let px = &mut self.pixels[row * self.cols + col];
        for (dst, src) in px.iter_mut().zip(color) {
            *dst += (src - *dst) * alpha;
        }
    }

    /// Converts a logical span to a clipped raster range covering at least
    /// one pixel.
    fn span(&self, start: f32, len: f32, limit: usize) -> Option<(usize, usize)> {
        let a = (start / self.scale).round();
        let mut b = ((start + len) / self.scale).round();
        if b <= a {
            b = a + 1.0;
        }
        if b <= 0.0 || a >= limit as f32 {
            return None;
        }
        Some((a.max(0.0) as usize, (b as usize).min(limit)))
    }

    /// Writes the raster and captions to `out` as one frame.
    pub fn present<W: Write>(&mut self, out: &mut W, captions: &[Caption]) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let term_rows = self.rows.div_ceil(2);
        let overlay = self.layout_captions(captions, term_rows);

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for term_row in 0..term_rows {
            let y = term_row * 2;
            for x in 0..self.cols {
                let top = self.pixel(x, y);
                let bot = if y + 1 < self.rows { self.pixel(x, y + 1) } else { top };

                let (glyph, fg) = match overlay[term_row * self.cols + x] {
                    Some((ch, color)) => (ch, color),
                    None => ('▄', bot),
                };

                // Only emit colour codes if changed
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(fg) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    prev_bot = Some(fg);
                }

                let mut utf8 = [0u8; 4];
                self.output_buf.extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if term_row + 1 < term_rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()?;
        Ok(())
    }

    fn layout_captions(&self, captions: &[Caption], term_rows: usize) -> Vec<Option<(char, Rgb)>> {
        let mut overlay = vec![None; self.cols * term_rows];

        for caption in captions {
            let len = caption.text.chars().count();
            let (row, start) = match caption.anchor {
                Anchor::Center(at) => {
                    let row = ((term_rows as f32 * at) as usize).min(term_rows - 1);
                    (row, self.cols.saturating_sub(len) / 2)
                }
                Anchor::TopRight => (0, self.cols.saturating_sub(len + 1)),
            };

            for (i, ch) in caption.text.chars().enumerate() {
                let col = start + i;
                if col >= self.cols {
                    break;
                }
                overlay[row * self.cols + col] = Some((ch, caption.color));
            }
        }

        overlay
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.cols as f32 * self.scale
    }

    fn height(&self) -> f32 {
        self.rows as f32 * self.scale
    }

    fn pixel_size(&self) -> f32 {
        self.scale
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let Some((x0, x1)) = self.span(x, w, self.cols) else { return };
        let Some((y0, y1)) = self.span(y, h, self.rows) else { return };

        let src = Self::to_float(color);
        for row in y0..y1 {
            for col in x0..x1 {
                self.blend(col, row, src, alpha);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let src = Self::to_float(color);

        let px = cx / self.scale;
        let py = cy / self.scale;
        let r = radius / self.scale;

        // Sub-pixel circles still light the pixel they fall in
        if r < 0.5 {
            if px >= 0.0 && py >= 0.0 && (px as usize) < self.cols && (py as usize) < self.rows {
                self.blend(px as usize, py as usize, src, alpha);
            }
            return;
        }

        let x0 = (px - r).floor().max(0.0) as usize;
        let y0 = (py - r).floor().max(0.0) as usize;
        let x1 = ((px + r).ceil().max(0.0) as usize).min(self.cols);
        let y1 = ((py + r).ceil().max(0.0) as usize).min(self.rows);
        let r2 = r * r;

        for row in y0..y1 {
            for col in x0..x1 {
                let dx = col as f32 + 0.5 - px;
                let dy = row as f32 + 0.5 - py;
                if dx * dx + dy * dy <= r2 {
                    self.blend(col, row, src, alpha);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, GOLD, WHITE};

    #[test]
    fn logical_size_scales_with_cells() {
        let canvas = Canvas::new(100, 60, 8.0, BLACK);
        assert_eq!(canvas.width(), 800.0);
        assert_eq!(canvas.height(), 480.0);
    }

    #[test]
    fn rect_composites_source_over() {
        let mut canvas = Canvas::new(4, 4, 1.0, BLACK);
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, WHITE, 0.5);
        assert_eq!(canvas.pixel(2, 2), Rgb(128, 128, 128));
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, WHITE, 1.0);
        assert_eq!(canvas.pixel(0, 3), WHITE);
    }

    #[test]
    fn drawing_is_clipped() {
        let mut canvas = Canvas::new(4, 4, 1.0, BLACK);
        canvas.fill_rect(-10.0, -10.0, 100.0, 100.0, WHITE, 1.0);
        canvas.fill_circle(-50.0, 2.0, 3.0, GOLD, 1.0);
        canvas.fill_circle(2.0, 2.0, 40.0, GOLD, 1.0);
        assert_eq!(canvas.pixel(3, 3), GOLD);
    }

    #[test]
    fn tiny_circle_lights_one_pixel() {
        let mut canvas = Canvas::new(10, 10, 8.0, BLACK);
        canvas.fill_circle(20.0, 20.0, 2.0, WHITE, 1.0);
        assert_eq!(canvas.pixel(2, 2), WHITE);
        assert_eq!(canvas.pixel(3, 2), BLACK);
    }

    #[test]
    fn resize_resets_raster_only() {
        let mut canvas = Canvas::new(4, 4, 2.0, BLACK);
        canvas.fill_rect(0.0, 0.0, 8.0, 8.0, WHITE, 1.0);
        canvas.resize(6, 8);
        assert_eq!(canvas.dimensions(), (6, 8));
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.width(), 12.0);
    }

    #[test]
    fn present_emits_half_blocks_and_captions() {
        let mut canvas = Canvas::new(12, 4, 1.0, BLACK);
        let mut out = Vec::new();
        canvas
            .present(&mut out, &[Caption::centered("hi", 0.0, GOLD)])
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert!(text.contains('▄'));
        assert!(text.contains("\x1b[38;2;255;204;0mhi"));
        assert_eq!(text.matches("\r\n").count(), 1);
    }
}
