use crate::color::Rgb;

/// 2D drawing target in logical pixel coordinates.
///
/// Implementations composite every primitive source-over with the given
/// alpha and clip anything outside their bounds, so callers never range
/// check coordinates themselves.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Logical size of one raster cell. Callers that paint per-pixel
    /// content (photos) step by this amount.
    fn pixel_size(&self) -> f32 {
        1.0
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32);

    /// Heart glyph built from two lobes and a tapering tip.
    fn fill_heart(&mut self, cx: f32, cy: f32, size: f32, color: Rgb, alpha: f32) {
        let lobe = size * 0.3;
        self.fill_circle(cx - lobe, cy - lobe * 0.5, lobe, color, alpha);
        self.fill_circle(cx + lobe, cy - lobe * 0.5, lobe, color, alpha);

        let step = self.pixel_size().max(0.5);
        let mut dy = 0.0;
        while dy < size * 0.55 {
            let half = (size * 0.6) * (1.0 - dy / (size * 0.55));
            self.fill_rect(cx - half, cy + dy - lobe * 0.3, half * 2.0, step, color, alpha);
            dy += step;
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Draw {
        Rect { x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32 },
        Circle { x: f32, y: f32, r: f32, color: Rgb, alpha: f32 },
    }

    /// Records every primitive instead of rasterising it.
    pub struct RecordingSurface {
        pub width: f32,
        pub height: f32,
        pub draws: Vec<Draw>,
    }

    impl RecordingSurface {
        pub fn new(width: f32, height: f32) -> Self {
            Self { width, height, draws: Vec::new() }
        }

        pub fn circles(&self) -> impl Iterator<Item = &Draw> {
            self.draws.iter().filter(|d| matches!(d, Draw::Circle { .. }))
        }

        pub fn rects(&self) -> impl Iterator<Item = &Draw> {
            self.draws.iter().filter(|d| matches!(d, Draw::Rect { .. }))
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f32 {
            self.width
        }

        fn height(&self) -> f32 {
            self.height
        }

        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
            self.draws.push(Draw::Rect { x, y, w, h, color, alpha });
        }

        fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Rgb, alpha: f32) {
            self.draws.push(Draw::Circle { x, y, r, color, alpha });
        }
    }
}
