use crate::color::Rgb;
use crate::surface::Surface;
use fastrand::Rng;
use noise::{NoiseFn, Perlin};
use std::time::Duration;

const HEART_COUNT: usize = 60;
const HEART_STAGGER: Duration = Duration::from_millis(30);
const FADE_IN: Duration = Duration::from_secs(1);
const MAX_OPACITY: f32 = 0.9;
const FLOAT_AMPLITUDE: f32 = 8.0;

const TRUNK_COLOR: Rgb = Rgb(0x8b, 0x45, 0x13);
const TRUNK_WIDTH: f32 = 20.0;
const TRUNK_HEIGHT: f32 = 150.0;
const TRUNK_BOTTOM: f32 = 50.0;

const HEART_COLORS: [Rgb; 16] = [
    Rgb(0xff, 0x33, 0x66), Rgb(0xff, 0x66, 0x99), Rgb(0xff, 0x99, 0x66), Rgb(0xff, 0xcc, 0x66),
    Rgb(0x66, 0xcc, 0xff), Rgb(0x99, 0xff, 0x66), Rgb(0x99, 0x66, 0xff), Rgb(0xff, 0x66, 0xcc),
    Rgb(0xff, 0x33, 0x33), Rgb(0x33, 0xff, 0x99), Rgb(0x33, 0x99, 0xff), Rgb(0xff, 0x99, 0x33),
    Rgb(0xcc, 0x66, 0xff), Rgb(0x66, 0xff, 0xcc), Rgb(0xff, 0x66, 0x66), Rgb(0xff, 0xcc, 0x33),
];

struct Heart {
    dx: f32,
    dy: f32,
    size: f32,
    color: Rgb,
    appear_at: Duration,
    float_seed: f64,
}

impl Heart {
    /// Scattered around the crown; wider than tall.
    fn scatter(index: usize, rng: &mut Rng) -> Self {
        let angle = rng.f32() * std::f32::consts::TAU;
        let distance = 60.0 + rng.f32() * 140.0;
        let spread = 0.6 + rng.f32() * 1.4;

        Self {
            dx: angle.cos() * distance * spread,
            dy: -angle.sin() * distance * 0.7,
            size: 18.0 + rng.f32() * 30.0,
            color: HEART_COLORS[rng.usize(0..HEART_COLORS.len())],
            // Created one stagger after the previous heart, then its
            // transition waits the same again
            appear_at: HEART_STAGGER * (index as u32 * 2),
            float_seed: rng.f64() * 100.0,
        }
    }

    /// Ease-in-out progress of the pop-in animation.
    fn progress(&self, elapsed: Duration) -> f32 {
        let Some(t) = elapsed.checked_sub(self.appear_at) else {
            return 0.0;
        };
        let t = (t.as_secs_f32() / FADE_IN.as_secs_f32()).min(1.0);
        t * t * (3.0 - 2.0 * t)
    }
}

/// Decorative tree of hearts that pops in one heart at a time.
pub struct HeartTree {
    hearts: Vec<Heart>,
    perlin: Perlin,
    started: Option<Duration>,
}

impl HeartTree {
    pub fn new(rng: &mut Rng) -> Self {
        Self {
            hearts: (0..HEART_COUNT).map(|i| Heart::scatter(i, rng)).collect(),
            perlin: Perlin::new(rng.u32(..)),
            started: None,
        }
    }

    /// Restarts the growth animation from `now`.
    pub fn grow(&mut self, now: Duration) {
        self.started = Some(now);
    }

    /// Hearts that have begun to appear.
    pub fn visible_hearts(&self, now: Duration) -> usize {
        let Some(started) = self.started else { return 0 };
        let elapsed = now.saturating_sub(started);
        self.hearts.iter().filter(|h| h.progress(elapsed) > 0.0).count()
    }

    pub fn render(&self, surface: &mut dyn Surface, now: Duration) {
        let Some(started) = self.started else { return };
        let elapsed = now.saturating_sub(started);
        let (width, height) = (surface.width(), surface.height());
        let (cx, cy) = (width * 0.5, height * 0.5);

        surface.fill_rect(
            cx - TRUNK_WIDTH / 2.0,
            height - TRUNK_BOTTOM - TRUNK_HEIGHT,
            TRUNK_WIDTH,
            TRUNK_HEIGHT,
            TRUNK_COLOR,
            1.0,
        );

        let t = elapsed.as_secs_f64();
        for heart in &self.hearts {
            let progress = heart.progress(elapsed);
            if progress <= 0.0 {
                continue;
            }

            // Gentle bob once fully grown, roughly a 3 s swing
            let bob = self.perlin.get([heart.float_seed, t / 3.0]) as f32 * FLOAT_AMPLITUDE;
            surface.fill_heart(
                cx + heart.dx,
                cy + heart.dy + bob * progress,
                heart.size * progress,
                heart.color,
                MAX_OPACITY * progress,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;

    #[test]
    fn nothing_drawn_before_growing() {
        let tree = HeartTree::new(&mut Rng::with_seed(1));
        let mut surface = RecordingSurface::new(800.0, 600.0);
        tree.render(&mut surface, Duration::from_secs(5));
        assert!(surface.draws.is_empty());
        assert_eq!(tree.visible_hearts(Duration::from_secs(5)), 0);
    }

    #[test]
    fn hearts_appear_staggered() {
        let mut tree = HeartTree::new(&mut Rng::with_seed(2));
        let start = Duration::from_secs(1);
        tree.grow(start);

        assert_eq!(tree.visible_hearts(start), 0);
        // Heart i starts at i * 60 ms
        assert_eq!(tree.visible_hearts(start + Duration::from_millis(130)), 3);
        assert_eq!(tree.visible_hearts(start + Duration::from_secs(10)), HEART_COUNT);
    }

    #[test]
    fn trunk_then_hearts() {
        let mut tree = HeartTree::new(&mut Rng::with_seed(3));
        tree.grow(Duration::ZERO);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        tree.render(&mut surface, Duration::from_secs(10));

        use crate::surface::testing::Draw;
        assert_eq!(
            surface.draws[0],
            Draw::Rect { x: 390.0, y: 400.0, w: 20.0, h: 150.0, color: TRUNK_COLOR, alpha: 1.0 }
        );
        // Two lobes per heart
        assert_eq!(surface.circles().count(), HEART_COUNT * 2);
        for draw in surface.circles() {
            if let Draw::Circle { alpha, .. } = draw {
                assert!((alpha - MAX_OPACITY).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn layout_stays_within_crown() {
        let mut rng = Rng::with_seed(4);
        for i in 0..HEART_COUNT {
            let heart = Heart::scatter(i, &mut rng);
            assert!(heart.dx.abs() <= 200.0 * 2.0);
            assert!(heart.dy.abs() <= 200.0 * 0.7);
            assert!((18.0..48.0).contains(&heart.size));
        }
    }
}
