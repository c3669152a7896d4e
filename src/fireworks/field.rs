use super::firework::Firework;
use crate::color::{Rgb, BLACK, GOLD};
use crate::surface::Surface;
use fastrand::Rng;
use std::time::Duration;

const TRAIL_FADE: f32 = 0.15;
const SECOND_LAUNCH_CHANCE: f32 = 0.5;
const SPARKLE_CHANCE: f32 = 0.4;
const HALO_RADIUS: f32 = 200.0;
const HALO_ALPHA: f32 = 0.1;

/// Blessing glow timing. Only used to drive the pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlessingOverlay {
    shown_at: Option<Duration>,
}

impl BlessingOverlay {
    pub fn show(&mut self, now: Duration) {
        if self.shown_at.is_none() {
            self.shown_at = Some(now);
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown_at.is_some()
    }

    pub fn shown_at(&self) -> Option<Duration> {
        self.shown_at
    }

    /// `0.3 + 0.2 * sin(ms * 0.005)` since the overlay appeared, or `None`
    /// while hidden.
    pub fn pulse(&self, now: Duration) -> Option<f32> {
        let shown_at = self.shown_at?;
        let elapsed_ms = now.saturating_sub(shown_at).as_secs_f64() * 1000.0;
        Some(0.3 + 0.2 * (elapsed_ms * 0.005).sin() as f32)
    }
}

/// Every firework in flight, plus the gate that admits new launches.
pub struct FireworksField {
    fireworks: Vec<Firework>,
    active: bool,
    blessing: BlessingOverlay,
    fade_color: Rgb,
    rng: Rng,
}

impl FireworksField {
    pub fn new(rng: Rng) -> Self {
        Self {
            fireworks: Vec::new(),
            active: false,
            blessing: BlessingOverlay::default(),
            fade_color: BLACK,
            rng,
        }
    }

    /// Colour painted over the previous frame to leave fading trails.
    pub fn with_fade_color(mut self, color: Rgb) -> Self {
        self.fade_color = color;
        self
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn particle_count(&self) -> usize {
        self.fireworks.iter().map(|fw| fw.particles().len()).sum()
    }

    /// Adds an already built firework, bypassing the active gate.
    pub fn push(&mut self, firework: Firework) {
        self.fireworks.push(firework);
    }

    /// Launches one shell, sometimes two, when active.
    pub fn spawn(&mut self, width: f32, height: f32) {
        if !self.active {
            return;
        }

        self.fireworks.push(Firework::launch(width, height, &mut self.rng));
        if self.rng.f32() > SECOND_LAUNCH_CHANCE {
            self.fireworks.push(Firework::launch(width, height, &mut self.rng));
        }
        log::debug!(
            "launched, {} fireworks and {} particles in flight",
            self.fireworks.len(),
            self.particle_count()
        );
    }

    pub fn show_blessing(&mut self, now: Duration) {
        self.blessing.show(now);
    }

    pub fn blessing(&self) -> &BlessingOverlay {
        &self.blessing
    }

    pub fn pulse_intensity(&self, now: Duration) -> Option<f32> {
        self.blessing.pulse(now)
    }

    /// One animation frame: fade, advance, draw, evict, then the blessing glow.
    pub fn tick(&mut self, surface: &mut dyn Surface, now: Duration) {
        let (width, height) = (surface.width(), surface.height());
        surface.fill_rect(0.0, 0.0, width, height, self.fade_color, TRAIL_FADE);

        let rng = &mut self.rng;
        self.fireworks.retain_mut(|firework| {
            firework.advance(rng);
            firework.render(surface);
            !firework.is_spent()
        });

        if let Some(pulse) = self.blessing.pulse(now) {
            let (cx, cy) = (width * 0.5, height * 0.5);

            if self.rng.f32() < SPARKLE_CHANCE {
                let x = cx + (self.rng.f32() - 0.5) * 120.0;
                let y = cy + (self.rng.f32() - 0.5) * 80.0;
                surface.fill_circle(x, y, 2.5, GOLD, pulse * 0.7);
                surface.fill_circle(x, y, 5.0, GOLD, pulse * 0.3);
            }

            surface.fill_circle(cx, cy, HALO_RADIUS, GOLD, HALO_ALPHA);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{Draw, RecordingSurface};

    const RED: Rgb = Rgb(255, 0, 0);

    fn field(seed: u64) -> FireworksField {
        FireworksField::new(Rng::with_seed(seed))
    }

    #[test]
    fn inactive_spawn_is_noop() {
        let mut field = field(1);
        for _ in 0..50 {
            field.spawn(800.0, 600.0);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn first_spawn_yields_one_or_two() {
        let mut seen = [false; 2];
        for seed in 0..64 {
            let mut field = field(seed);
            field.set_active(true);
            field.spawn(800.0, 600.0);

            assert!((1..=2).contains(&field.len()));
            seen[field.len() - 1] = true;
            for fw in field.fireworks() {
                assert!(!fw.exploded());
                assert_eq!(fw.position().1, 600.0);
            }
        }
        assert!(seen[0] && seen[1], "both launch branches should occur");
    }

    #[test]
    fn tick_fades_before_drawing() {
        let mut field = field(2);
        field.push(Firework::new(10.0, 500.0, 100.0, 3.0, RED, 4.0));

        let mut surface = RecordingSurface::new(800.0, 600.0);
        field.tick(&mut surface, Duration::ZERO);

        assert_eq!(
            surface.draws[0],
            Draw::Rect { x: 0.0, y: 0.0, w: 800.0, h: 600.0, color: BLACK, alpha: TRAIL_FADE }
        );
        assert_eq!(surface.circles().count(), 2);
        assert_eq!(field.fireworks()[0].position().1, 497.0);
    }

    #[test]
    fn removed_iff_exploded_and_drained() {
        let mut field = field(3);
        field.push(Firework::new(10.0, 102.0, 100.0, 2.0, RED, 4.0));
        field.push(Firework::new(20.0, 600.0, 100.0, 2.0, RED, 4.0));

        let mut surface = RecordingSurface::new(800.0, 600.0);
        field.tick(&mut surface, Duration::ZERO);
        assert_eq!(field.len(), 2);
        assert!(field.fireworks()[0].exploded());

        let mut frames = 0;
        while field.fireworks().iter().any(|fw| fw.exploded()) {
            for fw in field.fireworks() {
                assert!(!fw.is_spent(), "spent firework left in the field");
            }
            field.tick(&mut surface, Duration::ZERO);
            frames += 1;
            assert!(frames < 100);
        }

        assert_eq!(field.len(), 1);
        assert!(!field.fireworks()[0].exploded());
    }

    #[test]
    fn deactivating_lets_inflight_finish() {
        let mut field = field(4);
        field.set_active(true);
        field.spawn(800.0, 600.0);
        let launched = field.len();
        field.set_active(false);
        field.spawn(800.0, 600.0);
        assert_eq!(field.len(), launched);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        for _ in 0..2000 {
            field.tick(&mut surface, Duration::ZERO);
        }
        assert!(field.is_empty());
    }

    #[test]
    fn pulse_starts_at_baseline() {
        let mut field = field(5);
        assert_eq!(field.pulse_intensity(Duration::from_secs(3)), None);

        let shown = Duration::from_secs(10);
        field.show_blessing(shown);
        assert_eq!(field.pulse_intensity(shown), Some(0.3));

        // Quarter period of sin(ms * 0.005) is ~314 ms
        let peak = field.pulse_intensity(shown + Duration::from_micros(314_159)).unwrap();
        assert!((peak - 0.5).abs() < 1e-4);
    }

    #[test]
    fn blessing_draws_halo_every_frame() {
        let mut field = field(6);
        field.show_blessing(Duration::ZERO);

        let mut sparkles = 0;
        for _ in 0..200 {
            let mut surface = RecordingSurface::new(800.0, 600.0);
            field.tick(&mut surface, Duration::from_millis(16));

            let halo = Draw::Circle { x: 400.0, y: 300.0, r: HALO_RADIUS, color: GOLD, alpha: HALO_ALPHA };
            assert_eq!(surface.draws.last(), Some(&halo));

            let dots: Vec<_> = surface.circles().filter(|d| **d != halo).collect();
            match dots.len() {
                0 => {}
                2 => {
                    sparkles += 1;
                    if let Draw::Circle { x, y, .. } = dots[0] {
                        assert!((*x - 400.0).abs() <= 60.0);
                        assert!((*y - 300.0).abs() <= 40.0);
                    }
                }
                n => panic!("unexpected {n} sparkle circles"),
            }
        }
        assert!(sparkles > 40 && sparkles < 120, "sparkles: {sparkles}");
    }
}
