use crate::color::Rgb;
use crate::surface::Surface;
use fastrand::Rng;

pub const GRAVITY: f32 = 0.07;
pub const FRICTION: f32 = 0.97;
const GLOW_SCALE: f32 = 1.5;
const GLOW_ALPHA: f32 = 0.3;

/// One spark of a burst. Lives until its opacity runs out.
#[derive(Clone, Debug)]
pub struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    color: Rgb,
    opacity: f32,
    decay: f32,  // opacity lost per frame
    radius: f32,
}

impl Particle {
    /// Random direction and speed, each velocity axis uniform in [-6, 6).
    pub fn burst(x: f32, y: f32, color: Rgb, rng: &mut Rng) -> Self {
        Self {
            x,
            y,
            vx: (rng.f32() - 0.5) * 12.0,
            vy: (rng.f32() - 0.5) * 12.0,
            color,
            opacity: 1.0,
            decay: 0.015 + rng.f32() * 0.02,
            radius: 2.0 + rng.f32() * 4.0,
        }
    }

    /// One frame of motion: drag, then gravity, then integration, then fade.
    pub fn advance(&mut self) {
        self.vx *= FRICTION;
        self.vy *= FRICTION;
        self.vy += GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.opacity -= self.decay;
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.is_alive() {
            return;
        }

        surface.fill_circle(self.x, self.y, self.radius, self.color, self.opacity);
        // Bloom
        surface.fill_circle(
            self.x,
            self.y,
            self.radius * GLOW_SCALE,
            self.color,
            self.opacity * GLOW_ALPHA,
        );
    }

    pub fn is_alive(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;

    #[test]
    fn burst_ranges() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..500 {
            let p = Particle::burst(10.0, 20.0, Rgb(255, 0, 0), &mut rng);
            let (vx, vy) = p.velocity();
            assert!((-6.0..6.0).contains(&vx));
            assert!((-6.0..6.0).contains(&vy));
            assert!((0.015..0.035).contains(&p.decay()));
            assert!((2.0..6.0).contains(&p.radius()));
            assert_eq!(p.opacity(), 1.0);
            assert_eq!(p.position(), (10.0, 20.0));
        }
    }

    #[test]
    fn advance_applies_friction_before_gravity() {
        let mut rng = Rng::with_seed(1);
        let mut p = Particle::burst(0.0, 0.0, Rgb(0, 0, 0), &mut rng);
        let (vx, vy) = p.velocity();
        p.advance();

        let ex_vx = vx * FRICTION;
        let ex_vy = vy * FRICTION + GRAVITY;
        let (nvx, nvy) = p.velocity();
        assert!((nvx - ex_vx).abs() < 1e-6);
        assert!((nvy - ex_vy).abs() < 1e-6);
        assert_eq!(p.position(), (nvx, nvy));
    }

    #[test]
    fn opacity_never_increases_and_dead_is_not_drawn() {
        let mut rng = Rng::with_seed(99);
        let mut p = Particle::burst(50.0, 50.0, Rgb(0, 255, 0), &mut rng);
        let (radius, decay) = (p.radius(), p.decay());

        let mut last = p.opacity();
        while p.is_alive() {
            let mut surface = RecordingSurface::new(100.0, 100.0);
            p.render(&mut surface);
            assert_eq!(surface.circles().count(), 2);

            p.advance();
            assert!(p.opacity() < last);
            last = p.opacity();
        }

        assert_eq!(p.radius(), radius);
        assert_eq!(p.decay(), decay);

        let mut surface = RecordingSurface::new(100.0, 100.0);
        p.render(&mut surface);
        assert!(surface.draws.is_empty());
    }

    #[test]
    fn glow_is_wider_and_fainter() {
        let mut rng = Rng::with_seed(3);
        let p = Particle::burst(5.0, 5.0, Rgb(1, 2, 3), &mut rng);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        p.render(&mut surface);

        use crate::surface::testing::Draw;
        match (&surface.draws[0], &surface.draws[1]) {
            (Draw::Circle { r: r0, alpha: a0, .. }, Draw::Circle { r: r1, alpha: a1, .. }) => {
                assert!((r1 - r0 * 1.5).abs() < 1e-6);
                assert!((a1 - a0 * 0.3).abs() < 1e-6);
            }
            other => panic!("unexpected draws {other:?}"),
        }
    }
}
