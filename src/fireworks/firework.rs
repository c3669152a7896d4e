use super::particle::Particle;
use crate::color::Rgb;
use crate::surface::Surface;
use fastrand::Rng;

const MIN_BURST: usize = 100;
const MAX_BURST: usize = 180;
const TRAIL_OFFSET: f32 = 5.0;

enum Phase {
    Ascending,
    Exploded { particles: Vec<Particle> },
}

/// A shell that climbs from the bottom edge and bursts at `target_y`.
pub struct Firework {
    x: f32,
    y: f32,
    target_y: f32,
    speed: f32,
    color: Rgb,
    size: f32,
    phase: Phase,
}

impl Firework {
    pub fn new(x: f32, y: f32, target_y: f32, speed: f32, color: Rgb, size: f32) -> Self {
        Self {
            x,
            y,
            target_y,
            speed,
            color,
            size,
            phase: Phase::Ascending,
        }
    }

    /// Launch from the bottom edge of a `width` × `height` field.
    pub fn launch(width: f32, height: f32, rng: &mut Rng) -> Self {
        Self::new(
            rng.f32() * width,
            height,
            100.0 + rng.f32() * (height * 0.5),
            2.0 + rng.f32() * 3.0,
            Rgb::from_hsl(rng.f32() * 360.0, 1.0, 0.6),
            3.0 + rng.f32() * 2.0,
        )
    }

    pub fn advance(&mut self, rng: &mut Rng) {
        match &mut self.phase {
            Phase::Ascending => {
                self.y -= self.speed;
                if self.y <= self.target_y {
                    let count = rng.usize(MIN_BURST..MAX_BURST);
                    let particles = (0..count)
                        .map(|_| Particle::burst(self.x, self.y, self.color, rng))
                        .collect();
                    self.phase = Phase::Exploded { particles };
                }
            }
            Phase::Exploded { particles } => {
                particles.retain_mut(|particle| {
                    particle.advance();
                    particle.is_alive()
                });
            }
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match &self.phase {
            Phase::Ascending => {
                surface.fill_circle(self.x, self.y, self.size, self.color, 1.0);
                // Spark trail
                surface.fill_circle(
                    self.x,
                    self.y + TRAIL_OFFSET,
                    self.size * 0.7,
                    self.color,
                    0.5,
                );
            }
            Phase::Exploded { particles } => {
                for particle in particles {
                    particle.render(surface);
                }
            }
        }
    }

    pub fn exploded(&self) -> bool {
        matches!(self.phase, Phase::Exploded { .. })
    }

    pub fn particles(&self) -> &[Particle] {
        match &self.phase {
            Phase::Ascending => &[],
            Phase::Exploded { particles } => particles,
        }
    }

    /// Burst finished and every spark has faded.
    pub fn is_spent(&self) -> bool {
        matches!(&self.phase, Phase::Exploded { particles } if particles.is_empty())
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}
