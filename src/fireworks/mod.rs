//! Fireworks particle simulation.
//!
//! A [`FireworksField`] owns every [`Firework`] in flight. Each frame it
//! fades the previous frame, advances every shell (ascent, or the physics of
//! its burst particles) and draws it, evicting shells whose burst has fully
//! faded. Physics is per frame rather than per second, so the frame loop
//! must call [`FireworksField::tick`] at a steady rate.

mod field;
mod firework;
mod particle;

pub use field::{BlessingOverlay, FireworksField};
pub use firework::Firework;
pub use particle::Particle;
