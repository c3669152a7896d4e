//! Animated terminal greeting: a growing heart tree, a photo album and a
//! fireworks finale with a blessing message.

pub mod album;
pub mod audio;
pub mod blessing;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod fireworks;
pub mod scene;
pub mod surface;
pub mod tree;

pub use error::{AudioError, Error};
