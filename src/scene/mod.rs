//! Phase sequencing: which page is showing and when the next one starts.

mod director;
mod scheduler;
mod stage;

pub use director::{Director, Phase};
pub use scheduler::{Scheduler, TaskId};
pub use stage::{Page, Stage};
