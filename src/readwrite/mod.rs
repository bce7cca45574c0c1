//! Writers for model reports.

mod trajectory;

pub use trajectory::{TrajectoryEntry, TrajectoryWriter};
