//! Configuration data structures for skyline setups.

mod settings;

pub use settings::{ContactTracingSettings, IntervalSettings, Settings, SettingsError};
