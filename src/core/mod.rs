//! This module contains the core datatypes of the library.

mod contact_tracing;
mod epidemiology;
mod interval;
mod model;
mod skyline;

pub use contact_tracing::ContactTracing;
pub use epidemiology::{EpidemiologicalConverter, EpidemiologicalParameters};
pub use interval::Interval;
pub use model::{DEFAULT_NAME, Model, ModelConfig, Selection, State};
pub use skyline::{LABEL_PREFIX, PARAMETER_ROWS, SkylineModel};
