//! Model interface that a tree simulator drives.
//!
//! The interface constitutes three components:
//!
//! 1. `ModelConfig`: The rates of a single compartment model in the shape a simulator consumes
//!    them (state set, transmission rate matrix, removal and sampling vectors).
//! 2. `Selection`: An immutable snapshot of the interval that is active at a queried time.
//! 3. `Model`: The trait through which a simulator selects the parameters in effect at a given
//!    time and reads back names and epidemiological summaries.
use derive_more::Display;
use ndarray::{Array1, Array2};

use super::epidemiology::{EpidemiologicalConverter, EpidemiologicalParameters};
use super::interval::Interval;
use crate::errors::{Result, SkylineError};

/// Name reported by a model before any interval has been selected.
pub const DEFAULT_NAME: &str = "BD";

/// Epidemiological states of a birth-death model.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum State {
    Infected,
}

/// Simulator-facing rates of one interval.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    states: Vec<State>,
    transmission_rates: Array2<f64>,
    removal_rates: Array1<f64>,
    sampling_probabilities: Array1<f64>,
}

impl From<&Interval> for ModelConfig {
    fn from(interval: &Interval) -> Self {
        Self {
            states: vec![State::Infected],
            transmission_rates: Array2::from_elem((1, 1), interval.transmission_rate()),
            removal_rates: Array1::from_elem(1, interval.removal_rate()),
            sampling_probabilities: Array1::from_elem(1, interval.sampling_probability()),
        }
    }
}

impl ModelConfig {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Transmission rates between states, indexed by `[donor, recipient]`.
    pub fn transmission_rates(&self) -> &Array2<f64> {
        &self.transmission_rates
    }

    pub fn removal_rates(&self) -> &Array1<f64> {
        &self.removal_rates
    }

    pub fn sampling_probabilities(&self) -> &Array1<f64> {
        &self.sampling_probabilities
    }
}

/// Snapshot of the interval that is active at the queried time.
///
/// Rates and epidemiological parameters are derived from the snapshot itself, so a reader never
/// depends on state that a later selection could change.
#[derive(Clone, Copy, Debug)]
pub struct Selection<'a> {
    index: usize,
    interval: &'a Interval,
    config: &'a ModelConfig,
    converter: EpidemiologicalConverter,
    switched: bool,
}

impl<'a> Selection<'a> {
    pub(crate) fn new(
        index: usize,
        interval: &'a Interval,
        config: &'a ModelConfig,
        converter: EpidemiologicalConverter,
        switched: bool,
    ) -> Self {
        Self {
            index,
            interval,
            config,
            converter,
            switched,
        }
    }

    /// Position of the interval in the skyline.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &'a str {
        self.interval.label()
    }

    pub fn interval(&self) -> &'a Interval {
        self.interval
    }

    pub fn config(&self) -> &'a ModelConfig {
        self.config
    }

    pub fn converter(&self) -> EpidemiologicalConverter {
        self.converter
    }

    /// Whether the selection that produced this snapshot changed the active interval.
    pub fn switched(&self) -> bool {
        self.switched
    }

    pub fn epidemiological_parameters(&self) -> Result<EpidemiologicalParameters> {
        self.converter.convert(self.interval)
    }

    pub(crate) fn with_notification_probability(self, notification_probability: f64) -> Self {
        Self {
            converter: self
                .converter
                .with_notification_probability(notification_probability),
            ..self
        }
    }
}

/// A time-dependent epidemiological model.
///
/// The simulator owns the clock: it calls `select` whenever it needs the rates in effect at a
/// time point and reads them off the returned `Selection`. Selecting requires exclusive access
/// to the model, hence implementors are not meant to be shared between threads without external
/// synchronization.
pub trait Model {
    /// Activate the parameters in effect at `time` and return a snapshot of them.
    fn select(&mut self, time: f64) -> Selection<'_>;

    /// Snapshot of the active parameters, if any have been selected.
    fn active(&self) -> Option<Selection<'_>>;

    /// Times at which the parameters of the model change.
    fn change_times(&self) -> Vec<f64>;

    /// Name of the active parameter set.
    fn get_name(&self) -> String {
        self.active()
            .map(|selection| selection.label().to_string())
            .unwrap_or_else(|| DEFAULT_NAME.to_string())
    }

    /// Epidemiological parameters of the active parameter set.
    fn get_epidemiological_parameters(&self) -> Result<EpidemiologicalParameters> {
        self.active()
            .ok_or(SkylineError::NotConfiguredError)?
            .epidemiological_parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn config_from_interval() {
        let interval = Interval::new("BD1", 0.4, 0.1, 0.5, 2.0).unwrap();
        let config = ModelConfig::from(&interval);

        assert_eq!(config.states(), &[State::Infected]);
        assert_eq!(config.transmission_rates(), &arr2(&[[0.4]]));
        assert_eq!(config.removal_rates(), &arr1(&[0.1]));
        assert_eq!(config.sampling_probabilities(), &arr1(&[0.5]));
    }

    #[test]
    fn state_names() {
        assert_eq!(State::Infected.to_string(), "Infected");
    }

    #[test]
    fn selection_derives_parameters() {
        let interval = Interval::new("BD1", 2.0, 0.5, 0.6, 2.0).unwrap();
        let config = ModelConfig::from(&interval);
        let selection = Selection::new(0, &interval, &config, Default::default(), true)
            .with_notification_probability(0.3);

        let parameters = selection.epidemiological_parameters().unwrap();
        assert_eq!(selection.label(), "BD1");
        assert_eq!(parameters.r0, 4.0);
        assert_eq!(parameters.notification_probability, Some(0.3));
    }
}
