//! Settings module.

use itertools::izip;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::core::{ContactTracing, Model, PARAMETER_ROWS, SkylineModel};
use crate::errors::SkylineError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Skyline intervals in ascending order of their end.
    pub intervals: Vec<IntervalSettings>,

    /// Average number of recipients per transmission event.
    #[serde(default = "default_recipients")]
    pub recipients: f64,

    /// Contact tracing parameters, contact tracing is disabled if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_tracing: Option<ContactTracingSettings>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IntervalSettings {
    /// The transmission rate is the rate at which an infected host infects a new host.
    pub transmission_rate: f64,

    /// The removal rate is the rate at which an infected host stops being infectious.
    pub removal_rate: f64,

    /// The probability that a removed host is sampled.
    pub sampling_probability: f64,

    /// The time at which the interval ends.
    pub end: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContactTracingSettings {
    /// The probability that a removed host notifies its contacts.
    pub upsilon: f64,

    #[serde(default = "default_max_notified_contacts")]
    pub max_notified_contacts: usize,
}

fn default_recipients() -> f64 {
    1.0
}

fn default_max_notified_contacts() -> usize {
    1
}

#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    YamlError(serde_yaml::Error),
}

impl std::error::Error for SettingsError {}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::IoError(error) => write!(formatter, "IO error: {}", error),
            SettingsError::YamlError(error) => write!(formatter, "YAML error: {}", error),
        }
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = vec![];
        self.write(&mut output).map_err(|_| std::fmt::Error)?;
        let output = String::from_utf8(output).map_err(|_| std::fmt::Error)?;
        write!(formatter, "{}", output)
    }
}

impl Settings {
    /// Assemble settings from per-interval rate lists, as given on the command line.
    ///
    /// All lists must have one entry per interval end.
    pub fn from_rates(
        transmission_rates: &[f64],
        removal_rates: &[f64],
        sampling_probabilities: &[f64],
        ends: &[f64],
    ) -> Result<Self, SkylineError> {
        for (name, values) in [
            ("transmission rates", transmission_rates),
            ("removal rates", removal_rates),
            ("sampling probabilities", sampling_probabilities),
        ] {
            if values.len() != ends.len() {
                return Err(SkylineError::LengthMismatchError {
                    name,
                    expected: ends.len(),
                    found: values.len(),
                });
            }
        }

        let intervals = izip!(
            transmission_rates,
            removal_rates,
            sampling_probabilities,
            ends
        )
        .map(
            |(&transmission_rate, &removal_rate, &sampling_probability, &end)| IntervalSettings {
                transmission_rate,
                removal_rate,
                sampling_probability,
                end,
            },
        )
        .collect();

        Ok(Self {
            intervals,
            recipients: default_recipients(),
            contact_tracing: None,
        })
    }

    /// Parameter matrix with one column per interval and the rows transmission rate, removal
    /// rate, sampling probability and end.
    pub fn parameter_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((PARAMETER_ROWS, self.intervals.len()), |(row, col)| {
            let interval = &self.intervals[col];
            match row {
                0 => interval.transmission_rate,
                1 => interval.removal_rate,
                2 => interval.sampling_probability,
                _ => interval.end,
            }
        })
    }

    /// Build the model described by the settings.
    ///
    /// The skyline is wrapped with contact tracing if a positive notification probability is
    /// configured.
    pub fn build_model(&self) -> Result<Box<dyn Model>, SkylineError> {
        let skyline = SkylineModel::from_matrix(self.parameter_matrix().view())?
            .with_recipients(self.recipients)?;

        let model: Box<dyn Model> = match &self.contact_tracing {
            Some(contact_tracing) if contact_tracing.upsilon > 0.0 => Box::new(
                ContactTracing::new(skyline, contact_tracing.upsilon)?
                    .with_max_notified_contacts(contact_tracing.max_notified_contacts)?,
            ),
            _ => Box::new(skyline),
        };
        Ok(model)
    }

    pub fn write(&self, writer: &mut dyn std::io::Write) -> Result<(), SettingsError> {
        serde_yaml::to_writer(writer, self).map_err(SettingsError::YamlError)
    }

    pub fn read(reader: &mut dyn std::io::Read) -> Result<Settings, SettingsError> {
        serde_yaml::from_reader(reader).map_err(SettingsError::YamlError)
    }

    pub fn write_to_file(&self, filename: &str) -> Result<(), SettingsError> {
        let file = fs::File::create(filename).map_err(SettingsError::IoError)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write(&mut writer)
    }

    pub fn read_from_file(filename: &str) -> Result<Settings, SettingsError> {
        let file = fs::File::open(filename).map_err(SettingsError::IoError)?;
        let mut reader = std::io::BufReader::new(file);
        Self::read(&mut reader)
    }
}
