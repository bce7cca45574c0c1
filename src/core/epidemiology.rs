//! Conversion of raw birth-death rates into epidemiological quantities.

use serde::Serialize;
use std::fmt;

use super::interval::Interval;
use crate::errors::{Result, SkylineError};

/// Interpretable summary of the rates of a single interval.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpidemiologicalParameters {
    #[serde(rename = "R0")]
    pub r0: f64,
    #[serde(rename = "infectious time")]
    pub infectious_time: f64,
    #[serde(rename = "sampling probability")]
    pub sampling_probability: f64,
    #[serde(rename = "transmission rate")]
    pub transmission_rate: f64,
    #[serde(rename = "removal rate")]
    pub removal_rate: f64,
    /// Only present when a transmission event infects more than one recipient.
    #[serde(
        rename = "avg recipient number per transmission",
        skip_serializing_if = "Option::is_none"
    )]
    pub avg_recipients: Option<f64>,
    /// Only present when the model is wrapped with contact tracing.
    #[serde(
        rename = "notification probability",
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_probability: Option<f64>,
}

impl EpidemiologicalParameters {
    /// Key-value pairs in reporting order, leaving out absent optional entries.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = vec![
            ("R0", self.r0),
            ("infectious time", self.infectious_time),
            ("sampling probability", self.sampling_probability),
            ("transmission rate", self.transmission_rate),
            ("removal rate", self.removal_rate),
        ];
        if let Some(recipients) = self.avg_recipients {
            entries.push(("avg recipient number per transmission", recipients));
        }
        if let Some(upsilon) = self.notification_probability {
            entries.push(("notification probability", upsilon));
        }
        entries
    }
}

impl fmt::Display for EpidemiologicalParameters {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(formatter, "{}", output.trim_end())
    }
}

/// Derives `EpidemiologicalParameters` from the rates of an interval.
///
/// The converter carries the model-wide settings that are not part of an interval: the number
/// of recipients per transmission event, which scales R0, and the notification probability of
/// an enclosing contact tracing model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpidemiologicalConverter {
    recipients: f64,
    notification_probability: Option<f64>,
}

impl Default for EpidemiologicalConverter {
    fn default() -> Self {
        Self {
            recipients: 1.0,
            notification_probability: None,
        }
    }
}

impl EpidemiologicalConverter {
    pub fn new(recipients: f64) -> Result<Self> {
        if !(recipients.is_finite() && recipients > 0.0) {
            return Err(SkylineError::InvalidParameterError(format!(
                "number of recipients must be finite and positive, got {recipients}"
            )));
        }
        Ok(Self {
            recipients,
            notification_probability: None,
        })
    }

    pub fn with_notification_probability(self, notification_probability: f64) -> Self {
        Self {
            notification_probability: Some(notification_probability),
            ..self
        }
    }

    pub fn recipients(&self) -> f64 {
        self.recipients
    }

    pub fn notification_probability(&self) -> Option<f64> {
        self.notification_probability
    }

    /// Convert the rates of `interval`.
    ///
    /// Fails with `DivisionByZeroError` if the removal rate is zero, since neither R0 nor the
    /// infectious time are defined in that case.
    pub fn convert(&self, interval: &Interval) -> Result<EpidemiologicalParameters> {
        let transmission_rate = interval.transmission_rate();
        let removal_rate = interval.removal_rate();

        if removal_rate == 0.0 {
            return Err(SkylineError::DivisionByZeroError(
                interval.label().to_string(),
            ));
        }

        Ok(EpidemiologicalParameters {
            r0: transmission_rate / removal_rate * self.recipients,
            infectious_time: 1.0 / removal_rate,
            sampling_probability: interval.sampling_probability(),
            transmission_rate,
            removal_rate,
            avg_recipients: (self.recipients > 1.0).then_some(self.recipients),
            notification_probability: self.notification_probability,
        })
    }
}
