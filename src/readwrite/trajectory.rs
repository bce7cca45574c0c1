use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::Selection;

/// Parameters in effect at one time point of a sweep.
///
/// Derived quantities are left empty if they are undefined for the interval, e.g. if its
/// removal rate is zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrajectoryEntry {
    pub time: f64,
    pub interval: String,
    pub transmission_rate: f64,
    pub removal_rate: f64,
    pub sampling_probability: f64,
    pub r0: Option<f64>,
    pub infectious_time: Option<f64>,
    pub notification_probability: Option<f64>,
}

impl TrajectoryEntry {
    pub fn from_selection(time: f64, selection: &Selection<'_>) -> Self {
        let interval = selection.interval();
        let parameters = selection.epidemiological_parameters().ok();
        Self {
            time,
            interval: interval.label().to_string(),
            transmission_rate: interval.transmission_rate(),
            removal_rate: interval.removal_rate(),
            sampling_probability: interval.sampling_probability(),
            r0: parameters.as_ref().map(|p| p.r0),
            infectious_time: parameters.as_ref().map(|p| p.infectious_time),
            notification_probability: selection.converter().notification_probability(),
        }
    }
}

/// Writes trajectory entries as csv records, preceded by a header.
pub struct TrajectoryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl TrajectoryWriter<fs::File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        Ok(Self {
            writer: csv::WriterBuilder::new().from_path(path)?,
        })
    }
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().from_writer(writer),
        }
    }

    pub fn write(&mut self, entry: &TrajectoryEntry) -> Result<(), csv::Error> {
        self.writer.serialize(entry)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }
}
