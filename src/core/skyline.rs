//! Birth-death skyline model.
//!
//! A skyline splits the timeline `[0, ∞)` into consecutive intervals with their own transmission
//! rate, removal rate and sampling probability. Interval `i` is active for times in
//! `[end(i - 1), end(i))`, where the first interval starts at zero. The last interval stays
//! active beyond its declared end, so the skyline is open-ended.

use itertools::Itertools;
use ndarray::ArrayView2;

use super::epidemiology::EpidemiologicalConverter;
use super::interval::Interval;
use super::model::{Model, ModelConfig, Selection};
use crate::errors::{Result, SkylineError};

/// Number of rows of a parameter matrix: transmission rate, removal rate, sampling probability
/// and interval end.
pub const PARAMETER_ROWS: usize = 4;

/// Prefix of the labels assigned to intervals built from a parameter matrix.
pub const LABEL_PREFIX: &str = "BD";

/// Birth-death model with piecewise-constant parameters.
///
/// The model keeps track of the active interval. Selecting a new interval requires `&mut self`;
/// a model must not be shared across concurrent callers without external synchronization.
#[derive(Clone, Debug)]
pub struct SkylineModel {
    intervals: Vec<Interval>,
    configs: Vec<ModelConfig>,
    converter: EpidemiologicalConverter,
    active: Option<usize>,
}

impl SkylineModel {
    /// Create a model from a parameter matrix.
    ///
    /// The matrix has one column per interval and the rows transmission rate, removal rate,
    /// sampling probability and interval end. Columns are labeled `BD1`, `BD2`, ... in order.
    pub fn from_matrix(params: ArrayView2<f64>) -> Result<Self> {
        if params.nrows() != PARAMETER_ROWS {
            return Err(SkylineError::InvalidShapeError(params.nrows()));
        }

        let intervals = params
            .columns()
            .into_iter()
            .enumerate()
            .map(|(idx, column)| {
                Interval::new(
                    format!("{LABEL_PREFIX}{}", idx + 1),
                    column[0],
                    column[1],
                    column[2],
                    column[3],
                )
            })
            .collect::<Result<Vec<Interval>>>()?;

        Self::from_intervals(intervals)
    }

    /// Create a model from intervals sorted by ascending end.
    pub fn from_intervals(intervals: Vec<Interval>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(SkylineError::EmptyModelError);
        }

        if let Some((previous, next)) = intervals
            .iter()
            .tuple_windows()
            .find(|(previous, next)| next.interval_end() < previous.interval_end())
        {
            return Err(SkylineError::UnorderedIntervalsError(format!(
                "interval {} ends at {} before interval {} ending at {}",
                next.label(),
                next.interval_end(),
                previous.label(),
                previous.interval_end()
            )));
        }

        let configs = intervals.iter().map(ModelConfig::from).collect();

        Ok(Self {
            intervals,
            configs,
            converter: EpidemiologicalConverter::default(),
            active: None,
        })
    }

    /// Set the average number of recipients per transmission event, which scales R0.
    pub fn with_recipients(self, recipients: f64) -> Result<Self> {
        Ok(Self {
            converter: EpidemiologicalConverter::new(recipients)?,
            ..self
        })
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn recipients(&self) -> f64 {
        self.converter.recipients()
    }

    /// Index of the interval in effect at `time`, without changing the active interval.
    ///
    /// The declared end of the last interval is ignored, times past it resolve to the last
    /// interval. Negative times resolve to the first one.
    pub fn locate(&self, time: f64) -> usize {
        self.interior().partition_point(|interval| interval.interval_end() <= time)
    }

    /// All intervals but the last, whose ends bound the intervals they close.
    fn interior(&self) -> &[Interval] {
        &self.intervals[..self.intervals.len() - 1]
    }

    fn selection(&self, index: usize, switched: bool) -> Selection<'_> {
        Selection::new(
            index,
            &self.intervals[index],
            &self.configs[index],
            self.converter,
            switched,
        )
    }
}

impl Model for SkylineModel {
    fn select(&mut self, time: f64) -> Selection<'_> {
        let index = self.locate(time);
        let label = self.intervals[index].label();
        let switched = self
            .active
            .is_none_or(|previous| self.intervals[previous].label() != label);

        if switched {
            log::info!("Switched to interval {label} at time {time}.");
        }

        self.active = Some(index);
        self.selection(index, switched)
    }

    fn active(&self) -> Option<Selection<'_>> {
        self.active.map(|index| self.selection(index, false))
    }

    fn change_times(&self) -> Vec<f64> {
        self.interior()
            .iter()
            .map(|interval| interval.interval_end())
            .collect()
    }
}
