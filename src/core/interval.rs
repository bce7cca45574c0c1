use crate::errors::{Result, SkylineError};

/// A single piecewise-constant segment of a skyline.
///
/// The interval is applicable from the end of its predecessor (or time zero) up to, but not
/// including, `interval_end`. Intervals are immutable once a model has been built from them.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    label: String,
    transmission_rate: f64,
    removal_rate: f64,
    sampling_probability: f64,
    interval_end: f64,
}

impl Interval {
    /// Create a new interval and check that its parameters are admissible.
    ///
    /// A removal rate of zero is accepted here; it only becomes an error once epidemiological
    /// parameters are derived from the interval.
    pub fn new(
        label: impl Into<String>,
        transmission_rate: f64,
        removal_rate: f64,
        sampling_probability: f64,
        interval_end: f64,
    ) -> Result<Self> {
        let label = label.into();

        check_rate(&label, "transmission rate", transmission_rate)?;
        check_rate(&label, "removal rate", removal_rate)?;

        if !(0.0..=1.0).contains(&sampling_probability) {
            return Err(SkylineError::InvalidParameterError(format!(
                "sampling probability of interval {label} must lie in [0, 1], got {sampling_probability}"
            )));
        }

        if interval_end.is_nan() {
            return Err(SkylineError::InvalidParameterError(format!(
                "end of interval {label} is not a number"
            )));
        }

        Ok(Self {
            label,
            transmission_rate,
            removal_rate,
            sampling_probability,
            interval_end,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn transmission_rate(&self) -> f64 {
        self.transmission_rate
    }

    pub fn removal_rate(&self) -> f64 {
        self.removal_rate
    }

    pub fn sampling_probability(&self) -> f64 {
        self.sampling_probability
    }

    pub fn interval_end(&self) -> f64 {
        self.interval_end
    }
}

fn check_rate(label: &str, name: &str, rate: f64) -> Result<()> {
    if rate.is_finite() && rate >= 0.0 {
        return Ok(());
    }
    Err(SkylineError::InvalidParameterError(format!(
        "{name} of interval {label} must be finite and non-negative, got {rate}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_removal_rate() {
        let interval = Interval::new("BD1", 1.0, 0.0, 0.5, 2.0).unwrap();
        assert_eq!(interval.removal_rate(), 0.0);
        assert_eq!(interval.label(), "BD1");
    }

    #[test]
    fn accepts_open_end() {
        let interval = Interval::new("BD1", 1.0, 0.5, 0.5, f64::INFINITY).unwrap();
        assert!(interval.interval_end().is_infinite());
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            Interval::new("BD1", -1.0, 0.5, 0.5, 2.0),
            Err(SkylineError::InvalidParameterError(_))
        ));
        assert!(matches!(
            Interval::new("BD1", 1.0, f64::NAN, 0.5, 2.0),
            Err(SkylineError::InvalidParameterError(_))
        ));
        assert!(matches!(
            Interval::new("BD1", 1.0, 0.5, 1.5, 2.0),
            Err(SkylineError::InvalidParameterError(_))
        ));
        assert!(matches!(
            Interval::new("BD1", 1.0, 0.5, 0.5, f64::NAN),
            Err(SkylineError::InvalidParameterError(_))
        ));
    }
}
