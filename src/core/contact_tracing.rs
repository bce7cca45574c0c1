use super::model::{Model, Selection};
use crate::errors::{Result, SkylineError};

/// Contact tracing extension of a model.
///
/// Removed hosts notify their contacts with probability `upsilon`. The rates of the wrapped
/// model are passed through unchanged; the notification probability is added to its
/// epidemiological parameters and the maximum number of notified contacts is kept for the
/// simulator.
#[derive(Clone, Debug)]
pub struct ContactTracing<M: Model> {
    model: M,
    upsilon: f64,
    max_notified_contacts: usize,
}

impl<M: Model> ContactTracing<M> {
    pub fn new(model: M, upsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&upsilon) {
            return Err(SkylineError::InvalidParameterError(format!(
                "notification probability must lie in [0, 1], got {upsilon}"
            )));
        }
        Ok(Self {
            model,
            upsilon,
            max_notified_contacts: 1,
        })
    }

    pub fn with_max_notified_contacts(self, max_notified_contacts: usize) -> Result<Self> {
        if max_notified_contacts == 0 {
            return Err(SkylineError::InvalidParameterError(
                "at least one contact must be notifiable".to_string(),
            ));
        }
        Ok(Self {
            max_notified_contacts,
            ..self
        })
    }

    pub fn upsilon(&self) -> f64 {
        self.upsilon
    }

    pub fn max_notified_contacts(&self) -> usize {
        self.max_notified_contacts
    }

    pub fn inner(&self) -> &M {
        &self.model
    }
}

impl<M: Model> Model for ContactTracing<M> {
    fn select(&mut self, time: f64) -> Selection<'_> {
        let upsilon = self.upsilon;
        self.model
            .select(time)
            .with_notification_probability(upsilon)
    }

    fn active(&self) -> Option<Selection<'_>> {
        self.model
            .active()
            .map(|selection| selection.with_notification_probability(self.upsilon))
    }

    fn change_times(&self) -> Vec<f64> {
        self.model.change_times()
    }

    fn get_name(&self) -> String {
        format!("{}-CT", self.model.get_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SkylineModel;
    use ndarray::array;

    fn skyline() -> SkylineModel {
        let params = array![[2.0, 1.0], [0.5, 0.5], [0.6, 0.4], [3.0, 6.0]];
        SkylineModel::from_matrix(params.view()).unwrap()
    }

    #[test]
    fn names() {
        let mut model = ContactTracing::new(skyline(), 0.2).unwrap();
        assert_eq!(model.get_name(), "BD-CT");
        model.select(4.0);
        assert_eq!(model.get_name(), "BD2-CT");
    }

    #[test]
    fn adds_notification_probability() {
        let mut model = ContactTracing::new(skyline(), 0.2).unwrap();
        assert_eq!(
            model.get_epidemiological_parameters(),
            Err(SkylineError::NotConfiguredError)
        );

        let selection = model.select(1.0);
        assert_eq!(selection.label(), "BD1");
        assert!(selection.switched());

        let parameters = model.get_epidemiological_parameters().unwrap();
        assert_eq!(parameters.r0, 4.0);
        assert_eq!(parameters.notification_probability, Some(0.2));
        assert_eq!(
            parameters.entries().last(),
            Some(&("notification probability", 0.2))
        );
    }

    #[test]
    fn delegates_selection() {
        let mut model = ContactTracing::new(skyline(), 0.5)
            .unwrap()
            .with_max_notified_contacts(3)
            .unwrap();
        assert_eq!(model.change_times(), vec![3.0]);
        assert_eq!(model.select(3.0).label(), "BD2");
        assert_eq!(model.inner().get_name(), "BD2");
        assert_eq!(model.max_notified_contacts(), 3);
    }

    #[test]
    fn invalid_parameters() {
        assert!(ContactTracing::new(skyline(), 1.5).is_err());
        assert!(
            ContactTracing::new(skyline(), 0.5)
                .unwrap()
                .with_max_notified_contacts(0)
                .is_err()
        );
    }
}
