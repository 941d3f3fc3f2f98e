use operations::notifications::{NotificationDraft, NotificationType, Priority};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::sim_error::SimError;

/// A canned alert the generator may raise.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertTemplate {
    pub kind: NotificationType,
    pub priority: Priority,
    pub title: &'static str,
    pub message: &'static str,
}

impl AlertTemplate {
    pub fn to_draft(&self) -> NotificationDraft {
        NotificationDraft::new(self.kind, self.priority, self.title, self.message)
    }
}

pub const DEFAULT_TEMPLATES: [AlertTemplate; 3] = [
    AlertTemplate {
        kind: NotificationType::Weather,
        priority: Priority::Medium,
        title: "Weather Update",
        message: "Visibility reduced to 2 miles at LAX due to fog",
    },
    AlertTemplate {
        kind: NotificationType::Delay,
        priority: Priority::High,
        title: "Traffic Congestion",
        message: "Ground stop implemented at ORD due to air traffic congestion",
    },
    AlertTemplate {
        kind: NotificationType::Maintenance,
        priority: Priority::High,
        title: "Runway Maintenance",
        message: "Runway 24L at JFK closed for emergency maintenance",
    },
];

/// Synthesizes alerts: on each draw, with a fixed probability, one of the
/// templates picked uniformly.
pub struct AlertGenerator<R: Rng = StdRng> {
    rng: R,
    probability: f64,
    templates: Vec<AlertTemplate>,
}

impl AlertGenerator<StdRng> {
    pub fn new(probability: f64) -> Result<Self, SimError> {
        Self::with_rng(StdRng::from_entropy(), probability)
    }

    pub fn seeded(seed: u64, probability: f64) -> Result<Self, SimError> {
        Self::with_rng(StdRng::seed_from_u64(seed), probability)
    }
}

impl<R: Rng> AlertGenerator<R> {
    pub fn with_rng(rng: R, probability: f64) -> Result<Self, SimError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SimError::InvalidProbability(probability));
        }
        Ok(AlertGenerator {
            rng,
            probability,
            templates: DEFAULT_TEMPLATES.to_vec(),
        })
    }

    pub fn with_templates(mut self, templates: Vec<AlertTemplate>) -> Self {
        self.templates = templates;
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draws once. Returns the alert to raise, if any.
    pub fn draw(&mut self) -> Option<NotificationDraft> {
        if self.rng.gen::<f64>() >= self.probability {
            return None;
        }
        self.templates
            .choose(&mut self.rng)
            .map(AlertTemplate::to_draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bounds() {
        assert!(matches!(
            AlertGenerator::seeded(1, 1.5),
            Err(SimError::InvalidProbability(_))
        ));
        assert!(AlertGenerator::seeded(1, -0.1).is_err());
        assert!(AlertGenerator::seeded(1, 0.0).is_ok());
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut generator = AlertGenerator::seeded(5, 0.0).expect("generator");
        assert!((0..1000).all(|_| generator.draw().is_none()));
    }

    #[test]
    fn test_certain_probability_always_fires_a_template() {
        let mut generator = AlertGenerator::seeded(5, 1.0).expect("generator");
        for _ in 0..50 {
            let draft = generator.draw().expect("an alert");
            assert!(DEFAULT_TEMPLATES
                .iter()
                .any(|t| t.title == draft.title && t.message == draft.message));
        }
    }

    #[test]
    fn test_default_probability_fires_sometimes() {
        let mut generator = AlertGenerator::seeded(11, 0.1).expect("generator");
        let fired = (0..2000).filter(|_| generator.draw().is_some()).count();
        assert!(fired > 100 && fired < 300, "fired {} times", fired);
    }

    #[test]
    fn test_empty_template_list_raises_nothing() {
        let mut generator = AlertGenerator::seeded(5, 1.0)
            .expect("generator")
            .with_templates(Vec::new());
        assert!(generator.draw().is_none());
    }
}
