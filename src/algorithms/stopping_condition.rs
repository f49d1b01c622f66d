use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Trait to define a condition that causes an algorithm to terminate.
pub trait StoppingCondition<T: PartialOrd> {
    /// The target value of the stopping condition.
    fn target(&self) -> T;

    /// Whether the stopping condition is met.
    fn is_met(&self, current: T) -> bool {
        self.target() <= current
    }

    /// A name describing the stopping condition.
    fn name() -> String;
}

/// Number of generations after which a genetic algorithm terminates.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MaxGenerationValue(pub usize);

impl StoppingCondition<usize> for MaxGenerationValue {
    fn target(&self) -> usize {
        self.0
    }

    fn name() -> String {
        "maximum number of generations".to_string()
    }
}

/// Elapsed time after which a genetic algorithm terminates.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MaxDurationValue(pub Duration);

impl StoppingCondition<Duration> for MaxDurationValue {
    fn target(&self) -> Duration {
        self.0
    }

    fn name() -> String {
        "maximum duration".to_string()
    }
}

/// The type of stopping condition. Pick one type to inform the algorithm how/when it should
/// terminate the population evolution.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum StoppingConditionType {
    /// Set a maximum duration
    MaxDuration(MaxDurationValue),
    /// Set a maximum number of generations
    MaxGeneration(MaxGenerationValue),
}

impl StoppingConditionType {
    /// A name describing the stopping condition.
    ///
    /// returns: `String`
    pub fn name(&self) -> String {
        match self {
            StoppingConditionType::MaxDuration(_) => MaxDurationValue::name(),
            StoppingConditionType::MaxGeneration(_) => MaxGenerationValue::name(),
        }
    }

    /// Whether the algorithm must stop.
    ///
    /// # Arguments
    ///
    /// * `generation`: The number of evolved generations.
    /// * `elapsed`: The time since the algorithm started.
    ///
    /// returns: `bool`
    pub fn is_met(&self, generation: usize, elapsed: Duration) -> bool {
        match self {
            StoppingConditionType::MaxDuration(t) => t.is_met(elapsed),
            StoppingConditionType::MaxGeneration(t) => t.is_met(generation),
        }
    }
}
