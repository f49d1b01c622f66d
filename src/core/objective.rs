use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::OError;

/// Whether the objectives should be minimised or maximised. Default is minimise. The same
/// direction applies to every objective in the fitness vector.
#[derive(Default, Clone, Copy, Debug, PartialOrd, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveDirection {
    #[default]
    /// Minimise the objectives.
    #[serde(rename = "minimize", alias = "minimise")]
    Minimise,
    /// Maximise the objectives.
    #[serde(rename = "maximize", alias = "maximise")]
    Maximise,
}

impl ObjectiveDirection {
    /// Whether `first` is strictly better than `second` in this direction.
    pub(crate) fn is_better(&self, first: f64, second: f64) -> bool {
        match self {
            ObjectiveDirection::Minimise => first < second,
            ObjectiveDirection::Maximise => first > second,
        }
    }
}

impl Display for ObjectiveDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveDirection::Minimise => f.write_str("minimised"),
            ObjectiveDirection::Maximise => f.write_str("maximised"),
        }
    }
}

impl FromStr for ObjectiveDirection {
    type Err = OError;

    /// Parse the optimisation mode. Only `"minimize"` and `"maximize"` (or their British
    /// spelling) are accepted.
    ///
    /// # Arguments
    ///
    /// * `s`: The mode string.
    ///
    /// returns: `Result<ObjectiveDirection, OError>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minimize" | "minimise" => Ok(ObjectiveDirection::Minimise),
            "maximize" | "maximise" => Ok(ObjectiveDirection::Maximise),
            _ => Err(OError::InvalidInput(
                "objective direction".to_string(),
                format!("The mode '{s}' must be either 'minimize' or 'maximize'"),
            )),
        }
    }
}
