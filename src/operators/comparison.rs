use crate::core::{OError, ObjectiveDirection};

/// The preferred solution with the `BinaryComparisonOperator`.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy)]
pub enum PreferredSolution {
    /// The first solution is preferred.
    First,
    /// The second solution is preferred.
    Second,
    /// The two solutions are mutually preferred.
    MutuallyPreferred,
}

/// A trait to implement a comparison operator between the fitness vectors of two solutions.
pub trait BinaryComparisonOperator {
    /// Compare two solutions and select the best one.
    ///
    /// # Arguments
    ///
    /// * `first_solution`: The fitness of the first solution to compare.
    /// * `second_solution`: The fitness of the second solution to compare.
    ///
    /// returns: `Result<PreferredSolution, OError>` The preferred solution.
    fn compare(
        &self,
        first_solution: &[f64],
        second_solution: &[f64],
    ) -> Result<PreferredSolution, OError>;
}

/// This assesses the Pareto dominance between two solutions $S_1$ and $S_2$. When objectives are
/// minimised, $S_1$ dominates $S_2$ ($ S_1 \prec S_2 $) if no objective of $S_1$ is larger than
/// the one of $S_2$ and at least one is strictly smaller. With maximisation the inequalities are
/// flipped.
///
/// See: K. Deb, A. Pratap, S. Agarwal and T. Meyarivan (2002). <https://doi.org/10.1109/4235.996017>.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParetoDominance {
    /// Whether all the objectives are minimised or maximised.
    direction: ObjectiveDirection,
}

impl ParetoDominance {
    /// Create the operator.
    ///
    /// # Arguments
    ///
    /// * `direction`: Whether all the objectives are minimised or maximised.
    ///
    /// returns: `ParetoDominance`
    pub fn new(direction: ObjectiveDirection) -> Self {
        Self { direction }
    }

    /// The direction used to assess the dominance.
    pub fn direction(&self) -> ObjectiveDirection {
        self.direction
    }
}

impl BinaryComparisonOperator for ParetoDominance {
    /// Get the dominance relation between two fitness vectors. This returns an error if the
    /// vectors have a different length.
    ///
    /// # Arguments
    ///
    /// * `first_solution`: The fitness of the first solution.
    /// * `second_solution`: The fitness of the second solution.
    ///
    /// returns: `Result<PreferredSolution, OError>`
    fn compare(
        &self,
        first_solution: &[f64],
        second_solution: &[f64],
    ) -> Result<PreferredSolution, OError> {
        if first_solution.len() != second_solution.len() {
            return Err(OError::InvalidInput(
                "ParetoDominance".to_string(),
                format!(
                    "The fitness vectors must have the same length, but {} and {} given",
                    first_solution.len(),
                    second_solution.len()
                ),
            ));
        }

        let mut relation = PreferredSolution::MutuallyPreferred;
        for (obj_sol1, obj_sol2) in first_solution.iter().zip(second_solution) {
            if self.direction.is_better(*obj_sol1, *obj_sol2) {
                if relation == PreferredSolution::Second {
                    // mutually dominated
                    return Ok(PreferredSolution::MutuallyPreferred);
                }
                relation = PreferredSolution::First;
            } else if self.direction.is_better(*obj_sol2, *obj_sol1) {
                if relation == PreferredSolution::First {
                    // mutually dominated
                    return Ok(PreferredSolution::MutuallyPreferred);
                }
                relation = PreferredSolution::Second;
            }
        }

        Ok(relation)
    }
}

/// Get the dominance relation between two fitness vectors with the optimisation mode given as
/// string (`"minimize"` or `"maximize"`). This returns an error if the mode is not recognised
/// or the vectors have a different length.
///
/// # Arguments
///
/// * `first_solution`: The fitness of the first solution.
/// * `second_solution`: The fitness of the second solution.
/// * `mode`: The optimisation mode.
///
/// returns: `Result<PreferredSolution, OError>`
pub fn pareto_dominance(
    first_solution: &[f64],
    second_solution: &[f64],
    mode: &str,
) -> Result<PreferredSolution, OError> {
    ParetoDominance::new(mode.parse()?).compare(first_solution, second_solution)
}
