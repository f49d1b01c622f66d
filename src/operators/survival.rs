use std::cmp::Reverse;

use log::debug;
use ordered_float::OrderedFloat;

use crate::core::{OError, ObjectiveDirection};
use crate::utils::{crowding_distance, fast_non_dominated_sort};

/// Outputs of the environmental selection.
#[derive(Debug, Clone)]
pub struct SurvivalResults {
    /// The indexes of the surviving individuals. Whole fronts come first, in rank order, followed
    /// by the individuals picked from the truncated front by decreasing crowding distance.
    pub selected: Vec<usize>,
    /// All the fronts of the combined population.
    pub front_indexes: Vec<Vec<usize>>,
    /// The rank of the front that was truncated, if any.
    pub truncated_front: Option<usize>,
    /// The crowding distances of the members of the truncated front, aligned with
    /// `front_indexes[truncated_front]`. This is empty when no front was truncated.
    pub crowding_distances: Vec<f64>,
}

/// Select the `number_of_individuals` best individuals from a combined population (parents and
/// offsprings). Ranked non-dominated fronts are added until the population size almost reaches
/// `number_of_individuals`. When the next front does not fit, its members are sorted by
/// decreasing crowding distance and the first ones complete the population. Ties keep the order
/// of the front.
///
/// This returns an error if the combined population is smaller than `number_of_individuals`.
///
/// This implements the algorithm at the bottom of page 186 in Deb et al. (2002).
///
/// # Arguments
///
/// * `objectives`: The fitness vectors of the combined population.
/// * `number_of_individuals`: The number of individuals to keep.
/// * `direction`: Whether the objectives are minimised or maximised.
///
/// returns: `Result<SurvivalResults, OError>`
pub fn select_survivors(
    objectives: &[Vec<f64>],
    number_of_individuals: usize,
    direction: ObjectiveDirection,
) -> Result<SurvivalResults, OError> {
    let name = "survival".to_string();
    if objectives.len() < number_of_individuals {
        return Err(OError::InconsistentState(
            name,
            format!(
                "The combined population has {} individuals, but {number_of_individuals} must survive",
                objectives.len()
            ),
        ));
    }

    let sorting_results = fast_non_dominated_sort(objectives, direction, false)?;
    debug!("Collected {} fronts", sorting_results.front_indexes.len());

    let mut selected: Vec<usize> = Vec::with_capacity(number_of_individuals);
    let mut truncated_front = None;
    let mut crowding_distances = Vec::new();
    for (fi, front) in sorting_results.front_indexes.iter().enumerate() {
        if front.is_empty() {
            return Err(OError::InconsistentState(
                name,
                format!("The front #{fi} is empty"),
            ));
        }
        if selected.len() + front.len() <= number_of_individuals {
            debug!("Adding front #{} (size: {})", fi, front.len());
            selected.extend(front);
            if selected.len() == number_of_individuals {
                break;
            }
        } else {
            let missing = number_of_individuals - selected.len();
            debug!(
                "Population almost full ({} individuals). Adding {missing} individuals from front #{fi} by crowding distance",
                selected.len()
            );
            let front_objectives: Vec<Vec<f64>> =
                front.iter().map(|i| objectives[*i].clone()).collect();
            crowding_distances = crowding_distance(&front_objectives)?;

            // Sort in descending order. Prioritise individuals with the largest distance to
            // prevent crowding
            let mut positions: Vec<usize> = (0..front.len()).collect();
            positions.sort_by_key(|p| Reverse(OrderedFloat(crowding_distances[*p])));
            selected.extend(positions.iter().take(missing).map(|p| front[*p]));
            truncated_front = Some(fi);
            break;
        }
    }

    if selected.len() != number_of_individuals {
        return Err(OError::InconsistentState(
            name,
            format!(
                "The new population has {} individuals, but {number_of_individuals} were expected",
                selected.len()
            ),
        ));
    }

    Ok(SurvivalResults {
        selected,
        front_indexes: sorting_results.front_indexes,
        truncated_front,
        crowding_distances,
    })
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::core::test_utils::fitness_vectors;
    use crate::core::ObjectiveDirection;
    use crate::operators::select_survivors;
    use crate::utils::BOUNDARY_DISTANCE;

    #[test]
    /// Whole fronts fit exactly.
    fn test_whole_fronts() {
        let objectives = fitness_vectors(&[[1.0, 4.0], [4.0, 1.0], [2.0, 5.0], [5.0, 2.0]]);
        let results = select_survivors(&objectives, 2, ObjectiveDirection::Minimise).unwrap();
        assert_eq!(results.selected, vec![0, 1]);
        assert_eq!(results.truncated_front, None);
        assert!(results.crowding_distances.is_empty());
    }

    #[test]
    /// The second front is truncated by crowding distance.
    fn test_truncation() {
        let objectives = fitness_vectors(&[
            // front 0
            [0.0, 0.0],
            // front 1
            [1.0, 9.0],
            [2.0, 7.0],
            [4.0, 4.0],
            [7.0, 2.0],
            [10.0, 1.0],
        ]);
        let results = select_survivors(&objectives, 4, ObjectiveDirection::Minimise).unwrap();
        assert_eq!(results.truncated_front, Some(1));
        assert_eq!(results.front_indexes[1], vec![1, 2, 3, 4, 5]);
        assert_eq!(results.crowding_distances[0], BOUNDARY_DISTANCE);
        assert_eq!(results.crowding_distances[4], BOUNDARY_DISTANCE);

        // the two boundary points, then the most isolated interior point (index 3 has
        // 5/9 + 5/8, larger than 6/9 + 3/8 of index 4)
        assert_eq!(results.selected, vec![0, 1, 5, 3]);
    }

    #[test]
    /// Ties in the crowding distance keep the front order.
    fn test_tie_break() {
        let objectives = fitness_vectors(&[[1.0, 3.0], [2.0, 2.0], [3.0, 1.0]]);
        let results = select_survivors(&objectives, 1, ObjectiveDirection::Minimise).unwrap();
        assert_eq!(results.selected, vec![0]);
        let results = select_survivors(&objectives, 2, ObjectiveDirection::Minimise).unwrap();
        assert_eq!(results.selected, vec![0, 2]);
    }

    #[test]
    fn test_too_small_population() {
        let objectives = fitness_vectors(&[[1.0, 3.0], [2.0, 2.0]]);
        assert!(select_survivors(&objectives, 3, ObjectiveDirection::Minimise).is_err());
    }

    #[test]
    /// Exactly the requested number of unique individuals survives.
    fn test_survivor_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        for _ in 0..100 {
            let target: usize = rng.gen_range(1..30);
            let size = target + rng.gen_range(0..30);
            let objectives: Vec<Vec<f64>> = (0..size)
                .map(|_| (0..2).map(|_| rng.gen_range(0..6) as f64).collect())
                .collect();
            for direction in [ObjectiveDirection::Minimise, ObjectiveDirection::Maximise] {
                let results = select_survivors(&objectives, target, direction).unwrap();
                assert_eq!(results.selected.len(), target);
                let mut unique = results.selected.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), target);
            }
        }
    }
}
