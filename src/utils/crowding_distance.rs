use log::debug;

use crate::core::utils::{argsort, vector_max, vector_min};
use crate::core::OError;

/// The distance given to the boundary solutions of a front.
pub const BOUNDARY_DISTANCE: f64 = f64::INFINITY;

/// Calculate the crowding distance (with complexity $O(M * N log(N))$, where `M` is the number of
/// objectives and `N` the number of individuals). The distance is returned for each fitness
/// vector in the same order as `front`.
/// > NOTE: the fitness vectors must belong to the same non-dominated front. Distances are only
/// > meaningful to rank individuals within that front.
///
/// When the front has two or less members, they are all boundary points and get
/// [`BOUNDARY_DISTANCE`]. Otherwise, for each objective, the two extreme members get
/// [`BOUNDARY_DISTANCE`] and each interior member accumulates the normalised distance between its
/// two neighbours. An objective whose values are all equal does not contribute.
///
/// Implemented based on paragraph 3B in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `front`: The fitness vectors of the individuals in a non-dominated front.
///
/// returns: `Result<Vec<f64>, OError>`
pub fn crowding_distance(front: &[Vec<f64>]) -> Result<Vec<f64>, OError> {
    let total_individuals = front.len();
    if total_individuals == 0 {
        return Err(OError::InconsistentState(
            "crowding distance".to_string(),
            "The front is empty".to_string(),
        ));
    }
    let number_of_objectives = front[0].len();
    if front.iter().any(|f| f.len() != number_of_objectives) {
        return Err(OError::InvalidInput(
            "crowding distance".to_string(),
            "All fitness vectors in the front must have the same length".to_string(),
        ));
    }

    // if there are not enough points set distance to + infinite
    if total_individuals < 3 {
        debug!("Setting crowding distance to Inf for all individuals. At least 3 individuals are needed");
        return Ok(vec![BOUNDARY_DISTANCE; total_individuals]);
    }

    let mut distances = vec![0.0; total_individuals];
    for obj_idx in 0..number_of_objectives {
        let obj_values: Vec<f64> = front.iter().map(|f| f[obj_idx]).collect();

        // sort objectives and get indexes to map individuals to sorted objectives
        let sorted_idx = argsort(&obj_values);

        // assign infinite distance to the boundary points
        distances[sorted_idx[0]] = BOUNDARY_DISTANCE;
        distances[sorted_idx[total_individuals - 1]] = BOUNDARY_DISTANCE;

        let delta_range = vector_max(&obj_values)? - vector_min(&obj_values)?;
        if delta_range == 0.0 {
            debug!("Skipping objective #{obj_idx}. The min/max range is zero");
            continue;
        }

        for obj_i in 1..(total_individuals - 1) {
            let next = obj_values[sorted_idx[obj_i + 1]];
            let previous = obj_values[sorted_idx[obj_i - 1]];
            distances[sorted_idx[obj_i]] += (next - previous) / delta_range;
        }
    }

    Ok(distances)
}
