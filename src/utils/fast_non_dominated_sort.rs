use crate::core::{OError, ObjectiveDirection};
use crate::operators::{BinaryComparisonOperator, ParetoDominance, PreferredSolution};

/// Outputs of the non-dominated sort algorithm.
#[derive(Debug, Clone)]
pub struct NonDominatedSortResults {
    /// A vector containing sub-vectors. Each child vector represents a front (with the first being
    /// the primary non-dominated front with solutions of rank 0); each child vector contains
    /// the indexes of the fitness vectors passed to [`fast_non_dominated_sort`].
    pub front_indexes: Vec<Vec<usize>>,
    /// The rank (front index) of each solution. This is `None` for the solutions that were not
    /// ranked because only the first front was requested.
    pub ranks: Vec<Option<usize>>,
    /// Number of individuals that dominates a solution at a given vector index. When the counter
    /// is 0, the solution is non-dominated. This is `n_p` in the paper.
    pub domination_counter: Vec<usize>,
}

/// Non-dominated fast sorting from NSGA2 paper (with complexity $O(M * N^2)$, where `M` is the
/// number of objectives and `N` the number of individuals).
///
/// This sorts solutions into fronts based on the number of solutions dominating each of them.
/// Solutions that are not dominated by any other individuals belong to the first front (rank 0).
/// The fronts partition the solution indexes: every index belongs to exactly one front.
///
/// Implemented based on paragraph 3A in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `objectives`: The fitness vectors to sort by dominance.
/// * `direction`: Whether the objectives are minimised or maximised.
/// * `first_front_only`: Return the first front only with the rank 0 (i.e. containing only
/// non-dominated individuals). If you need only the first front set this to true to avoid
/// ranking the remaining individuals.
///
/// returns: `Result<NonDominatedSortResults, OError>`.
pub fn fast_non_dominated_sort(
    objectives: &[Vec<f64>],
    direction: ObjectiveDirection,
    first_front_only: bool,
) -> Result<NonDominatedSortResults, OError> {
    if objectives.is_empty() {
        return Err(OError::InvalidInput(
            "fast non-dominated sort".to_string(),
            "At least 1 fitness vector is needed for sorting".to_string(),
        ));
    }
    let operator = ParetoDominance::new(direction);
    let total = objectives.len();

    // this set contains all the individuals being dominated by an individual `p`.This is `S_p` in
    // the paper
    let mut dominated_solutions: Vec<Vec<usize>> = vec![Vec::new(); total];
    // number of individuals that dominates `p`. When the counter is 0, `p` is non-dominated. This
    // is `n_p` in the paper
    let mut domination_counter: Vec<usize> = vec![0; total];
    let mut ranks: Vec<Option<usize>> = vec![None; total];

    // the front of given rank containing non-dominated solutions
    let mut current_front: Vec<usize> = Vec::new();

    for pi in 0..total {
        for qi in (pi + 1)..total {
            match operator.compare(&objectives[pi], &objectives[qi])? {
                PreferredSolution::First => {
                    // `p` dominates `q` - add `q` to the set of solutions dominated by `p`
                    dominated_solutions[pi].push(qi);
                    domination_counter[qi] += 1;
                }
                PreferredSolution::Second => {
                    // q dominates p
                    dominated_solutions[qi].push(pi);
                    domination_counter[pi] += 1;
                }
                PreferredSolution::MutuallyPreferred => {}
            }
        }

        // the solution `p` is non-dominated by any other and this solution belongs to the first
        // front
        if domination_counter[pi] == 0 {
            current_front.push(pi);
            ranks[pi] = Some(0);
        }
    }

    let e_domination_counter = domination_counter.clone();
    if first_front_only {
        return Ok(NonDominatedSortResults {
            front_indexes: vec![current_front],
            ranks,
            domination_counter: e_domination_counter,
        });
    }

    // the vector with all fronts of sorted ranks
    let mut all_fronts: Vec<Vec<usize>> = vec![current_front.clone()];
    let mut rank = 0;
    loop {
        rank += 1;
        let mut next_front: Vec<usize> = Vec::new();
        for pi in current_front.iter() {
            // loop solutions that are dominated by `p` in the current front
            for qi in dominated_solutions[*pi].iter() {
                domination_counter[*qi] -= 1;

                // if counter is 0 then none of the individuals in the subsequent fronts are
                // dominated by `p` and `q` belongs to the next front
                if domination_counter[*qi] == 0 {
                    next_front.push(*qi);
                    ranks[*qi] = Some(rank);
                }
            }
        }

        // stop when all solutions have been ranked
        if next_front.is_empty() {
            break;
        }
        all_fronts.push(next_front.clone());
        current_front = next_front;
    }

    Ok(NonDominatedSortResults {
        front_indexes: all_fronts,
        ranks,
        domination_counter: e_domination_counter,
    })
}

/// Get the indexes of the non-dominated solutions only. This is a shortcut for
/// [`fast_non_dominated_sort`] with `first_front_only` set to `true`.
///
/// # Arguments
///
/// * `objectives`: The fitness vectors.
/// * `direction`: Whether the objectives are minimised or maximised.
///
/// returns: `Result<Vec<usize>, OError>`
pub fn non_dominated_front(
    objectives: &[Vec<f64>],
    direction: ObjectiveDirection,
) -> Result<Vec<usize>, OError> {
    let mut results = fast_non_dominated_sort(objectives, direction, true)?;
    Ok(results.front_indexes.swap_remove(0))
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::core::test_utils::fitness_vectors;
    use crate::core::ObjectiveDirection;
    use crate::operators::{BinaryComparisonOperator, ParetoDominance, PreferredSolution};
    use crate::utils::{fast_non_dominated_sort, non_dominated_front};

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_2obj() {
        let objectives = fitness_vectors(&[
            [1.1, 8.1],
            [2.1, 6.1],
            [3.1, 4.1],
            [3.1, 7.1],
            [5.1, 3.1],
            [5.1, 5.1],
            [7.1, 7.1],
            [8.1, 2.1],
            [10.1, 6.1],
            [11.1, 1.1],
            [11.1, 3.1],
        ]);
        let result =
            fast_non_dominated_sort(&objectives, ObjectiveDirection::Minimise, false).unwrap();

        // non-dominated front
        let expected_first = vec![0, 1, 2, 4, 7, 9];
        assert_eq!(result.front_indexes[0], expected_first);
        for idx in &expected_first {
            assert_eq!(result.ranks[*idx], Some(0));
        }

        // other fronts
        let expected_second = vec![3, 5, 10];
        assert_eq!(result.front_indexes[1], expected_second);
        for idx in expected_second {
            assert_eq!(result.ranks[idx], Some(1));
        }

        let expected_third = vec![6, 8];
        assert_eq!(result.front_indexes[2], expected_third);
        for idx in expected_third {
            assert_eq!(result.ranks[idx], Some(2));
        }
        assert_eq!(result.front_indexes.len(), 3);

        // check counter for some solutions
        for idx in expected_first {
            assert_eq!(result.domination_counter[idx], 0);
        }
        // by 2 and 4
        assert_eq!(result.domination_counter[5], 2);
        // by 1, 2, 4, 5 and 7
        assert_eq!(result.domination_counter[8], 5);
        // by 1 and 2
        assert_eq!(result.domination_counter[3], 2);
    }

    #[test]
    /// Test the non-dominated sorting when the objectives are maximised.
    fn test_sorting_2obj_maximise() {
        let objectives = fitness_vectors(&[
            [11.1, 8.1],
            [8.1, 6.1],
            [5.1, 4.1],
            [3.1, 3.1],
            [0.0, 9.1],
            [9.1, 0.0],
        ]);
        let result =
            fast_non_dominated_sort(&objectives, ObjectiveDirection::Maximise, false).unwrap();
        assert_eq!(result.front_indexes[0], vec![0, 4]);
        assert_eq!(result.front_indexes[1], vec![1, 5]);
        assert_eq!(result.front_indexes[2], vec![2]);
        assert_eq!(result.front_indexes[3], vec![3]);
    }

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_3obj() {
        let objectives = fitness_vectors(&[
            [2.1, 3.1, 4.1],
            [-1.1, 4.1, 8.1],
            [0.1, -1.1, -2.1],
            [0.1, 0.1, 0.1],
        ]);
        let result =
            fast_non_dominated_sort(&objectives, ObjectiveDirection::Minimise, false).unwrap();

        assert_eq!(result.front_indexes, vec![vec![1, 2], vec![3], vec![0]]);
        assert_eq!(result.ranks, vec![Some(2), Some(0), Some(0), Some(1)]);
        assert_eq!(result.domination_counter[0], 2);
        assert_eq!(result.domination_counter[3], 1);
    }

    #[test]
    fn test_first_front_only() {
        let objectives = fitness_vectors(&[[1.0, 4.0], [2.0, 5.0], [4.0, 1.0], [3.0, 3.0]]);
        let result =
            fast_non_dominated_sort(&objectives, ObjectiveDirection::Minimise, true).unwrap();
        assert_eq!(result.front_indexes, vec![vec![0, 2, 3]]);
        assert_eq!(result.ranks[1], None);

        assert_eq!(
            non_dominated_front(&objectives, ObjectiveDirection::Minimise).unwrap(),
            vec![0, 2, 3]
        );
    }

    #[test]
    fn test_edge_cases() {
        assert!(fast_non_dominated_sort(&[], ObjectiveDirection::Minimise, false).is_err());
        assert!(fast_non_dominated_sort(
            &[vec![1.0, 2.0], vec![1.0]],
            ObjectiveDirection::Minimise,
            false
        )
        .is_err());

        let single =
            fast_non_dominated_sort(&[vec![1.0, 2.0]], ObjectiveDirection::Minimise, false)
                .unwrap();
        assert_eq!(single.front_indexes, vec![vec![0]]);

        // duplicates are mutually non-dominated
        let duplicates = fitness_vectors(&[[1.0, 1.0], [1.0, 1.0], [2.0, 2.0]]);
        let result =
            fast_non_dominated_sort(&duplicates, ObjectiveDirection::Minimise, false).unwrap();
        assert_eq!(result.front_indexes, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    /// The fronts partition the population and the first front is never dominated, checked on
    /// random populations against a brute-force comparison.
    fn test_partition_and_first_front() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let operator = ParetoDominance::new(ObjectiveDirection::Minimise);
        for _ in 0..50 {
            let size: usize = rng.gen_range(1..40);
            let objectives: Vec<Vec<f64>> = (0..size)
                .map(|_| (0..2).map(|_| rng.gen_range(0..10) as f64).collect())
                .collect();
            let result =
                fast_non_dominated_sort(&objectives, ObjectiveDirection::Minimise, false)
                    .unwrap();

            let mut all: Vec<usize> = result.front_indexes.iter().flatten().copied().collect();
            all.sort();
            assert_eq!(all, (0..size).collect::<Vec<_>>());
            assert!(result.front_indexes.iter().all(|f| !f.is_empty()));

            for p in &result.front_indexes[0] {
                for q in 0..size {
                    assert_ne!(
                        operator.compare(&objectives[q], &objectives[*p]).unwrap(),
                        PreferredSolution::First
                    );
                }
            }

            // a solution is only dominated by solutions in earlier fronts
            for (rank, front) in result.front_indexes.iter().enumerate() {
                for p in front {
                    for q in 0..size {
                        if operator.compare(&objectives[q], &objectives[*p]).unwrap()
                            == PreferredSolution::First
                        {
                            assert!(result.ranks[q].unwrap() < rank);
                        }
                    }
                }
            }
        }
    }
}
