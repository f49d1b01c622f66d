use rand::prelude::SliceRandom;
use rand::seq::index;
use rand::{Rng, RngCore};

use crate::core::OError;
use crate::operators::{BinaryComparisonOperator, PreferredSolution};

/// A trait implementing methods to choose individuals from a population for reproduction.
pub trait Selector {
    /// Select a number of individuals from the population equal to `number_of_winners`. The same
    /// individual may be selected more than once.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The fitness vectors of the population.
    /// * `number_of_winners`: The number of winners to select.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<usize>, OError>` The indexes of the winners.
    fn select(
        &self,
        objectives: &[Vec<f64>],
        number_of_winners: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        let mut winners: Vec<usize> = Vec::with_capacity(number_of_winners);
        for _ in 0..number_of_winners {
            winners.push(self.select_fit_individual(objectives, rng)?);
        }
        Ok(winners)
    }

    /// Select the fittest individual from the population.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The fitness vectors of the population.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<usize, OError>` The index of the winner.
    fn select_fit_individual(
        &self,
        objectives: &[Vec<f64>],
        rng: &mut dyn RngCore,
    ) -> Result<usize, OError>;

    /// Build the mating pool. This selects as many parents as the population size and, when the
    /// size is odd, one more random individual so that parents can be paired.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The fitness vectors of the population.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<usize>, OError>`
    fn mating_pool(
        &self,
        objectives: &[Vec<f64>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, OError> {
        let mut pool = self.select(objectives, objectives.len(), rng)?;
        if pool.len() % 2 != 0 {
            pool.push(rng.gen_range(0..objectives.len()));
        }
        Ok(pool)
    }
}

/// Tournament selection method between multiple competitors for choosing individuals from a
/// population for reproduction. `number_of_competitors` distinct individuals are randomly drawn
/// from the population. The competitors that are not beaten by any other competitor, according to
/// the comparison `operator`, are the candidate winners and one of them is picked at random.
/// More tournaments may be run to select more individuals.
#[derive(Debug, Clone)]
pub struct TournamentSelector<Operator: BinaryComparisonOperator> {
    /// The number of competitors in each tournament. For example, 2 to run a binary tournament.
    number_of_competitors: usize,
    /// The operator to use to determine which individual wins a tournament.
    operator: Operator,
}

impl<Operator: BinaryComparisonOperator> TournamentSelector<Operator> {
    /// Create a new tournament. This returns an error if `number_of_competitors` is 0.
    ///
    /// # Arguments
    ///
    /// * `number_of_competitors`: The number of competitors in the tournament.
    /// * `operator`: The comparison operator.
    ///
    /// returns: `Result<TournamentSelector, OError>`
    pub fn new(number_of_competitors: usize, operator: Operator) -> Result<Self, OError> {
        if number_of_competitors == 0 {
            return Err(OError::InvalidInput(
                "TournamentSelector".to_string(),
                "The tournament needs at least one competitor".to_string(),
            ));
        }
        Ok(Self {
            number_of_competitors,
            operator,
        })
    }

    /// The number of competitors in each tournament.
    pub fn number_of_competitors(&self) -> usize {
        self.number_of_competitors
    }
}

impl<Operator: BinaryComparisonOperator> Selector for TournamentSelector<Operator> {
    fn select_fit_individual(
        &self,
        objectives: &[Vec<f64>],
        rng: &mut dyn RngCore,
    ) -> Result<usize, OError> {
        if objectives.is_empty() {
            return Err(OError::InvalidInput(
                "TournamentSelector".to_string(),
                "The population is empty and no individual can be selected".to_string(),
            ));
        }
        if objectives.len() < self.number_of_competitors {
            return Err(OError::InvalidInput(
                "TournamentSelector".to_string(),
                format!("The population size ({}) is smaller than the number of competitors needed in the tournament ({})", objectives.len(), self.number_of_competitors))
            );
        }

        let competitors = index::sample(rng, objectives.len(), self.number_of_competitors).into_vec();
        let mut candidates: Vec<usize> = Vec::with_capacity(competitors.len());
        for c in competitors.iter() {
            let mut beaten = false;
            for other in competitors.iter().filter(|o| *o != c) {
                if self.operator.compare(&objectives[*c], &objectives[*other])?
                    == PreferredSolution::Second
                {
                    beaten = true;
                    break;
                }
            }
            if !beaten {
                candidates.push(*c);
            }
        }

        // dominance is acyclic so there is always a candidate
        candidates.choose(rng).copied().ok_or_else(|| {
            OError::InconsistentState(
                "TournamentSelector".to_string(),
                "No competitor won the tournament".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::core::test_utils::fitness_vectors;
    use crate::core::ObjectiveDirection;
    use crate::operators::{
        BinaryComparisonOperator, ParetoDominance, PreferredSolution, Selector,
        TournamentSelector,
    };

    #[test]
    /// The dominated individual never wins a binary tournament with two individuals.
    fn test_dominated_never_wins() {
        let objectives = fitness_vectors(&[[1.0, 1.0], [2.0, 2.0]]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let selector =
            TournamentSelector::new(2, ParetoDominance::new(ObjectiveDirection::Minimise)).unwrap();
        for _ in 0..50 {
            assert_eq!(selector.select_fit_individual(&objectives, &mut rng).unwrap(), 0);
        }

        let selector =
            TournamentSelector::new(2, ParetoDominance::new(ObjectiveDirection::Maximise)).unwrap();
        for _ in 0..50 {
            assert_eq!(selector.select_fit_individual(&objectives, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    /// Mutually non-dominated competitors can all win.
    fn test_random_winner_among_candidates() {
        let objectives = fitness_vectors(&[[1.0, 3.0], [3.0, 1.0]]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let selector =
            TournamentSelector::new(2, ParetoDominance::new(ObjectiveDirection::Minimise)).unwrap();
        let winners = selector.select(&objectives, 100, &mut rng).unwrap();
        assert!(winners.contains(&0));
        assert!(winners.contains(&1));
    }

    #[test]
    fn test_invalid_tournament() {
        let objectives = fitness_vectors(&[[1.0, 3.0], [3.0, 1.0]]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(
            TournamentSelector::new(0, ParetoDominance::new(ObjectiveDirection::Minimise)).is_err()
        );
        let selector =
            TournamentSelector::new(3, ParetoDominance::new(ObjectiveDirection::Minimise)).unwrap();
        assert!(selector.select_fit_individual(&objectives, &mut rng).is_err());
        assert!(selector.select_fit_individual(&[], &mut rng).is_err());
    }

    #[test]
    /// A tournament with one competitor returns a random individual.
    fn test_single_competitor() {
        let objectives = fitness_vectors(&[[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let selector =
            TournamentSelector::new(1, ParetoDominance::new(ObjectiveDirection::Minimise)).unwrap();
        let winners = selector.select(&objectives, 200, &mut rng).unwrap();
        for i in 0..3 {
            assert!(winners.contains(&i));
        }
    }

    #[test]
    /// The winner is never dominated by the other competitors. With a tournament as large as the
    /// population, the winner must be in the first front.
    fn test_winner_validity() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let op = ParetoDominance::new(ObjectiveDirection::Minimise);
        for _ in 0..100 {
            let size: usize = rng.gen_range(1..15);
            let objectives: Vec<Vec<f64>> = (0..size)
                .map(|_| (0..2).map(|_| rng.gen_range(0..5) as f64).collect())
                .collect();
            let selector = TournamentSelector::new(size, op).unwrap();
            let winner = selector.select_fit_individual(&objectives, &mut rng).unwrap();
            for other in objectives.iter() {
                assert_ne!(
                    op.compare(&objectives[winner], other).unwrap(),
                    PreferredSolution::Second
                );
            }
        }
    }

    #[test]
    /// The mating pool always has an even size.
    fn test_mating_pool_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let selector =
            TournamentSelector::new(2, ParetoDominance::new(ObjectiveDirection::Minimise)).unwrap();
        for size in 2..12 {
            let objectives: Vec<Vec<f64>> = (0..size)
                .map(|_| (0..2).map(|_| rng.gen_range(0.0..10.0)).collect())
                .collect();
            let pool = selector.mating_pool(&objectives, &mut rng).unwrap();
            assert_eq!(pool.len(), size + size % 2);
            assert!(pool.iter().all(|i| *i < size));
        }
    }
}
