use rand::seq::index;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{Individual, OError};

/// The trait to implement a mutation operator to modify the genetic material of an individual.
pub trait Mutation {
    /// Mutate a population individual.
    ///
    /// # Arguments
    ///
    /// * `individual`: The individual to mutate.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Individual, OError>`. The mutated individual.
    fn mutate_offspring(
        &self,
        individual: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<Individual, OError>;
}

/// Move a random segment of `genes` to a random position. Two distinct positions delimit the
/// segment (both included); the segment is removed and inserted back anywhere in the remaining
/// genes, including at either end. The length and the multiset of the genes never change.
/// Sequences with less than two genes are returned unchanged.
///
/// # Arguments
///
/// * `genes`: The genes to rearrange.
/// * `rng`: The random number generator.
///
/// returns: `Vec<T>`
pub fn displace_segment<T: Clone>(genes: &[T], rng: &mut dyn RngCore) -> Vec<T> {
    if genes.len() < 2 {
        return genes.to_vec();
    }

    let mut bounds = index::sample(rng, genes.len(), 2).into_vec();
    bounds.sort();
    let (start, end) = (bounds[0], bounds[1]);
    let segment = &genes[start..=end];

    let mut rest: Vec<T> = Vec::with_capacity(genes.len());
    rest.extend_from_slice(&genes[..start]);
    rest.extend_from_slice(&genes[end + 1..]);

    let position = rng.gen_range(0..=rest.len());
    let mut mutated = Vec::with_capacity(genes.len());
    mutated.extend_from_slice(&rest[..position]);
    mutated.extend_from_slice(segment);
    mutated.extend_from_slice(&rest[position..]);
    mutated
}

/// Input arguments for [`SegmentDisplacement`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SegmentDisplacementArgs {
    /// The probability of mutating an offspring.
    pub mutation_probability: f64,
}

impl Default for SegmentDisplacementArgs {
    /// Mutate 10% of the offsprings.
    fn default() -> Self {
        Self {
            mutation_probability: 0.1,
        }
    }
}

/// The segment-displacement mutation operator. With probability `mutation_probability`, a segment
/// of the chromosome is moved to another position with [`displace_segment`].
#[derive(Debug, Clone)]
pub struct SegmentDisplacement {
    /// The probability of mutating an offspring.
    mutation_probability: f64,
}

impl SegmentDisplacement {
    /// Initialise the operator. This returns an error if the probability is outside the [0, 1]
    /// range.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters.
    ///
    /// returns: `Result<SegmentDisplacement, OError>`
    pub fn new(args: SegmentDisplacementArgs) -> Result<Self, OError> {
        if !(0.0..=1.0).contains(&args.mutation_probability) {
            return Err(OError::InvalidInput(
                "SegmentDisplacement".to_string(),
                format!(
                    "The mutation probability {} must be a number between 0 and 1",
                    args.mutation_probability
                ),
            ));
        }
        Ok(Self {
            mutation_probability: args.mutation_probability,
        })
    }

    /// Mutate a chromosome. This returns `None` when the chromosome is not mutated.
    ///
    /// # Arguments
    ///
    /// * `chromosome`: The chromosome.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Option<Vec<usize>>`
    pub fn mutate_chromosome(
        &self,
        chromosome: &[usize],
        rng: &mut dyn RngCore,
    ) -> Option<Vec<usize>> {
        if rng.gen_range(0.0..1.0) >= self.mutation_probability || chromosome.len() < 2 {
            return None;
        }
        Some(displace_segment(chromosome, rng))
    }
}

impl Mutation for SegmentDisplacement {
    fn mutate_offspring(
        &self,
        individual: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<Individual, OError> {
        match self.mutate_chromosome(individual.chromosome(), rng) {
            Some(chromosome) if chromosome != individual.chromosome() => {
                individual.with_chromosome(chromosome)
            }
            _ => Ok(individual.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::core::test_utils::{scenario_chromosome, scenario_problem};
    use crate::core::{Evaluator, Individual};
    use crate::operators::{
        displace_segment, Mutation, SegmentDisplacement, SegmentDisplacementArgs,
    };

    #[test]
    fn test_new_invalid_probability() {
        assert!(SegmentDisplacement::new(SegmentDisplacementArgs {
            mutation_probability: -0.1
        })
        .is_err());
        assert!(SegmentDisplacement::new(SegmentDisplacementArgs {
            mutation_probability: 1.1
        })
        .is_err());
    }

    #[test]
    /// The length and the multiset of genes are unchanged.
    fn test_displacement_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..300 {
            let length: usize = rng.gen_range(0..20);
            let genes: Vec<usize> = (0..length).map(|_| rng.gen_range(1..5)).collect();
            let mutated = displace_segment(&genes, &mut rng);
            assert_eq!(mutated.len(), genes.len());

            let mut sorted_genes = genes.clone();
            sorted_genes.sort();
            let mut sorted_mutated = mutated.clone();
            sorted_mutated.sort();
            assert_eq!(sorted_genes, sorted_mutated);
        }
    }

    #[test]
    /// The genes outside the moved segment keep their relative order.
    fn test_displacement_keeps_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let genes: Vec<usize> = (0..10).collect();
        for _ in 0..100 {
            let mutated = displace_segment(&genes, &mut rng);
            // the moved segment is contiguous and ascending, and so is the rest. At most one
            // descent can be created at each end of the segment
            let descents = mutated.windows(2).filter(|w| w[1] < w[0]).count();
            assert!(descents <= 2);
        }
    }

    #[test]
    fn test_short_chromosome() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        assert_eq!(displace_segment(&[7], &mut rng), vec![7]);
        assert!(displace_segment::<usize>(&[], &mut rng).is_empty());

        let mutation = SegmentDisplacement::new(SegmentDisplacementArgs {
            mutation_probability: 1.0,
        })
        .unwrap();
        assert!(mutation.mutate_chromosome(&[1], &mut rng).is_none());
        assert!(mutation.mutate_chromosome(&[1, 2], &mut rng).is_some());
    }

    #[test]
    /// The mutated offspring is re-evaluated.
    fn test_mutate_offspring() {
        let problem = Arc::new(scenario_problem());
        let individual = Individual::new(scenario_chromosome(), problem.clone()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(24);

        let mutation = SegmentDisplacement::new(SegmentDisplacementArgs {
            mutation_probability: 1.0,
        })
        .unwrap();
        for _ in 0..20 {
            let mutated = mutation.mutate_offspring(&individual, &mut rng).unwrap();
            assert_eq!(mutated.chromosome().len(), 9);
            assert_eq!(
                mutated.fitness(),
                problem.evaluate(mutated.chromosome()).unwrap()
            );
        }

        let mutation = SegmentDisplacement::new(SegmentDisplacementArgs {
            mutation_probability: 0.0,
        })
        .unwrap();
        let mutated = mutation.mutate_offspring(&individual, &mut rng).unwrap();
        assert_eq!(mutated.chromosome(), individual.chromosome());
    }
}
