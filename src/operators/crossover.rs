use rand::seq::index;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{Individual, OError};

/// Struct containing the offsprings from the crossover operation.
#[derive(Debug)]
pub struct CrossoverChildren {
    /// The first generated child.
    pub child1: Individual,
    /// The second generated child.
    pub child2: Individual,
}

/// Trait to define a crossover operator to generate a new child by recombining the genetic
/// material of two parents.
pub trait Crossover {
    /// Generate two children from their parents.
    ///
    /// # Arguments
    ///
    /// * `parent1`: The first parent to use for mating.
    /// * `parent2`: The second parent to use for mating.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<CrossoverChildren, OError>`.
    fn generate_offsprings(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<CrossoverChildren, OError>;
}

/// Draw `number_of_points` distinct cut points in `[1, length - 1]`, sorted in ascending order.
/// The ends of the sequence are never used as cut points, so every segment is non-empty.
fn cut_points(
    length: usize,
    number_of_points: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<usize>, OError> {
    if number_of_points < 1 || number_of_points >= length {
        return Err(OError::InvalidInput(
            "n-point crossover".to_string(),
            format!(
                "The number of cut points ({number_of_points}) must be between 1 and {}",
                length.saturating_sub(1)
            ),
        ));
    }
    let mut points: Vec<usize> = index::sample(rng, length - 1, number_of_points)
        .into_iter()
        .map(|p| p + 1)
        .collect();
    points.sort();
    Ok(points)
}

/// Build two children by alternating the parents' segments between the given cut points. The
/// first segment of `child1` comes from `parent1`.
fn alternate_segments<T: Clone>(parent1: &[T], parent2: &[T], points: &[usize]) -> (Vec<T>, Vec<T>) {
    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent2.len());
    let mut bounds = Vec::with_capacity(points.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(points);
    bounds.push(parent1.len());

    for (segment, window) in bounds.windows(2).enumerate() {
        let (start, end) = (window[0], window[1]);
        if segment % 2 == 0 {
            child1.extend_from_slice(&parent1[start..end]);
            child2.extend_from_slice(&parent2[start..end]);
        } else {
            child1.extend_from_slice(&parent2[start..end]);
            child2.extend_from_slice(&parent1[start..end]);
        }
    }
    (child1, child2)
}

/// Check that the two parents have the same rows, all with the same length. This returns the row
/// length.
fn check_rows<T>(parent1: &[Vec<T>], parent2: &[Vec<T>]) -> Result<usize, OError> {
    if parent1.len() != parent2.len() {
        return Err(OError::InvalidInput(
            "n-point crossover".to_string(),
            format!(
                "The parents must have the same number of rows, but {} and {} given",
                parent1.len(),
                parent2.len()
            ),
        ));
    }
    let row_length = parent1.first().map_or(0, |r| r.len());
    if parent1
        .iter()
        .chain(parent2.iter())
        .any(|r| r.len() != row_length)
    {
        return Err(OError::InvalidInput(
            "n-point crossover".to_string(),
            "All the parents' rows must have the same length".to_string(),
        ));
    }
    Ok(row_length)
}

/// Flat n-point crossover. `number_of_points` sorted cut points split the parents into segments
/// that alternately go to the two children.
///
/// This returns an error if the parents have a different length or if `number_of_points` is not
/// between 1 and the parents' length minus 1.
///
/// # Arguments
///
/// * `parent1`: The first parent.
/// * `parent2`: The second parent.
/// * `number_of_points`: The number of cut points.
/// * `rng`: The random number generator.
///
/// returns: `Result<(Vec<T>, Vec<T>), OError>`
pub fn n_point_crossover<T: Clone>(
    parent1: &[T],
    parent2: &[T],
    number_of_points: usize,
    rng: &mut dyn RngCore,
) -> Result<(Vec<T>, Vec<T>), OError> {
    if parent1.len() != parent2.len() {
        return Err(OError::InvalidInput(
            "n-point crossover".to_string(),
            format!(
                "The parents must have the same length, but {} and {} given",
                parent1.len(),
                parent2.len()
            ),
        ));
    }
    let points = cut_points(parent1.len(), number_of_points, rng)?;
    Ok(alternate_segments(parent1, parent2, &points))
}

/// Column-aligned n-point crossover for parents made of parallel rows of the same length. One set
/// of cut points is drawn and shared by all rows, so every row swaps the same columns.
///
/// # Arguments
///
/// * `parent1`: The rows of the first parent.
/// * `parent2`: The rows of the second parent.
/// * `number_of_points`: The number of cut points.
/// * `rng`: The random number generator.
///
/// returns: `Result<(Vec<Vec<T>>, Vec<Vec<T>>), OError>`
pub fn column_aligned_crossover<T: Clone>(
    parent1: &[Vec<T>],
    parent2: &[Vec<T>],
    number_of_points: usize,
    rng: &mut dyn RngCore,
) -> Result<(Vec<Vec<T>>, Vec<Vec<T>>), OError> {
    let row_length = check_rows(parent1, parent2)?;
    let points = cut_points(row_length, number_of_points, rng)?;
    Ok(parent1
        .iter()
        .zip(parent2)
        .map(|(r1, r2)| alternate_segments(r1, r2, &points))
        .unzip())
}

/// Row-independent n-point crossover for parents made of parallel rows of the same length. New cut
/// points are drawn for every row.
///
/// # Arguments
///
/// * `parent1`: The rows of the first parent.
/// * `parent2`: The rows of the second parent.
/// * `number_of_points`: The number of cut points in each row.
/// * `rng`: The random number generator.
///
/// returns: `Result<(Vec<Vec<T>>, Vec<Vec<T>>), OError>`
pub fn row_independent_crossover<T: Clone>(
    parent1: &[Vec<T>],
    parent2: &[Vec<T>],
    number_of_points: usize,
    rng: &mut dyn RngCore,
) -> Result<(Vec<Vec<T>>, Vec<Vec<T>>), OError> {
    let row_length = check_rows(parent1, parent2)?;
    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent2.len());
    for (r1, r2) in parent1.iter().zip(parent2) {
        let points = cut_points(row_length, number_of_points, rng)?;
        let (c1, c2) = alternate_segments(r1, r2, &points);
        child1.push(c1);
        child2.push(c2);
    }
    Ok((child1, child2))
}

/// How the chromosome is cut by [`NPointCrossover`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub enum CrossoverStrategy {
    /// The chromosome is a single sequence.
    #[default]
    Flat,
    /// The chromosome is viewed as consecutive rows of `row_length` genes, cut at the same
    /// columns.
    ColumnAligned { row_length: usize },
    /// The chromosome is viewed as consecutive rows of `row_length` genes, each cut at different
    /// positions.
    RowIndependent { row_length: usize },
}

/// Input arguments for [`NPointCrossover`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NPointCrossoverArgs {
    /// The probability that the parents participate in the crossover. If 1.0, the parents always
    /// participate in the crossover. If the probability is lower, then the children may be the
    /// exact clones of their parents.
    pub crossover_probability: f64,
    /// The number of cut points.
    pub number_of_points: usize,
    /// How the chromosome is cut.
    pub strategy: CrossoverStrategy,
}

impl Default for NPointCrossoverArgs {
    /// Default parameters for the n-point crossover with a crossover probability of 0.9 and one
    /// cut point on the flat chromosome.
    fn default() -> Self {
        Self {
            crossover_probability: 0.9,
            number_of_points: 1,
            strategy: CrossoverStrategy::Flat,
        }
    }
}

/// The n-point crossover operator for the machine-assignment chromosome. Children never contain a
/// gene that was not at the same position in one of their parents.
///
/// # Example
///
/// ```
/// use std::error::Error;
/// use std::sync::Arc;
///
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use paretoshop::core::{Individual, ShopProblem};
/// use paretoshop::operators::{Crossover, CrossoverStrategy, NPointCrossover, NPointCrossoverArgs};
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     let problem = Arc::new(ShopProblem::new(
///         vec![vec![2.0, 4.0], vec![3.0, 1.0]],
///         vec![vec![1.0, 2.0], vec![2.0, 5.0]],
///         vec![vec![1, 2], vec![2, 1]],
///     )?);
///     let a = Individual::new(vec![1, 1, 1, 1], problem.clone())?;
///     let b = Individual::new(vec![2, 2, 2, 2], problem.clone())?;
///
///     let args = NPointCrossoverArgs {
///         crossover_probability: 1.0,
///         number_of_points: 1,
///         strategy: CrossoverStrategy::ColumnAligned { row_length: 2 },
///     };
///     let crossover = NPointCrossover::new(args)?;
///     let mut rng = ChaCha8Rng::from_seed(Default::default());
///     let out = crossover.generate_offsprings(&a, &b, &mut rng)?;
///     assert_eq!(out.child1.chromosome(), &[1, 2, 1, 2]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NPointCrossover {
    /// The probability that the parents participate in the crossover.
    crossover_probability: f64,
    /// The number of cut points.
    number_of_points: usize,
    /// How the chromosome is cut.
    strategy: CrossoverStrategy,
}

impl NPointCrossover {
    /// Initialise the n-point crossover operator. This returns an error if the probability is
    /// outside the [0, 1] range, no cut point is requested or a row length is 0.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator input parameters. See [`NPointCrossoverArgs`].
    ///
    /// returns: `Result<NPointCrossover, OError>`
    pub fn new(args: NPointCrossoverArgs) -> Result<Self, OError> {
        let name = "NPointCrossover".to_string();
        if !(0.0..=1.0).contains(&args.crossover_probability) {
            return Err(OError::InvalidInput(
                name,
                format!(
                    "The crossover probability {} must be a number between 0 and 1",
                    args.crossover_probability
                ),
            ));
        }
        if args.number_of_points == 0 {
            return Err(OError::InvalidInput(
                name,
                "At least one cut point is needed".to_string(),
            ));
        }
        if let CrossoverStrategy::ColumnAligned { row_length }
        | CrossoverStrategy::RowIndependent { row_length } = args.strategy
        {
            if row_length == 0 {
                return Err(OError::InvalidInput(
                    name,
                    "The row length must be larger than 0".to_string(),
                ));
            }
        }

        Ok(Self {
            crossover_probability: args.crossover_probability,
            number_of_points: args.number_of_points,
            strategy: args.strategy,
        })
    }

    /// The crossover strategy.
    pub fn strategy(&self) -> CrossoverStrategy {
        self.strategy
    }

    /// Recombine two chromosomes. With probability `1 - crossover_probability` the children are
    /// copies of the parents.
    ///
    /// # Arguments
    ///
    /// * `parent1`: The first chromosome.
    /// * `parent2`: The second chromosome.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<(Vec<usize>, Vec<usize>), OError>`
    pub fn crossover_chromosomes(
        &self,
        parent1: &[usize],
        parent2: &[usize],
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<usize>, Vec<usize>), OError> {
        // do not apply crossover if probability is not reached
        if rng.gen_range(0.0..1.0) >= self.crossover_probability {
            return Ok((parent1.to_vec(), parent2.to_vec()));
        }

        match self.strategy {
            CrossoverStrategy::Flat => {
                n_point_crossover(parent1, parent2, self.number_of_points, rng)
            }
            CrossoverStrategy::ColumnAligned { row_length } => {
                let (c1, c2) = column_aligned_crossover(
                    &to_rows(parent1, row_length)?,
                    &to_rows(parent2, row_length)?,
                    self.number_of_points,
                    rng,
                )?;
                Ok((c1.concat(), c2.concat()))
            }
            CrossoverStrategy::RowIndependent { row_length } => {
                let (c1, c2) = row_independent_crossover(
                    &to_rows(parent1, row_length)?,
                    &to_rows(parent2, row_length)?,
                    self.number_of_points,
                    rng,
                )?;
                Ok((c1.concat(), c2.concat()))
            }
        }
    }
}

/// Split a flat chromosome into rows of `row_length` genes.
fn to_rows(chromosome: &[usize], row_length: usize) -> Result<Vec<Vec<usize>>, OError> {
    if row_length == 0 || chromosome.len() % row_length != 0 {
        return Err(OError::InvalidInput(
            "NPointCrossover".to_string(),
            format!(
                "The chromosome length ({}) is not a multiple of the row length ({row_length})",
                chromosome.len()
            ),
        ));
    }
    Ok(chromosome.chunks(row_length).map(|r| r.to_vec()).collect())
}

impl Crossover for NPointCrossover {
    fn generate_offsprings(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        rng: &mut dyn RngCore,
    ) -> Result<CrossoverChildren, OError> {
        let (c1, c2) = self.crossover_chromosomes(parent1.chromosome(), parent2.chromosome(), rng)?;
        let child1 = if c1 == parent1.chromosome() {
            parent1.clone()
        } else {
            parent1.with_chromosome(c1)?
        };
        let child2 = if c2 == parent2.chromosome() {
            parent2.clone()
        } else {
            parent2.with_chromosome(c2)?
        };
        Ok(CrossoverChildren { child1, child2 })
    }
}
