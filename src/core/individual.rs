use std::fmt::{Display, Formatter};
use std::sync::Arc;

use rand::{Rng, RngCore};
use rayon::prelude::*;
use serde::Serialize;

use crate::core::{Evaluator, OError};

/// Generate a chromosome of `length` genes, each drawn uniformly in the `[lower, upper]` range.
/// This returns an error if `lower` is larger than `upper`.
///
/// # Arguments
///
/// * `length`: The number of genes.
/// * `lower`: The smallest gene value.
/// * `upper`: The largest gene value.
/// * `rng`: The random number generator.
///
/// returns: `Result<Vec<usize>, OError>`
pub fn random_chromosome(
    length: usize,
    lower: usize,
    upper: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<usize>, OError> {
    if lower > upper {
        return Err(OError::InvalidInput(
            "random chromosome".to_string(),
            format!("The lower bound ({lower}) cannot be larger than the upper bound ({upper})"),
        ));
    }
    Ok((0..length).map(|_| rng.gen_range(lower..=upper)).collect())
}

/// An individual in the population containing a chromosome and its fitness vector.
///
/// The fitness is calculated with the evaluator when the individual is created and cannot be
/// changed independently: use [`Individual::with_chromosome`] to get a new individual with a
/// different chromosome.
#[derive(Debug, Clone)]
pub struct Individual {
    /// The machine assigned to each operation.
    chromosome: Vec<usize>,
    /// The objective values.
    fitness: Vec<f64>,
    /// The evaluator used to calculate the fitness.
    evaluator: Arc<dyn Evaluator>,
}

/// Serialisable data of an [`Individual`].
#[derive(Serialize, Debug)]
pub struct IndividualExport {
    /// The chromosome.
    pub chromosome: Vec<usize>,
    /// The objective values.
    pub objectives: Vec<f64>,
}

impl Display for Individual {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Individual(chromosome={:?}, fitness={:?})",
            self.chromosome, self.fitness
        )
    }
}

impl Individual {
    /// Create a new individual and evaluate its fitness. This returns an error if the evaluator
    /// fails, returns the wrong number of objectives or a NaN.
    ///
    /// # Arguments
    ///
    /// * `chromosome`: The chromosome.
    /// * `evaluator`: The evaluator to calculate the fitness with.
    ///
    /// returns: `Result<Individual, OError>`
    pub fn new(chromosome: Vec<usize>, evaluator: Arc<dyn Evaluator>) -> Result<Self, OError> {
        let fitness = evaluator.evaluate(&chromosome)?;
        let names = evaluator.objective_names();
        if fitness.len() != names.len() {
            return Err(OError::Evaluation(format!(
                "The evaluator returned {} objective values, but {} are expected",
                fitness.len(),
                names.len()
            )));
        }
        if let Some((_, name)) = fitness.iter().zip(&names).find(|(v, _)| v.is_nan()) {
            return Err(OError::NaN("objective".to_string(), name.clone()));
        }

        Ok(Self {
            chromosome,
            fitness,
            evaluator,
        })
    }

    /// Get a new individual with a different chromosome. The fitness is recalculated.
    ///
    /// # Arguments
    ///
    /// * `chromosome`: The new chromosome.
    ///
    /// returns: `Result<Individual, OError>`
    pub fn with_chromosome(&self, chromosome: Vec<usize>) -> Result<Self, OError> {
        Self::new(chromosome, self.evaluator.clone())
    }

    /// The chromosome.
    pub fn chromosome(&self) -> &[usize] {
        &self.chromosome
    }

    /// The fitness vector.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// The evaluator used to calculate the fitness.
    pub fn evaluator(&self) -> Arc<dyn Evaluator> {
        self.evaluator.clone()
    }

    /// Serialise the individual.
    pub fn serialise(&self) -> IndividualExport {
        IndividualExport {
            chromosome: self.chromosome.clone(),
            objectives: self.fitness.clone(),
        }
    }
}

/// Evaluate a batch of chromosomes, optionally in threads.
///
/// # Arguments
///
/// * `chromosomes`: The chromosomes.
/// * `evaluator`: The evaluator.
/// * `parallel`: Whether to run the evaluations with rayon.
///
/// returns: `Result<Vec<Individual>, OError>`
pub fn evaluate_chromosomes(
    chromosomes: Vec<Vec<usize>>,
    evaluator: &Arc<dyn Evaluator>,
    parallel: bool,
) -> Result<Vec<Individual>, OError> {
    if parallel {
        chromosomes
            .into_par_iter()
            .map(|c| Individual::new(c, evaluator.clone()))
            .collect()
    } else {
        chromosomes
            .into_iter()
            .map(|c| Individual::new(c, evaluator.clone()))
            .collect()
    }
}

/// The population with the individuals.
#[derive(Debug, Default, Clone)]
pub struct Population(Vec<Individual>);

impl Population {
    /// Initialise an empty population.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a population from existing individuals.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The individuals.
    ///
    /// returns: `Population`
    pub fn new_with(individuals: Vec<Individual>) -> Self {
        Self(individuals)
    }

    /// Create a population of `size` random individuals. Each gene is a random value in
    /// `[lower, upper]`.
    ///
    /// # Arguments
    ///
    /// * `evaluator`: The evaluator.
    /// * `chromosome_length`: The number of genes.
    /// * `bounds`: The gene bounds.
    /// * `size`: The number of individuals.
    /// * `parallel`: Whether to evaluate the individuals in threads.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Population, OError>`
    pub fn init(
        evaluator: Arc<dyn Evaluator>,
        chromosome_length: usize,
        bounds: (usize, usize),
        size: usize,
        parallel: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Self, OError> {
        let chromosomes = (0..size)
            .map(|_| random_chromosome(chromosome_length, bounds.0, bounds.1, rng))
            .collect::<Result<Vec<_>, OError>>()?;
        Ok(Self(evaluate_chromosomes(chromosomes, &evaluator, parallel)?))
    }

    /// The individuals.
    pub fn individuals(&self) -> &[Individual] {
        &self.0
    }

    /// The fitness vectors of all individuals.
    pub fn objectives(&self) -> Vec<Vec<f64>> {
        self.0.iter().map(|i| i.fitness.clone()).collect()
    }

    /// Add new individuals to the population.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The individuals to add.
    pub fn add_new_individuals(&mut self, individuals: Vec<Individual>) {
        self.0.extend(individuals)
    }

    /// Build a new population with the individuals at the given indexes. This returns an error
    /// if an index does not exist.
    ///
    /// # Arguments
    ///
    /// * `indexes`: The indexes of the individuals to keep.
    ///
    /// returns: `Result<Population, OError>`
    pub fn select(&self, indexes: &[usize]) -> Result<Self, OError> {
        let mut individuals = Vec::with_capacity(indexes.len());
        for idx in indexes {
            let individual = self.0.get(*idx).ok_or_else(|| {
                OError::InconsistentState(
                    "population".to_string(),
                    format!("The individual index {idx} does not exist"),
                )
            })?;
            individuals.push(individual.clone());
        }
        Ok(Self(individuals))
    }

    /// The population size.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialise the individuals.
    pub fn serialise(&self) -> Vec<IndividualExport> {
        self.0.iter().map(|i| i.serialise()).collect()
    }
}
