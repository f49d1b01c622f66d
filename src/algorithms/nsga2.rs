use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, info};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::algorithms::{Algorithm, StoppingConditionType};
use crate::core::utils::get_rng;
use crate::core::{
    evaluate_chromosomes, Evaluator, Individual, OError, ObjectiveDirection, Population,
    ShopProblem,
};
use crate::operators::{
    select_survivors, CrossoverStrategy, NPointCrossover, NPointCrossoverArgs, ParetoDominance,
    SegmentDisplacement, SegmentDisplacementArgs, Selector, SurvivalResults, TournamentSelector,
};
use crate::utils::fast_non_dominated_sort;

/// Input arguments for the NSGA2 algorithm.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NSGA2Arg {
    /// The number of individuals to use in the population. This must be at least `2`.
    pub number_of_individuals: usize,
    /// The number of competitors in each tournament used to select the parents. This defaults to
    /// `2` (binary tournament) and cannot exceed the population size.
    pub tournament_size: Option<usize>,
    /// The options of the n-point crossover operator. This defaults to
    /// [`NPointCrossoverArgs::default()`].
    pub crossover_operator_options: Option<NPointCrossoverArgs>,
    /// The options of the segment-displacement mutation operator. This defaults to
    /// [`SegmentDisplacementArgs::default()`].
    pub mutation_operator_options: Option<SegmentDisplacementArgs>,
    /// Whether the objectives are minimised or maximised.
    #[serde(default)]
    pub direction: ObjectiveDirection,
    /// The condition to use when to terminate the algorithm.
    pub stopping_condition: StoppingConditionType,
    /// Whether the objective should be evaluated using threads. This defaults to `true`.
    pub parallel: Option<bool>,
    /// The seed used in the random number generator (RNG). You can specify a seed in case you want
    /// to try to reproduce results.
    pub seed: Option<u64>,
}

/// The Non-dominated Sorting Genetic Algorithm (NSGA2) for the machine-assignment problem.
///
/// Implemented based on:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// See: <https://doi.org/10.1109/4235.996017>.
///
/// # Example
/// ```rust
/// use std::error::Error;
///
/// use paretoshop::algorithms::{Algorithm, MaxGenerationValue, NSGA2Arg, StoppingConditionType, NSGA2};
/// use paretoshop::core::{ObjectiveDirection, ShopProblem};
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     let problem = ShopProblem::new(
///         vec![vec![2.0, 4.0], vec![3.0, 1.0]],
///         vec![vec![1.0, 2.0], vec![2.0, 5.0]],
///         vec![vec![1, 2], vec![2, 1]],
///     )?;
///     let args = NSGA2Arg {
///         number_of_individuals: 10,
///         tournament_size: None,
///         crossover_operator_options: None,
///         mutation_operator_options: None,
///         direction: ObjectiveDirection::Minimise,
///         stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(20)),
///         parallel: Some(false),
///         seed: Some(10),
///     };
///     let mut algo = NSGA2::new(problem, args)?;
///     algo.run()?;
///     for individual in algo.pareto_front() {
///         println!("{individual}");
///     }
///     Ok(())
/// }
/// ```
pub struct NSGA2 {
    /// The number of individuals in the population.
    number_of_individuals: usize,
    /// The problem being solved.
    problem: Arc<ShopProblem>,
    /// The problem as fitness evaluator.
    evaluator: Arc<dyn Evaluator>,
    /// The evolved population.
    population: Population,
    /// Whether the objectives are minimised or maximised.
    direction: ObjectiveDirection,
    /// The operator to use to select the individuals for reproduction. This is a tournament
    /// selector ([`TournamentSelector`]) with the [`ParetoDominance`] comparison operator.
    selector_operator: TournamentSelector<ParetoDominance>,
    /// The operator to use to generate new children by recombining the chromosome of two parents.
    crossover_operator: NPointCrossover,
    /// The operator to use to mutate the chromosome of a child.
    mutation_operator: SegmentDisplacement,
    /// The number of evolved generations.
    generation: usize,
    /// The condition to use when to terminate the algorithm.
    stopping_condition: StoppingConditionType,
    /// The time when the algorithm started.
    start_time: DateTime<Local>,
    /// Whether the evaluation should be performed using threads.
    parallel: bool,
    /// The fronts of the current population.
    front_indexes: Vec<Vec<usize>>,
    /// The results of the last survivor selection.
    survival_results: Option<SurvivalResults>,
    /// The random number generator.
    rng: Box<dyn RngCore>,
    /// The algorithm options.
    args: NSGA2Arg,
}

impl NSGA2 {
    /// Initialise the NSGA2 algorithm. This returns an error if an option is not valid for the
    /// problem.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem being solved.
    /// * `options`: The [`NSGA2Arg`] arguments to customise the algorithm behaviour.
    ///
    /// returns: `Result<NSGA2, OError>`.
    pub fn new(problem: ShopProblem, options: NSGA2Arg) -> Result<Self, OError> {
        let name = "NSGA2".to_string();
        if options.number_of_individuals < 2 {
            return Err(OError::AlgorithmInit(
                name,
                "The population size must have at least 2 individuals".to_string(),
            ));
        }

        let tournament_size = options.tournament_size.unwrap_or(2);
        if tournament_size < 1 || tournament_size > options.number_of_individuals {
            return Err(OError::AlgorithmInit(
                name,
                format!(
                    "The tournament size ({tournament_size}) must be between 1 and the population size ({})",
                    options.number_of_individuals
                ),
            ));
        }
        let selector_operator =
            TournamentSelector::new(tournament_size, ParetoDominance::new(options.direction))?;

        let crossover_options = options.crossover_operator_options.clone().unwrap_or_default();
        let crossover_operator = NPointCrossover::new(crossover_options.clone())?;
        let chromosome_length = problem.chromosome_length();
        let cut_length = match crossover_options.strategy {
            CrossoverStrategy::Flat => chromosome_length,
            CrossoverStrategy::ColumnAligned { row_length }
            | CrossoverStrategy::RowIndependent { row_length } => {
                if chromosome_length % row_length != 0 {
                    return Err(OError::AlgorithmInit(
                        name,
                        format!("The chromosome length ({chromosome_length}) is not a multiple of the crossover row length ({row_length})"),
                    ));
                }
                row_length
            }
        };
        if crossover_options.number_of_points >= cut_length {
            return Err(OError::AlgorithmInit(
                name,
                format!(
                    "The number of crossover points ({}) must be smaller than {cut_length}",
                    crossover_options.number_of_points
                ),
            ));
        }

        let mutation_options = options.mutation_operator_options.clone().unwrap_or_default();
        let mutation_operator = SegmentDisplacement::new(mutation_options.clone())?;

        info!(
            "{}",
            Self::algorithm_option_str(
                &problem,
                &options,
                tournament_size,
                &crossover_options,
                &mutation_options
            )
        );

        let problem = Arc::new(problem);
        Ok(Self {
            number_of_individuals: options.number_of_individuals,
            evaluator: problem.clone(),
            problem,
            population: Population::new(),
            direction: options.direction,
            selector_operator,
            crossover_operator,
            mutation_operator,
            generation: 0,
            stopping_condition: options.stopping_condition.clone(),
            start_time: Local::now(),
            parallel: options.parallel.unwrap_or(true),
            front_indexes: Vec::new(),
            survival_results: None,
            rng: get_rng(options.seed),
            args: options,
        })
    }

    /// Get a string listing the algorithm options.
    ///
    /// # Arguments
    ///
    /// * `problem`: The problem.
    /// * `options`: The algorithm options.
    /// * `tournament_size`: The number of competitors in each tournament.
    /// * `crossover_options`: The crossover operator options.
    /// * `mutation_options`: The mutation operator options.
    ///
    /// returns: `String`
    pub fn algorithm_option_str(
        problem: &ShopProblem,
        options: &NSGA2Arg,
        tournament_size: usize,
        crossover_options: &NPointCrossoverArgs,
        mutation_options: &SegmentDisplacementArgs,
    ) -> String {
        let mut log_opts: String = "Algorithm options are:\n".to_owned();
        log_opts.push_str(
            format!(
                "\t* Number of tasks {:>17}\n\t* Number of operations {:>12}\n\t* Number of machines {:>14}\n",
                problem.number_of_tasks(),
                problem.number_of_operations(),
                problem.number_of_machines()
            )
            .as_str(),
        );
        log_opts.push_str(
            format!(
                "\t* Population size {:>17}\n\t* Tournament size {:>17}\n\t* Direction {:>23}\n",
                options.number_of_individuals, tournament_size, options.direction
            )
            .as_str(),
        );
        log_opts.push_str(
            format!(
                "\t* Crossover probability {:>11}\n\t* Crossover points {:>16}\n\t* Crossover strategy {:>14?}\n",
                crossover_options.crossover_probability,
                crossover_options.number_of_points,
                crossover_options.strategy,
            )
            .as_str(),
        );
        log_opts.push_str(
            format!(
                "\t* Mutation probability {:>12}",
                mutation_options.mutation_probability
            )
            .as_str(),
        );
        log_opts
    }

    /// The options used to create the algorithm.
    pub fn args(&self) -> &NSGA2Arg {
        &self.args
    }

    /// The results of the survivor selection at the last generation. The indexes refer to the
    /// combined population of parents and offsprings. This is `None` before the first evolution.
    pub fn survival_results(&self) -> Option<&SurvivalResults> {
        self.survival_results.as_ref()
    }

    /// The individuals in the first non-dominated front of the current population.
    ///
    /// returns: `Vec<Individual>`
    pub fn pareto_front(&self) -> Vec<Individual> {
        let individuals = self.population.individuals();
        self.front_indexes
            .first()
            .map(|front| {
                front
                    .iter()
                    .filter_map(|i| individuals.get(*i).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sort the current population into fronts.
    fn update_fronts(&mut self) -> Result<(), OError> {
        let sorting_results =
            fast_non_dominated_sort(&self.population.objectives(), self.direction, false)?;
        debug!(
            "The population has {} fronts",
            sorting_results.front_indexes.len()
        );
        self.front_indexes = sorting_results.front_indexes;
        Ok(())
    }
}

/// Implementation of Section IIIC of the paper.
impl Algorithm for NSGA2 {
    /// This creates and evaluates the initial random population and sorts it into fronts.
    ///
    /// return: `Result<(), OError>`
    fn initialise(&mut self) -> Result<(), OError> {
        self.start_time = Local::now();
        self.generation = 0;
        self.survival_results = None;

        info!("Creating and evaluating initial population");
        self.population = Population::init(
            self.evaluator.clone(),
            self.problem.chromosome_length(),
            (1, self.problem.number_of_machines()),
            self.number_of_individuals,
            self.parallel,
            &mut self.rng,
        )?;

        debug!("Calculating rank");
        self.update_fronts()?;

        info!("Initial evaluation completed");
        Ok(())
    }

    fn evolve(&mut self) -> Result<(), OError> {
        if self.population.len() != self.number_of_individuals {
            return Err(OError::AlgorithmRun(
                self.name(),
                format!(
                    "The population has {} individuals, but {} are needed. Was the algorithm initialised?",
                    self.population.len(),
                    self.number_of_individuals
                ),
            ));
        }

        // Create the offsprings, based on the population at the previous time-step. The loop adds
        // two children at the time.
        debug!("Generating new population (selection + crossover + mutation)");
        let parents = self.population.individuals();
        let mating_pool = self
            .selector_operator
            .mating_pool(&self.population.objectives(), &mut self.rng)?;

        let mut chromosomes: Vec<Vec<usize>> = Vec::with_capacity(mating_pool.len());
        for pair in mating_pool.chunks_exact(2) {
            let (child1, child2) = self.crossover_operator.crossover_chromosomes(
                parents[pair[0]].chromosome(),
                parents[pair[1]].chromosome(),
                &mut self.rng,
            )?;
            for child in [child1, child2] {
                let mutated = self
                    .mutation_operator
                    .mutate_chromosome(&child, &mut self.rng);
                chromosomes.push(mutated.unwrap_or(child));
            }
        }

        debug!("Evaluating {} offsprings", chromosomes.len());
        let offsprings = evaluate_chromosomes(chromosomes, &self.evaluator, self.parallel)?;

        debug!("Combining parents and offsprings in new population");
        let mut combined = self.population.clone();
        combined.add_new_individuals(offsprings);
        debug!("Combined population size is {}", combined.len());

        debug!("Selecting best individuals");
        let survival_results = select_survivors(
            &combined.objectives(),
            self.number_of_individuals,
            self.direction,
        )?;
        if let Some(fi) = survival_results.truncated_front {
            debug!("Truncated front #{fi} using the crowding distance");
        }
        self.population = combined.select(&survival_results.selected)?;
        self.survival_results = Some(survival_results);
        self.update_fronts()?;

        self.generation += 1;
        Ok(())
    }

    fn generation(&self) -> usize {
        self.generation
    }

    fn name(&self) -> String {
        "NSGA2".to_string()
    }

    fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    fn stopping_condition(&self) -> StoppingConditionType {
        self.stopping_condition.clone()
    }

    fn population(&self) -> Population {
        self.population.clone()
    }

    fn problem(&self) -> Arc<ShopProblem> {
        self.problem.clone()
    }

    fn front_indexes(&self) -> Vec<Vec<usize>> {
        self.front_indexes.clone()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use crate::algorithms::{
        Algorithm, MaxDurationValue, MaxGenerationValue, NSGA2Arg, StoppingConditionType, NSGA2,
    };
    use crate::core::test_utils::scenario_problem;
    use crate::core::{Evaluator, ObjectiveDirection};
    use crate::operators::{CrossoverStrategy, NPointCrossoverArgs, SegmentDisplacementArgs};
    use crate::utils::non_dominated_front;

    fn scenario_args(generations: usize, parallel: bool) -> NSGA2Arg {
        NSGA2Arg {
            number_of_individuals: 10,
            tournament_size: None,
            crossover_operator_options: None,
            mutation_operator_options: None,
            direction: ObjectiveDirection::Minimise,
            stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(
                generations,
            )),
            parallel: Some(parallel),
            seed: Some(1),
        }
    }

    #[test]
    fn test_invalid_options() {
        let mut args = scenario_args(5, false);
        args.number_of_individuals = 1;
        assert!(NSGA2::new(scenario_problem(), args).is_err());

        let mut args = scenario_args(5, false);
        args.tournament_size = Some(11);
        assert!(NSGA2::new(scenario_problem(), args).is_err());

        let mut args = scenario_args(5, false);
        args.tournament_size = Some(0);
        assert!(NSGA2::new(scenario_problem(), args).is_err());

        // 9 genes cannot be split in rows of 2
        let mut args = scenario_args(5, false);
        args.crossover_operator_options = Some(NPointCrossoverArgs {
            strategy: CrossoverStrategy::RowIndependent { row_length: 2 },
            ..NPointCrossoverArgs::default()
        });
        assert!(NSGA2::new(scenario_problem(), args).is_err());

        // too many points for a row of 3 genes
        let mut args = scenario_args(5, false);
        args.crossover_operator_options = Some(NPointCrossoverArgs {
            number_of_points: 3,
            strategy: CrossoverStrategy::ColumnAligned { row_length: 3 },
            ..NPointCrossoverArgs::default()
        });
        assert!(NSGA2::new(scenario_problem(), args).is_err());

        let mut args = scenario_args(5, false);
        args.mutation_operator_options = Some(SegmentDisplacementArgs {
            mutation_probability: 2.0,
        });
        assert!(NSGA2::new(scenario_problem(), args).is_err());
    }

    #[test]
    fn test_evolve_before_initialise() {
        let mut algo = NSGA2::new(scenario_problem(), scenario_args(5, false)).unwrap();
        assert!(algo.evolve().is_err());
    }

    #[test]
    /// The population keeps its size, the fitness matches the chromosomes and the first front is
    /// non-dominated.
    fn test_run() {
        let problem = scenario_problem();
        let mut algo = NSGA2::new(problem.clone(), scenario_args(15, true)).unwrap();
        algo.run().unwrap();
        assert_eq!(algo.generation(), 15);

        let population = algo.population();
        assert_eq!(population.len(), 10);
        for individual in population.individuals() {
            assert_eq!(
                individual.fitness(),
                problem.evaluate(individual.chromosome()).unwrap()
            );
        }

        let first_front =
            non_dominated_front(&population.objectives(), ObjectiveDirection::Minimise).unwrap();
        assert_eq!(algo.front_indexes()[0], first_front);
        assert_eq!(algo.pareto_front().len(), first_front.len());
        assert_eq!(algo.ranks().len(), 10);

        let survival = algo.survival_results().unwrap();
        assert_eq!(survival.selected.len(), 10);
    }

    #[test]
    /// The same seed reproduces the same run, with or without threads.
    fn test_seed_reproducibility() {
        let mut algo1 = NSGA2::new(scenario_problem(), scenario_args(10, false)).unwrap();
        algo1.run().unwrap();
        let mut algo2 = NSGA2::new(scenario_problem(), scenario_args(10, true)).unwrap();
        algo2.run().unwrap();

        let p1 = algo1.population();
        let p2 = algo2.population();
        for (i1, i2) in p1.individuals().iter().zip(p2.individuals()) {
            assert_eq!(i1.chromosome(), i2.chromosome());
            assert_eq!(i1.fitness(), i2.fitness());
        }
    }

    #[test]
    /// The best value of each objective never gets worse.
    fn test_elitism() {
        let mut args = scenario_args(0, false);
        args.crossover_operator_options = Some(NPointCrossoverArgs {
            crossover_probability: 1.0,
            number_of_points: 1,
            strategy: CrossoverStrategy::ColumnAligned { row_length: 3 },
        });
        args.mutation_operator_options = Some(SegmentDisplacementArgs {
            mutation_probability: 0.5,
        });
        let mut algo = NSGA2::new(scenario_problem(), args).unwrap();
        algo.initialise().unwrap();

        let best = |algo: &NSGA2, obj: usize| {
            algo.population()
                .objectives()
                .iter()
                .map(|o| o[obj])
                .fold(f64::INFINITY, f64::min)
        };
        let mut best_makespan = best(&algo, 0);
        let mut best_energy = best(&algo, 1);
        for _ in 0..20 {
            algo.evolve().unwrap();
            let makespan = best(&algo, 0);
            let energy = best(&algo, 1);
            assert!(makespan <= best_makespan);
            assert!(energy <= best_energy);
            best_makespan = makespan;
            best_energy = energy;
        }
        assert_eq!(algo.generation(), 20);
    }

    #[test]
    fn test_max_duration() {
        let mut args = scenario_args(0, false);
        args.stopping_condition =
            StoppingConditionType::MaxDuration(MaxDurationValue(Duration::from_millis(100)));
        let mut algo = NSGA2::new(scenario_problem(), args).unwrap();
        algo.run().unwrap();
        assert!(algo.generation() >= 1);
    }

    #[test]
    fn test_save_to_json() {
        let mut algo = NSGA2::new(scenario_problem(), scenario_args(3, false)).unwrap();
        algo.run().unwrap();

        let file = std::env::temp_dir().join("paretoshop_nsga2_export.json");
        algo.save_to_json(&file).unwrap();
        let data = std::fs::read_to_string(&file).unwrap();
        let json: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(json["generation"], 3);
        assert_eq!(json["algorithm"], "NSGA2");
        assert_eq!(json["individuals"].as_array().unwrap().len(), 10);
        assert_eq!(json["ranks"].as_array().unwrap().len(), 10);
        assert!(json["individuals"][0]["chromosome"].is_array());
        assert!(json["fronts"].is_array());
        let _ = std::fs::remove_file(&file);
    }
}
