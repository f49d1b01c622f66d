use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;

use crate::algorithms::StoppingConditionType;
use crate::core::{IndividualExport, OError, Population, ShopProblem};

#[derive(Serialize, Debug)]
pub struct Elapsed {
    hours: i64,
    minutes: i64,
    seconds: i64,
}

#[derive(Serialize, Debug)]
/// The struct used to export the algorithm data to JSON file.
pub struct AlgorithmExport {
    problem: ShopProblem,
    individuals: Vec<IndividualExport>,
    /// The rank of each individual in `individuals`.
    ranks: Vec<usize>,
    /// The indexes of the individuals in each front.
    fronts: Vec<Vec<usize>>,
    generation: usize,
    started_at: DateTime<Local>,
    algorithm: String,
    took: Elapsed,
}

/// The trait to use to implement an algorithm.
pub trait Algorithm {
    /// Initialise the algorithm.
    ///
    /// return: `Result<(), OError>`
    fn initialise(&mut self) -> Result<(), OError>;

    /// Evolve the population.
    ///
    /// return: `Result<(), OError>`
    fn evolve(&mut self) -> Result<(), OError>;

    /// Return the number of evolved generations.
    ///
    /// return: `usize`.
    fn generation(&self) -> usize;

    /// Return the algorithm name.
    ///
    /// return: `String`.
    fn name(&self) -> String;

    /// Get the time when the algorithm started.
    ///
    /// return: `DateTime<Local>`.
    fn start_time(&self) -> DateTime<Local>;

    /// Return the stopping condition.
    ///
    /// return: `StoppingConditionType`.
    fn stopping_condition(&self) -> StoppingConditionType;

    /// Return the evolved population.
    ///
    /// return: `Population`.
    fn population(&self) -> Population;

    /// Return the problem.
    ///
    /// return: `Arc<ShopProblem>`.
    fn problem(&self) -> Arc<ShopProblem>;

    /// Return the non-dominated fronts of the population. Each front contains the indexes of the
    /// individuals in [`Algorithm::population`].
    ///
    /// return: `Vec<Vec<usize>>`.
    fn front_indexes(&self) -> Vec<Vec<usize>>;

    /// Return the rank of each individual in the population.
    ///
    /// return: `Vec<usize>`.
    fn ranks(&self) -> Vec<usize> {
        let fronts = self.front_indexes();
        let mut ranks = vec![0; fronts.iter().map(|f| f.len()).sum()];
        for (rank, front) in fronts.iter().enumerate() {
            for idx in front {
                if let Some(r) = ranks.get_mut(*idx) {
                    *r = rank;
                }
            }
        }
        ranks
    }

    /// Get the time elapsed since the start of the algorithm.
    ///
    /// return: `Duration`.
    fn elapsed_duration(&self) -> Duration {
        (Local::now() - self.start_time())
            .to_std()
            .unwrap_or_default()
    }

    /// Get the elapsed hours, minutes and seconds since the start of the algorithm.
    ///
    /// return: `[i64; 3]`.
    fn elapsed(&self) -> [i64; 3] {
        let duration = Local::now() - self.start_time();
        let seconds = duration.num_seconds() % 60;
        let minutes = (duration.num_seconds() / 60) % 60;
        let hours = (duration.num_seconds() / 60) / 60;
        [hours, minutes, seconds]
    }

    /// Format the elapsed time as string.
    ///
    /// return: `String`.
    fn elapsed_as_string(&self) -> String {
        let [hours, minutes, seconds] = self.elapsed();
        format!(
            "{:0>2} hours, {:0>2} minutes and {:0>2} seconds",
            hours, minutes, seconds
        )
    }

    /// Run the algorithm. This initialises the population and evolves it until the stopping
    /// condition is met.
    ///
    /// return: `Result<(), OError>`
    fn run(&mut self) -> Result<(), OError> {
        info!("Starting {}", self.name());
        self.initialise()?;

        let cond = self.stopping_condition();
        while !cond.is_met(self.generation(), self.elapsed_duration()) {
            info!("Generation #{}", self.generation() + 1);
            self.evolve()?;
            info!(
                "Evolved generation #{} - Elapsed Time: {:?}",
                self.generation(),
                self.elapsed_duration()
            );
        }
        info!("Stopping evolution because the {} was reached", cond.name());
        info!("Took {}", self.elapsed_as_string());

        Ok(())
    }

    /// Save the algorithm data (the problem, the individuals' chromosome, objectives and rank, the
    /// fronts, ...) to a JSON file.
    ///
    /// # Arguments
    ///
    /// * `destination`: The path to the JSON file.
    ///
    /// return `Result<(), OError>`
    fn save_to_json(&self, destination: &Path) -> Result<(), OError> {
        let [hours, minutes, seconds] = self.elapsed();
        let export = AlgorithmExport {
            problem: self.problem().as_ref().clone(),
            individuals: self.population().serialise(),
            ranks: self.ranks(),
            fronts: self.front_indexes(),
            generation: self.generation(),
            started_at: self.start_time(),
            algorithm: self.name(),
            took: Elapsed {
                hours,
                minutes,
                seconds,
            },
        };
        let data = serde_json::to_string_pretty(&export)
            .map_err(|e| OError::AlgorithmExport(e.to_string()))?;

        fs::write(destination, data).map_err(|e| OError::AlgorithmExport(e.to_string()))?;
        Ok(())
    }
}
