use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::core::OError;

/// The name of the objectives returned by [`ShopProblem`].
pub const SHOP_OBJECTIVES: [&str; 2] = ["makespan", "energy"];

/// The trait to implement a fitness evaluator. An evaluator maps a chromosome to its fitness
/// vector; any data the evaluation needs (for example matrices) is bound when the evaluator is
/// created. The evaluator must be a pure function of the chromosome: the same chromosome must
/// always produce the same fitness.
pub trait Evaluator: Sync + Send + Debug {
    /// Calculate the fitness vector of a chromosome.
    ///
    /// # Arguments
    ///
    /// * `chromosome`: The chromosome to evaluate.
    ///
    /// returns: `Result<Vec<f64>, OError>` The objective values.
    fn evaluate(&self, chromosome: &[usize]) -> Result<Vec<f64>, OError>;

    /// The objective names, in the same order as the fitness vector.
    ///
    /// returns: `Vec<String>`
    fn objective_names(&self) -> Vec<String>;

    /// The number of objectives in each fitness vector.
    ///
    /// returns: `usize`
    fn number_of_objectives(&self) -> usize {
        self.objective_names().len()
    }
}

/// An operation placed on a machine by [`ShopProblem::decode`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScheduledOperation {
    /// The task index (0-based).
    pub task: usize,
    /// The position of the operation within the task (0-based).
    pub position: usize,
    /// The operation identifier (1-based row of the matrices).
    pub operation: usize,
    /// The machine identifier (1-based column of the matrices).
    pub machine: usize,
    /// When the operation starts.
    pub start: f64,
    /// When the operation ends.
    pub finish: f64,
    /// The energy consumed by the operation.
    pub energy: f64,
}

/// A decoded schedule. The operations are listed in the chromosome order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Schedule {
    /// The scheduled operations.
    pub operations: Vec<ScheduledOperation>,
    /// The completion time of the machine finishing last.
    pub makespan: f64,
    /// The total energy consumed by all the operations.
    pub total_energy: f64,
}

#[derive(Deserialize)]
struct ShopProblemData {
    time: Vec<Vec<f64>>,
    energy: Vec<Vec<f64>>,
    tasks: Vec<Vec<usize>>,
}

/// A job-shop machine assignment problem. Each task is an ordered list of operations, each
/// operation can run on any machine, with a duration and an energy cost that depend on the
/// operation and the machine.
///
/// A chromosome assigns one machine (1-based) to each operation instance, flattened in
/// task-major, operation-minor order. Its fitness is `[makespan, total_energy]`, both to be
/// minimised.
///
/// # Example
/// ```
/// use paretoshop::core::{Evaluator, ShopProblem};
///
/// let time = vec![vec![2.0, 4.0], vec![3.0, 1.0]];
/// let energy = vec![vec![1.0, 2.0], vec![2.0, 5.0]];
/// let tasks = vec![vec![1, 2], vec![2]];
/// let problem = ShopProblem::new(time, energy, tasks).unwrap();
///
/// let fitness = problem.evaluate(&[1, 2, 1]).unwrap();
/// assert_eq!(fitness, vec![5.0, 8.0]);
/// ```
#[derive(Serialize, Debug, Clone)]
pub struct ShopProblem {
    /// The duration of each operation (rows) on each machine (columns).
    time: Vec<Vec<f64>>,
    /// The energy used by each operation (rows) on each machine (columns).
    energy: Vec<Vec<f64>>,
    /// The operation identifiers of each task, in execution order.
    tasks: Vec<Vec<usize>>,
}

impl ShopProblem {
    /// Create a new problem. This returns an error if the matrices are empty, ragged, have a
    /// different shape, contain negative or non-finite values, or if a task references an
    /// operation that does not exist.
    ///
    /// # Arguments
    ///
    /// * `time`: The operation-time matrix (operations x machines).
    /// * `energy`: The operation-energy matrix (operations x machines).
    /// * `tasks`: The ordered operation identifiers (1-based) of each task.
    ///
    /// returns: `Result<ShopProblem, OError>`
    pub fn new(
        time: Vec<Vec<f64>>,
        energy: Vec<Vec<f64>>,
        tasks: Vec<Vec<usize>>,
    ) -> Result<Self, OError> {
        let name = "shop problem".to_string();
        if time.is_empty() || time[0].is_empty() {
            return Err(OError::InvalidInput(
                name,
                "The operation-time matrix must have at least one row and one column".to_string(),
            ));
        }
        let machines = time[0].len();
        if energy.len() != time.len() {
            return Err(OError::InvalidInput(
                name,
                format!(
                    "The operation-energy matrix has {} rows, but the operation-time matrix has {}",
                    energy.len(),
                    time.len()
                ),
            ));
        }
        for (matrix_name, matrix) in [("time", &time), ("energy", &energy)] {
            for (ri, row) in matrix.iter().enumerate() {
                if row.len() != machines {
                    return Err(OError::InvalidInput(
                        name,
                        format!(
                            "Row #{} of the operation-{matrix_name} matrix has {} columns, but {machines} are expected",
                            ri + 1,
                            row.len()
                        ),
                    ));
                }
                if let Some(v) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
                    return Err(OError::InvalidInput(
                        name,
                        format!(
                            "Row #{} of the operation-{matrix_name} matrix contains the invalid value {v}",
                            ri + 1
                        ),
                    ));
                }
            }
        }

        if tasks.iter().all(|t| t.is_empty()) {
            return Err(OError::InvalidInput(
                name,
                "At least one task with one operation is needed".to_string(),
            ));
        }
        for (ti, task) in tasks.iter().enumerate() {
            if let Some(op) = task.iter().find(|op| **op < 1 || **op > time.len()) {
                return Err(OError::InvalidInput(
                    name,
                    format!(
                        "Task #{ti} references the operation {op}, which must be between 1 and {}",
                        time.len()
                    ),
                ));
            }
        }

        Ok(Self {
            time,
            energy,
            tasks,
        })
    }

    /// Create the problem from a JSON string with the `time`, `energy` and `tasks` keys.
    ///
    /// # Arguments
    ///
    /// * `data`: The JSON string.
    ///
    /// returns: `Result<ShopProblem, OError>`
    pub fn from_json(data: &str) -> Result<Self, OError> {
        let data: ShopProblemData = serde_json::from_str(data).map_err(|e| {
            OError::InvalidInput("shop problem".to_string(), format!("Cannot parse JSON: {e}"))
        })?;
        Self::new(data.time, data.energy, data.tasks)
    }

    /// The number of machines.
    pub fn number_of_machines(&self) -> usize {
        self.time[0].len()
    }

    /// The number of distinct operations (the rows of the matrices).
    pub fn number_of_operations(&self) -> usize {
        self.time.len()
    }

    /// The number of tasks.
    pub fn number_of_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// The chromosome length, which is the total number of operations across all tasks.
    pub fn chromosome_length(&self) -> usize {
        self.tasks.iter().map(|t| t.len()).sum()
    }

    /// The operation identifiers of each task.
    pub fn tasks(&self) -> &[Vec<usize>] {
        &self.tasks
    }

    /// Check that the chromosome has the right length and that its genes are valid machine
    /// identifiers.
    ///
    /// # Arguments
    ///
    /// * `chromosome`: The chromosome.
    ///
    /// returns: `Result<(), OError>`
    pub fn validate_chromosome(&self, chromosome: &[usize]) -> Result<(), OError> {
        let expected = self.chromosome_length();
        if chromosome.len() != expected {
            return Err(OError::InvalidInput(
                "shop evaluator".to_string(),
                format!(
                    "The chromosome has {} genes, but {expected} operations must be assigned",
                    chromosome.len()
                ),
            ));
        }
        let machines = self.number_of_machines();
        if let Some((gi, m)) = chromosome
            .iter()
            .enumerate()
            .find(|(_, m)| **m < 1 || **m > machines)
        {
            return Err(OError::InvalidInput(
                "shop evaluator".to_string(),
                format!("Gene #{gi} is the machine {m}, which must be between 1 and {machines}"),
            ));
        }
        Ok(())
    }

    /// Decode a chromosome into a schedule. Operations are placed in the chromosome order (task
    /// by task). Each operation starts as soon as both the previous operation of the same task
    /// and the last operation placed on its machine are done.
    ///
    /// # Arguments
    ///
    /// * `chromosome`: The machine assigned to each operation.
    ///
    /// returns: `Result<Schedule, OError>`
    pub fn decode(&self, chromosome: &[usize]) -> Result<Schedule, OError> {
        self.validate_chromosome(chromosome)?;

        let mut machine_free_at = vec![0.0_f64; self.number_of_machines()];
        let mut task_ready_at = vec![0.0_f64; self.number_of_tasks()];
        let mut total_energy = 0.0;
        let mut operations = Vec::with_capacity(chromosome.len());

        let mut genes = chromosome.iter();
        for (task, ops) in self.tasks.iter().enumerate() {
            for (position, operation) in ops.iter().enumerate() {
                // length was validated
                let Some(machine) = genes.next() else {
                    break;
                };
                let (oi, mi) = (operation - 1, machine - 1);
                let duration = self.time[oi][mi];
                let energy = self.energy[oi][mi];

                let start = task_ready_at[task].max(machine_free_at[mi]);
                let finish = start + duration;
                machine_free_at[mi] = finish;
                task_ready_at[task] = finish;
                total_energy += energy;

                operations.push(ScheduledOperation {
                    task,
                    position,
                    operation: *operation,
                    machine: *machine,
                    start,
                    finish,
                    energy,
                });
            }
        }

        let makespan = machine_free_at.iter().copied().fold(0.0, f64::max);
        Ok(Schedule {
            operations,
            makespan,
            total_energy,
        })
    }
}

impl Evaluator for ShopProblem {
    fn evaluate(&self, chromosome: &[usize]) -> Result<Vec<f64>, OError> {
        let schedule = self.decode(chromosome)?;
        Ok(vec![schedule.makespan, schedule.total_energy])
    }

    fn objective_names(&self) -> Vec<String> {
        SHOP_OBJECTIVES.iter().map(|n| n.to_string()).collect()
    }
}

impl Display for ShopProblem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shop problem with {} tasks, {} operations and {} machines",
            self.number_of_tasks(),
            self.number_of_operations(),
            self.number_of_machines()
        )
    }
}
