//! NSGA-II for the machine-assignment problem: each task is an ordered sequence of operations and
//! every operation must be assigned to a machine so that the total completion time (makespan) and
//! the total energy consumption are minimised.
//!
//! - [`core`] contains the problem, the scheduling simulator used as fitness function, the
//!   individuals and the population.
//! - [`operators`] contains the dominance comparison, the tournament selector, the crossover and
//!   mutation operators and the survivor selection.
//! - [`utils`] contains the non-dominated sorting and the crowding distance.
//! - [`algorithms`] contains the NSGA2 algorithm.
pub mod algorithms;
pub mod core;
pub mod operators;
pub mod utils;
