use std::env;
use std::error::Error;

use log::LevelFilter;

use paretoshop::algorithms::{
    Algorithm, MaxGenerationValue, NSGA2Arg, StoppingConditionType, NSGA2,
};
use paretoshop::core::{ObjectiveDirection, ShopProblem};
use paretoshop::operators::{CrossoverStrategy, NPointCrossoverArgs, SegmentDisplacementArgs};

/// Three tasks with three operations each, to run on three machines. The rows of `time` and
/// `energy` are the operations, the columns the machines.
const PROBLEM: &str = r#"{
    "time": [[2, 4, 6], [3, 5, 2], [4, 1, 3]],
    "energy": [[5, 3, 2], [4, 6, 3], [2, 7, 5]],
    "tasks": [[1, 2, 3], [2, 3, 1], [3, 1, 2]]
}"#;

/// Find the trade-off between makespan and energy for a small 3x3 shop.
///
/// `cargo run --example shop_nsga2 --release`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let problem = ShopProblem::from_json(PROBLEM)?;
    println!("{problem}");

    let args = NSGA2Arg {
        number_of_individuals: 20,
        tournament_size: Some(2),
        // swap the same operations in each task
        crossover_operator_options: Some(NPointCrossoverArgs {
            crossover_probability: 0.9,
            number_of_points: 1,
            strategy: CrossoverStrategy::ColumnAligned { row_length: 3 },
        }),
        mutation_operator_options: Some(SegmentDisplacementArgs {
            mutation_probability: 0.2,
        }),
        direction: ObjectiveDirection::Minimise,
        stopping_condition: StoppingConditionType::MaxGeneration(MaxGenerationValue(100)),
        parallel: Some(false),
        seed: Some(10),
    };
    let mut algo = NSGA2::new(problem, args)?;
    algo.run()?;

    let problem = algo.problem();
    for individual in algo.pareto_front() {
        let schedule = problem.decode(individual.chromosome())?;
        println!(
            "{:?} -> makespan = {}, energy = {}",
            individual.chromosome(),
            schedule.makespan,
            schedule.total_energy
        );
    }

    // Export serialised results at last generation
    let out_path = env::temp_dir().join("shop_nsga2.json");
    algo.save_to_json(&out_path)?;
    println!("Results saved to {}", out_path.display());

    Ok(())
}
