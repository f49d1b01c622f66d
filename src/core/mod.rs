pub use error::OError;
pub use individual::{
    evaluate_chromosomes, random_chromosome, Individual, IndividualExport, Population,
};
pub use objective::ObjectiveDirection;
pub use problem::{Evaluator, Schedule, ScheduledOperation, ShopProblem, SHOP_OBJECTIVES};

mod error;
mod individual;
mod objective;
mod problem;
pub(crate) mod test_utils;
pub mod utils;
