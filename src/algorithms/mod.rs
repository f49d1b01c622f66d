pub use algorithm::{Algorithm, AlgorithmExport, Elapsed};
pub use nsga2::{NSGA2Arg, NSGA2};
pub use stopping_condition::{
    MaxDurationValue, MaxGenerationValue, StoppingCondition, StoppingConditionType,
};

mod algorithm;
mod nsga2;
mod stopping_condition;
