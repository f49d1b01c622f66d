use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum OError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("Invalid input given to '{0}': {1}")]
    InvalidInput(String, String),
    #[error("Inconsistent state detected in '{0}': {1}")]
    InconsistentState(String, String),
    #[error("An error occurred when evaluating a solution: {0}")]
    Evaluation(String),
    #[error("NaN detected when calculating the {0} '{1}'. This may be an error in the evaluation function")]
    NaN(String, String),
    #[error("An error occurred when initialising {0}: {1}")]
    AlgorithmInit(String, String),
    #[error("An error occurred when running {0}: {1}")]
    AlgorithmRun(String, String),
    #[error("An error occurred when exporting the algorithm data: {0}")]
    AlgorithmExport(String),
}
