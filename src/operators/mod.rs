pub use comparison::{pareto_dominance, BinaryComparisonOperator, ParetoDominance, PreferredSolution};
pub use crossover::{
    column_aligned_crossover, n_point_crossover, row_independent_crossover, Crossover,
    CrossoverChildren, CrossoverStrategy, NPointCrossover, NPointCrossoverArgs,
};
pub use mutation::{displace_segment, Mutation, SegmentDisplacement, SegmentDisplacementArgs};
pub use selector::{Selector, TournamentSelector};
pub use survival::{select_survivors, SurvivalResults};

mod comparison;
mod crossover;
mod mutation;
mod selector;
mod survival;
