pub use crowding_distance::{crowding_distance, BOUNDARY_DISTANCE};
pub use fast_non_dominated_sort::{
    fast_non_dominated_sort, non_dominated_front, NonDominatedSortResults,
};

mod crowding_distance;
mod fast_non_dominated_sort;
