#[cfg(test)]
use float_cmp::{approx_eq, F64Margin};

#[cfg(test)]
use crate::core::ShopProblem;

#[cfg(test)]
/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    assert_eq!(calculated_values.len(), expected_values.len());
    let margins = F64Margin {
        epsilon: 1e-9,
        ulps: 4,
    };
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

/// The 3-task, 3-operation, 3-machine scheduling scenario. Rows are operations, columns are
/// machines.
#[cfg(test)]
pub(crate) fn scenario_problem() -> ShopProblem {
    let time = vec![
        vec![2.0, 4.0, 6.0],
        vec![3.0, 5.0, 2.0],
        vec![4.0, 1.0, 3.0],
    ];
    let energy = vec![
        vec![5.0, 3.0, 2.0],
        vec![4.0, 6.0, 3.0],
        vec![2.0, 7.0, 5.0],
    ];
    let tasks = vec![vec![1, 2, 3], vec![2, 3, 1], vec![3, 1, 2]];
    ShopProblem::new(time, energy, tasks).unwrap()
}

/// The chromosome of the canonical scenario. Its fitness is `[22, 45]`.
#[cfg(test)]
pub(crate) fn scenario_chromosome() -> Vec<usize> {
    vec![1, 2, 2, 1, 3, 1, 3, 3, 2]
}

/// Convert fixed-size fitness arrays into fitness vectors.
#[cfg(test)]
pub(crate) fn fitness_vectors<const N: usize>(values: &[[f64; N]]) -> Vec<Vec<f64>> {
    values.iter().map(|v| v.to_vec()).collect()
}
