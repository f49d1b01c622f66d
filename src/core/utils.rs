use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::OError;

/// Get the random number generator. If no seed is provided, the default seed is used.
///
/// # Arguments
///
/// * `seed`: The optional seed number.
///
/// returns: `Box<dyn RngCore>`
pub fn get_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    let rng = match seed {
        None => ChaCha8Rng::from_seed(Default::default()),
        Some(s) => ChaCha8Rng::seed_from_u64(s),
    };
    Box::new(rng)
}

/// Calculate the vector minimum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, OError>`
pub fn vector_min(v: &[f64]) -> Result<f64, OError> {
    Ok(*v
        .iter()
        .min_by(|a, b| a.total_cmp(b))
        .ok_or(OError::Generic(
            "Cannot calculate vector min value".to_string(),
        ))?)
}

/// Calculate the vector maximum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, OError>`
pub fn vector_max(v: &[f64]) -> Result<f64, OError> {
    Ok(*v
        .iter()
        .max_by(|a, b| a.total_cmp(b))
        .ok_or(OError::Generic(
            "Cannot calculate vector max value".to_string(),
        ))?)
}

/// Get the indexes that sort the data in ascending order. The sort is stable, so equal values
/// keep their original order.
///
/// # Arguments
///
/// * `data`: The data to sort.
///
/// returns: `Vec<usize>`
pub fn argsort(data: &[f64]) -> Vec<usize> {
    let mut indices = (0..data.len()).collect::<Vec<_>>();
    indices.sort_by(|a, b| data[*a].total_cmp(&data[*b]));
    indices
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use crate::core::utils::{argsort, get_rng, vector_max, vector_min};

    #[test]
    fn test_min_max() {
        let v = [3.0, -1.5, 7.25, 0.0];
        assert_eq!(vector_min(&v).unwrap(), -1.5);
        assert_eq!(vector_max(&v).unwrap(), 7.25);
        assert!(vector_min(&[]).is_err());
        assert!(vector_max(&[]).is_err());
    }

    #[test]
    fn test_argsort_stable() {
        assert_eq!(argsort(&[3.0, 1.0, 3.0, 0.5]), vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = get_rng(Some(42));
        let mut b = get_rng(Some(42));
        let va: Vec<u32> = (0..10).map(|_| a.gen()).collect();
        let vb: Vec<u32> = (0..10).map(|_| b.gen()).collect();
        assert_eq!(va, vb);
    }
}
