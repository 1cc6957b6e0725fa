// Stratified train/test split

use hoops_models::{HoopsError, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffled split that keeps the win/loss ratio in both halves.
///
/// The test set gets `ceil(test_fraction * n)` rows; each class contributes
/// in proportion to its size, leftover slots going to the classes with the
/// largest fractional share.
pub fn stratified_split(labels: &Array1<bool>, test_fraction: f64, seed: u64) -> Result<SplitIndices> {
    let n = labels.len();
    if test_fraction.is_nan() || test_fraction <= 0.0 || test_fraction >= 1.0 {
        return Err(HoopsError::Training {
            reason: format!("test fraction must be in (0, 1), got {test_fraction}"),
        });
    }

    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(HoopsError::Training {
            reason: format!("cannot split {n} rows with test fraction {test_fraction}"),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut classes: Vec<Vec<usize>> = [false, true]
        .iter()
        .map(|class| (0..n).filter(|&i| labels[i] == *class).collect())
        .collect();

    let sizes: Vec<usize> = classes.iter().map(Vec::len).collect();
    let quotas = allocate(&sizes, n_test);

    let mut split = SplitIndices {
        train: Vec::with_capacity(n - n_test),
        test: Vec::with_capacity(n_test),
    };
    for (members, quota) in classes.iter_mut().zip(quotas) {
        members.shuffle(&mut rng);
        split.test.extend_from_slice(&members[..quota]);
        split.train.extend_from_slice(&members[quota..]);
    }
    split.train.shuffle(&mut rng);
    split.test.shuffle(&mut rng);

    Ok(split)
}

/// Largest-remainder allocation of `total` slots across classes.
fn allocate(sizes: &[usize], total: usize) -> Vec<usize> {
    let n: usize = sizes.iter().sum();
    if n == 0 {
        return vec![0; sizes.len()];
    }

    let shares: Vec<f64> = sizes
        .iter()
        .map(|&size| total as f64 * size as f64 / n as f64)
        .collect();
    let mut quotas: Vec<usize> = shares.iter().map(|s| s.floor() as usize).collect();

    let mut by_remainder: Vec<usize> = (0..sizes.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = shares[a] - shares[a].floor();
        let rb = shares[b] - shares[b].floor();
        rb.total_cmp(&ra)
    });

    let mut left = total - quotas.iter().sum::<usize>();
    for idx in by_remainder.into_iter().cycle() {
        if left == 0 {
            break;
        }
        if quotas[idx] < sizes[idx] {
            quotas[idx] += 1;
            left -= 1;
        }
    }
    quotas
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn labels(wins: usize, losses: usize) -> Array1<bool> {
        (0..wins + losses).map(|i| i < wins).collect()
    }

    #[test]
    fn test_split_sizes() {
        let split = stratified_split(&labels(36, 24), 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 12);
        assert_eq!(split.train.len(), 48);
    }

    #[test]
    fn test_split_is_a_partition() {
        let split = stratified_split(&labels(40, 23), 0.2, 42).unwrap();
        let all: HashSet<usize> = split.train.iter().chain(&split.test).copied().collect();
        assert_eq!(all.len(), 63);
        assert_eq!(split.train.len() + split.test.len(), 63);
    }

    #[test]
    fn test_split_preserves_class_ratio() {
        let y = labels(36, 24);
        let split = stratified_split(&y, 0.2, 42).unwrap();
        let test_wins = split.test.iter().filter(|&&i| y[i]).count();
        let train_wins = split.train.iter().filter(|&&i| y[i]).count();

        assert_eq!(test_wins, 7);
        assert_eq!(train_wins, 29);
    }

    #[test]
    fn test_split_is_deterministic_per_seed() {
        let y = labels(30, 30);
        let a = stratified_split(&y, 0.2, 42).unwrap();
        let b = stratified_split(&y, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_class_still_splits() {
        let split = stratified_split(&labels(55, 0), 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 11);
        assert_eq!(split.train.len(), 44);
    }

    #[test]
    fn test_degenerate_inputs_are_errors() {
        assert!(stratified_split(&labels(1, 0), 0.2, 42).is_err());
        assert!(stratified_split(&labels(10, 10), 0.0, 42).is_err());
        assert!(stratified_split(&labels(10, 10), 1.0, 42).is_err());
    }

    #[test]
    fn test_allocate_uses_largest_remainder() {
        // 12 * 36/60 = 7.2 and 12 * 24/60 = 4.8: the loss class takes the spare slot.
        assert_eq!(allocate(&[24, 36], 12), vec![5, 7]);
        assert_eq!(allocate(&[0, 10], 3), vec![0, 3]);
    }
}
