//! Stratified train/holdout splitting with a fixed seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fraction of rows held out for evaluation.
pub const HOLDOUT_FRACTION: f64 = 0.4;

/// Seed for the stratified shuffle, fixed so identical uploads produce
/// identical splits and therefore identical accuracy.
pub const SPLIT_SEED: u64 = 42;

/// A class too small to appear on both sides of the split.
#[derive(Debug, PartialEq, Eq)]
pub struct TooFewSamples {
    pub class: usize,
    pub count: usize,
}

/// Splits row indices into (train, holdout) so that each class keeps its
/// proportional share on both sides. Every class needs at least two rows;
/// otherwise the offending class is reported.
pub fn stratified_split(
    y: &[usize],
    n_classes: usize,
    holdout_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), TooFewSamples> {
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &class) in y.iter().enumerate() {
        by_class[class].push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut holdout = Vec::new();

    for (class, mut indices) in by_class.into_iter().enumerate() {
        if indices.is_empty() {
            continue;
        }
        if indices.len() < 2 {
            return Err(TooFewSamples {
                class,
                count: indices.len(),
            });
        }
        indices.shuffle(&mut rng);
        // At least one row on each side, whatever the rounding says.
        let n_holdout = ((indices.len() as f64 * holdout_fraction).round() as usize)
            .clamp(1, indices.len() - 1);
        holdout.extend_from_slice(&indices[..n_holdout]);
        train.extend_from_slice(&indices[n_holdout..]);
    }

    train.sort_unstable();
    holdout.sort_unstable();
    Ok((train, holdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_class_shares_on_both_sides() {
        // 10 of class 0, 5 of class 1.
        let y: Vec<usize> = std::iter::repeat(0)
            .take(10)
            .chain(std::iter::repeat(1).take(5))
            .collect();
        let (train, holdout) = stratified_split(&y, 2, HOLDOUT_FRACTION, SPLIT_SEED).unwrap();

        assert_eq!(train.len() + holdout.len(), y.len());
        assert_eq!(holdout.iter().filter(|&&i| y[i] == 0).count(), 4);
        assert_eq!(holdout.iter().filter(|&&i| y[i] == 1).count(), 2);
    }

    #[test]
    fn same_seed_same_split() {
        let y = vec![0, 0, 0, 1, 1, 1, 0, 1, 0, 1];
        let a = stratified_split(&y, 2, HOLDOUT_FRACTION, SPLIT_SEED).unwrap();
        let b = stratified_split(&y, 2, HOLDOUT_FRACTION, SPLIT_SEED).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn singleton_class_is_rejected() {
        let y = vec![0, 0, 0, 1];
        let err = stratified_split(&y, 2, HOLDOUT_FRACTION, SPLIT_SEED).unwrap_err();
        assert_eq!(err, TooFewSamples { class: 1, count: 1 });
    }

    #[test]
    fn two_member_class_lands_on_both_sides() {
        let y = vec![0, 0, 0, 0, 1, 1];
        let (train, holdout) = stratified_split(&y, 2, HOLDOUT_FRACTION, SPLIT_SEED).unwrap();
        assert_eq!(train.iter().filter(|&&i| y[i] == 1).count(), 1);
        assert_eq!(holdout.iter().filter(|&&i| y[i] == 1).count(), 1);
    }

    #[test]
    fn indices_are_disjoint_and_complete() {
        let y = vec![0, 1, 0, 1, 0, 1, 0, 1];
        let (train, holdout) = stratified_split(&y, 2, HOLDOUT_FRACTION, SPLIT_SEED).unwrap();
        let mut all: Vec<usize> = train.iter().chain(holdout.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..y.len()).collect::<Vec<_>>());
    }
}
