//! Decision-tree classifier over one-hot encoded features.
//!
//! Splits are chosen greedily by impurity reduction. The search visits
//! features in a fixed order and keeps the first best split, so fitting is
//! fully deterministic for identical input data.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Split-quality measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    /// Information gain over Shannon entropy.
    Entropy,
    /// Gini impurity reduction.
    Gini,
}

impl Criterion {
    fn impurity(self, counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let n = total as f64;
        match self {
            Criterion::Entropy => counts
                .iter()
                .filter(|&&c| c > 0)
                .map(|&c| {
                    let p = c as f64 / n;
                    -p * p.log2()
                })
                .sum(),
            Criterion::Gini => {
                1.0 - counts
                    .iter()
                    .map(|&c| {
                        let p = c as f64 / n;
                        p * p
                    })
                    .sum::<f64>()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    criterion: Criterion,
    min_samples_split: usize,
    n_classes: usize,
    root: Option<Node>,
}

const MIN_GAIN: f64 = 1e-12;

impl DecisionTree {
    pub fn new(criterion: Criterion) -> Self {
        Self {
            criterion,
            min_samples_split: 2,
            n_classes: 0,
            root: None,
        }
    }

    /// Fits the tree on the given encoded rows and class indices.
    /// `y` values must all be below `n_classes`.
    pub fn fit(&mut self, x: ArrayView2<'_, f32>, y: &[usize], n_classes: usize) {
        self.n_classes = n_classes;
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.root = Some(self.build(x, y, &indices));
    }

    fn class_counts(&self, y: &[usize], indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[y[i]] += 1;
        }
        counts
    }

    /// The majority class among `counts`; ties resolve to the lowest index.
    fn majority(counts: &[usize]) -> usize {
        counts
            .iter()
            .enumerate()
            .max_by(|(ia, ca), (ib, cb)| ca.cmp(cb).then(ib.cmp(ia)))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn build(&self, x: ArrayView2<'_, f32>, y: &[usize], indices: &[usize]) -> Node {
        let counts = self.class_counts(y, indices);
        let majority = Self::majority(&counts);

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        if pure || indices.len() < self.min_samples_split {
            return Node::Leaf { class: majority };
        }

        let parent_impurity = self.criterion.impurity(&counts, indices.len());
        let n = indices.len() as f64;

        let mut best: Option<(f64, usize)> = None;
        for feature in 0..x.ncols() {
            let mut left_counts = vec![0usize; self.n_classes];
            let mut left_total = 0usize;
            for &i in indices {
                if x[[i, feature]] <= 0.5 {
                    left_counts[y[i]] += 1;
                    left_total += 1;
                }
            }
            let right_total = indices.len() - left_total;
            if left_total == 0 || right_total == 0 {
                continue;
            }
            let right_counts: Vec<usize> = counts
                .iter()
                .zip(&left_counts)
                .map(|(&c, &l)| c - l)
                .collect();

            let weighted = (left_total as f64 / n)
                * self.criterion.impurity(&left_counts, left_total)
                + (right_total as f64 / n) * self.criterion.impurity(&right_counts, right_total);
            let gain = parent_impurity - weighted;

            let improves = match best {
                Some((best_gain, _)) => gain > best_gain + MIN_GAIN,
                None => gain > MIN_GAIN,
            };
            if improves {
                best = Some((gain, feature));
            }
        }

        let Some((_, feature)) = best else {
            return Node::Leaf { class: majority };
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| x[[i, feature]] <= 0.5);

        Node::Split {
            feature,
            left: Box::new(self.build(x, y, &left_idx)),
            right: Box::new(self.build(x, y, &right_idx)),
        }
    }

    /// Classifies one encoded row. Returns the majority class of the leaf
    /// the row lands in, or `None` if the tree was never fitted.
    pub fn predict_row(&self, row: &[f32]) -> Option<usize> {
        let mut node = self.root.as_ref()?;
        loop {
            match node {
                Node::Leaf { class } => return Some(*class),
                Node::Split { feature, left, right } => {
                    node = if row.get(*feature).copied().unwrap_or(0.0) <= 0.5 {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Classifies a batch of encoded rows.
    pub fn predict(&self, x: ArrayView2<'_, f32>) -> Vec<Option<usize>> {
        (0..x.nrows())
            .map(|i| self.predict_row(x.row(i).as_slice().unwrap_or(&[])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn entropy_of_pure_and_even_sets() {
        assert_eq!(Criterion::Entropy.impurity(&[4, 0], 4), 0.0);
        let even = Criterion::Entropy.impurity(&[2, 2], 4);
        assert!((even - 1.0).abs() < 1e-9);
    }

    #[test]
    fn gini_of_pure_and_even_sets() {
        assert_eq!(Criterion::Gini.impurity(&[4, 0], 4), 0.0);
        let even = Criterion::Gini.impurity(&[2, 2], 4);
        assert!((even - 0.5).abs() < 1e-9);
    }

    #[test]
    fn learns_a_single_separating_feature() {
        // Class is fully determined by column 0.
        let x = array![
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
            [0.0, 1.0],
        ];
        let y = vec![1, 1, 0, 0];
        let mut tree = DecisionTree::new(Criterion::Entropy);
        tree.fit(x.view(), &y, 2);

        assert_eq!(tree.predict_row(&[1.0, 0.5]), Some(1));
        assert_eq!(tree.predict_row(&[0.0, 0.5]), Some(0));
    }

    #[test]
    fn all_zero_row_still_classifies() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let y = vec![0, 1, 0];
        let mut tree = DecisionTree::new(Criterion::Entropy);
        tree.fit(x.view(), &y, 2);
        // An out-of-vocabulary row encodes to all zeros; it must land in
        // some leaf rather than fail.
        assert!(tree.predict_row(&[0.0, 0.0]).is_some());
    }

    #[test]
    fn unfitted_tree_predicts_none() {
        let tree = DecisionTree::new(Criterion::Entropy);
        assert_eq!(tree.predict_row(&[0.0]), None);
    }

    #[test]
    fn fitting_is_deterministic() {
        let x = array![
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let y = vec![0, 1, 0, 1, 0, 1];

        let mut a = DecisionTree::new(Criterion::Entropy);
        let mut b = DecisionTree::new(Criterion::Entropy);
        a.fit(x.view(), &y, 2);
        b.fit(x.view(), &y, 2);

        let ser_a = bincode::serialize(&a).unwrap();
        let ser_b = bincode::serialize(&b).unwrap();
        assert_eq!(ser_a, ser_b);
    }

    #[test]
    fn majority_ties_break_to_lowest_class() {
        assert_eq!(DecisionTree::majority(&[2, 2, 1]), 0);
        assert_eq!(DecisionTree::majority(&[0, 3, 3]), 1);
    }
}
