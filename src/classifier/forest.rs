//! Random-forest inference over an encoded feature vector.

use crate::error::ClassifyError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left, otherwise right.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class sample weights that reached this leaf.
    Leaf { value: Vec<f64> },
}

/// Nodes in a flat array; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, n_classes: usize, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {i} splits on feature {feature} but the model has {n_features} features"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i} has a non-finite threshold"));
                    }
                    // Children always come after their parent, which also rules out cycles.
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!("node {i} points at invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {i} has {} class weights, expected {n_classes}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {i} has unusable class weights"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_for(&self, x: &Array1<f64>) -> Result<&[f64], ClassifyError> {
        let mut index = 0;
        // A valid path visits each node at most once.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = x.get(*feature).ok_or_else(|| {
                        ClassifyError::Classification(format!(
                            "split on feature {feature} but the input has {} features",
                            x.len()
                        ))
                    })?;
                    index = if v <= threshold { *left } else { *right };
                }
                None => {
                    return Err(ClassifyError::Classification(format!(
                        "tree node {index} does not exist"
                    )))
                }
            }
        }
        Err(ClassifyError::Classification("tree walk did not reach a leaf".to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Structural checks run once when the bundle is loaded.
    pub fn validate(&self, n_classes: usize, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(n_classes, n_features)
                .map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }

    /// Mean of the per-tree normalized leaf distributions.
    pub fn predict_proba(&self, x: &Array1<f64>, n_classes: usize) -> Result<Array1<f64>, ClassifyError> {
        if self.trees.is_empty() {
            return Err(ClassifyError::Classification("forest has no trees".to_string()));
        }

        let mut proba = Array1::<f64>::zeros(n_classes);
        for tree in &self.trees {
            let leaf = tree.leaf_for(x)?;
            if leaf.len() != n_classes {
                return Err(ClassifyError::Classification(format!(
                    "leaf has {} class weights, expected {n_classes}",
                    leaf.len()
                )));
            }
            let total: f64 = leaf.iter().sum();
            if total <= 0.0 {
                return Err(ClassifyError::Classification("leaf has zero total weight".to_string()));
            }
            proba += &(Array1::from_vec(leaf.to_vec()) / total);
        }
        Ok(proba / self.trees.len() as f64)
    }

    /// Index of the most probable class. Ties go to the lowest index.
    pub fn predict(&self, x: &Array1<f64>, n_classes: usize) -> Result<usize, ClassifyError> {
        let proba = self.predict_proba(x, n_classes)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf(value: &[f64]) -> TreeNode {
        TreeNode::Leaf {
            value: value.to_vec(),
        }
    }

    fn stump(feature: usize, threshold: f64, left: &[f64], right: &[f64]) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                leaf(left),
                leaf(right),
            ],
        }
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let forest = RandomForest {
            trees: vec![stump(0, 0.5, &[1.0, 0.0], &[0.0, 1.0])],
        };
        assert_eq!(forest.predict(&Array1::from_vec(vec![0.5]), 2).unwrap(), 0);
        assert_eq!(forest.predict(&Array1::from_vec(vec![0.51]), 2).unwrap(), 1);
    }

    #[test]
    fn averages_normalized_leaves() {
        let forest = RandomForest {
            trees: vec![
                stump(0, 0.0, &[3.0, 1.0], &[0.0, 1.0]),
                stump(1, 0.0, &[0.0, 2.0], &[1.0, 0.0]),
            ],
        };
        let proba = forest
            .predict_proba(&Array1::from_vec(vec![-1.0, -1.0]), 2)
            .unwrap();
        assert_relative_eq!(proba[0], 0.375);
        assert_relative_eq!(proba[1], 0.625);
    }

    #[test]
    fn ties_go_to_first_class() {
        let forest = RandomForest {
            trees: vec![
                stump(0, 0.0, &[1.0, 0.0], &[1.0, 0.0]),
                stump(0, 0.0, &[0.0, 1.0], &[0.0, 1.0]),
            ],
        };
        assert_eq!(forest.predict(&Array1::from_vec(vec![0.0]), 2).unwrap(), 0);
    }

    #[test]
    fn feature_outside_input_is_a_classification_error() {
        let forest = RandomForest {
            trees: vec![stump(4, 0.0, &[1.0], &[1.0])],
        };
        let err = forest.predict(&Array1::from_vec(vec![0.0]), 1).unwrap_err();
        assert!(matches!(err, ClassifyError::Classification(_)));
    }

    #[test]
    fn validation_catches_broken_structure() {
        let empty = RandomForest { trees: vec![] };
        assert!(empty.validate(2, 1).is_err());

        let wide_leaf = RandomForest {
            trees: vec![stump(0, 0.0, &[1.0, 0.0, 0.0], &[0.0, 1.0])],
        };
        assert!(wide_leaf.validate(2, 1).unwrap_err().contains("3 class weights"));

        let cyclic = RandomForest {
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                }],
            }],
        };
        assert!(cyclic.validate(1, 1).unwrap_err().contains("invalid child"));

        let ok = RandomForest {
            trees: vec![stump(0, 0.0, &[1.0, 0.0], &[0.0, 1.0])],
        };
        assert!(ok.validate(2, 1).is_ok());
    }
}
