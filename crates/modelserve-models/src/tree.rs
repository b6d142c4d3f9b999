//! Decision tree and random forest regressors

use crate::artifact::InvalidArtifact;
use crate::predictor::{ensure_n_features, Predictor};
use modelserve_core::{Error, Result};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// A node in a flattened regression tree.
///
/// Child indices always point forward in the node list, which keeps every
/// walk finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`, else `right`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node
    Leaf { value: f64 },
}

/// Fitted regression tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    n_features: usize,
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Create a tree from its flattened nodes, rooted at index 0
    pub fn new(n_features: usize, nodes: Vec<TreeNode>) -> std::result::Result<Self, InvalidArtifact> {
        if n_features == 0 {
            return Err(InvalidArtifact::new("decision tree expects zero features"));
        }
        if nodes.is_empty() {
            return Err(InvalidArtifact::new("decision tree has no nodes"));
        }

        for (index, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(InvalidArtifact::new(format!(
                            "node {} splits on feature {} but the tree has {} features",
                            index, feature, n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(InvalidArtifact::new(format!(
                            "node {} has a NaN threshold",
                            index
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= nodes.len() {
                            return Err(InvalidArtifact::new(format!(
                                "node {} has invalid child index {}",
                                index, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(InvalidArtifact::new(format!(
                            "leaf {} has a non-finite value",
                            index
                        )));
                    }
                }
            }
        }

        Ok(Self { n_features, nodes })
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<f64> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(Error::prediction(format!(
                        "tree walk reached missing node {}",
                        index
                    )))
                }
            }
        }
    }
}

impl Predictor for DecisionTree {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        ensure_n_features(self.algorithm(), self.n_features, &features)?;

        features
            .axis_iter(Axis(0))
            .map(|row| self.predict_row(row))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }

    fn algorithm(&self) -> &str {
        "DecisionTreeRegressor"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Bagged ensemble of regression trees; predicts the mean tree output
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Create a forest from already-validated trees
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> std::result::Result<Self, InvalidArtifact> {
        if trees.is_empty() {
            return Err(InvalidArtifact::new("random forest has no trees"));
        }
        if let Some(tree) = trees.iter().find(|t| t.n_features != n_features) {
            return Err(InvalidArtifact::new(format!(
                "random forest expects {} features but a tree expects {}",
                n_features, tree.n_features
            )));
        }

        Ok(Self { n_features, trees })
    }

    /// Number of trees in the ensemble
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for RandomForest {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        ensure_n_features(self.algorithm(), self.n_features, &features)?;

        let mut sum = Array1::<f64>::zeros(features.nrows());
        for tree in &self.trees {
            sum += &tree.predict(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn algorithm(&self) -> &str {
        "RandomForestRegressor"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn stump(threshold: f64, low: f64, high: f64) -> DecisionTree {
        DecisionTree::new(
            2,
            vec![
                TreeNode::Split {
                    feature: 0,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_tree_walk() {
        let tree = stump(1.5, 10.0, 20.0);

        let out = tree
            .predict(array![[1.0, 0.0], [1.5, 0.0], [2.0, 0.0]].view())
            .unwrap();
        assert_eq!(out.to_vec(), vec![10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_tree_single_leaf() {
        let tree = DecisionTree::new(3, vec![TreeNode::Leaf { value: 4.5 }]).unwrap();
        let out = tree.predict(array![[0.0, 0.0, 0.0]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![4.5]);
    }

    #[test]
    fn test_tree_rejects_backward_child() {
        let nodes = vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: 1.0 },
        ];
        assert!(DecisionTree::new(1, nodes).is_err());
    }

    #[test]
    fn test_tree_rejects_out_of_range() {
        let nodes = vec![
            TreeNode::Split {
                feature: 5,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: 1.0 },
            TreeNode::Leaf { value: 2.0 },
        ];
        assert!(DecisionTree::new(2, nodes).is_err());
        assert!(DecisionTree::new(2, vec![]).is_err());
    }

    #[test]
    fn test_forest_mean() {
        let forest = RandomForest::new(2, vec![stump(1.5, 10.0, 20.0), stump(0.5, 0.0, 4.0)]).unwrap();

        let out = forest.predict(array![[1.0, 0.0], [2.0, 0.0]].view()).unwrap();
        assert_eq!(out.to_vec(), vec![7.0, 12.0]);
        assert_eq!(forest.n_estimators(), 2);
    }

    #[test]
    fn test_forest_rejects_mismatched_trees() {
        let other = DecisionTree::new(3, vec![TreeNode::Leaf { value: 1.0 }]).unwrap();
        assert!(RandomForest::new(2, vec![stump(1.0, 0.0, 1.0), other]).is_err());
        assert!(RandomForest::new(2, vec![]).is_err());
    }

    #[test]
    fn test_node_deserialization() {
        let nodes: Vec<TreeNode> = serde_json::from_str(
            r#"[{"feature": 0, "threshold": 1.5, "left": 1, "right": 2}, {"value": 3.0}]"#,
        )
        .unwrap();

        assert!(matches!(nodes[0], TreeNode::Split { feature: 0, .. }));
        assert_eq!(nodes[1], TreeNode::Leaf { value: 3.0 });
    }
}
