//! Random forest of binary classification trees.
//!
//! Each leaf stores per-class weights (training sample counts or fractions).
//! A tree's probability is its leaf's normalized weights; the forest averages
//! trees in file order so the result is bit-for-bit reproducible.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: [f64; 2],
    },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(not_settled: f64, settled: f64) -> Self {
        Node::Leaf {
            value: [not_settled, settled],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    fn validate(&self, tree_idx: usize, n_features: usize) -> Result<(), AppError> {
        if self.nodes.is_empty() {
            return Err(AppError::load(format!("Tree {tree_idx} has no nodes.")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(AppError::mismatch(format!(
                            "Tree {tree_idx} node {idx} splits on feature {feature}; model has {n_features}."
                        )));
                    }
                    // Children must point forward, which also rules out cycles.
                    if left <= idx || right <= idx || left >= self.nodes.len() || right >= self.nodes.len() {
                        return Err(AppError::load(format!(
                            "Tree {tree_idx} node {idx} has invalid children ({left}, {right})."
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(AppError::load(format!(
                            "Tree {tree_idx} node {idx} has a non-finite threshold."
                        )));
                    }
                }
                Node::Leaf { value } => {
                    let total = value[0] + value[1];
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) || total <= 0.0 {
                        return Err(AppError::load(format!(
                            "Tree {tree_idx} leaf {idx} has invalid class weights."
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root; `x[feature] <= threshold` goes left.
    fn leaf_proba(&self, x: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
                Node::Leaf { value } => {
                    let total = value[0] + value[1];
                    return [value[0] / total, value[1] / total];
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Self {
        Self { n_features, trees }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.trees.is_empty() {
            return Err(AppError::load("Random forest has no trees."));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx, self.n_features)?;
        }
        Ok(())
    }

    pub(crate) fn proba(&self, x: &[f64]) -> [f64; 2] {
        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let p = tree.leaf_proba(x);
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: [f64; 2], high: [f64; 2]) -> Tree {
        Tree::new(vec![
            Node::split(feature, threshold, 1, 2),
            Node::leaf(low[0], low[1]),
            Node::leaf(high[0], high[1]),
        ])
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let tree = stump(0, 1.0, [3.0, 1.0], [0.0, 2.0]);
        assert_eq!(tree.leaf_proba(&[1.0]), [0.75, 0.25]);
        assert_eq!(tree.leaf_proba(&[1.0001]), [0.0, 1.0]);
    }

    #[test]
    fn forest_averages_trees() {
        let forest = RandomForest::new(
            2,
            vec![
                stump(0, 0.0, [1.0, 0.0], [0.0, 1.0]),
                stump(1, 0.0, [1.0, 1.0], [0.0, 1.0]),
            ],
        );
        forest.validate().unwrap();
        assert_eq!(forest.proba(&[1.0, -1.0]), [0.25, 0.75]);
        assert_eq!(forest.proba(&[-1.0, -1.0]), [0.75, 0.25]);
    }

    #[test]
    fn backward_child_is_rejected() {
        let tree = Tree::new(vec![Node::split(0, 0.0, 0, 1), Node::leaf(1.0, 0.0)]);
        let forest = RandomForest::new(1, vec![tree]);
        assert!(forest.validate().is_err());
    }

    #[test]
    fn out_of_range_feature_is_a_mismatch() {
        let forest = RandomForest::new(1, vec![stump(3, 0.0, [1.0, 0.0], [0.0, 1.0])]);
        let err = forest.validate().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ArtifactMismatch);
    }

    #[test]
    fn empty_leaf_is_rejected() {
        let forest = RandomForest::new(1, vec![Tree::new(vec![Node::leaf(0.0, 0.0)])]);
        assert!(forest.validate().is_err());
    }

    #[test]
    fn nodes_deserialize_untagged() {
        let tree: Tree = serde_json::from_str(
            r#"{"nodes":[{"feature":0,"threshold":0.5,"left":1,"right":2},{"value":[4,0]},{"value":[0,4]}]}"#,
        )
        .unwrap();
        assert_eq!(tree.nodes[0], Node::split(0, 0.5, 1, 2));
        assert_eq!(tree.nodes[2], Node::leaf(0.0, 4.0));
    }
}
