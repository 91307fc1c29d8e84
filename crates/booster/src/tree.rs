use crate::error::BoosterError;
use crate::model::RawTree;

const LEAF: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Node {
    left: i32,
    right: i32,
    feature: u32,
    /// Split threshold for inner nodes, output value for leaves.
    value: f32,
    default_left: bool,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.left == LEAF
    }
}

/// A single regression tree in array form, root at index 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn from_raw(index: usize, raw: RawTree) -> Result<Self, BoosterError> {
        let invalid = |reason: String| BoosterError::InvalidTree {
            tree: index,
            reason,
        };

        let len = raw.left_children.len();
        if len == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }
        let lengths = [
            ("right_children", raw.right_children.len()),
            ("split_indices", raw.split_indices.len()),
            ("split_conditions", raw.split_conditions.len()),
            ("default_left", raw.default_left.len()),
        ];
        for (name, other) in lengths {
            if other != len {
                return Err(invalid(format!(
                    "{name} has {other} entries, left_children has {len}"
                )));
            }
        }
        if raw.split_type.iter().any(|kind| *kind != 0) {
            return Err(invalid("categorical splits are not supported".to_string()));
        }

        let mut nodes = Vec::with_capacity(len);
        for node in 0..len {
            let left = raw.left_children[node];
            let right = raw.right_children[node];
            if left == LEAF {
                if right != LEAF {
                    return Err(invalid(format!("node {node} has only a right child")));
                }
            } else {
                // Children always follow their parent, which also rules out cycles.
                for child in [left, right] {
                    let in_range = usize::try_from(child)
                        .map(|child| child > node && child < len)
                        .unwrap_or(false);
                    if !in_range {
                        return Err(invalid(format!("node {node} has bad child {child}")));
                    }
                }
            }
            let feature = u32::try_from(raw.split_indices[node])
                .map_err(|_| invalid(format!("node {node} has negative split index")))?;
            nodes.push(Node {
                left,
                right,
                feature,
                value: raw.split_conditions[node],
                default_left: raw.default_left[node].is_set(),
            });
        }
        Ok(Self { nodes })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Largest feature index any split reads, if the tree has splits.
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter(|node| !node.is_leaf())
            .map(|node| node.feature as usize)
            .max()
    }

    /// Walks from the root to a leaf. `features` must be at least
    /// `max_feature() + 1` long; the booster checks that before scoring.
    pub fn leaf_value(&self, features: &[f32]) -> f32 {
        let mut index = 0usize;
        loop {
            let node = &self.nodes[index];
            if node.is_leaf() {
                return node.value;
            }
            let value = features[node.feature as usize];
            let go_left = if value.is_nan() {
                node.default_left
            } else {
                value < node.value
            };
            let next = if go_left { node.left } else { node.right };
            index = next as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Flag;

    fn stump(feature: i64, threshold: f32, default_left: bool) -> RawTree {
        RawTree {
            left_children: vec![1, -1, -1],
            right_children: vec![2, -1, -1],
            split_indices: vec![feature, 0, 0],
            split_conditions: vec![threshold, -0.4, 0.6],
            default_left: vec![Flag::Bool(default_left), Flag::Int(0), Flag::Int(0)],
            split_type: vec![0, 0, 0],
        }
    }

    #[test]
    fn strict_less_than_goes_left() {
        let tree = Tree::from_raw(0, stump(1, 700.0, false)).expect("tree");
        assert_eq!(tree.leaf_value(&[0.0, 699.0]), -0.4);
        assert_eq!(tree.leaf_value(&[0.0, 700.0]), 0.6);
        assert_eq!(tree.max_feature(), Some(1));
        assert_eq!(tree.num_nodes(), 3);
    }

    #[test]
    fn missing_value_follows_default_direction() {
        let left = Tree::from_raw(0, stump(0, 1.0, true)).expect("tree");
        let right = Tree::from_raw(0, stump(0, 1.0, false)).expect("tree");
        assert_eq!(left.leaf_value(&[f32::NAN]), -0.4);
        assert_eq!(right.leaf_value(&[f32::NAN]), 0.6);
    }

    #[test]
    fn single_leaf_tree_has_no_features() {
        let raw = RawTree {
            left_children: vec![-1],
            right_children: vec![-1],
            split_indices: vec![0],
            split_conditions: vec![0.25],
            default_left: vec![Flag::Int(0)],
            split_type: Vec::new(),
        };
        let tree = Tree::from_raw(0, raw).expect("tree");
        assert_eq!(tree.max_feature(), None);
        assert_eq!(tree.leaf_value(&[]), 0.25);
    }

    #[test]
    fn rejects_mismatched_arrays() {
        let mut raw = stump(0, 1.0, false);
        raw.split_conditions.pop();
        let err = Tree::from_raw(4, raw).expect_err("mismatch").to_string();
        assert!(err.contains("tree 4"));
        assert!(err.contains("split_conditions"));
    }

    #[test]
    fn rejects_backward_child_links() {
        let mut raw = stump(0, 1.0, false);
        raw.left_children[0] = 0;
        assert!(Tree::from_raw(0, raw).is_err());
    }

    #[test]
    fn rejects_categorical_splits() {
        let mut raw = stump(0, 1.0, false);
        raw.split_type[0] = 1;
        assert!(Tree::from_raw(0, raw).is_err());
    }
}
