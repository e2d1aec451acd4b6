//! Structural invariant checking for the B-tree.
//!
//! Tests call [`BTree::validate`] after inserts to catch split bugs as soon
//! as they happen instead of through a wrong lookup much later.

use crate::btree::node::{Key, Node};
use crate::btree::tree::BTree;

/// A violated structural invariant, with the path of child indices from the
/// root to the offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Node holds more than `2t - 1` keys.
    Overfull { path: Vec<usize>, keys: usize },
    /// Non-root node holds fewer than `t - 1` keys.
    Underfull { path: Vec<usize>, keys: usize },
    /// `keys` and `payloads` have different lengths.
    PayloadMismatch { path: Vec<usize> },
    /// Internal node with `k` keys does not have `k + 1` children, or a leaf has children.
    ChildCount { path: Vec<usize>, keys: usize, children: usize },
    /// Keys out of order within a node or across a separator.
    KeyOrder { path: Vec<usize>, key: Key },
    /// Leaves found at different depths.
    UnevenLeaves { expected: usize, found: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overfull { path, keys } => write!(f, "node {path:?} is overfull ({keys} keys)"),
            Self::Underfull { path, keys } => {
                write!(f, "node {path:?} is underfull ({keys} keys)")
            }
            Self::PayloadMismatch { path } => {
                write!(f, "node {path:?} has misaligned keys and payloads")
            }
            Self::ChildCount {
                path,
                keys,
                children,
            } => write!(
                f,
                "node {path:?} has {keys} keys but {children} children"
            ),
            Self::KeyOrder { path, key } => write!(f, "key {key} out of order in node {path:?}"),
            Self::UnevenLeaves { expected, found } => {
                write!(f, "leaf at depth {found}, expected depth {expected}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

struct Checker {
    t: usize,
    leaf_depth: Option<usize>,
}

impl Checker {
    /// Check `node` and its subtree. Keys must lie within `[low, high]`.
    ///
    /// Bounds are inclusive because the tree accepts duplicate keys, and a
    /// duplicate of a separator may land in the subtree to its right.
    fn check<V>(
        &mut self,
        node: &Node<V>,
        path: &mut Vec<usize>,
        low: Option<Key>,
        high: Option<Key>,
    ) -> Result<(), InvariantViolation> {
        let keys = node.keys.len();
        if keys > 2 * self.t - 1 {
            return Err(InvariantViolation::Overfull {
                path: path.clone(),
                keys,
            });
        }
        if !path.is_empty() && keys < self.t - 1 {
            return Err(InvariantViolation::Underfull {
                path: path.clone(),
                keys,
            });
        }
        if node.payloads.len() != keys {
            return Err(InvariantViolation::PayloadMismatch { path: path.clone() });
        }

        let expected_children = if node.is_leaf { 0 } else { keys + 1 };
        if node.children.len() != expected_children {
            return Err(InvariantViolation::ChildCount {
                path: path.clone(),
                keys,
                children: node.children.len(),
            });
        }

        let mut prev = low;
        for &key in &node.keys {
            let below_prev = prev.is_some_and(|p| key < p);
            let above_high = high.is_some_and(|h| key > h);
            if below_prev || above_high {
                return Err(InvariantViolation::KeyOrder {
                    path: path.clone(),
                    key,
                });
            }
            prev = Some(key);
        }

        if node.is_leaf {
            let depth = path.len();
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(InvariantViolation::UnevenLeaves {
                        expected,
                        found: depth,
                    });
                }
                Some(_) => {}
            }
            return Ok(());
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_low = if i == 0 { low } else { Some(node.keys[i - 1]) };
            let child_high = node.keys.get(i).copied().or(high);
            path.push(i);
            self.check(child, path, child_low, child_high)?;
            path.pop();
        }
        Ok(())
    }
}

impl<V> BTree<V> {
    /// Verify every structural invariant of the tree.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut checker = Checker {
            t: self.t,
            leaf_depth: None,
        };
        checker.check(&self.root, &mut Vec::new(), None, None)
    }
}
