//! In-memory B-tree with preemptive split-on-insert.
//!
//! Insertion splits every full node it is about to enter, so the node being
//! descended into is never full and splits never have to propagate upward.
//! Height only grows when the root itself is split.

use crate::btree::node::{Key, Node};

/// Smallest minimum degree that yields a valid B-tree.
pub const MIN_DEGREE: usize = 2;

/// An in-memory B-tree mapping integer keys to payloads.
///
/// The tree only grows: there is no removal, and `insert` never rejects or
/// overwrites an existing key. Callers that need unique keys must `search`
/// first.
#[derive(Debug)]
pub struct BTree<V> {
    pub(crate) root: Node<V>,
    /// Minimum degree `t`. Nodes hold at most `2t - 1` keys.
    pub(crate) t: usize,
    /// Records inserted so far.
    len: usize,
}

/// Structural statistics for a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TreeStats {
    pub node_count: usize,
    pub total_records: usize,
    pub height: usize,
    pub minimum_degree: usize,
}

impl<V> BTree<V> {
    /// Create a new empty tree with minimum degree `t`.
    pub fn new(t: usize) -> Result<Self, BTreeError> {
        if t < MIN_DEGREE {
            return Err(BTreeError::InvalidDegree(t));
        }
        Ok(Self {
            root: Node::new_leaf(),
            t,
            len: 0,
        })
    }

    /// Get the minimum degree.
    #[must_use]
    pub const fn minimum_degree(&self) -> usize {
        self.t
    }

    /// Number of records inserted, duplicates included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no records.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Insert a key-payload pair.
    ///
    /// A duplicate key produces a second entry placed after the existing one.
    pub fn insert(&mut self, key: Key, payload: V) {
        let t = self.t;

        if self.root.is_full(t) {
            let old_root = std::mem::replace(&mut self.root, Node::new_leaf());
            self.root = Node::with_single_child(old_root);
            self.root.split_child(0, t);
        }

        let mut node = &mut self.root;
        while !node.is_leaf {
            let mut i = node.upper_bound(key);
            if node.children[i].is_full(t) {
                node.split_child(i, t);
                if node.keys[i] <= key {
                    i += 1;
                }
            }
            node = &mut node.children[i];
        }
        node.insert_into_leaf(key, payload);
        self.len += 1;
    }

    /// Look up a payload by key.
    ///
    /// If the key was inserted more than once, returns the first match met
    /// on the way down.
    #[must_use]
    pub fn search(&self, key: Key) -> Option<&V> {
        let mut node = &self.root;
        loop {
            let i = node.lower_bound(key);
            if node.keys.get(i) == Some(&key) {
                return Some(&node.payloads[i]);
            }
            if node.is_leaf {
                return None;
            }
            node = &node.children[i];
        }
    }

    /// All payloads in ascending key order.
    #[must_use]
    pub fn in_order(&self) -> Vec<&V> {
        let mut out = Vec::new();
        Self::collect_in_order(&self.root, &mut out);
        out
    }

    fn collect_in_order<'a>(node: &'a Node<V>, out: &mut Vec<&'a V>) {
        if node.is_leaf {
            out.extend(node.payloads.iter());
            return;
        }
        for (i, payload) in node.payloads.iter().enumerate() {
            Self::collect_in_order(&node.children[i], out);
            out.push(payload);
        }
        if let Some(last) = node.children.last() {
            Self::collect_in_order(last, out);
        }
    }

    /// Visit every node in pre-order: a node first, then its children left to right.
    pub(crate) fn for_each_node_preorder<'a, E>(
        &'a self,
        mut visit: impl FnMut(&'a Node<V>) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            visit(node)?;
            stack.extend(node.children.iter().rev());
        }
        Ok(())
    }

    /// Compute structural statistics.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            node_count: Self::count_nodes(&self.root),
            total_records: self.in_order().len(),
            height: self.height(),
            minimum_degree: self.t,
        }
    }

    fn count_nodes(node: &Node<V>) -> usize {
        1 + node.children.iter().map(Self::count_nodes).sum::<usize>()
    }

    /// Height measured along the leftmost path. A lone leaf has height 1.
    ///
    /// Only equals the true height while every leaf sits at the same depth,
    /// which split-on-insert guarantees. Revisit if removal is ever added.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while let Some(first) = node.children.first() {
            height += 1;
            node = first;
        }
        height
    }
}

/// Errors that can occur when working with the B-tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// Minimum degree below 2.
    InvalidDegree(usize),
    /// A record lacks the field a scan or sort asked for.
    MissingField { key: Key, field: &'static str },
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDegree(t) => {
                write!(f, "invalid minimum degree: {t} (must be at least {MIN_DEGREE})")
            }
            Self::MissingField { key, field } => {
                write!(f, "record {key} has no {field}")
            }
        }
    }
}

impl std::error::Error for BTreeError {}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    use super::*;

    fn tree_with(t: usize, keys: &[Key]) -> BTree<Key> {
        let mut tree = BTree::new(t).expect("create tree");
        for &k in keys {
            tree.insert(k, k * 10);
        }
        tree
    }

    fn keys_in_order(tree: &BTree<Key>) -> Vec<Key> {
        tree.in_order().into_iter().map(|v| v / 10).collect()
    }

    #[test]
    fn test_new_rejects_small_degree() {
        assert_eq!(BTree::<()>::new(0).unwrap_err(), BTreeError::InvalidDegree(0));
        assert_eq!(BTree::<()>::new(1).unwrap_err(), BTreeError::InvalidDegree(1));
        assert!(BTree::<()>::new(2).is_ok());
    }

    #[test]
    fn test_empty_tree() {
        let tree: BTree<Key> = BTree::new(3).expect("create tree");
        assert!(tree.is_empty());
        assert!(tree.search(1).is_none());
        assert!(tree.in_order().is_empty());
        assert_eq!(
            tree.stats(),
            TreeStats {
                node_count: 1,
                total_records: 0,
                height: 1,
                minimum_degree: 3,
            }
        );
    }

    #[test]
    fn test_single_leaf_until_full() {
        let tree = tree_with(2, &[10, 20, 30]);
        assert!(tree.root.is_leaf);
        assert_eq!(tree.root.keys, vec![10, 20, 30]);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_root_split_scenario() {
        let mut tree = tree_with(2, &[10, 20, 30]);

        tree.insert(40, 400);
        assert_eq!(tree.root.keys, vec![20]);
        assert_eq!(tree.root.children[0].keys, vec![10]);
        assert_eq!(tree.root.children[1].keys, vec![30, 40]);

        tree.insert(50, 500);
        assert_eq!(tree.root.children[1].keys, vec![30, 40, 50]);

        let stats = tree.stats();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.total_records, 5);
        assert_eq!(stats.height, 2);
        assert_eq!(keys_in_order(&tree), vec![10, 20, 30, 40, 50]);

        assert!(tree.search(25).is_none());
        assert_eq!(tree.search(30), Some(&300));
    }

    #[test]
    fn test_promoted_key_shifts_descent() {
        // Root [20] with right leaf [30, 40, 50]; inserting 45 splits the
        // right leaf (promoting 40) and must descend right of 40.
        let mut tree = tree_with(2, &[10, 20, 30, 40, 50]);
        tree.insert(45, 450);

        assert_eq!(tree.root.keys, vec![20, 40]);
        assert_eq!(tree.root.children[2].keys, vec![45, 50]);
        assert_eq!(keys_in_order(&tree), vec![10, 20, 30, 40, 45, 50]);
    }

    #[test]
    fn test_insert_equal_to_promoted_key_goes_right() {
        let mut tree = tree_with(2, &[10, 20, 30, 40, 50]);
        tree.insert(40, 401);

        assert_eq!(tree.root.keys, vec![20, 40]);
        assert_eq!(tree.root.children[2].keys, vec![40, 50]);
        assert_eq!(tree.search(40), Some(&400));
        tree.validate().expect("valid tree");
    }

    #[test]
    fn test_duplicate_key_is_not_overwritten() {
        let mut tree = tree_with(3, &[1, 2, 3]);
        tree.insert(2, -2);

        assert_eq!(tree.stats().total_records, 4);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.search(2), Some(&20));
        assert_eq!(tree.in_order(), vec![&10, &20, &-2, &30]);
    }

    #[test]
    fn test_descending_inserts() {
        let keys: Vec<Key> = (0..200).rev().collect();
        let tree = tree_with(2, &keys);
        tree.validate().expect("valid tree");
        assert_eq!(keys_in_order(&tree), (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_many_inserts_random_order() {
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let t = 2 + usize::try_from(seed % 4).expect("small");
            let mut keys: Vec<Key> = (0..500).map(|k| k * 3).collect();
            keys.shuffle(&mut rng);

            let mut tree = BTree::new(t).expect("create tree");
            for &k in &keys {
                tree.insert(k, k * 10);
                tree.validate().expect("invariants hold after every insert");
            }

            assert_eq!(keys_in_order(&tree), (0..500).map(|k| k * 3).collect::<Vec<_>>());
            assert_eq!(tree.len(), tree.stats().total_records);
            for &k in &keys {
                assert_eq!(tree.search(k), Some(&(k * 10)), "seed {seed} key {k}");
            }
            for missing in [-1, 1, 2, 4, 1500] {
                assert!(tree.search(missing).is_none(), "seed {seed} key {missing}");
            }
        }
    }

    #[test]
    fn test_height_matches_every_leaf_depth() {
        let keys: Vec<Key> = (0..1000).collect();
        let tree = tree_with(3, &keys);

        let mut depths = Vec::new();
        let mut stack = vec![(&tree.root, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            if node.is_leaf {
                depths.push(depth);
            }
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        assert!(depths.iter().all(|&d| d == tree.height()));
    }

    #[test]
    fn test_node_count() {
        let tree = tree_with(2, &(0..10).collect::<Vec<_>>());
        let mut expected = 0;
        tree.for_each_node_preorder(|_| {
            expected += 1;
            Ok::<(), ()>(())
        })
        .expect("visit");
        assert_eq!(tree.stats().node_count, expected);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            BTreeError::InvalidDegree(1).to_string(),
            "invalid minimum degree: 1 (must be at least 2)"
        );
        assert_eq!(
            BTreeError::MissingField {
                key: 7,
                field: "location"
            }
            .to_string(),
            "record 7 has no location"
        );
    }
}
