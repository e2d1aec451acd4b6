//! B-tree node type.
//!
//! A node stores its keys in ascending order, one payload per key, and owns
//! its children outright. Parents are never referenced from below: every
//! structural change happens top-down, starting at the node that owns the
//! child being changed.

/// Integer key for the index.
pub type Key = i64;

/// A single B-tree node.
///
/// `keys[i]` and `payloads[i]` always belong together. For an internal node
/// with `k` keys, `children[i]` holds keys below `keys[i]` and
/// `children[k]` holds keys above `keys[k - 1]`.
#[derive(Debug)]
pub struct Node<V> {
    /// Keys in ascending order.
    pub keys: Vec<Key>,
    /// Payloads aligned index-for-index with `keys`.
    pub payloads: Vec<V>,
    /// Owned child subtrees. Empty iff `is_leaf`.
    pub children: Vec<Self>,
    pub is_leaf: bool,
}

impl<V> Node<V> {
    /// Create a new empty leaf node.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::new() is not const-stable
    pub fn new_leaf() -> Self {
        Self {
            keys: Vec::new(),
            payloads: Vec::new(),
            children: Vec::new(),
            is_leaf: true,
        }
    }

    /// Create an internal node whose only child is `child`.
    ///
    /// Used when the root is full: the old root becomes the sole child of a
    /// new root, which is then immediately split.
    #[must_use]
    pub fn with_single_child(child: Self) -> Self {
        Self {
            keys: Vec::new(),
            payloads: Vec::new(),
            children: vec![child],
            is_leaf: false,
        }
    }

    /// Number of keys stored in this node.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check if the node is full for minimum degree `t`.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn is_full(&self, t: usize) -> bool {
        self.keys.len() == 2 * t - 1
    }

    /// Index of the first key strictly greater than `key`.
    ///
    /// Equal keys sort to the left of the returned index, so this is both the
    /// child to descend into during insertion and the leaf slot a new pair
    /// goes into.
    #[must_use]
    pub fn upper_bound(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k <= key)
    }

    /// Index of the first key greater than or equal to `key`.
    #[must_use]
    pub fn lower_bound(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k < key)
    }

    /// Insert a pair into a non-full leaf, after every key `<= key`.
    pub fn insert_into_leaf(&mut self, key: Key, payload: V) {
        debug_assert!(self.is_leaf, "insert_into_leaf called on internal node");
        let idx = self.upper_bound(key);
        self.keys.insert(idx, key);
        self.payloads.insert(idx, payload);
    }

    /// Split the full child at `index`, promoting its median into `self`.
    ///
    /// Given a child with `2t - 1` keys:
    /// - the child keeps positions `[0, t - 2]` and, if internal, children `[0, t - 1]`
    /// - a new right sibling takes positions `[t, 2t - 2]` and children `[t, 2t - 1]`
    /// - the median at `t - 1` moves into `self` at `index`, with the sibling
    ///   inserted at `children[index + 1]`
    pub fn split_child(&mut self, index: usize, t: usize) {
        let full = &mut self.children[index];
        debug_assert!(full.is_full(t), "split_child called on non-full child");

        // Median plus everything after it; the median is then peeled off the front
        let mut right_keys = full.keys.split_off(t - 1);
        let mut right_payloads = full.payloads.split_off(t - 1);
        let median_key = right_keys.remove(0);
        let median_payload = right_payloads.remove(0);
        let right_children: Vec<Self> = if full.is_leaf {
            Vec::new()
        } else {
            full.children.split_off(t)
        };

        let right = Self {
            keys: right_keys,
            payloads: right_payloads,
            children: right_children,
            is_leaf: full.is_leaf,
        };

        self.keys.insert(index, median_key);
        self.payloads.insert(index, median_payload);
        self.children.insert(index + 1, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(keys: &[Key]) -> Node<Key> {
        let mut node = Node::new_leaf();
        for &k in keys {
            node.insert_into_leaf(k, k * 100);
        }
        node
    }

    #[test]
    fn test_new_leaf_is_empty() {
        let node: Node<()> = Node::new_leaf();
        assert!(node.is_leaf);
        assert!(node.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_is_full() {
        assert!(!leaf_with(&[1, 2]).is_full(2));
        assert!(leaf_with(&[1, 2, 3]).is_full(2));
        assert!(!leaf_with(&[1, 2, 3]).is_full(3));
    }

    #[test]
    fn test_insert_into_leaf_keeps_order() {
        let node = leaf_with(&[30, 10, 20]);
        assert_eq!(node.keys, vec![10, 20, 30]);
        assert_eq!(node.payloads, vec![1000, 2000, 3000]);
    }

    #[test]
    fn test_duplicate_lands_after_equal_key() {
        let mut node = leaf_with(&[10, 20]);
        node.insert_into_leaf(10, -1);
        assert_eq!(node.keys, vec![10, 10, 20]);
        assert_eq!(node.payloads, vec![1000, -1, 2000]);
    }

    #[test]
    fn test_bounds() {
        let node = leaf_with(&[10, 20, 30]);

        // Key less than first key -> first slot
        assert_eq!(node.upper_bound(5), 0);
        // Key equal to a key -> after it
        assert_eq!(node.upper_bound(10), 1);
        assert_eq!(node.lower_bound(10), 0);
        // Key between keys
        assert_eq!(node.upper_bound(25), 2);
        assert_eq!(node.lower_bound(25), 2);
        // Key greater than all -> last slot
        assert_eq!(node.upper_bound(35), 3);
    }

    #[test]
    fn test_split_leaf_child() {
        let mut parent = Node::with_single_child(leaf_with(&[10, 20, 30]));
        parent.split_child(0, 2);

        assert_eq!(parent.keys, vec![20]);
        assert_eq!(parent.payloads, vec![2000]);
        assert_eq!(parent.children.len(), 2);
        assert_eq!(parent.children[0].keys, vec![10]);
        assert_eq!(parent.children[1].keys, vec![30]);
        assert!(parent.children[1].is_leaf);
    }

    #[test]
    fn test_split_internal_child_moves_children() {
        // Internal node with 5 keys (t = 3) and 6 leaf children
        let full = Node {
            keys: vec![10, 20, 30, 40, 50],
            payloads: vec![1000, 2000, 3000, 4000, 5000],
            children: [5, 15, 25, 35, 45, 55]
                .iter()
                .map(|&k| leaf_with(&[k]))
                .collect(),
            is_leaf: false,
        };

        let mut parent = Node::with_single_child(full);
        parent.split_child(0, 3);

        assert_eq!(parent.keys, vec![30]);
        let left = &parent.children[0];
        let right = &parent.children[1];
        assert_eq!(left.keys, vec![10, 20]);
        assert_eq!(right.keys, vec![40, 50]);
        assert!(!right.is_leaf);

        let left_children: Vec<Key> = left.children.iter().map(|c| c.keys[0]).collect();
        let right_children: Vec<Key> = right.children.iter().map(|c| c.keys[0]).collect();
        assert_eq!(left_children, vec![5, 15, 25]);
        assert_eq!(right_children, vec![35, 45, 55]);
    }

    #[test]
    fn test_split_inserts_at_index() {
        // Parent [50] with a full left child and a small right child
        let mut parent = Node::with_single_child(leaf_with(&[10, 20, 30]));
        parent.keys.push(50);
        parent.payloads.push(5000);
        parent.children.push(leaf_with(&[60]));

        parent.split_child(0, 2);

        assert_eq!(parent.keys, vec![20, 50]);
        let firsts: Vec<Key> = parent.children.iter().map(|c| c.keys[0]).collect();
        assert_eq!(firsts, vec![10, 30, 60]);
    }
}
