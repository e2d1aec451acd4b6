//! In-memory B-tree index for the provider directory.
//!
//! This module provides a classic B-tree keyed by integer id.
//!
//! # Structure
//!
//! Every node holds up to `2t - 1` keys with one payload per key. Internal
//! nodes own one more child than they have keys. Nodes are split on the way
//! down during insertion, so all leaves stay at the same depth without any
//! separate rebalancing step.
//!
//! # Usage
//!
//! ```
//! use directory::btree::BTree;
//!
//! let mut tree = BTree::new(2).expect("valid degree");
//! for key in [10, 20, 30, 40, 50] {
//!     tree.insert(key, key * 100);
//! }
//!
//! assert_eq!(tree.search(30), Some(&3000));
//! assert_eq!(tree.search(25), None);
//!
//! let stats = tree.stats();
//! assert_eq!(stats.node_count, 3);
//! assert_eq!(stats.height, 2);
//! ```

mod invariants;
mod node;
mod query;
mod tree;

pub use invariants::InvariantViolation;
pub use node::{Key, Node};
pub use tree::{BTree, BTreeError, MIN_DEGREE, TreeStats};
