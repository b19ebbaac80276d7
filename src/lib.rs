//! An ordered map from string keys to unsigned integers implemented with an AVL tree.
//!
//! Every subtree is owned by exactly one `Box` in its parent (or by the tree for the root).
//! Insert and remove descend recursively and rebalance on the way back up, so the tree
//! height stays logarithmic in the number of entries.
//!
//! ```
//! use avl_index::AvlTree;
//! let mut tree = AvlTree::new();
//! tree.insert("apple", 3);
//! tree.insert("banana", 5);
//! tree["cherry"] += 7;
//! assert_eq!(tree.keys(), vec!["apple", "banana", "cherry"]);
//! assert_eq!(tree.find_range("b", "d"), vec![5, 7]);
//! ```

#![forbid(unsafe_code)]

mod node;
mod tree;

pub use tree::{AvlTree, Iter};

#[cfg(test)]
mod proptests;
