use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, IndexMut};

use crate::node::{self, Link, Node};

/// An ordered map from string keys to unsigned integers implemented with an AVL tree.
///
/// ```
/// use avl_index::AvlTree;
/// let mut tree = AvlTree::new();
/// tree.insert("b", 2);
/// tree.insert("a", 1);
/// tree.insert("c", 3);
/// assert_eq!(tree.get("a"), Some(1));
/// assert_eq!(tree.find_range("a", "b"), vec![1, 2]);
/// tree.remove("a");
/// assert!(!tree.contains_key("a"));
/// ```
#[derive(Clone, Default)]
pub struct AvlTree {
    root: Link,
    num_nodes: usize,
}

/// An iterator over the entries of a tree in ascending key order.
#[derive(Clone)]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
    remaining: usize,
}

/// Result of one removal descent.
enum Removal {
    /// No node holds the key.
    Absent,
    /// A leaf or single-child node was unlinked.
    Detached,
    /// The node holding the key has two children; nothing was changed yet.
    Successor(String, usize),
}

impl AvlTree {
    /// Creates an empty tree.
    /// No memory is allocated until the first entry is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns true if the tree contains an entry for the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value stored for the key.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.find(key).map(|node| node.value)
    }

    /// Returns a mutable reference to the value stored for the key.
    /// Unlike indexing, this never inserts.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut usize> {
        self.root
            .as_deref_mut()
            .and_then(|root| root.find_mut(key))
            .map(|node| &mut node.value)
    }

    /// Returns a mutable reference to the value stored for the key,
    /// inserting an entry with value 0 first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: &str) -> &mut usize {
        let (root, inserted) = Self::insert_into(self.root.take(), key, 0);
        if inserted {
            self.num_nodes += 1;
        }
        self.root.insert(root).value_mut(key)
    }

    /// Inserts a key-value pair into the tree.
    /// Returns false and leaves the stored value untouched if the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: usize) -> bool {
        let key: String = key.into();
        let (root, inserted) = Self::insert_into(self.root.take(), key, value);
        self.root = Some(root);
        if inserted {
            self.num_nodes += 1;
        }
        inserted
    }

    /// Removes the entry for the key.
    /// Returns whether the key was previously in the tree.
    pub fn remove(&mut self, key: &str) -> bool {
        let (root, removal) = Self::remove_from(self.root.take(), key);
        self.root = root;
        match removal {
            Removal::Absent => false,
            Removal::Detached => {
                debug_assert!(self.num_nodes >= 1);
                self.num_nodes -= 1;
                true
            }
            Removal::Successor(successor_key, successor_value) => {
                // Unlink the successor starting from the root, so every node on the
                // path down to it gets its height adjusted and is rebalanced.
                let (root, removal) = Self::remove_from(self.root.take(), &successor_key);
                self.root = root;
                debug_assert!(matches!(removal, Removal::Detached));

                // Rotations move nodes around but never free them,
                // so the node holding the key is still there.
                if let Some(node) = self.root.as_deref_mut().and_then(|root| root.find_mut(key)) {
                    node.key = successor_key;
                    node.value = successor_value;
                }
                self.num_nodes -= 1;
                debug_assert!(!self.contains_key(key));
                true
            }
        }
    }

    /// Returns the values of all entries with `low <= key <= high`, in ascending key order.
    pub fn find_range(&self, low: &str, high: &str) -> Vec<usize> {
        let mut values = Vec::new();
        Self::collect_range(self.root.as_deref(), low, high, &mut values);
        values
    }

    /// Returns all keys in ascending order.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_owned()).collect()
    }

    /// Returns all values in ascending key order.
    pub fn values(&self) -> Vec<usize> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Gets an iterator over the entries of the tree in ascending key order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height()),
            remaining: self.num_nodes,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Visits all entries level by level, starting at the root.
    pub fn traverse_level_order<F: FnMut(&str, usize)>(&self, mut f: F) {
        let mut queue: VecDeque<&Node> = VecDeque::with_capacity(self.num_nodes);
        queue.extend(self.root.as_deref());
        while let Some(node) = queue.pop_front() {
            f(node.key.as_str(), node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        fn check(
            link: &Link,
            low: Option<&str>,
            high: Option<&str>,
            num_nodes: &mut usize,
        ) -> usize {
            let node = match link {
                None => return 0,
                Some(node) => node,
            };

            // Check ordering against all ancestors
            if let Some(low) = low {
                assert!(low < node.key.as_str());
            }
            if let Some(high) = high {
                assert!(node.key.as_str() < high);
            }

            let left_height = check(&node.left, low, Some(node.key.as_str()), num_nodes);
            let right_height = check(&node.right, Some(node.key.as_str()), high, num_nodes);

            // Check height
            assert_eq!(node.height, 1 + left_height.max(right_height));

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            *num_nodes += 1;
            node.height
        }

        let mut num_nodes = 0;
        check(&self.root, None, None, &mut num_nodes);

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
    }

    fn find(&self, key: &str) -> Option<&Node> {
        self.root.as_deref().and_then(|root| root.find(key))
    }

    // The key is only turned into an owned `String` when a new node is created.
    fn insert_into<K>(link: Link, key: K, value: usize) -> (Box<Node>, bool)
    where
        K: AsRef<str> + Into<String>,
    {
        let mut node = match link {
            None => return (Node::new(key.into(), value), true),
            Some(node) => node,
        };

        let inserted = match key.as_ref().cmp(node.key.as_str()) {
            Ordering::Equal => false,
            Ordering::Less => {
                let (left, inserted) = Self::insert_into(node.left.take(), key, value);
                node.left = Some(left);
                inserted
            }
            Ordering::Greater => {
                let (right, inserted) = Self::insert_into(node.right.take(), key, value);
                node.right = Some(right);
                inserted
            }
        };

        if inserted {
            (node::rebalance(node), true)
        } else {
            (node, false)
        }
    }

    fn remove_from(link: Link, key: &str) -> (Link, Removal) {
        let mut node = match link {
            None => return (None, Removal::Absent),
            Some(node) => node,
        };

        let removal = match key.cmp(node.key.as_str()) {
            Ordering::Less => {
                let (left, removal) = Self::remove_from(node.left.take(), key);
                node.left = left;
                removal
            }
            Ordering::Greater => {
                let (right, removal) = Self::remove_from(node.right.take(), key);
                node.right = right;
                removal
            }
            Ordering::Equal => return Self::unlink(node),
        };

        match removal {
            Removal::Detached => (Some(node::rebalance(node)), removal),
            _ => (Some(node), removal),
        }
    }

    // Leaf and stem nodes are unlinked directly, their child (if any) taking their place.
    // Nodes with two children are left in place and reported with their successor.
    fn unlink(mut node: Box<Node>) -> (Link, Removal) {
        if node.is_leaf() {
            return (None, Removal::Detached);
        }
        match node.num_children() {
            1 => (node.left.take().or_else(|| node.right.take()), Removal::Detached),
            _ => {
                let removal = match node.successor() {
                    Some(successor) => Removal::Successor(successor.key.clone(), successor.value),
                    None => Removal::Absent,
                };
                (Some(node), removal)
            }
        }
    }

    fn collect_range(link: Option<&Node>, low: &str, high: &str, values: &mut Vec<usize>) {
        let node = match link {
            None => return,
            Some(node) => node,
        };
        let key = node.key.as_str();
        if key > low {
            Self::collect_range(node.left.as_deref(), low, high, values);
        }
        if low <= key && key <= high {
            values.push(node.value);
        }
        if key < high {
            Self::collect_range(node.right.as_deref(), low, high, values);
        }
    }

    fn fmt_sideways(link: Option<&Node>, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = link {
            Self::fmt_sideways(node.right.as_deref(), depth + 1, f)?;
            writeln!(f, "{:indent$}{}: {}", "", node.key, node.value, indent = depth * 4)?;
            Self::fmt_sideways(node.left.as_deref(), depth + 1, f)?;
        }
        Ok(())
    }
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((node.key.as_str(), node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = (&'a str, usize);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<&str> for AvlTree {
    type Output = usize;

    /// Returns a reference to the value stored for the key, or to 0 if the key is absent.
    /// Reading never inserts; only `IndexMut` does.
    fn index(&self, key: &str) -> &usize {
        self.find(key).map_or(&0, |node| &node.value)
    }
}

impl IndexMut<&str> for AvlTree {
    /// Returns a mutable reference to the value stored for the key,
    /// inserting an entry with value 0 first if the key is absent.
    fn index_mut(&mut self, key: &str) -> &mut usize {
        self.get_or_insert_default(key)
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for AvlTree {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Into<String>> Extend<(K, usize)> for AvlTree {
    fn extend<I: IntoIterator<Item = (K, usize)>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |(key, value)| {
            self.insert(key, value);
        });
    }
}

impl PartialEq for AvlTree {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for AvlTree {}

impl fmt::Debug for AvlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for AvlTree {
    /// Renders the tree sideways: right subtree above, left subtree below,
    /// indented by depth. The format is meant for debugging only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_sideways(self.root.as_deref(), 0, f)
    }
}
