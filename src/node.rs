use std::cmp::{self, Ordering};

pub(crate) type Link = Option<Box<Node>>;

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) key: String,
    pub(crate) value: usize,
    pub(crate) height: usize,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

/// Returns the cached height of a subtree, zero for an empty one.
pub(crate) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

impl Node {
    pub(crate) fn new(key: String, value: usize) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    /// 0, 1 or 2
    pub(crate) fn num_children(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Height of left subtree minus height of right subtree.
    pub(crate) fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    pub(crate) fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    /// Returns the in-order successor: the leftmost node of the right subtree.
    pub(crate) fn successor(&self) -> Option<&Node> {
        let mut current = self.right.as_deref()?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Some(current)
    }

    pub(crate) fn find(&self, key: &str) -> Option<&Node> {
        let mut current = self;
        loop {
            current = match key.cmp(current.key.as_str()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current.left.as_deref()?,
                Ordering::Greater => current.right.as_deref()?,
            };
        }
    }

    /// Returns the value of the node holding the key, or of the last node on the
    /// search path if there is none. Callers make sure the key is present.
    pub(crate) fn value_mut(&mut self, key: &str) -> &mut usize {
        match key.cmp(self.key.as_str()) {
            Ordering::Less => {
                if let Some(left) = self.left.as_deref_mut() {
                    return left.value_mut(key);
                }
            }
            Ordering::Greater => {
                if let Some(right) = self.right.as_deref_mut() {
                    return right.value_mut(key);
                }
            }
            Ordering::Equal => {}
        }
        debug_assert_eq!(self.key, key);
        &mut self.value
    }

    pub(crate) fn find_mut(&mut self, key: &str) -> Option<&mut Node> {
        let mut current = self;
        loop {
            current = match key.cmp(current.key.as_str()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current.left.as_deref_mut()?,
                Ordering::Greater => current.right.as_deref_mut()?,
            };
        }
    }
}

/// Rotates the subtree left and returns its new root.
/// The inner grandchild (left child of the right child) moves across.
/// Without a right child the node is returned unchanged.
pub(crate) fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    match node.right.take() {
        None => node,
        Some(mut right) => {
            node.right = right.left.take();
            node.adjust_height();
            right.left = Some(node);
            right.adjust_height();
            right
        }
    }
}

/// Rotates the subtree right and returns its new root.
/// The inner grandchild (right child of the left child) moves across.
/// Without a left child the node is returned unchanged.
pub(crate) fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    match node.left.take() {
        None => node,
        Some(mut left) => {
            node.left = left.right.take();
            node.adjust_height();
            left.right = Some(node);
            left.adjust_height();
            left
        }
    }
}

/// Adjusts the height of the given subtree root and restores the AVL condition
/// if necessary. Initial balance must not exceed +2 or -2, which always holds
/// after a single insert or remove below this node.
pub(crate) fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.adjust_height();
    let balance = node.balance();
    debug_assert!((-2..=2).contains(&balance));
    if balance > 1 {
        // Left-right case: straighten the left child first
        if node.left.as_ref().map_or(0, |left| left.balance()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if balance < -1 {
        // Right-left case: straighten the right child first
        if node.right.as_ref().map_or(0, |right| right.balance()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}
