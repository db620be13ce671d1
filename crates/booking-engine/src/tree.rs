//! AVL-balanced interval tree.
//!
//! Nodes are keyed by `interval.low` and cache the largest `high` found in their
//! subtree, which lets overlap queries skip whole subtrees that end before the
//! query starts. Nodes live in an arena and refer to their children by index;
//! every index sits in at most one parent slot.
//!
//! The tree is meant to be built from a snapshot of bookings, queried, and
//! dropped. It has no removal operation.

use crate::interval::{Interval, OverlapRule};

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    interval: Interval,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Largest `high` in this node's subtree, the node itself included.
    max_high: i64,
    height: u32,
}

impl Node {
    fn leaf(interval: Interval) -> Self {
        let max_high = interval.high;
        Self {
            interval,
            left: None,
            right: None,
            max_high,
            height: 1,
        }
    }
}

/// Interval tree answering overlap queries under a fixed [`OverlapRule`].
#[derive(Debug, Clone)]
pub struct IntervalTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    rule: OverlapRule,
}

impl IntervalTree {
    pub fn new(rule: OverlapRule) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            rule,
        }
    }

    pub fn with_capacity(rule: OverlapRule, capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
            rule,
        }
    }

    /// Build a tree holding every interval in `intervals`.
    pub fn from_intervals<I>(rule: OverlapRule, intervals: I) -> Self
    where
        I: IntoIterator<Item = Interval>,
    {
        let intervals = intervals.into_iter();
        let mut tree = Self::with_capacity(rule, intervals.size_hint().0);
        tree.extend(intervals);
        tree
    }

    pub fn rule(&self) -> OverlapRule {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Largest `high` stored, if any.
    pub fn max_high(&self) -> Option<i64> {
        self.root.map(|id| self.nodes[id].max_high)
    }

    /// Insert an interval keyed by its `low`. Equal keys go to the right.
    pub fn insert(&mut self, interval: Interval) {
        let id = self.nodes.len();
        self.nodes.push(Node::leaf(interval));
        self.root = Some(self.insert_at(self.root, id));
    }

    /// Return some stored interval overlapping `query`, or `None` if none does.
    ///
    /// Which overlapping interval comes back depends on the tree's shape; it is
    /// not necessarily the one with the smallest `low`.
    pub fn search_any(&self, query: &Interval) -> Option<&Interval> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if node.interval.overlaps(query, self.rule) {
                return Some(&node.interval);
            }
            // If the left subtree reaches the query but holds no overlap, every
            // interval in it starts after the query ends, and so does every
            // interval to the right. Either way one side is enough.
            cursor = match node.left {
                Some(left) if self.rule.reaches(self.nodes[left].max_high, query.low) => {
                    Some(left)
                }
                _ => node.right,
            };
        }
        None
    }

    /// Iterate over every stored interval overlapping `query`, in `low` order.
    ///
    /// The traversal is lazy and keeps no state in the tree, so it can be
    /// started again at any time.
    pub fn search_all(&self, query: &Interval) -> Overlapping<'_> {
        let mut iter = Overlapping {
            tree: self,
            low: query.low,
            high: query.high,
            stack: Vec::new(),
        };
        iter.descend(self.root);
        iter
    }

    /// Iterate over all stored intervals in `low` order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::with_capacity(self.height() as usize),
        };
        iter.descend(self.root);
        iter
    }

    fn insert_at(&mut self, at: Option<NodeId>, new: NodeId) -> NodeId {
        let Some(id) = at else {
            return new;
        };

        if self.nodes[new].interval.low < self.nodes[id].interval.low {
            let left = self.insert_at(self.nodes[id].left, new);
            self.nodes[id].left = Some(left);
        } else {
            let right = self.insert_at(self.nodes[id].right, new);
            self.nodes[id].right = Some(right);
        }

        self.rebalance(id)
    }

    /// Restore height, `max_high` and the AVL balance at `id`. Returns the
    /// subtree's new root.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        self.update(id);
        let balance = self.balance(id);

        if balance > 1 {
            if let Some(left) = self.nodes[id].left {
                if self.balance(left) < 0 {
                    let left = self.rotate_left(left);
                    self.nodes[id].left = Some(left);
                }
            }
            return self.rotate_right(id);
        }

        if balance < -1 {
            if let Some(right) = self.nodes[id].right {
                if self.balance(right) > 0 {
                    let right = self.rotate_right(right);
                    self.nodes[id].right = Some(right);
                }
            }
            return self.rotate_left(id);
        }

        id
    }

    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let Some(x) = self.nodes[y].left else {
            return y;
        };
        self.nodes[y].left = self.nodes[x].right;
        self.nodes[x].right = Some(y);
        self.update(y);
        self.update(x);
        x
    }

    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        self.nodes[x].right = self.nodes[y].left;
        self.nodes[y].left = Some(x);
        self.update(x);
        self.update(y);
        y
    }

    fn update(&mut self, id: NodeId) {
        let (left, right) = (self.nodes[id].left, self.nodes[id].right);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let max_high = self.nodes[id]
            .interval
            .high
            .max(self.max_high_of(left))
            .max(self.max_high_of(right));

        let node = &mut self.nodes[id];
        node.height = height;
        node.max_high = max_high;
    }

    fn balance(&self, id: NodeId) -> i64 {
        let node = &self.nodes[id];
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.nodes[id].height)
    }

    fn max_high_of(&self, id: Option<NodeId>) -> i64 {
        id.map_or(i64::MIN, |id| self.nodes[id].max_high)
    }
}

impl Extend<Interval> for IntervalTree {
    fn extend<I: IntoIterator<Item = Interval>>(&mut self, intervals: I) {
        for interval in intervals {
            self.insert(interval);
        }
    }
}

impl<'a> IntoIterator for &'a IntervalTree {
    type Item = &'a Interval;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the intervals overlapping a query. See
/// [`IntervalTree::search_all`].
#[derive(Debug, Clone)]
pub struct Overlapping<'a> {
    tree: &'a IntervalTree,
    low: i64,
    high: i64,
    stack: Vec<NodeId>,
}

impl Overlapping<'_> {
    /// Push the left spine of `cursor`, skipping subtrees that end before the
    /// query starts.
    fn descend(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            let node = &self.tree.nodes[id];
            if !self.tree.rule.reaches(node.max_high, self.low) {
                break;
            }
            self.stack.push(id);
            cursor = node.left;
        }
    }
}

impl<'a> Iterator for Overlapping<'a> {
    type Item = &'a Interval;

    fn next(&mut self) -> Option<Self::Item> {
        let rule = self.tree.rule;
        while let Some(id) = self.stack.pop() {
            let node = &self.tree.nodes[id];
            if !rule.starts_before(node.interval.low, self.high) {
                // Everything still on the stack starts even later.
                self.stack.clear();
                return None;
            }
            self.descend(node.right);
            if rule.overlaps(node.interval.low, node.interval.high, self.low, self.high) {
                return Some(&node.interval);
            }
        }
        None
    }
}

/// In-order iterator over every stored interval.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    tree: &'a IntervalTree,
    stack: Vec<NodeId>,
}

impl Iter<'_> {
    fn descend(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.tree.nodes[id].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Interval;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.descend(self.tree.nodes[id].right);
        Some(&self.tree.nodes[id].interval)
    }
}
