//! Bounded recency queue
//!
//! Nodes live in an arena and link to each other by slot index, so callers
//! hold copyable [`NodeId`] handles instead of references. The head is the
//! least recently used node and the next one to be evicted; the tail is the
//! most recently used.
//!
//! A `RecencyQueue` is not thread safe. Callers that share one across threads
//! must guard it themselves (`lrucache` keeps it behind the same lock as its
//! key index).

use std::fmt;

use crate::error::{Error, Result};

/// Handle to a node in a [`RecencyQueue`]
///
/// Handles stay valid until the node is evicted or removed. After that the
/// slot may be reused by a later [`RecencyQueue::add`], so a stale handle can
/// alias a different key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node in the recency list
#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity queue ordered by recency of use
pub struct RecencyQueue {
    nodes: Vec<Option<Node>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
    max_size: usize,
}

impl RecencyQueue {
    /// Create an empty queue holding at most `max_size` keys
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` if `max_size` is zero
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(Error::InvalidCapacity(max_size));
        }

        Ok(Self {
            nodes: Vec::with_capacity(max_size),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
            max_size,
        })
    }

    /// Append `key` at the most recently used end
    ///
    /// If the queue is full the head is evicted first and its key is
    /// returned alongside the new node's handle. Duplicate keys are not
    /// detected.
    pub fn add(&mut self, key: impl Into<String>) -> (NodeId, Option<String>) {
        let evicted = if self.len == self.max_size {
            self.pop_head()
        } else {
            None
        };

        let idx = self.alloc_node(Node {
            key: key.into(),
            prev: None,
            next: None,
        });
        self.push_tail(idx);

        (NodeId(idx), evicted)
    }

    /// Move a node to the most recently used end
    ///
    /// Handles that do not name a live node are ignored.
    pub fn touch(&mut self, id: NodeId) {
        debug_assert!(self.contains(id), "touch on dead node {:?}", id);
        if !self.contains(id) || self.tail == Some(id.0) {
            return;
        }

        self.unlink(id.0);
        self.push_tail(id.0);
    }

    /// Unlink a node and free its slot, returning its key
    pub fn remove(&mut self, id: NodeId) -> Option<String> {
        if !self.contains(id) {
            return None;
        }

        self.unlink(id.0);
        self.release(id.0)
    }

    /// Oldest node, the next eviction victim
    pub fn peek_head(&self) -> Option<NodeRef<'_>> {
        self.head.and_then(|idx| self.node_ref(idx))
    }

    /// Newest node
    pub fn peek_tail(&self) -> Option<NodeRef<'_>> {
        self.tail.and_then(|idx| self.node_ref(idx))
    }

    /// Look up a live node by handle
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.node_ref(id.0)
    }

    /// Check whether a handle names a live node
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    /// Iterate from least to most recently used
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.peek_head(),
            remaining: self.len,
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of live nodes
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn node_ref(&self, idx: usize) -> Option<NodeRef<'_>> {
        let node = self.nodes.get(idx)?.as_ref()?;
        Some(NodeRef {
            queue: self,
            idx,
            node,
        })
    }

    fn pop_head(&mut self) -> Option<String> {
        let idx = self.head?;
        self.unlink(idx);
        self.release(idx)
    }

    fn push_tail(&mut self, idx: usize) {
        let old_tail = self.tail;

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = &mut self.nodes[tail_idx] {
                    tail.next = Some(idx);
                }
            }
            None => {
                self.head = Some(idx);
            }
        }

        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &mut self.nodes[idx] {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_node(&mut self, node: Node) -> usize {
        self.len += 1;
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    // Caller must unlink first.
    fn release(&mut self, idx: usize) -> Option<String> {
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some(node.key)
    }
}

impl fmt::Debug for RecencyQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyQueue")
            .field("len", &self.len)
            .field("max_size", &self.max_size)
            .field("order", &self.iter().map(|n| n.value()).collect::<Vec<_>>())
            .finish()
    }
}

/// Read-only view of a live node
///
/// Exposes the key and the neighbouring nodes without giving access to the
/// link fields themselves.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    queue: &'a RecencyQueue,
    idx: usize,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// Handle of this node
    pub fn id(&self) -> NodeId {
        NodeId(self.idx)
    }

    /// Key stored in this node
    pub fn value(&self) -> &'a str {
        &self.node.key
    }

    /// Next (more recently used) node
    pub fn next(&self) -> Option<NodeRef<'a>> {
        self.node.next.and_then(|idx| self.queue.node_ref(idx))
    }

    /// Previous (less recently used) node
    pub fn previous(&self) -> Option<NodeRef<'a>> {
        self.node.prev.and_then(|idx| self.queue.node_ref(idx))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.queue, other.queue) && self.idx == other.idx
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.idx)
            .field("value", &self.node.key)
            .finish()
    }
}

/// Iterator over a queue from head to tail
pub struct Iter<'a> {
    next: Option<NodeRef<'a>>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next();
        self.remaining = self.remaining.saturating_sub(1);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RecencyQueue {
    type Item = NodeRef<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the list both ways and compare against the expected keys.
    fn assert_order(queue: &RecencyQueue, expected: &[&str]) {
        let mut forward = Vec::new();
        let mut node = queue.peek_head();
        while let Some(n) = node {
            assert!(forward.len() < expected.len(), "loop in queue");
            forward.push(n.value());
            node = n.next();
        }
        assert_eq!(forward, expected, "forward order");

        let mut backward = Vec::new();
        let mut node = queue.peek_tail();
        while let Some(n) = node {
            assert!(backward.len() < expected.len(), "loop in queue");
            backward.push(n.value());
            node = n.previous();
        }
        backward.reverse();
        assert_eq!(backward, expected, "reverse order");

        assert_eq!(queue.len(), expected.len());
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(RecencyQueue::new(0).unwrap_err(), Error::InvalidCapacity(0));
    }

    #[test]
    fn test_empty_queue() {
        let queue = RecencyQueue::new(3).unwrap();

        assert!(queue.is_empty());
        assert!(queue.peek_head().is_none());
        assert!(queue.peek_tail().is_none());
        assert_eq!(queue.iter().count(), 0);
    }

    #[test]
    fn test_queue_size() {
        let mut queue = RecencyQueue::new(2).unwrap();

        let (one, evicted) = queue.add("one");
        assert_eq!(evicted, None);
        assert_eq!(queue.peek_head().unwrap().id(), one);
        assert_eq!(queue.peek_tail().unwrap().id(), one);

        let (two, evicted) = queue.add("two");
        assert_eq!(evicted, None);
        assert_eq!(queue.peek_head().unwrap().id(), one);
        assert_eq!(queue.peek_tail().unwrap().id(), two);

        let (three, evicted) = queue.add("three");
        assert_eq!(evicted.as_deref(), Some("one"));
        assert_eq!(queue.peek_head().unwrap().id(), two);
        assert_eq!(queue.peek_tail().unwrap().id(), three);
        assert_eq!(queue.len(), 2);
        // the evicted slot is recycled for the new node
        assert_eq!(three, one);
        assert_eq!(queue.get(one).unwrap().value(), "three");
    }

    #[test]
    fn test_touch() {
        let mut queue = RecencyQueue::new(4).unwrap();

        let (one, _) = queue.add("one");
        let (two, _) = queue.add("two");
        queue.add("three");
        let (four, _) = queue.add("four");
        assert_order(&queue, &["one", "two", "three", "four"]);

        // already the tail
        queue.touch(four);
        assert_order(&queue, &["one", "two", "three", "four"]);

        // middle element
        queue.touch(two);
        assert_order(&queue, &["one", "three", "four", "two"]);

        // head
        queue.touch(one);
        assert_order(&queue, &["three", "four", "two", "one"]);
        assert_eq!(queue.peek_head().unwrap().value(), "three");
    }

    #[test]
    fn test_touch_changes_eviction_victim() {
        let mut queue = RecencyQueue::new(3).unwrap();

        let (a, _) = queue.add("a");
        queue.add("b");
        queue.add("c");
        queue.touch(a);

        let (_, evicted) = queue.add("d");
        assert_eq!(evicted.as_deref(), Some("b"));
        assert_order(&queue, &["c", "a", "d"]);
    }

    #[test]
    fn test_capacity_one() {
        let mut queue = RecencyQueue::new(1).unwrap();

        let (a, evicted) = queue.add("a");
        assert_eq!(evicted, None);
        queue.touch(a);
        assert_order(&queue, &["a"]);

        let (b, evicted) = queue.add("b");
        assert_eq!(evicted.as_deref(), Some("a"));
        assert_order(&queue, &["b"]);
        assert_eq!(queue.peek_head().unwrap().id(), b);
        assert_eq!(queue.peek_tail().unwrap().id(), b);
    }

    #[test]
    fn test_remove() {
        let mut queue = RecencyQueue::new(4).unwrap();

        let (one, _) = queue.add("one");
        let (two, _) = queue.add("two");
        let (three, _) = queue.add("three");
        queue.add("four");

        assert_eq!(queue.remove(two).as_deref(), Some("two"));
        assert_order(&queue, &["one", "three", "four"]);

        assert_eq!(queue.remove(one).as_deref(), Some("one"));
        assert_order(&queue, &["three", "four"]);

        assert_eq!(queue.remove(one), None);

        let tail = queue.peek_tail().unwrap().id();
        assert_eq!(queue.remove(tail).as_deref(), Some("four"));
        assert_order(&queue, &["three"]);

        assert_eq!(queue.remove(three).as_deref(), Some("three"));
        assert_order(&queue, &[]);
        assert!(queue.peek_head().is_none());
        assert!(queue.peek_tail().is_none());
    }

    #[test]
    fn test_slots_are_reused() {
        let mut queue = RecencyQueue::new(2).unwrap();

        for i in 0..100 {
            queue.add(format!("key{}", i));
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.nodes.len(), 2);
        assert_order(&queue, &["key98", "key99"]);
    }

    #[test]
    fn test_iter_and_clear() {
        let mut queue = RecencyQueue::new(3).unwrap();

        queue.add("x");
        queue.add("y");
        queue.add("z");

        let iter = queue.iter();
        assert_eq!(iter.len(), 3);
        let keys: Vec<_> = (&queue).into_iter().map(|n| n.value()).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);

        queue.clear();
        assert!(queue.is_empty());
        assert_order(&queue, &[]);

        queue.add("w");
        assert_order(&queue, &["w"]);
    }

    #[test]
    fn test_node_ref_equality() {
        let mut queue = RecencyQueue::new(2).unwrap();

        let (a, _) = queue.add("a");
        queue.add("b");

        assert_eq!(queue.peek_head(), queue.get(a));
        assert_ne!(queue.peek_head(), queue.peek_tail());
        assert_eq!(queue.peek_tail().unwrap().previous(), queue.get(a));
    }
}
