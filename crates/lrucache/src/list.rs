//! Recency list: a doubly-linked list stored in an arena
//!
//! Nodes live in a `Vec` and link to each other by slot index, so there are
//! no owning cycles between neighbours. Slots 0 and 1 are fixed sentinels
//! (head and tail) that never carry an entry and are never released.
//!
//! Order runs from least-recently-used (just after head) to
//! most-recently-used (just before tail).

/// Slot of the head sentinel. `nodes[HEAD].next` is the LRU entry.
const HEAD: usize = 0;

/// Slot of the tail sentinel. `nodes[TAIL].prev` is the MRU entry.
const TAIL: usize = 1;

/// Link value of a node that is not in the list
const UNLINKED: usize = usize::MAX;

/// Handle to a node in a [`RecencyList`]
///
/// Only valid until the node is released. The index keeps exactly one handle
/// per live key, and drops it in the same call that releases the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// Node in the recency list
struct Node<K, V> {
    /// `None` for sentinels and for free slots
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel(prev: usize, next: usize) -> Self {
        Self {
            entry: None,
            prev,
            next,
        }
    }

    fn is_linked(&self) -> bool {
        self.prev != UNLINKED && self.next != UNLINKED
    }
}

/// Arena-backed doubly-linked list ordered by recency
pub(crate) struct RecencyList<K, V> {
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` entries
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(2));
        nodes.push(Node::sentinel(UNLINKED, TAIL));
        nodes.push(Node::sentinel(HEAD, UNLINKED));

        Self {
            nodes,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of entries linked into the list
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Store an entry in a fresh, detached node
    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeId {
        let node = Node {
            entry: Some((key, value)),
            prev: UNLINKED,
            next: UNLINKED,
        };

        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = node;
            NodeId(idx)
        } else {
            self.nodes.push(node);
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Drop a detached node and hand back its entry
    ///
    /// The slot goes back on the free list; `id` must not be used again.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<(K, V)> {
        debug_assert!(id.0 > TAIL, "sentinels are never released");
        debug_assert!(!self.nodes[id.0].is_linked(), "release of a linked node");

        let entry = self.nodes[id.0].entry.take();
        if entry.is_some() {
            self.free_list.push(id.0);
        }
        entry
    }

    /// Unlink `id` by joining its predecessor directly to its successor
    pub(crate) fn detach(&mut self, id: NodeId) {
        let idx = id.0;
        debug_assert!(idx > TAIL, "sentinels are never detached");
        debug_assert!(self.nodes[idx].is_linked(), "detach of an unlinked node");

        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        let node = &mut self.nodes[idx];
        node.prev = UNLINKED;
        node.next = UNLINKED;
        self.len -= 1;
    }

    /// Link a detached node just before the tail sentinel
    pub(crate) fn append_most_recent(&mut self, id: NodeId) {
        let idx = id.0;
        debug_assert!(idx > TAIL, "sentinels are never appended");
        debug_assert!(!self.nodes[idx].is_linked(), "append of a linked node");

        let last = self.nodes[TAIL].prev;

        let node = &mut self.nodes[idx];
        node.prev = last;
        node.next = TAIL;

        self.nodes[last].next = idx;
        self.nodes[TAIL].prev = idx;
        self.len += 1;
    }

    /// Mark `id` as most recently used
    pub(crate) fn touch(&mut self, id: NodeId) {
        if self.nodes[TAIL].prev == id.0 {
            return; // Already most recent
        }
        self.detach(id);
        self.append_most_recent(id);
    }

    /// Node right after the head sentinel, if any
    pub(crate) fn least_recent(&self) -> Option<NodeId> {
        let first = self.nodes[HEAD].next;
        (first != TAIL).then_some(NodeId(first))
    }

    pub(crate) fn key(&self, id: NodeId) -> Option<&K> {
        self.nodes[id.0].entry.as_ref().map(|(k, _)| k)
    }

    pub(crate) fn entry(&self, id: NodeId) -> Option<(&K, &V)> {
        self.nodes[id.0].entry.as_ref().map(|(k, v)| (k, v))
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes[id.0].entry.as_mut().map(|(_, v)| v)
    }

    /// Drop every entry and relink the sentinels to each other
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free_list.clear();
        self.len = 0;
    }

    /// Entries from least to most recently used
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
            remaining: self.len,
        }
    }
}

/// Iterator over list entries, LRU first
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        node.entry.as_ref().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, &'static str>) -> Vec<u32> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_empty_list() {
        let list: RecencyList<u32, &str> = RecencyList::with_capacity(4);

        assert_eq!(list.len(), 0);
        assert_eq!(list.least_recent(), None);
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_append_order() {
        let mut list = RecencyList::with_capacity(4);

        for (k, v) in [(1, "a"), (2, "b"), (3, "c")] {
            let id = list.alloc(k, v);
            list.append_most_recent(id);
        }

        assert_eq!(list.len(), 3);
        assert_eq!(keys(&list), vec![1, 2, 3]);

        let lru = list.least_recent().unwrap();
        assert_eq!(list.key(lru), Some(&1));
    }

    #[test]
    fn test_detach_middle() {
        let mut list = RecencyList::with_capacity(4);
        let a = list.alloc(1, "a");
        let b = list.alloc(2, "b");
        let c = list.alloc(3, "c");
        list.append_most_recent(a);
        list.append_most_recent(b);
        list.append_most_recent(c);

        list.detach(b);

        assert_eq!(list.len(), 2);
        assert_eq!(keys(&list), vec![1, 3]);
        assert_eq!(list.entry(b), Some((&2, &"b")));
    }

    #[test]
    fn test_touch() {
        let mut list = RecencyList::with_capacity(4);
        let a = list.alloc(1, "a");
        let b = list.alloc(2, "b");
        list.append_most_recent(a);
        list.append_most_recent(b);

        list.touch(a);
        assert_eq!(keys(&list), vec![2, 1]);

        // Touching the tail-adjacent node is a no-op
        list.touch(a);
        assert_eq!(keys(&list), vec![2, 1]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_release_reuses_slot() {
        let mut list = RecencyList::with_capacity(2);
        let a = list.alloc(1, "a");
        list.append_most_recent(a);

        list.detach(a);
        assert_eq!(list.release(a), Some((1, "a")));
        assert_eq!(list.least_recent(), None);

        let b = list.alloc(2, "b");
        assert_eq!(b, a);
        list.append_most_recent(b);
        assert_eq!(keys(&list), vec![2]);
    }

    #[test]
    fn test_value_mut() {
        let mut list = RecencyList::with_capacity(1);
        let a = list.alloc(1, "a");
        list.append_most_recent(a);

        if let Some(v) = list.value_mut(a) {
            *v = "z";
        }
        assert_eq!(list.entry(a), Some((&1, &"z")));
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::with_capacity(4);
        for k in 0..3 {
            let id = list.alloc(k, "x");
            list.append_most_recent(id);
        }

        list.clear();

        assert_eq!(list.len(), 0);
        assert_eq!(list.least_recent(), None);

        let id = list.alloc(9, "y");
        list.append_most_recent(id);
        assert_eq!(keys(&list), vec![9]);
    }
}
