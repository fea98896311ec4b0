//! Circular ready queue.
//!
//! The queue is a ring with one distinguished position, the *current*
//! element. Elements live in an arena and link to each other by index, so
//! taking the current element out never leaves a dangling link behind.

struct Node<T> {
    item: T,
    next: usize,
    prev: usize,
}

/// A ring of elements with a current position.
///
/// - Empty if and only if there is no current element.
/// - Otherwise the links form exactly one cycle through every element, and
///   `next` and `prev` are inverses of each other.
pub struct ReadyQueue<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    current: Option<usize>,
    len: usize,
}

impl<T> ReadyQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            current: None,
            len: 0,
        }
    }

    /// Number of elements in the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    fn node(&self, idx: usize) -> &Node<T> {
        self.nodes[idx].as_ref().expect("link to a vacant node")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        self.nodes[idx].as_mut().expect("link to a vacant node")
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// The current element.
    pub fn current(&self) -> Option<&T> {
        self.current.map(|idx| &self.node(idx).item)
    }

    /// The current element.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let idx = self.current?;
        Some(&mut self.node_mut(idx).item)
    }

    /// Insert `item` right before the current element, so that it is the
    /// last one reached when advancing from the current element.
    ///
    /// The first element of an empty queue becomes current.
    pub fn push(&mut self, item: T) {
        self.len += 1;
        match self.current {
            None => {
                let idx = self.alloc(Node {
                    item,
                    next: 0,
                    prev: 0,
                });
                let node = self.node_mut(idx);
                node.next = idx;
                node.prev = idx;
                self.current = Some(idx);
            }
            Some(cur) => {
                let prev = self.node(cur).prev;
                let idx = self.alloc(Node {
                    item,
                    next: cur,
                    prev,
                });
                self.node_mut(prev).next = idx;
                self.node_mut(cur).prev = idx;
            }
        }
    }

    /// Move the current position to its successor.
    pub fn advance(&mut self) -> Option<&mut T> {
        let next = self.node(self.current?).next;
        self.current = Some(next);
        Some(&mut self.node_mut(next).item)
    }

    /// Take the current element out of the ring.
    ///
    /// Its successor becomes current.
    pub fn remove_current(&mut self) -> Option<T> {
        let cur = self.current?;
        let Node { item, next, prev } = self.nodes[cur].take().expect("current is vacant");
        self.free.push(cur);
        self.len -= 1;
        if next == cur {
            self.current = None;
        } else {
            // Close the ring before looking at the successor.
            self.node_mut(prev).next = next;
            self.node_mut(next).prev = prev;
            self.current = Some(next);
        }
        Some(item)
    }

    /// Iterate over the ring starting from the current element.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let mut cursor = self.current;
        (0..self.len).filter_map(move |_| {
            let node = self.node(cursor?);
            cursor = Some(node.next);
            Some(&node.item)
        })
    }
}

impl<T> Default for ReadyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_ring<T>(q: &ReadyQueue<T>) {
        let Some(start) = q.current else {
            assert_eq!(q.len(), 0);
            return;
        };
        let mut idx = start;
        for _ in 0..q.len() {
            let node = q.node(idx);
            assert_eq!(q.node(node.next).prev, idx);
            idx = node.next;
        }
        assert_eq!(idx, start, "links do not form a single cycle");
    }

    fn order(q: &ReadyQueue<char>) -> String {
        q.iter().collect()
    }

    #[test]
    fn insertion_order() {
        let mut q = ReadyQueue::new();
        assert!(q.is_empty());
        assert!(q.advance().is_none());
        for c in ['a', 'b', 'c'] {
            q.push(c);
            assert_ring(&q);
        }
        assert_eq!(q.current(), Some(&'a'));
        assert_eq!(order(&q), "abc");

        let mut seen = String::new();
        for _ in 0..6 {
            seen.push(*q.advance().unwrap());
        }
        assert_eq!(seen, "bcabca");
    }

    #[test]
    fn push_goes_last_in_lap() {
        let mut q = ReadyQueue::new();
        q.push('a');
        q.push('b');
        q.advance();
        // b is current; d must run after a.
        q.push('d');
        assert_ring(&q);
        assert_eq!(order(&q), "bad");
    }

    #[test]
    fn remove_current() {
        let mut q = ReadyQueue::new();
        for c in ['a', 'b', 'c', 'd'] {
            q.push(c);
        }
        q.advance();
        assert_eq!(q.remove_current(), Some('b'));
        assert_ring(&q);
        assert_eq!(q.current(), Some(&'c'));
        assert_eq!(order(&q), "cda");

        // Vacated nodes are reused.
        q.push('e');
        assert_eq!(q.nodes.len(), 4);
        assert_eq!(order(&q), "cdae");

        for expected in ['c', 'd', 'a', 'e'] {
            assert_eq!(q.remove_current(), Some(expected));
            assert_ring(&q);
        }
        assert!(q.is_empty());
        assert!(q.current().is_none());
        assert!(q.remove_current().is_none());
    }

    #[test]
    fn single_element_advances_to_itself() {
        let mut q = ReadyQueue::new();
        q.push(1);
        assert_eq!(q.advance(), Some(&mut 1));
        assert_eq!(q.current(), Some(&1));
        assert_ring(&q);
    }
}
