use float_ord::FloatOrd;
use std::collections::{BinaryHeap, VecDeque};

/// An ordered worklist.
///
/// Propagation uses the FIFO [`Queue`]; [`Stack`] and [`PriorityQueue`]
/// offer depth-first and priority-ordered traversal for hosts that want a
/// different visit order.
pub trait Sequencer<T> {
    /// Adds an item to the worklist.
    fn push(&mut self, item: T);
    /// Removes and returns the next item, or `None` when empty.
    fn pop(&mut self) -> Option<T>;
    /// The next item without removing it.
    fn peek(&self) -> Option<&T>;
    /// Number of items currently held.
    fn len(&self) -> usize;
    /// Whether the worklist holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A first-in, first-out worklist.
#[derive(Debug, Clone, Default)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Sequencer<T> for Queue<T> {
    fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// A last-in, first-out worklist.
#[derive(Debug, Clone, Default)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Sequencer<T> for Stack<T> {
    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
struct PriorityItem<T> {
    priority: FloatOrd<f64>,
    item: T,
}

impl<T> PartialEq for PriorityItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<T> Eq for PriorityItem<T> {}

impl<T> PartialOrd for PriorityItem<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for PriorityItem<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority.cmp(&other.priority)
    }
}

/// A worklist that pops the highest-priority item first.
///
/// Items pushed through the plain [`Sequencer::push`] get priority 0.0;
/// use [`PriorityQueue::push_with`] to attach an explicit priority.
#[derive(Debug, Clone, Default)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<PriorityItem<T>>,
}

impl<T> PriorityQueue<T> {
    /// Creates an empty priority queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Adds an item with an explicit priority. Higher pops earlier; ties
    /// pop in unspecified order.
    pub fn push_with(&mut self, item: T, priority: f64) {
        self.heap.push(PriorityItem {
            priority: FloatOrd(priority),
            item,
        });
    }
}

impl<T> Sequencer<T> for PriorityQueue<T> {
    fn push(&mut self, item: T) {
        self.push_with(item, 0.0);
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|wrapped| wrapped.item)
    }

    fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|wrapped| &wrapped.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
