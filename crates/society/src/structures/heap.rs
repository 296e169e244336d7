//! Binary min-heap with deterministic tie-breaking.

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    priority: i64,
    sequence: u64,
    item: T,
}

impl<T> HeapEntry<T> {
    // Lower priority wins; equal priorities resolve to the earlier insertion.
    fn precedes(&self, other: &Self) -> bool {
        (self.priority, self.sequence) < (other.priority, other.sequence)
    }
}

/// Min-heap keyed by `(priority, insertion sequence)`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    entries: Vec<HeapEntry<T>>,
    next_sequence: u64,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 0,
        }
    }
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, priority: i64, item: T) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(HeapEntry {
            priority,
            sequence,
            item,
        });
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove the most urgent item, or `None` when the heap is empty.
    pub fn pop_min(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }

        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let root = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(root.item)
    }

    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.item)
    }

    /// Items in the order successive `pop_min` calls would return them.
    pub fn ordered(&self) -> Vec<&T> {
        let mut entries: Vec<&HeapEntry<T>> = self.entries.iter().collect();
        super::sort::quick_sort_by(&mut entries, |a, b| {
            (a.priority, a.sequence).cmp(&(b.priority, b.sequence))
        });
        entries.into_iter().map(|entry| &entry.item).collect()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.entries[index].precedes(&self.entries[parent]) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.entries[left].precedes(&self.entries[smallest]) {
                smallest = left;
            }
            if right < len && self.entries[right].precedes(&self.entries[smallest]) {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_priority_order() {
        let mut heap = MinHeap::new();
        for (priority, label) in [(3, "leak"), (1, "fire"), (5, "paint"), (2, "lift"), (4, "gate")]
        {
            heap.push(priority, label);
        }

        let mut drained = Vec::new();
        while let Some(label) = heap.pop_min() {
            drained.push(label);
        }

        assert_eq!(drained, vec!["fire", "lift", "leak", "gate", "paint"]);
        assert!(heap.pop_min().is_none());
    }

    #[test]
    fn equal_priorities_resolve_in_insertion_order() {
        let mut heap = MinHeap::new();
        heap.push(2, "first");
        heap.push(1, "urgent");
        heap.push(2, "second");
        heap.push(2, "third");

        assert_eq!(heap.pop_min(), Some("urgent"));
        assert_eq!(heap.pop_min(), Some("first"));
        assert_eq!(heap.pop_min(), Some("second"));
        assert_eq!(heap.pop_min(), Some("third"));
    }

    #[test]
    fn interleaved_pushes_and_pops_stay_non_decreasing() {
        let mut heap = MinHeap::new();
        let priorities = [9, 4, 7, 1, 8, 2, 6, 3, 5, 0, 4, 4];
        let mut popped = Vec::new();

        for (index, priority) in priorities.iter().enumerate() {
            heap.push(*priority, index);
            if index % 3 == 2 {
                popped.extend(heap.pop_min());
            }
        }
        let mut tail = Vec::new();
        while let Some(index) = heap.pop_min() {
            tail.push(priorities[index]);
        }

        assert!(tail.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(popped.len() + tail.len(), priorities.len());
    }

    #[test]
    fn n_pushes_then_n_pops_return_every_item_once() {
        let mut heap = MinHeap::new();
        for item in 0..50u32 {
            heap.push(i64::from(item % 7), item);
        }

        let mut seen: Vec<u32> = std::iter::from_fn(|| heap.pop_min()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn ordered_matches_pop_sequence_without_mutating() {
        let mut heap = MinHeap::new();
        heap.push(3, 'c');
        heap.push(1, 'a');
        heap.push(3, 'd');
        heap.push(2, 'b');

        let ordered: Vec<char> = heap.ordered().into_iter().copied().collect();
        assert_eq!(ordered, vec!['a', 'b', 'c', 'd']);
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.peek(), Some(&'a'));
    }
}
