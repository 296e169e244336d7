//! Singly-linked record storage.
//!
//! Nodes live in an arena addressed by stable integer handles and each node stores the handle
//! of its successor. Removal unlinks the node and recycles its slot, so handles of the other
//! nodes never move.

use super::error::StructureError;
use super::search::binary_search_by;
use super::sort::quick_sort_by;
use std::cmp::Ordering;

/// Records kept in a [`RecordList`] expose a unique string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Stable reference to an occupied arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    record: T,
    next: Option<NodeHandle>,
}

#[derive(Debug, Clone)]
pub struct RecordList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
    len: usize,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }
}

impl<T: Keyed> RecordList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a record at the tail. Fails when the key is already present.
    pub fn insert(&mut self, record: T) -> Result<NodeHandle, StructureError> {
        if self.handle_of(record.key()).is_some() {
            return Err(StructureError::duplicate(record.key()));
        }

        let node = Node { record, next: None };
        let handle = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeHandle(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeHandle(self.slots.len() - 1)
            }
        };

        match self.tail.and_then(|tail| self.slots[tail.0].as_mut()) {
            Some(tail) => tail.next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;

        Ok(handle)
    }

    /// Unlink the record stored under `key` and hand it back.
    pub fn remove(&mut self, key: &str) -> Result<T, StructureError> {
        let mut previous: Option<NodeHandle> = None;
        let mut cursor = self.head;

        while let Some(handle) = cursor {
            let Some(node) = self.slots[handle.0].as_ref() else {
                break;
            };
            let next = node.next;

            if node.record.key() == key {
                match previous.and_then(|prev| self.slots[prev.0].as_mut()) {
                    Some(prev) => prev.next = next,
                    None => self.head = next,
                }
                if self.tail == Some(handle) {
                    self.tail = previous;
                }
                self.len -= 1;
                self.free.push(handle.0);

                return self.slots[handle.0]
                    .take()
                    .map(|node| node.record)
                    .ok_or_else(|| StructureError::not_found(key));
            }

            previous = Some(handle);
            cursor = next;
        }

        Err(StructureError::not_found(key))
    }

    /// Linear scan from the head.
    pub fn find(&self, key: &str) -> Option<&T> {
        self.iter().find(|record| record.key() == key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut T> {
        let handle = self.handle_of(key)?;
        self.slots[handle.0].as_mut().map(|node| &mut node.record)
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.slots
            .get(handle.0)
            .and_then(Option::as_ref)
            .map(|node| &node.record)
    }

    fn handle_of(&self, key: &str) -> Option<NodeHandle> {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let node = self.slots[handle.0].as_ref()?;
            if node.record.key() == key {
                return Some(handle);
            }
            cursor = node.next;
        }
        None
    }

    /// Sorts a snapshot of the list by key, then binary searches it.
    pub fn search_by_key(&self, key: &str) -> Result<&T, StructureError> {
        let mut snapshot: Vec<&T> = self.iter().collect();
        quick_sort_by(&mut snapshot, |a, b| a.key().cmp(b.key()));

        binary_search_by(&snapshot, |probe| probe.key().cmp(key))
            .map(|index| snapshot[index])
            .ok_or_else(|| StructureError::not_found(key))
    }

    /// Cloned view of the list ordered by `compare`. The list itself is left untouched.
    pub fn sorted_view<F>(&self, compare: F) -> Vec<T>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut view: Vec<T> = self.iter().cloned().collect();
        quick_sort_by(&mut view, compare);
        view
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Records in list order.
    pub fn dump(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Build a list from records in the given order. Fails on the first repeated key.
    pub fn load<I>(records: I) -> Result<Self, StructureError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = Self::new();
        for record in records {
            list.insert(record)?;
        }
        Ok(list)
    }
}

pub struct Iter<'a, T> {
    list: &'a RecordList<T>,
    cursor: Option<NodeHandle>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let node = self.list.slots[handle.0].as_ref()?;
        self.cursor = node.next;
        Some(&node.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        key: String,
        weight: i32,
    }

    impl Keyed for Entry {
        fn key(&self) -> &str {
            &self.key
        }
    }

    fn entry(key: &str, weight: i32) -> Entry {
        Entry {
            key: key.to_string(),
            weight,
        }
    }

    fn keys(list: &RecordList<Entry>) -> Vec<&str> {
        list.iter().map(|entry| entry.key.as_str()).collect()
    }

    #[test]
    fn insert_appends_in_order_and_rejects_duplicates() {
        let mut list = RecordList::new();
        list.insert(entry("B-101", 1)).expect("insert");
        list.insert(entry("A-101", 2)).expect("insert");

        assert_eq!(keys(&list), vec!["B-101", "A-101"]);
        assert_eq!(
            list.insert(entry("A-101", 9)),
            Err(StructureError::DuplicateKey {
                key: "A-101".to_string()
            })
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_unlinks_head_middle_and_tail() {
        let mut list = RecordList::new();
        for key in ["A", "B", "C", "D"] {
            list.insert(entry(key, 0)).expect("insert");
        }

        assert_eq!(list.remove("B").expect("middle").key, "B");
        assert_eq!(keys(&list), vec!["A", "C", "D"]);

        assert_eq!(list.remove("A").expect("head").key, "A");
        assert_eq!(keys(&list), vec!["C", "D"]);

        assert_eq!(list.remove("D").expect("tail").key, "D");
        assert_eq!(keys(&list), vec!["C"]);

        list.insert(entry("E", 0)).expect("append after tail removal");
        assert_eq!(keys(&list), vec!["C", "E"]);

        assert!(matches!(
            list.remove("missing"),
            Err(StructureError::NotFound { .. })
        ));
    }

    #[test]
    fn freed_slots_are_recycled_without_moving_other_handles() {
        let mut list = RecordList::new();
        let first = list.insert(entry("A", 1)).expect("insert");
        let second = list.insert(entry("B", 2)).expect("insert");
        list.remove("A").expect("remove");
        let third = list.insert(entry("C", 3)).expect("insert");

        assert_eq!(third, first);
        assert_eq!(list.get(second).map(|e| e.weight), Some(2));
        assert_eq!(keys(&list), vec!["B", "C"]);
    }

    #[test]
    fn search_by_key_finds_every_inserted_record() {
        let mut list = RecordList::new();
        let inserted = ["C-303", "A-101", "B-202", "A-102", "B-101"];
        for (weight, key) in inserted.iter().enumerate() {
            list.insert(entry(key, weight as i32)).expect("insert");
        }

        for (weight, key) in inserted.iter().enumerate() {
            let found = list.search_by_key(key).expect("present");
            assert_eq!(found, &entry(key, weight as i32));
        }
        assert!(matches!(
            list.search_by_key("Z-999"),
            Err(StructureError::NotFound { .. })
        ));
    }

    #[test]
    fn sorted_view_leaves_list_order_untouched() {
        let mut list = RecordList::new();
        list.insert(entry("B", 3)).expect("insert");
        list.insert(entry("A", 1)).expect("insert");
        list.insert(entry("C", 2)).expect("insert");

        let view = list.sorted_view(|a, b| a.weight.cmp(&b.weight));
        let view_keys: Vec<&str> = view.iter().map(|e| e.key.as_str()).collect();

        assert_eq!(view_keys, vec!["A", "C", "B"]);
        assert_eq!(keys(&list), vec!["B", "A", "C"]);
    }

    #[test]
    fn load_rejects_duplicate_keys() {
        let result = RecordList::load(vec![entry("A", 1), entry("A", 2)]);
        assert!(matches!(result, Err(StructureError::DuplicateKey { .. })));
    }
}
