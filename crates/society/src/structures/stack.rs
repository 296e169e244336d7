/// Last-in first-out history of reversible actions.
#[derive(Debug, Clone)]
pub struct UndoStack<T> {
    items: Vec<T>,
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> UndoStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the most recent action, or `None` when there is nothing to undo.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Drop every action rejected by `keep`, preserving the order of the rest.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_most_recent_first() {
        let mut stack = UndoStack::new();
        stack.push("first");
        stack.push("second");
        stack.push("third");

        assert_eq!(stack.peek(), Some(&"third"));
        assert_eq!(stack.pop(), Some("third"));
        assert_eq!(stack.pop(), Some("second"));
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec!["first"]);
        assert_eq!(stack.pop(), Some("first"));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn retain_keeps_relative_order() {
        let mut stack = UndoStack::new();
        for value in 1..=6 {
            stack.push(value);
        }
        stack.retain(|value| value % 2 == 0);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![2, 4, 6]);
        assert_eq!(stack.pop(), Some(6));
    }
}
