use std::cmp::Ordering;

/// Binary search over a slice already sorted by the probed key.
///
/// `probe` reports how an element compares to the target. Returns the index of a matching
/// element, or `None` when no element compares `Equal`.
pub fn binary_search_by<T, F>(items: &[T], mut probe: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let mut low = 0;
    let mut high = items.len();

    while low < high {
        let mid = low + (high - low) / 2;
        match probe(&items[mid]) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Some(mid),
        }
    }

    None
}
