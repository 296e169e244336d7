use std::cmp::Ordering;

/// Sorts `items` in place with quick sort.
///
/// The pivot is the last element of each range; elements comparing `Less` than the pivot move
/// to the left partition and everything else stays right of it. The sort is not stable, so
/// callers that need deterministic output must supply a comparator that is a total order.
pub fn quick_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_range(items, &mut compare);
}

// Recurses into the smaller partition and loops on the larger one so stack depth stays
// logarithmic even for already-sorted input.
fn sort_range<T, F>(mut items: &mut [T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    while items.len() > 1 {
        let pivot = partition(items, compare);
        let (left, rest) = std::mem::take(&mut items).split_at_mut(pivot);
        let right = &mut rest[1..];

        if left.len() < right.len() {
            sort_range(left, compare);
            items = right;
        } else {
            sort_range(right, compare);
            items = left;
        }
    }
}

fn partition<T, F>(items: &mut [T], compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let last = items.len() - 1;
    let mut store = 0;

    for index in 0..last {
        if compare(&items[index], &items[last]) == Ordering::Less {
            items.swap(index, store);
            store += 1;
        }
    }

    items.swap(store, last);
    store
}
