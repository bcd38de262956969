//! Sort and search primitives for the sorted intersection strategies
//!
//! Both sorts order token ids ascending in place. Quicksort uses a Lomuto
//! partition with the last element as pivot, so its worst case is O(n^2)
//! on already-sorted input; heapsort stays at O(n log n) for every input.

use crate::store::TokenId;

pub(super) fn quicksort(data: &mut [TokenId]) {
    if data.len() <= 1 {
        return;
    }
    let pivot_index = partition(data);
    let (left, right) = data.split_at_mut(pivot_index);
    quicksort(left);
    quicksort(&mut right[1..]);
}

fn partition(data: &mut [TokenId]) -> usize {
    let last = data.len() - 1;
    let pivot = data[last];
    let mut boundary = 0;
    for index in 0..last {
        if data[index] <= pivot {
            data.swap(boundary, index);
            boundary += 1;
        }
    }
    data.swap(boundary, last);
    boundary
}

pub(super) fn heapsort(data: &mut [TokenId]) {
    if data.len() <= 1 {
        return;
    }

    // Build a max heap, then swap the maximum to the shrinking tail.
    let mut start = data.len() / 2;
    while start > 0 {
        start -= 1;
        sift_down(data, start, data.len());
    }

    let mut end = data.len();
    while end > 1 {
        end -= 1;
        data.swap(0, end);
        sift_down(data, 0, end);
    }
}

fn sift_down(data: &mut [TokenId], start: usize, end: usize) {
    let mut root = start;
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && data[child] < data[child + 1] {
            child += 1;
        }
        if data[root] < data[child] {
            data.swap(root, child);
            root = child;
        } else {
            break;
        }
    }
}

/// Membership test on an ascending slice. The midpoint is computed as
/// `left + (right - left) / 2` so the addition cannot overflow.
pub(super) fn binary_search(sorted: &[TokenId], needle: TokenId) -> bool {
    let mut left = 0;
    let mut right = sorted.len();
    while left < right {
        let middle = left + (right - left) / 2;
        if sorted[middle] == needle {
            return true;
        }
        if sorted[middle] < needle {
            left = middle + 1;
        } else {
            right = middle;
        }
    }
    false
}
