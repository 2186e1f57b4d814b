//! Recursive (top-down) and iterative (bottom-up) merge sort.
//!
//! Items are never moved while sorting. Keys are read once into a
//! vector indexed like the input, the passes permute a buffer of
//! indices into that arena, and the final order is cloned out at the
//! end. Both variants share one merge routine, so they agree on every
//! input: the right run's head is taken only when its key is strictly
//! smaller, which keeps equal keys in input order.

use crate::engine::{EngineError, Keyed};
use crate::models::SortAlgorithm;

/// Sort `items` by the numeric attribute `key` with top-down merge sort.
pub fn merge_sort_recursive<T: Keyed + Clone>(
    items: &[T],
    key: &str,
) -> Result<Vec<T>, EngineError> {
    let keys = extract_keys(items, key)?;
    let mut order: Vec<usize> = (0..items.len()).collect();
    let mut scratch = vec![0usize; items.len()];
    sort_range(&keys, &mut order, &mut scratch);
    Ok(gather(items, &order))
}

/// Sort `items` by the numeric attribute `key` with bottom-up merge sort.
///
/// Each pass merges adjacent runs of `width` items, writing the merged
/// window `[lo, lo + 2 * width)` into the second index buffer, then the
/// buffers swap roles and the width doubles.
pub fn merge_sort_iterative<T: Keyed + Clone>(
    items: &[T],
    key: &str,
) -> Result<Vec<T>, EngineError> {
    let keys = extract_keys(items, key)?;
    let len = items.len();
    let mut src: Vec<usize> = (0..len).collect();
    let mut dst = vec![0usize; len];

    let mut width = 1usize;
    while width < len {
        let mut lo = 0;
        while lo < len {
            let mid = lo.saturating_add(width).min(len);
            let hi = lo.saturating_add(width.saturating_mul(2)).min(len);
            merge_into(&keys, &src[lo..mid], &src[mid..hi], &mut dst[lo..hi]);
            lo = hi;
        }
        std::mem::swap(&mut src, &mut dst);
        width = width.saturating_mul(2);
    }

    Ok(gather(items, &src))
}

/// Dispatch to the requested variant.
pub fn sort_with<T: Keyed + Clone>(
    algorithm: SortAlgorithm,
    items: &[T],
    key: &str,
) -> Result<Vec<T>, EngineError> {
    match algorithm {
        SortAlgorithm::Recursive => merge_sort_recursive(items, key),
        SortAlgorithm::Iterative => merge_sort_iterative(items, key),
    }
}

/// Whether `items` are in non-decreasing order of `key`.
pub fn is_sorted_by<T: Keyed>(items: &[T], key: &str) -> Result<bool, EngineError> {
    let keys = extract_keys(items, key)?;
    Ok(keys.windows(2).all(|pair| !(pair[1] < pair[0])))
}

fn extract_keys<T: Keyed>(items: &[T], key: &str) -> Result<Vec<f64>, EngineError> {
    items.iter().map(|item| item.numeric_key(key)).collect()
}

fn sort_range(keys: &[f64], order: &mut [usize], scratch: &mut [usize]) {
    let len = order.len();
    if len <= 1 {
        return;
    }

    let mid = len / 2;
    {
        let (left, right) = order.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        sort_range(keys, left, left_scratch);
        sort_range(keys, right, right_scratch);
    }

    merge_into(keys, &order[..mid], &order[mid..], &mut scratch[..len]);
    order.copy_from_slice(&scratch[..len]);
}

fn merge_into(keys: &[f64], left: &[usize], right: &[usize], out: &mut [usize]) {
    debug_assert_eq!(left.len() + right.len(), out.len());

    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        if keys[right[j]] < keys[left[i]] {
            out[k] = right[j];
            j += 1;
        } else {
            out[k] = left[i];
            i += 1;
        }
        k += 1;
    }

    let rest = if i < left.len() { &left[i..] } else { &right[j..] };
    out[k..].copy_from_slice(rest);
}

fn gather<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&idx| items[idx].clone()).collect()
}
