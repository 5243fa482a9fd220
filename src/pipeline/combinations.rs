//! Combination generation (n choose k over each category's labels).

use crate::types::{Combination, SampleCategory};

/// Default combination size: the minimum number of tags per classifier.
pub const DEFAULT_MIN_TAGS: usize = 3;

/// Every `size`-element subset of each category's labels.
///
/// Categories are visited in the given order; within a category subsets
/// are emitted in lexicographic order of label positions, and each subset
/// keeps the category's label order. A category with fewer than `size`
/// labels contributes nothing, as does `size == 0`.
pub fn generate(categories: &[SampleCategory], size: usize) -> Vec<Combination> {
    categories
        .iter()
        .flat_map(|category| {
            index_subsets(category.labels.len(), size).into_iter().map(|indices| {
                Combination::new(
                    category.name.clone(),
                    indices.into_iter().map(|i| category.labels[i].clone()),
                )
            })
        })
        .collect()
}

/// Ascending index vectors of every k-subset of `0..n`.
fn index_subsets(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut subsets = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        subsets.push(indices.clone());

        // Rightmost position that can still advance.
        let Some(pos) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
            return subsets;
        };
        indices[pos] += 1;
        for i in pos + 1..k {
            indices[i] = indices[i - 1] + 1;
        }
    }
}

/// Binomial coefficient C(n, k), or `None` if the computation overflows `usize`.
pub fn count(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    (0..k).try_fold(1usize, |acc, i| Some(acc.checked_mul(n - i)? / (i + 1)))
}
