use rand::seq::SliceRandom;

use crate::{Collection, contains, filter, fold};

/// The first `n` elements, or the whole slice if it is shorter.
pub fn first_n<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// The last `n` elements, or the whole slice if it is shorter.
pub fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Index of the first element equal to `target`.
pub fn index_of<T: PartialEq>(items: &[T], target: &T) -> Option<usize> {
    let mut found = None;
    items.each(|item, index, _| {
        if found.is_none() && item == target {
            found = Some(index);
        }
    });
    found
}

/// Copy of `items` with later duplicates removed; first occurrences keep their order.
pub fn uniq<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut unique = Vec::new();
    items.each(|item, index, all| {
        if index_of(all, item) == Some(index) {
            unique.push(item.clone());
        }
    });
    unique
}

/// Elements of the first slice that appear in every other slice.
///
/// Order and duplicates follow the first slice. No slices yields an empty result.
pub fn intersection<T: PartialEq + Clone>(slices: &[&[T]]) -> Vec<T> {
    let Some((head, rest)) = slices.split_first() else {
        return Vec::new();
    };

    fold(rest, head.to_vec(), |common, other| {
        filter(&common, |item| contains(*other, item))
    })
}

/// Elements of `items` that appear in none of `others`.
pub fn difference<T: PartialEq + Clone>(items: &[T], others: &[&[T]]) -> Vec<T> {
    fold(others, items.to_vec(), |remaining, other| {
        filter(&remaining, |item| !contains(*other, item))
    })
}

/// Copy of `items` in random order. The input is left untouched.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(&mut rand::rng());
    shuffled
}
