use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::{
    PacekitError, contains, difference, each, every, every_truthy, filter, first_n, fold,
    identity, index_of, intersection, last_n, map, reduce, reject, shuffle, some, some_truthy,
    uniq,
};

#[test]
fn each_visits_sequence_in_index_order_with_container() {
    let items = vec!["a", "b", "c"];
    let mut seen = Vec::new();

    each(&items, |value, index, container| {
        assert_eq!(container.len(), 3);
        seen.push((index, *value));
    });

    assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c")]);
}

#[test]
fn each_visits_every_map_entry_once() {
    let mut scores = HashMap::new();
    scores.insert("ann", 3);
    scores.insert("bob", 5);
    scores.insert("cy", 8);

    let mut seen = Vec::new();
    each(&scores, |value, key, container| {
        assert_eq!(container[key], *value);
        seen.push((*key, *value));
    });

    seen.sort();
    assert_eq!(seen, vec![("ann", 3), ("bob", 5), ("cy", 8)]);
}

#[test]
fn each_on_btree_map_follows_key_order() {
    let map: BTreeMap<u32, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    let mut keys = Vec::new();

    each(&map, |_, key, _| keys.push(*key));

    assert_eq!(keys, vec![1, 2, 3]);
}

#[test]
fn each_on_empty_collection_never_calls_back() {
    let empty: Vec<i32> = Vec::new();
    let mut calls = 0;

    each(&empty, |_, _, _| calls += 1);

    assert_eq!(calls, 0);
}

#[test]
fn map_identity_returns_equal_sequence() {
    let items = vec![4, 8, 15, 16, 23, 42];

    assert_eq!(map(&items, |n| identity(*n)), items);
    assert_eq!(map(&items[..0], |n| *n), Vec::<i32>::new());
}

#[test]
fn map_preserves_length_and_order() {
    let words = VecDeque::from(vec!["x", "yy", "zzz"]);

    assert_eq!(map(&words, |w| w.len()), vec![1, 2, 3]);
}

#[test]
fn filter_and_reject_partition_the_input() {
    let items: Vec<i32> = (-5..=10).collect();
    let is_even = |n: &i32| n % 2 == 0;

    let kept = filter(&items, is_even);
    let dropped = reject(&items, is_even);

    assert!(kept.iter().all(|n| n % 2 == 0));
    assert!(dropped.iter().all(|n| n % 2 != 0));
    assert_eq!(kept.len() + dropped.len(), items.len());

    let mut rejoined = [kept, dropped].concat();
    rejoined.sort();
    assert_eq!(rejoined, items);
}

#[test]
fn filter_coerces_predicate_results() {
    let items = [0, 1, 2, 0, 3];

    assert_eq!(filter(&items, |n| *n), vec![1, 2, 3]);
    assert_eq!(reject(&items, |n| *n), vec![0, 0]);

    let names = ["", "ada", "", "grace"];
    assert_eq!(filter(&names, |s| s.to_string()), vec!["ada", "grace"]);
}

#[test]
fn filter_over_map_values() {
    let stock: HashMap<&str, u32> = [("apples", 0), ("pears", 4)].into_iter().collect();

    assert_eq!(filter(&stock, |count| *count), vec![4]);
}

#[test]
fn reduce_with_initial_value() {
    assert_eq!(reduce(&[1, 2, 3], |a, b| a + b, Some(0)), Ok(6));
    assert_eq!(reduce(&Vec::<i32>::new(), |a, b| a + b, Some(9)), Ok(9));
}

#[test]
fn reduce_without_initial_seeds_from_first_element() {
    assert_eq!(reduce(&[1, 2, 3], |a, b| a + b, None), Ok(6));
    assert_eq!(reduce(&[5], |_, _| unreachable!(), None), Ok(5));

    let mut calls = Vec::new();
    let result = reduce(
        &[10, 20, 30],
        |acc, n| {
            calls.push((acc, *n));
            acc - n
        },
        None,
    );

    assert_eq!(result, Ok(-40));
    assert_eq!(calls, vec![(10, 20), (-10, 30)]);
}

#[test]
fn reduce_empty_without_initial_fails() {
    assert_eq!(
        reduce(&Vec::<i32>::new(), |a, b| a + b, None),
        Err(PacekitError::EmptyCollection)
    );
}

#[test]
fn fold_changes_accumulator_type() {
    let words = ["ab", "cde", "f"];

    assert_eq!(fold(&words, 0usize, |total, w| total + w.len()), 6);
    assert_eq!(
        fold(&words, String::new(), |mut s, w| {
            s.push_str(w);
            s
        }),
        "abcdef"
    );
}

#[test]
fn every_and_some_match_full_evaluation() {
    let items = [2, 4, 6];

    assert!(every(&items, |n| n % 2 == 0));
    assert!(!every(&items, |n| *n > 2));
    assert!(some(&items, |n| *n > 5));
    assert!(!some(&items, |n| *n > 6));
}

#[test]
fn every_and_some_on_empty_collections() {
    let empty: Vec<bool> = Vec::new();

    assert!(every(&empty, |b| *b));
    assert!(!some(&empty, |b| *b));
    assert!(every_truthy(&empty));
    assert!(!some_truthy(&empty));
}

#[test]
fn truthy_defaults_use_element_truthiness() {
    assert!(every_truthy(&[1, 2, 3]));
    assert!(!every_truthy(&[1, 0, 3]));
    assert!(some_truthy(&[0, 0, 3]));
    assert!(!some_truthy(&[0.0, f64::NAN]));
    assert!(some_truthy(&[None, Some("x")]));
    assert!(!some_truthy(&[None, Some("")]));
}

#[test]
fn contains_compares_by_value() {
    let names = vec!["ada".to_string(), "grace".to_string()];

    assert!(contains(&names, &"grace".to_string()));
    assert!(!contains(&names, &"linus".to_string()));

    let ages: HashMap<&str, u8> = [("ada", 36)].into_iter().collect();
    assert!(contains(&ages, &36));
    assert!(!contains(&ages, &37));
}

#[test]
fn first_n_and_last_n_clamp_to_length() {
    let items = [1, 2, 3];

    assert_eq!(first_n(&items, 2), &[1, 2]);
    assert_eq!(first_n(&items, 5), &[1, 2, 3]);
    assert_eq!(first_n(&items, 0), &[] as &[i32]);
    assert_eq!(last_n(&items, 2), &[2, 3]);
    assert_eq!(last_n(&items, 5), &[1, 2, 3]);
}

#[test]
fn index_of_finds_first_match() {
    let items = [5, 7, 5, 9];

    assert_eq!(index_of(&items, &5), Some(0));
    assert_eq!(index_of(&items, &9), Some(3));
    assert_eq!(index_of(&items, &1), None);
}

#[test]
fn uniq_keeps_first_occurrences_in_order() {
    assert_eq!(uniq(&[3, 1, 3, 2, 1, 4]), vec![3, 1, 2, 4]);
    assert_eq!(uniq::<u8>(&[]), Vec::<u8>::new());
}

#[test]
fn intersection_keeps_shared_items_of_first_slice() {
    let a = [1, 2, 3, 4];
    let b = [2, 4, 6];
    let c = [4, 2, 0];

    assert_eq!(intersection(&[&a[..], &b[..], &c[..]]), vec![2, 4]);
    assert_eq!(intersection(&[&a[..]]), vec![1, 2, 3, 4]);
    assert_eq!(intersection::<i32>(&[]), Vec::<i32>::new());
}

#[test]
fn difference_removes_items_found_elsewhere() {
    let a = [1, 2, 3, 4, 5];
    let b = [5, 2, 10];
    let c = [1];

    assert_eq!(difference(&a, &[&b[..], &c[..]]), vec![3, 4]);
    assert_eq!(difference(&a, &[]), a.to_vec());
}

#[test]
fn shuffle_is_a_permutation_and_leaves_input_alone() {
    let items: Vec<u32> = (0..50).collect();

    let mut shuffled = shuffle(&items);
    assert_eq!(items, (0..50).collect::<Vec<_>>());

    shuffled.sort();
    assert_eq!(shuffled, items);
}
