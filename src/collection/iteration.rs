use crate::{Collection, PacekitError, Truthy};

/// Return the argument unchanged.
pub fn identity<T>(value: T) -> T {
    value
}

/// Apply `callback` to every element, preserving order and length.
pub fn map<C, U, F>(collection: &C, mut callback: F) -> Vec<U>
where
    C: Collection + ?Sized,
    F: FnMut(&C::Item) -> U,
{
    let mut mapped = Vec::with_capacity(collection.size());
    collection.each(|value, _, _| mapped.push(callback(value)));
    mapped
}

/// Elements for which `predicate` is truthy, in traversal order.
pub fn filter<C, P, T>(collection: &C, mut predicate: P) -> Vec<C::Item>
where
    C: Collection + ?Sized,
    C::Item: Clone,
    P: FnMut(&C::Item) -> T,
    T: Truthy,
{
    let mut kept = Vec::new();
    collection.each(|value, _, _| {
        if predicate(value).is_truthy() {
            kept.push(value.clone());
        }
    });
    kept
}

/// Elements for which `predicate` is falsy, in traversal order.
///
/// The complement of [`filter`].
pub fn reject<C, P, T>(collection: &C, mut predicate: P) -> Vec<C::Item>
where
    C: Collection + ?Sized,
    C::Item: Clone,
    P: FnMut(&C::Item) -> T,
    T: Truthy,
{
    filter(collection, |value| !predicate(value).is_truthy())
}

/// Left-to-right fold starting from `initial`.
pub fn fold<C, Acc, F>(collection: &C, initial: Acc, mut callback: F) -> Acc
where
    C: Collection + ?Sized,
    F: FnMut(Acc, &C::Item) -> Acc,
{
    let mut accumulator = Some(initial);
    collection.each(|value, _, _| {
        accumulator = accumulator.take().map(|acc| callback(acc, value));
    });

    match accumulator {
        Some(acc) => acc,
        None => unreachable!("fold: accumulator is restored after every step"),
    }
}

/// Left-to-right fold whose accumulator has the element type.
///
/// Without an `initial` value the first element seeds the accumulator and the
/// fold starts at the second element. An empty collection with no `initial`
/// value fails with [`PacekitError::EmptyCollection`].
///
/// # Examples
///
/// ```
/// use pacekit::{PacekitError, reduce};
///
/// assert_eq!(reduce(&[1, 2, 3], |a, b| a + b, Some(0)), Ok(6));
/// assert_eq!(
///     reduce(&Vec::<i32>::new(), |a, b| a + b, None),
///     Err(PacekitError::EmptyCollection)
/// );
/// ```
pub fn reduce<C, F>(
    collection: &C,
    mut callback: F,
    initial: Option<C::Item>,
) -> Result<C::Item, PacekitError>
where
    C: Collection + ?Sized,
    C::Item: Clone,
    F: FnMut(C::Item, &C::Item) -> C::Item,
{
    if let Some(initial) = initial {
        return Ok(fold(collection, initial, callback));
    }

    let seeded = fold(collection, None, |accumulator, value| match accumulator {
        None => Some(value.clone()),
        Some(acc) => Some(callback(acc, value)),
    });

    seeded.ok_or(PacekitError::EmptyCollection)
}

/// Whether `predicate` is truthy for every element. `true` for an empty collection.
pub fn every<C, P, T>(collection: &C, mut predicate: P) -> bool
where
    C: Collection + ?Sized,
    P: FnMut(&C::Item) -> T,
    T: Truthy,
{
    fold(collection, true, |all, value| {
        all && predicate(value).is_truthy()
    })
}

/// Whether `predicate` is truthy for at least one element. `false` for an empty collection.
pub fn some<C, P, T>(collection: &C, mut predicate: P) -> bool
where
    C: Collection + ?Sized,
    P: FnMut(&C::Item) -> T,
    T: Truthy,
{
    !every(collection, |value| !predicate(value).is_truthy())
}

/// [`every`] with the element itself as the predicate.
pub fn every_truthy<C>(collection: &C) -> bool
where
    C: Collection + ?Sized,
    C::Item: Truthy,
{
    every(collection, |value| value.is_truthy())
}

/// [`some`] with the element itself as the predicate.
pub fn some_truthy<C>(collection: &C) -> bool
where
    C: Collection + ?Sized,
    C::Item: Truthy,
{
    some(collection, |value| value.is_truthy())
}

/// Whether any element equals `target`.
pub fn contains<C>(collection: &C, target: &C::Item) -> bool
where
    C: Collection + ?Sized,
    C::Item: PartialEq,
{
    some(collection, |value| value == target)
}
