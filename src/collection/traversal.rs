use std::collections::{BTreeMap, HashMap, VecDeque};

/// A container the iteration kernel can traverse.
///
/// Sequences yield their index as the key and are visited in index order. Maps
/// yield a reference to their key; visiting order is whatever the map iterates in
/// (sorted for [`BTreeMap`], unspecified but stable between mutations for
/// [`HashMap`]).
pub trait Collection {
    /// Element type.
    type Item;

    /// Key handed to callbacks alongside each element.
    type Key<'a>
    where
        Self: 'a;

    /// Invoke `callback(value, key, container)` once per element, in traversal order.
    fn each<'a, F>(&'a self, callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self);

    /// Number of elements.
    fn size(&self) -> usize;
}

impl<T> Collection for [T] {
    type Item = T;
    type Key<'a>
        = usize
    where
        Self: 'a;

    fn each<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self),
    {
        for (index, value) in self.iter().enumerate() {
            callback(value, index, self);
        }
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> Collection for [T; N] {
    type Item = T;
    type Key<'a>
        = usize
    where
        Self: 'a;

    fn each<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self),
    {
        for (index, value) in self.iter().enumerate() {
            callback(value, index, self);
        }
    }

    fn size(&self) -> usize {
        N
    }
}

impl<T> Collection for Vec<T> {
    type Item = T;
    type Key<'a>
        = usize
    where
        Self: 'a;

    fn each<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self),
    {
        for (index, value) in self.iter().enumerate() {
            callback(value, index, self);
        }
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> Collection for VecDeque<T> {
    type Item = T;
    type Key<'a>
        = usize
    where
        Self: 'a;

    fn each<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self),
    {
        for (index, value) in self.iter().enumerate() {
            callback(value, index, self);
        }
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> Collection for HashMap<K, V, S> {
    type Item = V;
    type Key<'a>
        = &'a K
    where
        Self: 'a;

    fn each<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self),
    {
        for (key, value) in self.iter() {
            callback(value, key, self);
        }
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl<K, V> Collection for BTreeMap<K, V> {
    type Item = V;
    type Key<'a>
        = &'a K
    where
        Self: 'a;

    fn each<'a, F>(&'a self, mut callback: F)
    where
        F: FnMut(&'a Self::Item, Self::Key<'a>, &'a Self),
    {
        for (key, value) in self.iter() {
            callback(value, key, self);
        }
    }

    fn size(&self) -> usize {
        self.len()
    }
}

/// Invoke `callback(value, key, container)` once per element of `collection`.
pub fn each<'a, C, F>(collection: &'a C, callback: F)
where
    C: Collection + ?Sized,
    F: FnMut(&'a C::Item, C::Key<'a>, &'a C),
{
    collection.each(callback);
}
