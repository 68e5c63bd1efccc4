use std::{cell::RefCell, hash::Hash, marker::PhantomData, num::NonZeroUsize};

use lru::LruCache;
use parking_lot::ReentrantMutex;

/// Function whose results are cached by argument value.
///
/// [`memoize`] builds a single-slot cache: only the most recent argument and its
/// result are remembered, so alternating between two arguments recomputes every
/// time. Use [`Memoize::with_capacity`] to remember more pairs; the least recently
/// used pair is evicted first.
///
/// # Thread Safety
///
/// Calls are serialized through a reentrant lock, so the wrapped function never
/// runs on two threads at once. The function may call its own wrapper recursively
/// on the same thread.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use pacekit::memoize;
///
/// let runs = AtomicUsize::new(0);
/// let square = memoize(|n: u64| {
///     runs.fetch_add(1, Ordering::SeqCst);
///     n * n
/// });
///
/// assert_eq!(square.call(3), 9);
/// assert_eq!(square.call(3), 9);
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
pub struct Memoize<F, A, R> {
    func: F,
    cache: ReentrantMutex<RefCell<LruCache<A, R>>>,
    _args: PhantomData<fn(A) -> R>,
}

/// Wrap `func` with a single-slot result cache.
pub fn memoize<F, A, R>(func: F) -> Memoize<F, A, R>
where
    F: Fn(A) -> R,
    A: Hash + Eq,
{
    Memoize::new(func)
}

impl<F, A, R> Memoize<F, A, R>
where
    F: Fn(A) -> R,
    A: Hash + Eq,
{
    /// Wrap `func` with a single-slot result cache.
    pub fn new(func: F) -> Self {
        Self::with_capacity(func, NonZeroUsize::MIN)
    }

    /// Wrap `func` with a cache that keeps the `capacity` most recently used pairs.
    pub fn with_capacity(func: F, capacity: NonZeroUsize) -> Self {
        Self {
            func,
            cache: ReentrantMutex::new(RefCell::new(LruCache::new(capacity))),
            _args: PhantomData,
        }
    }

    /// Return the cached result for `arg`, computing and caching it on a miss.
    pub fn call(&self, arg: A) -> R
    where
        A: Clone,
        R: Clone,
    {
        let cache = self.cache.lock();

        let cached = cache.borrow_mut().get(&arg).cloned();
        if let Some(result) = cached {
            tracing::trace!("memoize: cache hit");
            return result;
        }

        tracing::trace!("memoize: cache miss");
        let result = (self.func)(arg.clone());
        cache.borrow_mut().put(arg, result.clone());
        result
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.cache.lock().borrow().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached pair.
    pub fn clear(&self) {
        self.cache.lock().borrow_mut().clear();
    }
}
