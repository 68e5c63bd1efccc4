use std::{fmt, sync::OnceLock};

/// Function that runs at most once.
///
/// The first call runs the wrapped function with its arguments and stores the
/// result. Every later call, whatever its arguments, returns the stored result
/// without running the function again.
///
/// # Thread Safety
///
/// Concurrent first calls race for a single claim. The winner runs the function;
/// the others block until it finishes and then observe its result. If the
/// function panics nothing is stored and the next call tries again.
///
/// Calling the same `Once` from inside its own function deadlocks.
///
/// # Examples
///
/// ```
/// use pacekit::once;
///
/// let init = once(|port: u16| format!("listening on {port}"));
///
/// assert_eq!(init.call(8080), "listening on 8080");
/// assert_eq!(init.call(9090), "listening on 8080");
/// ```
pub struct Once<F, R> {
    func: F,
    result: OnceLock<R>,
}

/// Wrap `func` so that it runs at most once.
pub fn once<F, A, R>(func: F) -> Once<F, R>
where
    F: Fn(A) -> R,
{
    Once::new(func)
}

impl<F, R> Once<F, R> {
    /// Wrap `func` so that it runs at most once.
    pub fn new<A>(func: F) -> Self
    where
        F: Fn(A) -> R,
    {
        Self {
            func,
            result: OnceLock::new(),
        }
    }

    /// Run the function on the first call, return its stored result afterwards.
    pub fn call<A>(&self, args: A) -> &R
    where
        F: Fn(A) -> R,
    {
        self.result.get_or_init(|| {
            tracing::trace!("once: running wrapped function");
            (self.func)(args)
        })
    }

    /// Stored result, if the function has completed.
    pub fn get(&self) -> Option<&R> {
        self.result.get()
    }

    /// Whether the function has completed.
    pub fn is_called(&self) -> bool {
        self.result.get().is_some()
    }
}

impl<F, R: fmt::Debug> fmt::Debug for Once<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Once")
            .field("result", &self.result.get())
            .finish_non_exhaustive()
    }
}
