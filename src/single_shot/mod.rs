//! Wrappers that run their function at most once per distinct input.
//!
//! Neither wrapper needs a timer, so both are plain synchronous calls.
//!
//! - [`Once`]: runs the wrapped function on the first call only.
//! - [`Memoize`]: caches results for the most recently used arguments.

mod once;
pub use once::*;

mod memoize;
pub use memoize::*;
