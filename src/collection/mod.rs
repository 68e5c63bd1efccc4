//! Iteration kernel.
//!
//! Stateless, single-pass traversals over sequences and maps. Everything here is
//! built on [`Collection::each`], and every function returns a new container
//! rather than mutating its input.
//!
//! # Examples
//!
//! ```
//! use pacekit::{every_truthy, filter, map, reduce, reject, some};
//!
//! let numbers = [1, 2, 3, 4];
//!
//! assert_eq!(map(&numbers, |n| n * 10), vec![10, 20, 30, 40]);
//! assert_eq!(filter(&numbers, |n| n % 2 == 0), vec![2, 4]);
//! assert_eq!(reject(&numbers, |n| n % 2 == 0), vec![1, 3]);
//! assert_eq!(reduce(&numbers, |total, n| total + n, None), Ok(10));
//! assert!(every_truthy(&numbers));
//! assert!(some(&numbers, |n| *n > 3));
//! ```

mod traversal;
pub use traversal::*;

mod truthy;
pub use truthy::*;

mod iteration;
pub use iteration::*;

mod array_helpers;
pub use array_helpers::*;
