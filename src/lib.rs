#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod pacer;
pub use pacer::*;

mod collection;
pub use collection::*;

mod single_shot;
pub use single_shot::*;

mod scheduler;
pub use scheduler::*;

mod rate_control;
pub use rate_control::*;

mod error;
pub use error::*;

mod common;
pub use common::{FailureReporter, Invocation, MaxPending, WaitMs};

#[cfg(test)]
mod tests;
