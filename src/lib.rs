//! # pushrx: a minimal push-based reactive stream
//!
//! A source pushes values and one terminal signal through a chain of
//! operator stages to any number of observers.
//!
//! ## Quick Start
//!
//! ```rust
//! use pushrx::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let out = Arc::new(Mutex::new(vec![]));
//! let c_out = out.clone();
//!
//! Pipeline::from(ColdSource::<i64, ()>::from_iter(0..10))
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(FnMutObserver(move |v: i64| c_out.lock().unwrap().push(v)))
//!   .unwrap();
//!
//! assert_eq!(*out.lock().unwrap(), vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observer`] | Consumes `next`, `error`, and `complete` signals |
//! | [`Observable`] | Records observers for future signals |
//! | [`HotSource`] | Counter that emits once, regardless of subscribers |
//! | [`ColdSource`] | Emitter procedure re-run on every start |
//! | [`Pipeline`] | Fluent builder chaining `map`/`filter` stages |
//!
//! ## Feature Flags
//!
//! - **`thread-pool`** (default): [`ThreadPoolScheduler`] backed by the
//!   `futures` thread pool
//!
//! [`Observer`]: observer::Observer
//! [`Observable`]: observer::Observable
//! [`HotSource`]: source::HotSource
//! [`ColdSource`]: source::ColdSource
//! [`Pipeline`]: pipeline::Pipeline
//! [`ThreadPoolScheduler`]: scheduler::ThreadPoolScheduler
pub mod error;
pub mod observer;
pub mod ops;
pub mod pacing;
pub mod pipeline;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod source;
pub mod subscribers;
#[cfg(test)]
mod test_util;

pub use prelude::*;
