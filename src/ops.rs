//! Operator stages.
//!
//! A stage is an [`Observer`](crate::observer::Observer) of its upstream and
//! an [`Observable`](crate::observer::Observable) for its downstream. Stages
//! run synchronously on the emitting thread and fan out to every downstream
//! observer in subscription order.
pub mod filter;
pub mod map;

pub use filter::{filter, Filter, FilterStage};
pub use map::{map, Map, MapStage};
