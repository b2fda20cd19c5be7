//! Prelude module for convenient imports
#[cfg(feature = "thread-pool")]
pub use crate::scheduler::ThreadPoolScheduler;
pub use crate::{
  error::SourceError,
  observer::{self, BoxedObserver, Emitter, FnMutObserver, Observable, Observer, Signal},
  ops::{self, Filter, Map},
  pacing::Pacing,
  pipeline::Pipeline,
  rc::MutArc,
  scheduler::{EmissionHandle, Immediate, NewThread, Scheduler},
  source::{ColdSource, HotSource, Source, Temperature, Terminal},
  subscribers::{Multicast, Subscribers},
};
