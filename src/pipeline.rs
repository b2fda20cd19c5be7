//! Fluent pipeline builder.
//!
//! ```rust
//! use pushrx::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let out = Arc::new(Mutex::new(vec![]));
//! let c_out = out.clone();
//!
//! Pipeline::from(ColdSource::<i64, ()>::counter(10, Pacing::none()))
//!   .map(|v| v + 10)
//!   .filter(|v| v % 2 == 0)
//!   .subscribe(FnMutObserver(move |v: i64| c_out.lock().unwrap().push(v)))
//!   .unwrap();
//!
//! assert_eq!(*out.lock().unwrap(), vec![10, 12, 14, 16, 18]);
//! ```
use std::sync::Arc;

use crate::{
  error::SourceError,
  observer::{Observable, Observer},
  ops::{self, Filter, Map},
  scheduler::{EmissionHandle, Immediate, Scheduler},
  source::{Source, Temperature},
};

/// Builder handle: the source plus the current tail of the stage chain.
///
/// Every combinator consumes the handle and returns a new one pointing at the
/// stage it created, which is already subscribed to the previous tail.
pub struct Pipeline<S, T> {
  source: S,
  tail: T,
  scheduler: Arc<dyn Scheduler + Send + Sync>,
}

impl<S> Pipeline<S, S>
where
  S: Source + Clone,
{
  /// Start a pipeline whose tail is the source itself.
  #[allow(clippy::should_implement_trait)]
  pub fn from(source: S) -> Self {
    Pipeline { tail: source.clone(), source, scheduler: Arc::new(Immediate) }
  }
}

impl<S, T> Pipeline<S, T>
where
  S: Source,
  T: Observable,
{
  pub fn map<Out, F>(self, transform: F) -> Pipeline<S, Map<F, T::Item, Out, T::Err>>
  where
    T::Item: 'static,
    T::Err: Clone + Send + 'static,
    F: FnMut(T::Item) -> Out + Send + 'static,
    Out: Clone + Send + 'static,
  {
    let tail = ops::map(&self.tail, transform);
    Pipeline { source: self.source, tail, scheduler: self.scheduler }
  }

  pub fn filter<P>(self, predicate: P) -> Pipeline<S, Filter<P, T::Item, T::Err>>
  where
    T::Item: Clone + Send + 'static,
    T::Err: Clone + Send + 'static,
    P: FnMut(&T::Item) -> bool + Send + 'static,
  {
    let tail = ops::filter(&self.tail, predicate);
    Pipeline { source: self.source, tail, scheduler: self.scheduler }
  }

  /// Run the cold passes triggered by [`Pipeline::subscribe`] on `scheduler`
  /// instead of the calling thread.
  pub fn subscribe_on<Sch>(self, scheduler: Sch) -> Self
  where
    Sch: Scheduler + Send + Sync + 'static,
  {
    Pipeline { scheduler: Arc::new(scheduler), ..self }
  }

  /// Attach `observer` to the tail.
  ///
  /// For a cold source this also starts one emission pass, so every call is an
  /// independent pass through the chain. Passes run one at a time, and an
  /// observer is never attached while a pass is underway. For a hot source the
  /// observer simply joins the running stream and the returned handle has
  /// nothing to wait for. If the hot source has already ended, the observer
  /// receives its terminal signal straight away.
  pub fn subscribe<O>(&self, observer: O) -> Result<EmissionHandle, SourceError>
  where
    T: Observable<Err = S::Err>,
    O: Observer<T::Item, S::Err> + Send + 'static,
  {
    let mut unattached = Some(observer);
    let settled = self.source.attach_guarded(&mut || {
      if let Some(observer) = unattached.take() {
        self.tail.subscribe(observer);
      }
    });
    if let (Some(terminal), Some(mut observer)) = (settled, unattached) {
      terminal.deliver::<T::Item, _>(&mut observer);
      return Ok(EmissionHandle::ready());
    }
    match self.source.temperature() {
      Temperature::Cold => self.source.start_on(&*self.scheduler),
      Temperature::Hot => Ok(EmissionHandle::ready()),
    }
  }

  /// The current tail; observers attached here do not trigger a pass.
  ///
  /// This is the raw node: attaching to it after a hot source has ended
  /// delivers nothing. Use [`Pipeline::subscribe`] to get the terminal signal.
  pub fn tail(&self) -> &T { &self.tail }

  pub fn source(&self) -> &S { &self.source }
}
