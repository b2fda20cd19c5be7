use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  error::SourceError,
  observer::{Emitter, Observable, Observer},
  pacing::Pacing,
  rc::MutArc,
  scheduler::{EmissionHandle, Immediate, Scheduler},
  source::{Source, Temperature, Terminal},
  subscribers::Subscribers,
};

type EmitFn<Item, Err> = dyn Fn(&mut dyn Emitter<Item, Err>) + Send + Sync;

/// A source whose emitter procedure runs once per [`ColdSource::start`].
///
/// Subscribing only records the observer. Every start is a fresh pass that
/// delivers the complete sequence to the observers recorded at that moment.
/// Passes over one source run one at a time, so an observer present for two
/// passes sees them back to back.
///
/// ```rust
/// use pushrx::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// let source = ColdSource::<i64, ()>::new(|emitter| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
/// });
/// source.subscribe(FnMutObserver(move |v: i64| c_seen.lock().unwrap().push(v)));
/// assert!(seen.lock().unwrap().is_empty());
///
/// source.start().unwrap();
/// source.start().unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 2]);
/// ```
pub struct ColdSource<Item, Err> {
  emit: Arc<EmitFn<Item, Err>>,
  subscribers: MutArc<Subscribers<Item, Err>>,
  pass_gate: Arc<Mutex<()>>,
}

impl<Item, Err> Clone for ColdSource<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      emit: self.emit.clone(),
      subscribers: self.subscribers.clone(),
      pass_gate: self.pass_gate.clone(),
    }
  }
}

impl<Item, Err> ColdSource<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  /// Wrap an emitter procedure. It is not invoked here.
  pub fn new<F>(emit: F) -> Self
  where
    F: Fn(&mut dyn Emitter<Item, Err>) + Send + Sync + 'static,
  {
    Self {
      emit: Arc::new(emit),
      subscribers: MutArc::own(Subscribers::default()),
      pass_gate: Arc::new(Mutex::new(())),
    }
  }

  /// Emit every item of `iter`, then complete.
  #[allow(clippy::should_implement_trait)]
  pub fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = Item> + Clone + Send + Sync + 'static,
  {
    Self::new(move |emitter| {
      for value in iter.clone() {
        emitter.next(value);
      }
      emitter.complete();
    })
  }

  /// Run one pass on the calling thread.
  pub fn start(&self) -> Result<EmissionHandle, SourceError> { self.start_on(&Immediate) }

  /// Run one pass on `scheduler`.
  pub fn start_on(&self, scheduler: &dyn Scheduler) -> Result<EmissionHandle, SourceError> {
    let emit = self.emit.clone();
    let subscribers = self.subscribers.clone();
    let pass_gate = self.pass_gate.clone();
    scheduler.schedule(Box::new(move || {
      let _pass = pass_gate.lock();
      run_pass(&*emit, &subscribers)
    }))
  }
}

impl<Err> ColdSource<i64, Err>
where
  Err: Clone + Send + 'static,
{
  /// Emit `0..count`, pausing after each value, then complete.
  pub fn counter(count: i64, pacing: Pacing) -> Self {
    Self::new(move |emitter| {
      for value in 0..count {
        emitter.next(value);
        pacing.pause();
      }
      emitter.complete();
    })
  }
}

fn run_pass<Item: Clone, Err: Clone>(
  emit: &EmitFn<Item, Err>,
  subscribers: &MutArc<Subscribers<Item, Err>>,
) {
  let span = tracing::debug_span!("cold_pass");
  let _enter = span.enter();
  tracing::trace!("pass started");
  let mut emitter = PassEmitter { subscribers, terminated: false };
  emit(&mut emitter);
  if emitter.terminated {
    tracing::trace!("pass finished");
  } else {
    tracing::debug!("emitter returned without a terminal signal");
  }
}

/// Emitter for a single pass; drops everything after the terminal signal.
struct PassEmitter<'a, Item, Err> {
  subscribers: &'a MutArc<Subscribers<Item, Err>>,
  terminated: bool,
}

impl<Item: Clone, Err: Clone> Emitter<Item, Err> for PassEmitter<'_, Item, Err> {
  fn next(&mut self, value: Item) {
    if self.terminated {
      tracing::trace!("value after terminal signal dropped");
      return;
    }
    self.subscribers.rc_deref_mut().broadcast_value(value);
  }

  fn error(&mut self, err: Err) {
    if !std::mem::replace(&mut self.terminated, true) {
      self.subscribers.rc_deref_mut().broadcast_error(err);
    }
  }

  fn complete(&mut self) {
    if !std::mem::replace(&mut self.terminated, true) {
      self.subscribers.rc_deref_mut().broadcast_complete();
    }
  }
}

impl<Item, Err> Observable for ColdSource<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn subscribe<O>(&self, observer: O)
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    self.subscribers.subscribe(observer);
  }
}

impl<Item, Err> Source for ColdSource<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn temperature(&self) -> Temperature { Temperature::Cold }

  fn start_on(&self, scheduler: &dyn Scheduler) -> Result<EmissionHandle, SourceError> {
    ColdSource::start_on(self, scheduler)
  }

  fn attach_guarded(&self, attach: &mut dyn FnMut()) -> Option<Terminal<Err>> {
    let _pass = self.pass_gate.lock();
    attach();
    None
  }
}
