use crate::{
  observer::{Observable, Observer},
  rc::MutArc,
  subscribers::{Multicast, Subscribers},
};

/// Shared handle to a [`FilterStage`].
pub type Filter<P, Item, Err> = MutArc<FilterStage<P, Item, Err>>;

/// Emit only those values from `upstream` that pass a predicate test.
///
/// Rejected values vanish without a signal. `error` and `complete` always pass
/// through.
///
/// ```rust
/// use pushrx::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let coll = Arc::new(Mutex::new(vec![]));
/// let c_coll = coll.clone();
///
/// let source = ColdSource::<i64, ()>::from_iter(0..10);
/// ops::filter(&source, |v| *v % 2 == 0)
///   .subscribe(FnMutObserver(move |v: i64| c_coll.lock().unwrap().push(v)));
/// source.start().unwrap();
///
/// // only even numbers received.
/// assert_eq!(*coll.lock().unwrap(), vec![0, 2, 4, 6, 8]);
/// ```
pub fn filter<U, P>(upstream: &U, predicate: P) -> Filter<P, U::Item, U::Err>
where
  U: Observable,
  U::Item: Clone + Send + 'static,
  U::Err: Clone + Send + 'static,
  P: FnMut(&U::Item) -> bool + Send + 'static,
{
  let stage = MutArc::own(FilterStage::new(predicate));
  upstream.subscribe(stage.clone());
  stage
}

pub struct FilterStage<P, Item, Err> {
  predicate: P,
  subscribers: Subscribers<Item, Err>,
}

impl<P, Item, Err> FilterStage<P, Item, Err> {
  pub fn new(predicate: P) -> Self { Self { predicate, subscribers: Subscribers::default() } }
}

impl<P, Item, Err> Observer<Item, Err> for FilterStage<P, Item, Err>
where
  P: FnMut(&Item) -> bool,
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.subscribers.broadcast_value(value)
    }
  }

  fn error(&mut self, err: Err) { self.subscribers.broadcast_error(err) }

  fn complete(&mut self) { self.subscribers.broadcast_complete() }
}

impl<P, Item, Err> Multicast for FilterStage<P, Item, Err> {
  type Item = Item;
  type Err = Err;

  #[inline]
  fn subscribers_mut(&mut self) -> &mut Subscribers<Item, Err> { &mut self.subscribers }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{observer::Signal, source::ColdSource, test_util::Recorder};

  #[test]
  fn drops_rejected_values_silently() {
    let source = ColdSource::<i64, ()>::from_iter(0..10);
    let odd = filter(&source, |v| v % 2 == 1);
    let recorder = Recorder::default();
    odd.subscribe(recorder.clone());

    source.start().unwrap();
    assert_eq!(
      recorder.signals(),
      vec![
        Signal::Next(1),
        Signal::Next(3),
        Signal::Next(5),
        Signal::Next(7),
        Signal::Next(9),
        Signal::Complete
      ]
    );
  }

  #[test]
  fn terminal_passes_even_when_last_value_rejected() {
    let source = ColdSource::<i64, &'static str>::new(|emitter| {
      emitter.next(1);
      emitter.error("boom");
    });
    let none = filter(&source, |_| false);
    let recorder = Recorder::default();
    none.subscribe(recorder.clone());

    source.start().unwrap();
    assert_eq!(recorder.signals(), vec![Signal::Error("boom")]);
  }

  #[test]
  fn chained_stages_compose() {
    let source = ColdSource::<i64, ()>::from_iter(0..10);
    let shifted = crate::ops::map(&source, |v| v + 10);
    let even = filter(&shifted, |v| v % 2 == 0);
    let recorder = Recorder::default();
    even.subscribe(recorder.clone());

    source.start().unwrap();
    assert_eq!(recorder.values(), vec![10, 12, 14, 16, 18]);
    assert_eq!(recorder.terminal_count(), 1);
  }
}
