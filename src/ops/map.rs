use std::marker::PhantomData;

use crate::{
  observer::{Observable, Observer},
  rc::MutArc,
  subscribers::{Multicast, Subscribers},
};

/// Shared handle to a [`MapStage`], as held by its upstream and the builder.
pub type Map<F, In, Out, Err> = MutArc<MapStage<F, In, Out, Err>>;

/// Creates a new stage which calls a closure on each value and emits its
/// return, and subscribes it to `upstream`.
///
/// Terminal signals pass through untouched. A panicking closure is not caught.
pub fn map<U, F, Out>(upstream: &U, transform: F) -> Map<F, U::Item, Out, U::Err>
where
  U: Observable,
  U::Item: 'static,
  U::Err: Clone + Send + 'static,
  F: FnMut(U::Item) -> Out + Send + 'static,
  Out: Clone + Send + 'static,
{
  let stage = MutArc::own(MapStage::new(transform));
  upstream.subscribe(stage.clone());
  stage
}

pub struct MapStage<F, In, Out, Err> {
  transform: F,
  subscribers: Subscribers<Out, Err>,
  _p: PhantomData<fn(In)>,
}

impl<F, In, Out, Err> MapStage<F, In, Out, Err> {
  pub fn new(transform: F) -> Self {
    Self { transform, subscribers: Subscribers::default(), _p: PhantomData }
  }
}

impl<F, In, Out, Err> Observer<In, Err> for MapStage<F, In, Out, Err>
where
  F: FnMut(In) -> Out,
  Out: Clone,
  Err: Clone,
{
  fn next(&mut self, value: In) {
    let mapped = (self.transform)(value);
    self.subscribers.broadcast_value(mapped)
  }

  fn error(&mut self, err: Err) { self.subscribers.broadcast_error(err) }

  fn complete(&mut self) { self.subscribers.broadcast_complete() }
}

impl<F, In, Out, Err> Multicast for MapStage<F, In, Out, Err> {
  type Item = Out;
  type Err = Err;

  #[inline]
  fn subscribers_mut(&mut self) -> &mut Subscribers<Out, Err> { &mut self.subscribers }
}
