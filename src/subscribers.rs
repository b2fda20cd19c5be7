use smallvec::SmallVec;

use crate::{
  observer::{BoxedObserver, Observable, Observer},
  rc::MutArc,
};

/// Ordered fan-out list of downstream observers.
///
/// Every producer in the crate (sources and operator stages) owns one of
/// these. Observers are kept in subscription order and the list only grows,
/// so the index returned by [`Subscribers::add`] stays valid.
///
/// # Delivery policy
///
/// Signals are delivered to each observer in turn, on the calling thread. A
/// panic inside a handler is not caught: it unwinds through the broadcast and
/// the observers after it miss that signal.
///
/// # Design Rationale
///
/// - **SmallVec**: most nodes have exactly one or two downstream observers, so
///   those stay inline.
/// - **Clone Optimization**: When broadcasting, the last observer receives the
///   moved value instead of a clone.
pub struct Subscribers<Item, Err> {
  observers: SmallVec<[BoxedObserver<Item, Err>; 2]>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { observers: SmallVec::new() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Append an observer and return its position in subscription order.
  ///
  /// Adding the same observer twice is allowed and yields two deliveries per
  /// signal.
  #[inline]
  pub fn add(&mut self, observer: BoxedObserver<Item, Err>) -> usize {
    self.observers.push(observer);
    let index = self.observers.len() - 1;
    tracing::trace!(index, "observer subscribed");
    index
  }

  #[inline]
  pub fn len(&self) -> usize { self.observers.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.observers.is_empty() }

  /// Drop every observer.
  pub fn clear(&mut self) { self.observers.clear(); }

  /// Broadcast value to all observers with optimal cloning.
  ///
  /// - **n subscribers**: n-1 clones + 1 move
  /// - **0 subscribers**: the value is dropped
  pub fn broadcast_value(&mut self, value: Item)
  where
    Item: Clone,
  {
    let mut iter = self.observers.iter_mut().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.next(value.clone());
      } else {
        observer.next(value);
        break;
      }
    }
  }

  /// Broadcast error to all observers, cloning it for all but the last.
  pub fn broadcast_error(&mut self, err: Err)
  where
    Err: Clone,
  {
    let mut iter = self.observers.iter_mut().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.error(err.clone());
      } else {
        observer.error(err);
        break;
      }
    }
  }

  pub fn broadcast_complete(&mut self) {
    for observer in self.observers.iter_mut() {
      observer.complete();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for Subscribers<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  #[inline]
  fn next(&mut self, value: Item) { self.broadcast_value(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.broadcast_error(err) }

  #[inline]
  fn complete(&mut self) { self.broadcast_complete() }
}

impl<Item, Err> std::fmt::Debug for Subscribers<Item, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscribers").field("len", &self.observers.len()).finish()
  }
}

// ============================================================================
// Multicast
// ============================================================================

/// A node that owns a [`Subscribers`] list for its downstream observers.
///
/// Wrapping such a node in a [`MutArc`] makes it an [`Observable`].
pub trait Multicast {
  type Item;
  type Err;

  fn subscribers_mut(&mut self) -> &mut Subscribers<Self::Item, Self::Err>;
}

impl<Item, Err> Multicast for Subscribers<Item, Err> {
  type Item = Item;
  type Err = Err;

  #[inline]
  fn subscribers_mut(&mut self) -> &mut Subscribers<Item, Err> { self }
}

impl<T: Multicast> Observable for MutArc<T> {
  type Item = T::Item;
  type Err = T::Err;

  fn subscribe<O>(&self, observer: O)
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static,
  {
    self.rc_deref_mut().subscribers_mut().add(Box::new(observer));
  }
}
