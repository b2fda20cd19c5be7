//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion). The producer side is [`Observable`],
//! which records observers, and [`Emitter`], the facade a cold source hands to
//! its emitter procedure.

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. Producers guarantee that at most one of `error` or
/// `complete` is delivered per emission pass, and nothing after it.
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable
  fn error(&mut self, err: Err);

  /// Handle completion of the observable
  fn complete(&mut self);
}

// ============================================================================
// Observable Trait
// ============================================================================

/// The producer half of the protocol.
///
/// `subscribe` records the observer as a recipient of future signals and
/// returns immediately, whether or not emission has started. Operator stages
/// implement both this trait and [`Observer`].
pub trait Observable {
  type Item;
  type Err;

  fn subscribe<O>(&self, observer: O)
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// A trait for emitting items to the observers of a cold source.
///
/// Cold emitter procedures receive `&mut dyn Emitter<Item, Err>`, so the
/// procedure never learns the concrete type of whatever sits downstream (a
/// `MapStage`, a `FilterStage`, or the final user observer). The emitter
/// enforces the terminal rule for its pass: everything emitted after the first
/// `error` or `complete` is dropped.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
}

/// Boxed observer as stored by every multicast node.
pub type BoxedObserver<Item, Err> = Box<dyn Observer<Item, Err> + Send>;

impl<O, Item, Err> Observer<Item, Err> for Box<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }
}

// ============================================================================
// Signal
// ============================================================================

/// One event flowing through a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

impl<Item, Err> Signal<Item, Err> {
  /// `Complete` and `Error` end an emission pass.
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Signal::Next(_)) }

  /// Hand this signal to the matching observer method.
  pub fn deliver<O>(self, observer: &mut O)
  where
    O: Observer<Item, Err> + ?Sized,
  {
    match self {
      Signal::Next(value) => observer.next(value),
      Signal::Error(err) => observer.error(err),
      Signal::Complete => observer.complete(),
    }
  }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Observer built from a single `next` closure.
///
/// `error` and `complete` are ignored. Use [`fns`] when the terminal signals
/// matter.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(&mut self, _err: Err) {}

  #[inline]
  fn complete(&mut self) {}
}

/// Observer built from three closures, one per signal.
#[derive(Clone)]
pub struct FnObserver<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

/// Build an observer from `next`, `error` and `complete` handlers.
///
/// ```rust
/// use pushrx::prelude::*;
///
/// let mut sum = 0;
/// let mut done = false;
/// {
///   let mut observer = pushrx::observer::fns(|v: i64| sum += v, |_: ()| {}, || done = true);
///   Observer::<i64, ()>::next(&mut observer, 2);
///   Observer::<i64, ()>::next(&mut observer, 3);
///   Observer::<i64, ()>::complete(&mut observer);
/// }
/// assert_eq!(sum, 5);
/// assert!(done);
/// ```
pub fn fns<N, E, C>(next: N, error: E, complete: C) -> FnObserver<N, E, C> {
  FnObserver { next, error, complete }
}

impl<N, E, C, Item, Err> Observer<Item, Err> for FnObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(&mut self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(&mut self) { (self.complete)() }
}
