//! Stream origins.
//!
//! - [`HotSource`]: a counting loop that runs once, independently of who is
//!   subscribed. Late observers miss earlier values.
//! - [`ColdSource`]: wraps an emitter procedure that runs once per `start`,
//!   against whoever is subscribed at that moment.
use crate::{
  error::SourceError,
  observer::{Observable, Observer},
  scheduler::{EmissionHandle, Scheduler},
};

mod cold;
mod hot;
pub use cold::ColdSource;
pub use hot::HotSource;

/// Subscription-timing model of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temperature {
  /// Emission is independent of subscription.
  Hot,
  /// Every start is a fresh emission pass.
  Cold,
}

/// How a stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal<Err> {
  Completed,
  Errored(Err),
}

impl<Err> Terminal<Err> {
  pub fn deliver<Item, O>(self, observer: &mut O)
  where
    O: Observer<Item, Err> + ?Sized,
  {
    match self {
      Terminal::Completed => observer.complete(),
      Terminal::Errored(err) => observer.error(err),
    }
  }
}

/// The origin of a pipeline.
pub trait Source: Observable {
  fn temperature(&self) -> Temperature;

  /// Begin an emission pass on `scheduler`.
  fn start_on(&self, scheduler: &dyn Scheduler) -> Result<EmissionHandle, SourceError>;

  /// Run `attach`, which subscribes something downstream of this source.
  ///
  /// While `attach` runs the source cannot settle, and a cold source cannot be
  /// in the middle of a pass. If a hot source has already ended, `attach` is
  /// skipped and the terminal signal it ended with is returned instead.
  fn attach_guarded(&self, attach: &mut dyn FnMut()) -> Option<Terminal<Self::Err>>;
}
