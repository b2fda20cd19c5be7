use std::time::Duration;

/// Fixed delay a source waits after each emitted value.
///
/// The delay is not a synchronization point: observers subscribing during it
/// simply join the stream from the next value on. Use [`Pacing::none`] for
/// deterministic tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
  interval: Duration,
}

impl Pacing {
  pub const fn none() -> Self { Self { interval: Duration::ZERO } }

  pub const fn every(interval: Duration) -> Self { Self { interval } }

  #[inline]
  pub fn interval(&self) -> Duration { self.interval }

  /// Block the emitting thread for one interval.
  pub fn pause(&self) {
    if !self.interval.is_zero() {
      std::thread::sleep(self.interval);
    }
  }
}

impl From<Duration> for Pacing {
  fn from(interval: Duration) -> Self { Self::every(interval) }
}
