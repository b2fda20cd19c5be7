use thiserror::Error;

/// Failures of the machinery around an emission pass.
///
/// Errors travelling *through* a stream are not represented here: they are
/// the stream's own `Err` type and reach observers as `error` signals.
#[derive(Debug, Error)]
pub enum SourceError {
  #[error("hot source was already started")]
  AlreadyStarted,

  #[error("failed to spawn emission thread: {0}")]
  Spawn(#[from] std::io::Error),

  #[error("shared thread pool is unavailable: {0}")]
  PoolUnavailable(String),

  #[error("emission pass panicked")]
  EmitterPanicked,
}
