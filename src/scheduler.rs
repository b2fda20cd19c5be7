//! Where an emission pass runs.
//!
//! A hot source always runs its loop on a scheduler; a cold source runs a pass
//! inline by default and on a scheduler when asked to. The operator chain
//! itself is never scheduled: every stage runs synchronously on whichever
//! thread the source emits from.
use std::thread::JoinHandle;

use crate::error::SourceError;

mod thread_scheduler;
pub use thread_scheduler::NewThread;
#[cfg(feature = "thread-pool")]
mod thread_pool_scheduler;
#[cfg(feature = "thread-pool")]
pub use thread_pool_scheduler::ThreadPoolScheduler;

/// One emission pass, ready to run.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A Scheduler is an object to order task and schedule their execution.
pub trait Scheduler {
  fn schedule(&self, task: Task) -> Result<EmissionHandle, SourceError>;
}

/// Runs the task on the calling thread before `schedule` returns.
///
/// A panic inside the task propagates to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Scheduler for Immediate {
  fn schedule(&self, task: Task) -> Result<EmissionHandle, SourceError> {
    task();
    Ok(EmissionHandle::ready())
  }
}

/// Handle to a scheduled emission pass.
///
/// Dropping it detaches the pass, which keeps running to its terminal signal.
pub struct EmissionHandle(HandleInner);

enum HandleInner {
  Ready,
  Thread(JoinHandle<()>),
  #[cfg(feature = "thread-pool")]
  Pool(futures::channel::oneshot::Receiver<bool>),
}

impl EmissionHandle {
  /// A handle with nothing left to wait for.
  pub fn ready() -> Self { Self(HandleInner::Ready) }

  pub(crate) fn from_thread(handle: JoinHandle<()>) -> Self { Self(HandleInner::Thread(handle)) }

  #[cfg(feature = "thread-pool")]
  pub(crate) fn from_pool(finished: futures::channel::oneshot::Receiver<bool>) -> Self {
    Self(HandleInner::Pool(finished))
  }

  /// Block until the pass has run to completion.
  pub fn wait(self) -> Result<(), SourceError> {
    match self.0 {
      HandleInner::Ready => Ok(()),
      HandleInner::Thread(handle) => handle.join().map_err(|_| SourceError::EmitterPanicked),
      #[cfg(feature = "thread-pool")]
      HandleInner::Pool(finished) => match futures::executor::block_on(finished) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(SourceError::EmitterPanicked),
      },
    }
  }
}

impl std::fmt::Debug for EmissionHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let kind = match &self.0 {
      HandleInner::Ready => "ready",
      HandleInner::Thread(_) => "thread",
      #[cfg(feature = "thread-pool")]
      HandleInner::Pool(_) => "pool",
    };
    f.debug_tuple("EmissionHandle").field(&kind).finish()
  }
}
