use std::panic::{catch_unwind, AssertUnwindSafe};

use futures::{channel::oneshot, executor::ThreadPool};
use once_cell::sync::Lazy;

use crate::{
  error::SourceError,
  scheduler::{EmissionHandle, Scheduler, Task},
};

static DEFAULT_POOL: Lazy<Result<ThreadPool, String>> = Lazy::new(|| {
  ThreadPool::builder().name_prefix("pushrx-pool-").create().map_err(|e| e.to_string())
});

/// Runs tasks on a `futures` thread pool.
#[derive(Debug, Clone)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl ThreadPoolScheduler {
  /// Scheduler backed by the lazily created process-wide pool.
  pub fn shared() -> Result<Self, SourceError> {
    match &*DEFAULT_POOL {
      Ok(pool) => Ok(Self { pool: pool.clone() }),
      Err(msg) => Err(SourceError::PoolUnavailable(msg.clone())),
    }
  }

  pub fn with_pool(pool: ThreadPool) -> Self { Self { pool } }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, task: Task) -> Result<EmissionHandle, SourceError> {
    let (finished, rx) = oneshot::channel();
    self.pool.spawn_ok(async move {
      let ok = catch_unwind(AssertUnwindSafe(task)).is_ok();
      // The handle may already be gone; the pass ran either way.
      let _ = finished.send(ok);
    });
    tracing::trace!("emission scheduled on thread pool");
    Ok(EmissionHandle::from_pool(rx))
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::mpsc::channel, thread};

  use super::*;

  #[test]
  fn runs_off_the_calling_thread() {
    let scheduler = ThreadPoolScheduler::shared().unwrap();
    let (tx, rx) = channel();
    let handle = scheduler
      .schedule(Box::new(move || {
        tx.send(thread::current().id()).unwrap();
      }))
      .unwrap();
    handle.wait().unwrap();
    assert_ne!(rx.recv().unwrap(), thread::current().id());
  }

  #[test]
  fn panicking_task_surfaces_on_wait() {
    let scheduler = ThreadPoolScheduler::with_pool(ThreadPool::new().unwrap());
    let handle = scheduler.schedule(Box::new(|| panic!("pool task failed"))).unwrap();
    assert!(matches!(handle.wait(), Err(SourceError::EmitterPanicked)));
  }
}
