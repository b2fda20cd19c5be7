use std::thread;

use crate::{
  error::SourceError,
  scheduler::{EmissionHandle, Scheduler, Task},
};

/// Runs every task on a freshly spawned thread.
#[derive(Debug, Clone, Default)]
pub struct NewThread {
  name: Option<String>,
}

impl NewThread {
  pub fn named(name: impl Into<String>) -> Self { Self { name: Some(name.into()) } }
}

impl Scheduler for NewThread {
  fn schedule(&self, task: Task) -> Result<EmissionHandle, SourceError> {
    let mut builder = thread::Builder::new();
    if let Some(name) = &self.name {
      builder = builder.name(name.clone());
    }
    let handle = builder.spawn(task)?;
    tracing::trace!(thread = ?handle.thread().id(), "emission scheduled on new thread");
    Ok(EmissionHandle::from_thread(handle))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::mpsc::channel;

  use super::*;

  #[test]
  fn runs_on_another_thread() {
    let (tx, rx) = channel();
    let handle = NewThread::named("emitter")
      .schedule(Box::new(move || {
        let current = thread::current();
        tx.send((current.id(), current.name().map(str::to_owned))).unwrap();
      }))
      .unwrap();
    handle.wait().unwrap();

    let (id, name) = rx.recv().unwrap();
    assert_ne!(id, thread::current().id());
    assert_eq!(name.as_deref(), Some("emitter"));
  }

  #[test]
  fn panicking_task_surfaces_on_wait() {
    let handle = NewThread::default().schedule(Box::new(|| panic!("emitter failed"))).unwrap();
    assert!(matches!(handle.wait(), Err(SourceError::EmitterPanicked)));
  }
}
