use std::sync::Arc;

use parking_lot::Mutex;

use crate::observer::{Observer, Signal};

/// Observer that records every signal it receives, shareable across threads.
pub(crate) struct Recorder<Item, Err> {
  log: Arc<Mutex<Vec<Signal<Item, Err>>>>,
}

impl<Item, Err> Default for Recorder<Item, Err> {
  fn default() -> Self { Self { log: Arc::new(Mutex::new(vec![])) } }
}

impl<Item, Err> Clone for Recorder<Item, Err> {
  fn clone(&self) -> Self { Self { log: self.log.clone() } }
}

impl<Item: Clone, Err: Clone> Recorder<Item, Err> {
  pub(crate) fn signals(&self) -> Vec<Signal<Item, Err>> { self.log.lock().clone() }

  pub(crate) fn values(&self) -> Vec<Item> {
    self
      .log
      .lock()
      .iter()
      .filter_map(|s| match s {
        Signal::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }

  pub(crate) fn terminal_count(&self) -> usize {
    self.log.lock().iter().filter(|s| s.is_terminal()).count()
  }
}

impl<Item, Err> Observer<Item, Err> for Recorder<Item, Err> {
  fn next(&mut self, value: Item) { self.log.lock().push(Signal::Next(value)); }
  fn error(&mut self, err: Err) { self.log.lock().push(Signal::Error(err)); }
  fn complete(&mut self) { self.log.lock().push(Signal::Complete); }
}
