use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use parking_lot::Mutex;

use crate::{
  error::SourceError,
  observer::{Observable, Observer},
  pacing::Pacing,
  rc::MutArc,
  scheduler::{EmissionHandle, NewThread, Scheduler},
  source::{Source, Temperature, Terminal},
  subscribers::Subscribers,
};

/// A counter that emits `0..count` once, on its own execution path.
///
/// The loop runs whether or not anybody is subscribed, and nothing is
/// buffered: an observer attached while the loop is running receives the
/// remaining values and the terminal signal. An observer attached after the
/// terminal signal, here or through a [`Pipeline`](crate::pipeline::Pipeline),
/// receives only the terminal signal.
///
/// [`HotSource::inject_error`] may be called from inside a handler.
///
/// ```rust
/// use pushrx::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// let counter = HotSource::<()>::new(3, Pacing::none());
/// counter.subscribe(FnMutObserver(move |v: i64| c_seen.lock().unwrap().push(v)));
/// counter.start(&NewThread::default()).unwrap().wait().unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
/// ```
pub struct HotSource<Err> {
  count: i64,
  pacing: Pacing,
  shared: Arc<Shared<Err>>,
}

struct Shared<Err> {
  started: AtomicBool,
  control: Mutex<Control<Err>>,
  /// Held while the stream settles, and while a guarded attach runs.
  gate: Mutex<()>,
  state: MutArc<HotState<Err>>,
}

/// Loop bookkeeping, never held across a broadcast.
struct Control<Err> {
  stopped: bool,
  emitting: bool,
  pending: Option<Terminal<Err>>,
}

struct HotState<Err> {
  subscribers: Subscribers<i64, Err>,
  terminal: Option<Terminal<Err>>,
}

impl<Err: Clone> Shared<Err> {
  /// Deliver the terminal signal and remember it for late observers.
  fn settle(&self, terminal: Terminal<Err>) {
    let _gate = self.gate.lock();
    let mut state = self.state.rc_deref_mut();
    match &terminal {
      Terminal::Completed => state.subscribers.broadcast_complete(),
      Terminal::Errored(err) => state.subscribers.broadcast_error(err.clone()),
    }
    state.terminal = Some(terminal);
    state.subscribers.clear();
  }

  /// Mark a value as in flight. The mark is not live once the stream stopped.
  fn begin_value(&self) -> InFlight<'_, Err> {
    let mut control = self.control.lock();
    let live = !control.stopped;
    control.emitting = live;
    InFlight { shared: self, live }
  }
}

/// Clears the in-flight mark, even when a handler unwinds.
struct InFlight<'a, Err> {
  shared: &'a Shared<Err>,
  live: bool,
}

impl<Err> InFlight<'_, Err> {
  /// The error injected while the value was being delivered, if any.
  fn finish(self) -> Option<Terminal<Err>> {
    let mut control = self.shared.control.lock();
    control.emitting = false;
    control.pending.take()
  }
}

impl<Err> Drop for InFlight<'_, Err> {
  fn drop(&mut self) { self.shared.control.lock().emitting = false; }
}

impl<Err> Clone for HotSource<Err> {
  fn clone(&self) -> Self {
    Self { count: self.count, pacing: self.pacing, shared: self.shared.clone() }
  }
}

impl<Err> HotSource<Err>
where
  Err: Clone + Send + 'static,
{
  /// An inert counter; nothing is emitted until [`HotSource::start`].
  pub fn new(count: i64, pacing: Pacing) -> Self {
    let shared = Shared {
      started: AtomicBool::new(false),
      control: Mutex::new(Control { stopped: false, emitting: false, pending: None }),
      gate: Mutex::new(()),
      state: MutArc::own(HotState { subscribers: Subscribers::default(), terminal: None }),
    };
    Self { count, pacing, shared: Arc::new(shared) }
  }

  /// Build a counter and start it on a new thread right away.
  pub fn spawn(count: i64, pacing: Pacing) -> Result<Self, SourceError> {
    let source = Self::new(count, pacing);
    source.start(&NewThread::named("pushrx-hot"))?;
    Ok(source)
  }

  /// Run the counting loop on `scheduler`. A source starts at most once.
  pub fn start(&self, scheduler: &dyn Scheduler) -> Result<EmissionHandle, SourceError> {
    if self.shared.started.swap(true, Ordering::AcqRel) {
      return Err(SourceError::AlreadyStarted);
    }
    let (shared, count, pacing) = (self.shared.clone(), self.count, self.pacing);
    tracing::debug!(count, interval = ?pacing.interval(), "starting hot source");
    scheduler.schedule(Box::new(move || count_up(&shared, count, pacing))).map_err(|e| {
      self.shared.started.store(false, Ordering::Release);
      e
    })
  }

  /// Terminate the stream with `err`.
  ///
  /// Current observers receive the error and the loop stops before its next
  /// value. When called from a handler while a value is being delivered, the
  /// error follows once that value has reached every observer. Returns `false`
  /// when the stream had already terminated.
  pub fn inject_error(&self, err: Err) -> bool {
    let mut control = self.shared.control.lock();
    if std::mem::replace(&mut control.stopped, true) {
      return false;
    }
    if control.emitting {
      control.pending = Some(Terminal::Errored(err));
      tracing::debug!("error injected while a value is in flight");
      return true;
    }
    drop(control);
    self.shared.settle(Terminal::Errored(err));
    tracing::debug!("error injected into hot source");
    true
  }

  /// Whether the stream has stopped emitting values.
  pub fn is_terminated(&self) -> bool { self.shared.control.lock().stopped }
}

fn count_up<Err: Clone>(shared: &Shared<Err>, count: i64, pacing: Pacing) {
  for value in 0..count {
    let in_flight = shared.begin_value();
    if !in_flight.live {
      tracing::debug!(value, "hot source stopped early");
      return;
    }
    shared.state.rc_deref_mut().subscribers.broadcast_value(value);
    if let Some(injected) = in_flight.finish() {
      shared.settle(injected);
      tracing::debug!(value, "hot source stopped by injected error");
      return;
    }
    pacing.pause();
  }
  if !std::mem::replace(&mut shared.control.lock().stopped, true) {
    shared.settle(Terminal::Completed);
    tracing::debug!(count, "hot source completed");
  }
}

impl<Err> Observable for HotSource<Err>
where
  Err: Clone + Send + 'static,
{
  type Item = i64;
  type Err = Err;

  fn subscribe<O>(&self, mut observer: O)
  where
    O: Observer<i64, Err> + Send + 'static,
  {
    let mut state = self.shared.state.rc_deref_mut();
    let terminal = state.terminal.clone();
    match terminal {
      None => {
        state.subscribers.add(Box::new(observer));
      }
      Some(terminal) => {
        drop(state);
        terminal.deliver(&mut observer);
      }
    }
  }
}

impl<Err> Source for HotSource<Err>
where
  Err: Clone + Send + 'static,
{
  fn temperature(&self) -> Temperature { Temperature::Hot }

  fn start_on(&self, scheduler: &dyn Scheduler) -> Result<EmissionHandle, SourceError> {
    self.start(scheduler)
  }

  fn attach_guarded(&self, attach: &mut dyn FnMut()) -> Option<Terminal<Err>> {
    let _gate = self.shared.gate.lock();
    let settled = self.shared.state.rc_deref_mut().terminal.clone();
    if settled.is_none() {
      attach();
    }
    settled
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::mpsc::channel, thread, time::Duration};

  use super::*;
  use crate::{
    observer::{FnMutObserver, Signal},
    scheduler::Immediate,
    test_util::Recorder,
  };

  #[test]
  fn subscribed_before_start_sees_everything() {
    let source = HotSource::<()>::new(5, Pacing::none());
    let recorder = Recorder::default();
    source.subscribe(recorder.clone());

    source.start(&Immediate).unwrap().wait().unwrap();

    assert_eq!(recorder.values(), vec![0, 1, 2, 3, 4]);
    assert_eq!(recorder.signals().last(), Some(&Signal::Complete));
    assert_eq!(recorder.terminal_count(), 1);
  }

  #[test]
  fn starts_only_once() {
    let source = HotSource::<()>::new(1, Pacing::none());
    source.start(&Immediate).unwrap();
    assert!(matches!(source.start(&Immediate), Err(SourceError::AlreadyStarted)));
    assert!(matches!(source.clone().start(&Immediate), Err(SourceError::AlreadyStarted)));
  }

  #[test]
  fn late_subscriber_sees_strict_suffix() {
    let source = HotSource::<()>::new(20, Pacing::every(Duration::from_millis(2)));
    let early = Recorder::default();
    let (tx, rx) = channel();
    source.subscribe(early.clone());
    source.subscribe(FnMutObserver(move |v: i64| {
      let _ = tx.send(v);
    }));

    let handle = source.start(&NewThread::default()).unwrap();
    while rx.recv().unwrap() < 4 {}
    let late = Recorder::default();
    source.subscribe(late.clone());
    handle.wait().unwrap();

    assert_eq!(early.values(), (0..20).collect::<Vec<_>>());
    let late_values = late.values();
    let first = *late_values.first().unwrap_or(&20);
    assert!(first >= 5);
    assert_eq!(late_values, (first..20).collect::<Vec<_>>());
    assert_eq!(late.signals().last(), Some(&Signal::Complete));
    assert_eq!(late.terminal_count(), 1);
  }

  #[test]
  fn subscriber_after_completion_gets_terminal_only() {
    let source = HotSource::<()>::new(3, Pacing::none());
    source.start(&Immediate).unwrap();
    assert!(source.is_terminated());

    let recorder = Recorder::default();
    source.subscribe(recorder.clone());
    assert_eq!(recorder.signals(), vec![Signal::Complete]);
  }

  #[test]
  fn injected_error_terminates_the_loop() {
    let source = HotSource::<&'static str>::new(1_000, Pacing::every(Duration::from_millis(2)));
    let recorder = Recorder::default();
    let (tx, rx) = channel();
    source.subscribe(recorder.clone());
    source.subscribe(FnMutObserver(move |v: i64| {
      let _ = tx.send(v);
    }));

    let handle = source.start(&NewThread::default()).unwrap();
    while rx.recv().unwrap() < 2 {}
    assert!(source.inject_error("halt"));
    handle.wait().unwrap();

    let values = recorder.values();
    assert_eq!(values, (0..values.len() as i64).collect::<Vec<_>>());
    assert!(values.len() < 1_000);
    assert_eq!(recorder.signals().last(), Some(&Signal::Error("halt")));
    assert_eq!(recorder.terminal_count(), 1);
    assert!(!source.inject_error("again"));
  }

  #[test]
  fn error_injected_from_a_handler() {
    let source = HotSource::<&'static str>::new(100, Pacing::none());
    let before = Recorder::default();
    let after = Recorder::default();
    source.subscribe(before.clone());
    let c_source = source.clone();
    source.subscribe(FnMutObserver(move |v: i64| {
      if v == 3 {
        assert!(c_source.inject_error("stop"));
      }
    }));
    source.subscribe(after.clone());

    let handle = source.start(&NewThread::default()).unwrap();
    let (tx, rx) = channel();
    thread::spawn(move || {
      let _ = tx.send(handle.wait().is_ok());
    });
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));

    let expected = vec![
      Signal::Next(0),
      Signal::Next(1),
      Signal::Next(2),
      Signal::Next(3),
      Signal::Error("stop"),
    ];
    assert_eq!(before.signals(), expected);
    assert_eq!(after.signals(), expected);
    assert!(source.is_terminated());
    assert!(!source.inject_error("again"));
  }

  #[test]
  fn error_injected_from_a_handler_inline() {
    let source = HotSource::<&'static str>::new(10, Pacing::none());
    let recorder = Recorder::default();
    let c_source = source.clone();
    source.subscribe(FnMutObserver(move |v: i64| {
      if v == 1 {
        c_source.inject_error("inline stop");
      }
    }));
    source.subscribe(recorder.clone());

    source.start(&Immediate).unwrap().wait().unwrap();
    assert_eq!(
      recorder.signals(),
      vec![Signal::Next(0), Signal::Next(1), Signal::Error("inline stop")]
    );
  }

  #[test]
  fn spawn_begins_at_construction() {
    let source = HotSource::<()>::spawn(3, Pacing::none()).unwrap();
    let mut waited = Duration::ZERO;
    while !source.is_terminated() && waited < Duration::from_secs(5) {
      std::thread::sleep(Duration::from_millis(1));
      waited += Duration::from_millis(1);
    }
    assert!(source.is_terminated());
    assert!(matches!(source.start(&Immediate), Err(SourceError::AlreadyStarted)));
  }
}
