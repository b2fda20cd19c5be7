use parking_lot::{Mutex, MutexGuard};

use crate::observer::Observer;

/// Shared, lockable handle to a pipeline node.
///
/// An operator stage is reached from two sides at once: its upstream producer
/// holds one clone (as an observer) and the pipeline builder holds another (to
/// attach downstream observers). The lock never poisons, so a node stays
/// usable after a handler panicked through it.
#[derive(Default)]
pub struct MutArc<T>(std::sync::Arc<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(std::sync::Arc::new(Mutex::new(t))) }

  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> { self.0.lock() }

  /// Whether both handles point at the same node.
  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { std::sync::Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T, Item, Err> Observer<Item, Err> for MutArc<T>
where
  T: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) { self.rc_deref_mut().next(value) }
  fn error(&mut self, err: Err) { self.rc_deref_mut().error(err); }
  fn complete(&mut self) { self.rc_deref_mut().complete(); }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MutArc<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("MutArc").field(&*self.rc_deref_mut()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Default)]
  struct Sum(i64);

  impl Observer<i64, ()> for Sum {
    fn next(&mut self, value: i64) { self.0 += value; }
    fn error(&mut self, _: ()) {}
    fn complete(&mut self) {}
  }

  #[test]
  fn clones_share_one_observer() {
    let sum = MutArc::own(Sum::default());
    let mut a = sum.clone();
    let mut b = sum.clone();
    a.next(1);
    b.next(2);
    assert_eq!(sum.rc_deref_mut().0, 3);
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&MutArc::own(Sum::default())));
  }

  #[test]
  fn survives_a_panicking_holder() {
    let sum = MutArc::own(Sum::default());
    let c_sum = sum.clone();
    let r = std::thread::spawn(move || {
      let _guard = c_sum.rc_deref_mut();
      panic!("handler failed");
    })
    .join();
    assert!(r.is_err());
    let mut s = sum.clone();
    s.next(5);
    assert_eq!(sum.rc_deref_mut().0, 5);
  }
}
