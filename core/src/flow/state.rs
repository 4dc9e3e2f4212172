// storefront/src/flow/state.rs
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable context handed to every step of a flow.
///
/// Guards are blocking and MUST be dropped before the next `.await`.
/// Copy what a step needs out of the guard, release it, then do I/O.
#[derive(Debug)]
pub struct FlowState<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> FlowState<T> {
  pub fn new(data: T) -> Self {
    FlowState(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Takes the data back out once the flow has finished.
  ///
  /// Returns `None` while another clone of this state is still alive.
  pub fn try_into_inner(self) -> Option<T> {
    Arc::try_unwrap(self.0).ok().map(RwLock::into_inner)
  }
}

impl<T: Send + Sync + 'static> Clone for FlowState<T> {
  fn clone(&self) -> Self {
    FlowState(Arc::clone(&self.0))
  }
}
