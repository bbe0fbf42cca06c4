// storefront_cart/src/store/listeners.rs

use super::snapshot::CartSnapshot;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type Listener = Arc<dyn Fn(&CartSnapshot) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Subscribers to snapshot changes, called in registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
  next_id: AtomicU64,
  listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
}

impl ListenerRegistry {
  pub(crate) fn add(&self, listener: Listener) -> SubscriptionId {
    let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
    self.listeners.lock().push((id, listener));
    id
  }

  pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
    let mut listeners = self.listeners.lock();
    let before = listeners.len();
    listeners.retain(|(existing, _)| *existing != id);
    listeners.len() != before
  }

  pub(crate) fn notify(&self, snapshot: &CartSnapshot) {
    // Copy out first so a listener may subscribe or unsubscribe re-entrantly.
    let current: Vec<Listener> = self.listeners.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
    for listener in current {
      listener(snapshot);
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.listeners.lock().len()
  }
}
