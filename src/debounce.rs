//! Trailing-edge debouncing on the tokio timer.
//!
//! Each [`Debounced::call`] aborts the pending timer and schedules a new one,
//! so a burst of calls collapses into one invocation carrying the latest
//! argument. The action never runs synchronously inside `call`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

pub struct Debounced<T> {
  action: Arc<dyn Fn(T) + Send + Sync>,
  delay: Duration,
  /// Bumped on every call and cancel; a timer only fires if it still holds
  /// the latest generation.
  generation: Arc<AtomicU64>,
  pending: Option<JoinHandle<()>>,
}

/// Wrap `action` so that calls less than `delay` apart collapse into one.
/// Must be called from within a tokio runtime.
pub fn debounce<T, F>(action: F, delay: Duration) -> Debounced<T>
where
  T: Send + 'static,
  F: Fn(T) + Send + Sync + 'static,
{
  Debounced { action: Arc::new(action), delay, generation: Arc::new(AtomicU64::new(0)), pending: None }
}

impl<T: Send + 'static> Debounced<T> {
  pub fn call(&mut self, arg: T) {
    self.cancel();
    let generation = self.generation.load(Ordering::SeqCst);
    let latest = Arc::clone(&self.generation);
    let action = Arc::clone(&self.action);
    let delay = self.delay;
    self.pending = Some(tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      if latest.load(Ordering::SeqCst) == generation {
        action(arg);
      } else {
        trace!(generation, "debounce: superseded timer dropped");
      }
    }));
  }

  /// Drop the pending invocation, if any.
  pub fn cancel(&mut self) {
    self.generation.fetch_add(1, Ordering::SeqCst);
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }

  pub fn is_pending(&self) -> bool {
    self.pending.as_ref().is_some_and(|h| !h.is_finished())
  }
}

impl<T> Drop for Debounced<T> {
  fn drop(&mut self) {
    self.generation.fetch_add(1, Ordering::SeqCst);
    if let Some(handle) = self.pending.take() {
      handle.abort();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;
  use tokio::time::{Instant, sleep};

  type Calls = Arc<Mutex<Vec<(&'static str, Instant)>>>;

  fn recorder() -> (Calls, impl Fn(&'static str) + Send + Sync + 'static) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    (calls, move |arg| sink.lock().unwrap().push((arg, Instant::now())))
  }

  #[tokio::test(start_paused = true)]
  async fn burst_collapses_to_latest_argument() {
    let (calls, action) = recorder();
    let mut debounced = debounce(action, Duration::from_millis(150));
    let start = Instant::now();

    debounced.call("a");
    sleep(Duration::from_millis(40)).await;
    debounced.call("b");
    sleep(Duration::from_millis(40)).await;
    debounced.call("c");

    sleep(Duration::from_millis(149)).await;
    assert!(calls.lock().unwrap().is_empty());

    sleep(Duration::from_millis(20)).await;
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "c");
    assert!(calls[0].1.duration_since(start) >= Duration::from_millis(230));
  }

  #[tokio::test(start_paused = true)]
  async fn never_fires_synchronously() {
    let (calls, action) = recorder();
    let mut debounced = debounce(action, Duration::ZERO);
    debounced.call("now");
    assert!(calls.lock().unwrap().is_empty());
    assert!(debounced.is_pending());
    sleep(Duration::from_millis(1)).await;
    assert_eq!(calls.lock().unwrap().len(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn spaced_calls_each_fire() {
    let (calls, action) = recorder();
    let mut debounced = debounce(action, Duration::from_millis(150));
    debounced.call("first");
    sleep(Duration::from_millis(200)).await;
    debounced.call("second");
    sleep(Duration::from_millis(200)).await;
    let args: Vec<&str> = calls.lock().unwrap().iter().map(|(a, _)| *a).collect();
    assert_eq!(args, vec!["first", "second"]);
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_drops_pending_call() {
    let (calls, action) = recorder();
    let mut debounced = debounce(action, Duration::from_millis(150));
    debounced.call("gone");
    debounced.cancel();
    assert!(!debounced.is_pending());
    sleep(Duration::from_millis(300)).await;
    assert!(calls.lock().unwrap().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn drop_cancels_pending_call() {
    let (calls, action) = recorder();
    {
      let mut debounced = debounce(action, Duration::from_millis(150));
      debounced.call("gone");
    }
    sleep(Duration::from_millis(300)).await;
    assert!(calls.lock().unwrap().is_empty());
  }
}
