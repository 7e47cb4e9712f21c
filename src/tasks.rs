//! Background work owned by a mounted tool.
//!
//! A `TaskHandle` aborts its task when dropped. Tools keep their handles in
//! fields, so navigating away (which drops the tool) tears down every timer,
//! fetch and render job the tool started.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct TaskHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawn on the current tokio runtime. Returns `None` outside a runtime.
    pub fn spawn<F>(name: &'static str, future: F) -> Option<Self>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::debug!("Spawning task '{}'", name);
                Some(Self {
                    name,
                    handle: runtime.spawn(future),
                })
            }
            Err(_) => {
                tracing::warn!("No async runtime; task '{}' not started", name);
                None
            }
        }
    }

    /// Run `tick` every `period` until the handle is dropped. The first tick
    /// fires after one full period.
    pub fn interval<F>(name: &'static str, period: Duration, mut tick: F) -> Option<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        Self::spawn(name, async move {
            let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                if !tick() {
                    break;
                }
            }
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if !self.is_finished() {
            tracing::debug!("Cancelling task '{}'", self.name);
            self.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_spawn_outside_runtime_is_none() {
        assert!(TaskHandle::spawn("noop", async {}).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticks_until_dropped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let handle = TaskHandle::interval("ticker", Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_stops_when_tick_returns_false() {
        let handle = TaskHandle::interval("once", Duration::from_secs(1), || false).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(handle.is_finished());
    }
}
