//! Trailing-edge debounce timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs the most recently scheduled task once `delay` has passed without
/// another call to [`Debouncer::schedule`].
///
/// The timer is a spawned Tokio task. Re-arming aborts the pending one, as
/// does dropping the debouncer. Scheduling requires a running Tokio
/// runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Debouncer with a fixed quiet period.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured quiet period.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending task and arm the timer for `task`.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending task. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a scheduled task has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::{Instant, sleep};

    #[tokio::test(start_paused = true)]
    async fn only_the_last_schedule_fires_after_the_quiet_period() {
        let start = Instant::now();
        let fired = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        for (offset, value) in [(0, "a"), (100, "ab"), (200, "abc")] {
            sleep(Duration::from_millis(offset) - start.elapsed()).await;
            let fired = Arc::clone(&fired);
            debouncer.schedule(async move {
                fired
                    .lock()
                    .expect("fired lock")
                    .push((start.elapsed(), value));
            });
        }

        sleep(Duration::from_millis(1_000)).await;
        let fired = fired.lock().expect("fired lock").clone();
        assert_eq!(fired, vec![(Duration::from_millis(700), "abc")]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_pending_task() {
        let count = Arc::new(AtomicU32::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        let counter = Arc::clone(&count);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_debouncer_aborts_the_timer() {
        let count = Arc::new(AtomicU32::new(0));
        {
            let mut debouncer = Debouncer::new(Duration::from_millis(50));
            let counter = Arc::clone(&count);
            debouncer.schedule(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
