//! A single-instance periodic background task.
//!
//! [`RepeatingTask`] owns at most one running loop. Starting it while a
//! loop is already running cancels and joins the old loop first, so
//! toggling a timer on and off any number of times never leaves two loops
//! ticking at once.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// How long [`RepeatingTask::stop`] waits for the loop to notice
/// cancellation before aborting it.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RepeatingTask {
    name: &'static str,
    period: Duration,
    slot: Mutex<Option<Running>>,
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period,
            slot: Mutex::new(None),
        }
    }

    /// Start ticking: `tick` runs once immediately and then every period.
    ///
    /// Ticks run inline, so a slow tick delays the next one instead of
    /// overlapping it.
    pub async fn start<F, Fut>(&self, tick: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.slot.lock().await;
        if let Some(running) = slot.take() {
            self.halt(running).await;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.period;
        let name = self.name;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!(task = name, "Repeating task cancelled");
                        break;
                    }
                    _ = ticker.tick() => tick().await,
                }
            }
        });

        tracing::info!(
            task = self.name,
            period_ms = self.period.as_millis() as u64,
            "Repeating task started",
        );
        *slot = Some(Running { cancel, handle });
    }

    /// Stop the loop if one is running. Returns whether anything was stopped.
    pub async fn stop(&self) -> bool {
        let running = self.slot.lock().await.take();
        match running {
            Some(running) => {
                self.halt(running).await;
                tracing::info!(task = self.name, "Repeating task stopped");
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self) -> bool {
        self.slot
            .lock()
            .await
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    async fn halt(&self, mut running: Running) {
        running.cancel.cancel();
        if tokio::time::timeout(STOP_TIMEOUT, &mut running.handle)
            .await
            .is_err()
        {
            tracing::warn!(task = self.name, "Repeating task did not stop in time, aborting");
            running.handle.abort();
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        if let Some(running) = self.slot.get_mut().take() {
            running.cancel.cancel();
        }
    }
}
