use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Countdown driver for an active panel.
///
/// Sends one `Instant` per interval until cancelled. The background task is
/// aborted on `cancel` and on drop, so no tick arrives after teardown.
pub struct SessionTimer {
    handle: JoinHandle<()>,
}

impl SessionTimer {
    /// Spawn the ticking task. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(interval: Duration) -> (Self, mpsc::Receiver<Instant>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                let at = ticker.tick().await;
                if tx.send(at).await.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(?interval, "session timer started");
        (Self { handle }, rx)
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval() {
        let (_timer, mut rx) = SessionTimer::start(Duration::from_secs(1));
        let first = rx.recv().await.expect("first tick");
        let second = rx.recv().await.expect("second tick");
        assert_eq!(second - first, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_closes_the_channel() {
        let (timer, mut rx) = SessionTimer::start(Duration::from_secs(1));
        timer.cancel();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticking() {
        let (timer, mut rx) = SessionTimer::start(Duration::from_secs(1));
        drop(timer);
        assert!(rx.recv().await.is_none());
    }
}
