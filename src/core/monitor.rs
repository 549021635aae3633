//! The long-lived monitor poll loop.
//!
//! Polls the tracker on a fixed interval and hands control to the alert
//! controller whenever the matching-window count rises. Episodes are
//! awaited synchronously, so no two can ever overlap; the loop resumes
//! polling only after the previous alarm has fully stopped.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::core::alert::{AlertController, AlertOutcome};
use crate::core::tracker::WindowTracker;
use crate::source::{SourceError, WindowSource};

/// Owns the tracker and the last-known matching count.
pub struct Monitor<S: WindowSource> {
    tracker: WindowTracker<S>,
    controller: AlertController,
    poll_interval: Duration,
    last_count: usize,
    episodes: Vec<AlertOutcome>,
}

impl<S: WindowSource> Monitor<S> {
    pub fn new(
        tracker: WindowTracker<S>,
        controller: AlertController,
        poll_interval: Duration,
    ) -> Self {
        Self {
            tracker,
            controller,
            poll_interval,
            last_count: 0,
            episodes: Vec::new(),
        }
    }

    /// The matching-window count as of the last completed tick.
    pub fn last_count(&self) -> usize {
        self.last_count
    }

    /// Outcomes of every episode run so far, oldest first.
    pub fn episodes(&self) -> &[AlertOutcome] {
        &self.episodes
    }

    /// Poll until `token` is cancelled.
    ///
    /// A failed tick is logged and the loop continues on the next
    /// interval; one bad poll must not take the monitor down.
    pub async fn run(&mut self, token: CancellationToken) {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "monitor started"
        );

        while !token.is_cancelled() {
            if let Err(e) = self.tick(&token).await {
                error!(error = %e, "monitor tick failed");
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = sleep(self.poll_interval) => {}
            }
        }

        info!("monitor stopped");
    }

    /// One poll cycle: update the tracker, run an episode on an increase,
    /// then record the new count regardless of which branch was taken.
    async fn tick(&mut self, token: &CancellationToken) -> Result<(), SourceError> {
        let count = self.tracker.update()?;

        if count > self.last_count && !token.is_cancelled() {
            let outcome = self
                .controller
                .run_episode(&mut self.tracker, self.last_count, token)
                .await;
            self.episodes.push(outcome);
        }

        if count != self.last_count {
            info!(
                previous = self.last_count,
                current = count,
                "matching window count changed"
            );
            self.last_count = count;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::RecordingSink;
    use crate::core::alert::AlertPolicy;
    use crate::core::tracker::WindowFilter;
    use crate::source::scripted::{test_window, ScriptedSource};
    use std::sync::Arc;

    fn fast_policy() -> AlertPolicy {
        AlertPolicy {
            check_interval: Duration::from_millis(1),
            max_duration: Duration::from_millis(200),
            ..AlertPolicy::default()
        }
    }

    fn monitor_with(source: &ScriptedSource, sink: &RecordingSink) -> Monitor<ScriptedSource> {
        let tracker = WindowTracker::new(source.clone(), WindowFilter::default());
        let controller = AlertController::new(fast_policy(), Arc::new(sink.clone()));
        Monitor::new(tracker, controller, Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_count_increase_triggers_one_episode() {
        let source = ScriptedSource::new();
        let sink = RecordingSink::new();
        let mut monitor = monitor_with(&source, &sink);
        let token = CancellationToken::new();

        // No windows on the first tick.
        monitor.tick(&token).await.unwrap();
        assert_eq!(monitor.last_count(), 0);
        assert!(monitor.episodes().is_empty());

        // The popup opens; it closes again while the episode is running.
        source.push_snapshot(vec![test_window(1, "Time Doctor", false)]);
        source.push_snapshot(vec![test_window(1, "Time Doctor", false)]);
        source.push_snapshot(vec![]);
        monitor.tick(&token).await.unwrap();

        assert_eq!(monitor.episodes(), &[AlertOutcome::WindowClosed]);
        assert_eq!(monitor.last_count(), 1);

        // Next tick sees the close and only updates the count.
        monitor.tick(&token).await.unwrap();
        assert_eq!(monitor.last_count(), 0);
        assert_eq!(monitor.episodes().len(), 1);
    }

    #[tokio::test]
    async fn test_two_windows_in_one_cycle_start_one_episode() {
        let source = ScriptedSource::new();
        let sink = RecordingSink::new();
        let mut monitor = monitor_with(&source, &sink);
        let token = CancellationToken::new();

        monitor.tick(&token).await.unwrap();

        source.push_snapshot(vec![
            test_window(1, "Time Doctor", false),
            test_window(2, "Time Doctor", false),
        ]);
        source.push_snapshot(vec![]);
        monitor.tick(&token).await.unwrap();

        assert_eq!(monitor.episodes().len(), 1);
        assert_eq!(monitor.last_count(), 2);
    }

    #[tokio::test]
    async fn test_decrease_never_triggers_an_episode() {
        let source = ScriptedSource::new();
        let sink = RecordingSink::new();
        let mut monitor = monitor_with(&source, &sink);
        let token = CancellationToken::new();

        // First observation is itself an increase from zero; the window
        // set then shrinks, which must not start another episode.
        source.push_snapshot(vec![
            test_window(1, "Time Doctor", false),
            test_window(2, "Time Doctor", false),
        ]);
        source.push_snapshot(vec![test_window(1, "Time Doctor", false)]);
        monitor.tick(&token).await.unwrap();
        let episodes_after_first = monitor.episodes().len();

        monitor.tick(&token).await.unwrap();
        assert_eq!(monitor.last_count(), 1);
        assert_eq!(monitor.episodes().len(), episodes_after_first);
    }

    #[tokio::test]
    async fn test_run_exits_promptly_on_cancellation() {
        let source = ScriptedSource::new();
        let sink = RecordingSink::new();
        let mut monitor = monitor_with(&source, &sink);
        let token = CancellationToken::new();

        let cancel = token.clone();
        let handle = tokio::spawn(async move {
            monitor.run(token).await;
            monitor
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let monitor = tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("monitor did not stop after cancellation")
            .unwrap();
        assert!(monitor.episodes().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_unwinds_in_flight_episode() {
        let source = ScriptedSource::new();
        let sink = RecordingSink::new();
        let mut monitor = monitor_with(&source, &sink);
        let token = CancellationToken::new();

        // Window appears and stays; the episode will be cut short by the
        // shutdown signal rather than by its own exit conditions.
        source.set_windows(vec![test_window(1, "Time Doctor", false)]);

        let cancel = token.clone();
        let handle = tokio::spawn(async move {
            monitor.run(token).await;
            monitor
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();

        let monitor = tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("monitor did not stop after cancellation")
            .unwrap();

        assert_eq!(monitor.episodes(), &[AlertOutcome::Cancelled]);

        // Playback stopped with the episode.
        let played = sink.tone_count();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(sink.tone_count(), played);
    }
}
