//! Alert episode control.
//!
//! One episode runs from a detected count increase until the triggering
//! window disappears, the idle policy fires, a cap is hit, or the agent is
//! cancelled. The episode owns exactly one alarm playback task through a
//! child token and never returns before that task has acknowledged
//! cancellation.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::alarm::{self, player, NoteSequence, Playback, ToneSink, PERIODIC_BEEP};
use crate::config::duration_millis;
use crate::core::tracker::WindowTracker;
use crate::source::WindowSource;

/// How the idle timer gates an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleMode {
    /// Alarm only when the user is away: skip the episode if the user was
    /// active at trigger time, and stop as soon as they become active.
    RequireIdle,
    /// Inverted variant: alarm only while the user is still at the
    /// machine, and stop once the idle timer says they walked away.
    RequireActive,
    /// No idle checks; only window state and the caps end an episode.
    Ignore,
}

/// Whether the alarm is a continuous siren or a beep per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    Continuous,
    PeriodicBeep,
}

/// Tunable episode policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub idle_mode: IdleMode,
    /// Idle durations below this mean "the user just did something"
    #[serde(with = "duration_millis")]
    pub activity_threshold: Duration,
    /// Wall-clock cap on one episode
    #[serde(with = "duration_millis")]
    pub max_duration: Duration,
    /// Iteration cap on one episode
    pub max_iterations: u32,
    /// Sleep between condition checks
    #[serde(with = "duration_millis")]
    pub check_interval: Duration,
    pub audio_mode: AudioMode,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            idle_mode: IdleMode::Ignore,
            activity_threshold: Duration::from_millis(400),
            max_duration: Duration::from_secs(60),
            max_iterations: 600,
            check_interval: Duration::from_millis(100),
            audio_mode: AudioMode::Continuous,
        }
    }
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    /// The activation gate rejected the episode; no sound was made
    Skipped,
    /// The matching window count fell back to the baseline
    WindowClosed,
    /// The user pressed a key or moved the mouse
    UserActive,
    /// The user walked away (require-active policy)
    UserAway,
    /// A duration or iteration cap was hit
    TimedOut,
    /// The agent is shutting down
    Cancelled,
}

/// Runs alert episodes against a tracker and a tone sink.
pub struct AlertController {
    policy: AlertPolicy,
    sink: Arc<dyn ToneSink>,
    songs: Vec<NoteSequence>,
}

impl AlertController {
    pub fn new(policy: AlertPolicy, sink: Arc<dyn ToneSink>) -> Self {
        Self {
            policy,
            sink,
            songs: alarm::siren_songs(),
        }
    }

    /// Replace the stock song list.
    pub fn with_songs(mut self, songs: Vec<NoteSequence>) -> Self {
        self.songs = songs;
        self
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// Run one full episode.
    ///
    /// `baseline` is the matching-window count from before the increase
    /// that triggered this episode; the episode ends once the count is
    /// back at or below it. Returns only after any alarm playback has
    /// fully stopped.
    pub async fn run_episode<S: WindowSource>(
        &self,
        tracker: &mut WindowTracker<S>,
        baseline: usize,
        token: &CancellationToken,
    ) -> AlertOutcome {
        info!(baseline, "alert episode started");

        // Idle checks degrade to the timeout caps when the timer fails;
        // the episode must never be able to run unbounded.
        let mut idle_checks = self.policy.idle_mode != IdleMode::Ignore;

        if self.policy.idle_mode == IdleMode::RequireIdle {
            match tracker.idle_duration() {
                Ok(idle) if idle < self.policy.activity_threshold => {
                    info!(
                        idle_ms = idle.as_millis() as u64,
                        "user is active, skipping alarm"
                    );
                    return AlertOutcome::Skipped;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "cannot confirm inactivity, relying on timeout");
                    idle_checks = false;
                }
            }
        }

        let audio_token = token.child_token();
        let playback = match self.policy.audio_mode {
            AudioMode::Continuous => Some(tokio::spawn(player::play(
                self.sink.clone(),
                self.songs.clone(),
                audio_token.clone(),
            ))),
            AudioMode::PeriodicBeep => None,
        };

        let started = Instant::now();
        let mut iterations: u32 = 0;

        let outcome = loop {
            if token.is_cancelled() {
                break AlertOutcome::Cancelled;
            }

            match tracker.update() {
                Ok(count) if count <= baseline => {
                    info!(count, baseline, "triggering window closed");
                    break AlertOutcome::WindowClosed;
                }
                Ok(_) => {}
                // A bad query leaves the window state unknown; the caps
                // below still bound the episode.
                Err(e) => warn!(error = %e, "window query failed during episode"),
            }

            if idle_checks {
                match tracker.idle_duration() {
                    Ok(idle) => {
                        let active = idle < self.policy.activity_threshold;
                        match self.policy.idle_mode {
                            IdleMode::RequireIdle if active => {
                                info!("user became active");
                                break AlertOutcome::UserActive;
                            }
                            IdleMode::RequireActive if !active => {
                                info!("user walked away");
                                break AlertOutcome::UserAway;
                            }
                            _ => {}
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "cannot confirm inactivity, relying on timeout");
                        idle_checks = false;
                    }
                }
            }

            iterations += 1;
            if started.elapsed() >= self.policy.max_duration
                || iterations >= self.policy.max_iterations
            {
                info!(iterations, "alert episode timed out");
                break AlertOutcome::TimedOut;
            }

            if self.policy.audio_mode == AudioMode::PeriodicBeep
                && !player::play_note(self.sink.as_ref(), PERIODIC_BEEP, token).await
            {
                break AlertOutcome::Cancelled;
            }

            tokio::select! {
                _ = token.cancelled() => break AlertOutcome::Cancelled,
                _ = sleep(self.policy.check_interval) => {}
            }
        };

        // Tear down the alarm before reporting the episode done; nothing
        // may keep sounding past this point.
        audio_token.cancel();
        if let Some(task) = playback {
            match task.await {
                Ok(Playback::Cancelled) => info!("alarm playback stopped"),
                Err(e) => warn!(error = %e, "alarm playback task failed"),
            }
        }

        info!(
            ?outcome,
            iterations,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "alert episode finished"
        );
        outcome
    }
}
