//! Audible alarm playback.
//!
//! Tones go through a [`ToneSink`] so the same player drives the Win32
//! console beeper, a logging stand-in on other platforms, and a recording
//! sink in tests. Playback itself is a cancellable task in
//! [`player`]; the note script lives in [`sequences`].

pub mod player;
pub mod sequences;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(target_os = "windows"))]
pub mod noop;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use player::{play, Playback};
pub use sequences::{siren_songs, Note, NoteSequence, PERIODIC_BEEP};

/// Errors from the underlying tone device.
#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("tone playback failed: {0}")]
    Playback(String),
}

/// Something that can sound a single tone.
///
/// `beep` resolves when the tone has finished sounding. Callers must
/// await every call to completion; a dropped future may leave a blocking
/// implementation sounding. The player bounds cancellation latency by
/// slicing long tones, not by abandoning a beep mid-flight.
#[async_trait]
pub trait ToneSink: Send + Sync {
    async fn beep(&self, frequency_hz: u32, duration: Duration) -> Result<(), AlarmError>;
}

#[cfg(target_os = "windows")]
pub use windows::Win32Beeper;

/// Platform-agnostic sink type alias
#[cfg(target_os = "windows")]
pub type SystemSink = Win32Beeper;

#[cfg(not(target_os = "windows"))]
pub use noop::NoopSink;

/// Platform-agnostic sink type alias
#[cfg(not(target_os = "windows"))]
pub type SystemSink = NoopSink;

/// A sink that records every tone instead of sounding it.
///
/// Clones share the same recording; tests hand one clone to the player and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    tones: Arc<Mutex<Vec<Note>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tones recorded so far.
    pub fn tones(&self) -> Vec<Note> {
        self.tones.lock().unwrap().clone()
    }

    /// Number of tones recorded so far.
    pub fn tone_count(&self) -> usize {
        self.tones.lock().unwrap().len()
    }
}

#[async_trait]
impl ToneSink for RecordingSink {
    async fn beep(&self, frequency_hz: u32, duration: Duration) -> Result<(), AlarmError> {
        self.tones.lock().unwrap().push(Note {
            frequency_hz,
            duration,
        });
        // A token sleep keeps a looping player from starving the runtime
        // before its token is cancelled.
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok(())
    }
}
