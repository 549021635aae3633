//! Non-Windows (noop) tone sink.
//!
//! Keeps the playback timing of the real beeper by sleeping for each
//! tone's duration, but only logs the tone instead of sounding it.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::alarm::{AlarmError, ToneSink};

/// A sink that logs tones instead of sounding them.
#[derive(Debug, Default)]
pub struct NoopSink;

impl NoopSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToneSink for NoopSink {
    async fn beep(&self, frequency_hz: u32, duration: Duration) -> Result<(), AlarmError> {
        debug!(frequency_hz, duration_ms = duration.as_millis() as u64, "beep");
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
