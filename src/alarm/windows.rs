//! Windows tone sink backed by the kernel console beeper.
//!
//! `Beep` blocks for the full tone duration, so each call runs on the
//! blocking pool. The blocking call cannot be interrupted once started;
//! callers keep cancellation responsive by slicing tones short.

use std::time::Duration;

use async_trait::async_trait;
use windows::Win32::System::Diagnostics::Debug::Beep;

use crate::alarm::{AlarmError, ToneSink};

/// Tone sink using the Win32 `Beep` call.
#[derive(Debug, Default)]
pub struct Win32Beeper;

impl Win32Beeper {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToneSink for Win32Beeper {
    async fn beep(&self, frequency_hz: u32, duration: Duration) -> Result<(), AlarmError> {
        let millis = duration.as_millis().min(u128::from(u32::MAX)) as u32;
        tokio::task::spawn_blocking(move || unsafe { Beep(frequency_hz, millis) })
            .await
            .map_err(|e| AlarmError::Playback(format!("beep task failed: {e}")))?
            .map_err(|e| AlarmError::Playback(e.to_string()))
    }
}
