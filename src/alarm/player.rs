//! Cancellable alarm playback task.
//!
//! Notes are sounded in short slices with the token checked between
//! slices, and every slice is awaited to completion rather than raced
//! and dropped. Cancellation is acknowledged within one slice length,
//! and a sink that blocks for the full slice can never keep sounding
//! after the player has returned.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::alarm::sequences::{Note, NoteSequence};
use crate::alarm::ToneSink;

/// Longest uninterrupted slice of one tone. Bounds how long a
/// cancellation can go unacknowledged once a note has started.
pub const MAX_TONE_SLICE: Duration = Duration::from_millis(100);

/// How a playback task ended. Cancellation is the only exit; it is a
/// clean outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Cancelled,
}

/// Sound one note, sliced so cancellation is observed mid-tone.
///
/// Each slice is awaited to completion; dropping an in-flight beep would
/// leave a blocking sink sounding past the caller's teardown. A failing
/// slice is logged and the rest of the note skipped; one bad beep must
/// not silence the alarm. Returns `false` once the token has fired.
pub async fn play_note(sink: &dyn ToneSink, note: Note, token: &CancellationToken) -> bool {
    let mut remaining = note.duration;
    while remaining > Duration::ZERO {
        if token.is_cancelled() {
            return false;
        }
        let slice = remaining.min(MAX_TONE_SLICE);
        if let Err(e) = sink.beep(note.frequency_hz, slice).await {
            warn!(error = %e, "tone playback failed, continuing");
            break;
        }
        remaining = remaining.saturating_sub(slice);
    }
    !token.is_cancelled()
}

/// Play the song list in a loop until `token` is cancelled.
pub async fn play(
    sink: Arc<dyn ToneSink>,
    songs: Vec<NoteSequence>,
    token: CancellationToken,
) -> Playback {
    loop {
        for song in &songs {
            for _ in 0..song.repeat_count {
                for note in &song.notes {
                    if !play_note(sink.as_ref(), *note, &token).await {
                        return Playback::Cancelled;
                    }
                }
                if song.pause_after > Duration::ZERO {
                    tokio::select! {
                        _ = token.cancelled() => return Playback::Cancelled,
                        _ = sleep(song.pause_after) => {}
                    }
                }
            }
        }
    }
}
