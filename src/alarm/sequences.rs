//! The alarm note script.
//!
//! Eight short sequences of (frequency, duration) tones, played in order
//! and looped. The first two are the march theme, the rest trade phrases
//! around it; together they make an alarm that is hard to sleep through.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One tone: frequency in hertz and how long to hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub frequency_hz: u32,
    #[serde(with = "crate::config::duration_millis")]
    pub duration: Duration,
}

impl Note {
    pub const fn new(frequency_hz: u32, millis: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(millis),
        }
    }
}

/// A named run of notes, optionally repeated, with a pause afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSequence {
    pub notes: Vec<Note>,
    pub repeat_count: u32,
    #[serde(with = "crate::config::duration_millis")]
    pub pause_after: Duration,
}

impl NoteSequence {
    pub fn new(notes: Vec<Note>, repeat_count: u32, pause_after_ms: u64) -> Self {
        Self {
            notes,
            repeat_count,
            pause_after: Duration::from_millis(pause_after_ms),
        }
    }
}

/// The tone sounded once per iteration in periodic-beep mode.
pub const PERIODIC_BEEP: Note = Note::new(750, 300);

/// The full looping alarm script.
pub fn siren_songs() -> Vec<NoteSequence> {
    vec![
        NoteSequence::new(
            vec![
                Note::new(440, 500),
                Note::new(440, 500),
                Note::new(440, 500),
                Note::new(349, 350),
                Note::new(523, 150),
                Note::new(440, 500),
                Note::new(349, 350),
                Note::new(523, 150),
                Note::new(440, 1000),
            ],
            1,
            0,
        ),
        NoteSequence::new(
            vec![
                Note::new(659, 500),
                Note::new(659, 500),
                Note::new(659, 500),
                Note::new(698, 350),
                Note::new(523, 150),
                Note::new(415, 500),
                Note::new(349, 350),
                Note::new(523, 150),
                Note::new(440, 1000),
            ],
            1,
            0,
        ),
        NoteSequence::new(
            vec![
                Note::new(880, 500),
                Note::new(440, 350),
                Note::new(440, 150),
                Note::new(880, 500),
                Note::new(830, 250),
                Note::new(784, 250),
                Note::new(740, 125),
                Note::new(698, 125),
                Note::new(740, 250),
            ],
            1,
            250,
        ),
        NoteSequence::new(
            vec![
                Note::new(455, 250),
                Note::new(622, 500),
                Note::new(587, 250),
                Note::new(554, 250),
                Note::new(523, 125),
                Note::new(466, 125),
                Note::new(523, 250),
            ],
            1,
            250,
        ),
        NoteSequence::new(
            vec![
                Note::new(349, 125),
                Note::new(415, 500),
                Note::new(349, 375),
                Note::new(440, 125),
                Note::new(523, 500),
                Note::new(440, 375),
                Note::new(523, 125),
                Note::new(659, 1000),
            ],
            1,
            0,
        ),
        NoteSequence::new(
            vec![
                Note::new(880, 500),
                Note::new(440, 350),
                Note::new(440, 150),
                Note::new(880, 500),
                Note::new(830, 250),
                Note::new(784, 250),
                Note::new(740, 125),
                Note::new(698, 125),
                Note::new(740, 250),
            ],
            1,
            250,
        ),
        NoteSequence::new(
            vec![
                Note::new(455, 250),
                Note::new(622, 500),
                Note::new(587, 250),
                Note::new(554, 250),
                Note::new(523, 125),
                Note::new(466, 125),
                Note::new(523, 250),
            ],
            1,
            250,
        ),
        NoteSequence::new(
            vec![
                Note::new(349, 250),
                Note::new(415, 500),
                Note::new(349, 375),
                Note::new(523, 125),
                Note::new(440, 500),
                Note::new(349, 375),
                Note::new(261, 125),
                Note::new(440, 1000),
            ],
            1,
            100,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_list_shape() {
        let songs = siren_songs();
        assert_eq!(songs.len(), 8);
        for song in &songs {
            assert!(!song.notes.is_empty());
            assert!(song.repeat_count >= 1);
        }
    }

    #[test]
    fn test_no_note_outlasts_cancellation_budget() {
        // The player checks its token between notes; the longest single
        // note bounds how long a cancelled episode can keep sounding.
        for song in siren_songs() {
            for note in &song.notes {
                assert!(note.duration <= Duration::from_millis(1000));
            }
        }
    }
}
