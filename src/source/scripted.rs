//! Scripted window source for tests and dry runs.
//!
//! Snapshots are queued ahead of time or swapped mid-run; every clone
//! shares the same state, so a test can hold one handle while the monitor
//! polls another and flip the window set between polls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::source::types::{SourceError, WindowHandle, WindowRecord, WindowRect};
use crate::source::WindowSource;

#[derive(Debug)]
struct ScriptState {
    /// Snapshots still to be served, oldest first.
    queue: VecDeque<Vec<WindowRecord>>,
    /// Snapshot served once the queue runs dry.
    current: Vec<WindowRecord>,
    /// Scripted idle durations, oldest first.
    idle_queue: VecDeque<Duration>,
    /// Idle duration served once the idle queue runs dry.
    idle: Option<Duration>,
    /// Number of enumeration passes served so far.
    enumerations: u64,
}

/// A `WindowSource` that replays scripted snapshots.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSource {
    /// Create a source that starts with no windows and no idle timer.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                queue: VecDeque::new(),
                current: Vec::new(),
                idle_queue: VecDeque::new(),
                idle: None,
                enumerations: 0,
            })),
        }
    }

    /// Queue a snapshot to be served by the next enumeration pass.
    ///
    /// Once the queue is exhausted, the last served snapshot repeats.
    pub fn push_snapshot(&self, windows: Vec<WindowRecord>) {
        self.state.lock().unwrap().queue.push_back(windows);
    }

    /// Replace the current window set immediately, bypassing the queue.
    pub fn set_windows(&self, windows: Vec<WindowRecord>) {
        let mut state = self.state.lock().unwrap();
        state.queue.clear();
        state.current = windows;
    }

    /// Queue an idle duration for the next idle query.
    pub fn push_idle(&self, idle: Duration) {
        self.state.lock().unwrap().idle_queue.push_back(idle);
    }

    /// Set the idle duration served once the idle queue is exhausted.
    pub fn set_idle(&self, idle: Duration) {
        self.state.lock().unwrap().idle = Some(idle);
    }

    /// Make every further idle query fail with `IdleUnavailable`.
    pub fn fail_idle(&self) {
        let mut state = self.state.lock().unwrap();
        state.idle_queue.clear();
        state.idle = None;
    }

    /// Number of enumeration passes served so far.
    pub fn enumeration_count(&self) -> u64 {
        self.state.lock().unwrap().enumerations
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSource for ScriptedSource {
    fn visible_windows(&self) -> Result<Vec<WindowRecord>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.enumerations += 1;
        if let Some(next) = state.queue.pop_front() {
            state.current = next;
        }
        Ok(state.current.clone())
    }

    fn idle_duration(&self) -> Result<Duration, SourceError> {
        let mut state = self.state.lock().unwrap();
        if let Some(next) = state.idle_queue.pop_front() {
            state.idle = Some(next);
        }
        state
            .idle
            .ok_or_else(|| SourceError::IdleUnavailable("idle timer not scripted".to_string()))
    }
}

/// Build a window record with the given handle and process name.
///
/// Dimensions default to a size that passes the stock popup filter.
pub fn test_window(handle: u64, process_name: &str, is_foreground: bool) -> WindowRecord {
    WindowRecord {
        handle: WindowHandle(handle),
        title: format!("{process_name} window"),
        process_name: process_name.to_string(),
        rect: WindowRect::new(100, 100, 800, 400),
        class_name: "TestWindowClass".to_string(),
        is_foreground,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_queue_then_repeat() {
        let source = ScriptedSource::new();
        source.push_snapshot(vec![test_window(1, "Time Doctor", false)]);
        source.push_snapshot(vec![]);

        assert_eq!(source.visible_windows().unwrap().len(), 1);
        assert!(source.visible_windows().unwrap().is_empty());
        // Queue exhausted: last snapshot repeats.
        assert!(source.visible_windows().unwrap().is_empty());
        assert_eq!(source.enumeration_count(), 3);
    }

    #[test]
    fn test_set_windows_bypasses_queue() {
        let source = ScriptedSource::new();
        source.push_snapshot(vec![test_window(1, "Time Doctor", false)]);
        source.set_windows(vec![
            test_window(2, "Time Doctor", false),
            test_window(3, "Time Doctor", true),
        ]);

        let windows = source.visible_windows().unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].handle, WindowHandle(2));
    }

    #[test]
    fn test_idle_script() {
        let source = ScriptedSource::new();
        assert!(matches!(
            source.idle_duration(),
            Err(SourceError::IdleUnavailable(_))
        ));

        source.set_idle(Duration::from_secs(5));
        source.push_idle(Duration::from_millis(100));

        assert_eq!(source.idle_duration().unwrap(), Duration::from_millis(100));
        assert_eq!(source.idle_duration().unwrap(), Duration::from_millis(100));
    }

    #[test]
    fn test_clones_share_state() {
        let source = ScriptedSource::new();
        let other = source.clone();

        other.set_windows(vec![test_window(7, "Time Doctor", false)]);
        assert_eq!(source.visible_windows().unwrap().len(), 1);
    }
}
