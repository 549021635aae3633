//! Window set tracking and diffing.
//!
//! The tracker keeps the previous filtered snapshot and, on every update,
//! diffs a fresh enumeration pass against it by handle identity. Changes
//! are logged one record per window; the stored snapshot is only replaced
//! when something actually changed, so repeated polls against an unchanged
//! desktop stay silent and allocation-free.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::source::{SourceError, WindowRecord, WindowSource};

/// Predicate selecting which windows count as "matching".
///
/// Fixed for the lifetime of one monitoring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowFilter {
    /// Owning process name to match exactly, if any
    pub process_name: Option<String>,
    /// Minimum window width in pixels (exclusive)
    pub min_width: i32,
    /// Minimum window height in pixels (exclusive)
    pub min_height: i32,
    /// Only match the foreground window
    pub foreground_only: bool,
}

impl Default for WindowFilter {
    fn default() -> Self {
        // The stock filter matches the Time Doctor attention popup and
        // ignores its smaller chrome windows.
        Self {
            process_name: Some("Time Doctor".to_string()),
            min_width: 550,
            min_height: 100,
            foreground_only: false,
        }
    }
}

impl WindowFilter {
    /// Match every window; useful for one-shot inspection.
    pub fn any() -> Self {
        Self {
            process_name: None,
            min_width: 0,
            min_height: 0,
            foreground_only: false,
        }
    }

    pub fn matches(&self, window: &WindowRecord) -> bool {
        if let Some(ref name) = self.process_name {
            if window.process_name != *name {
                return false;
            }
        }
        if self.foreground_only && !window.is_foreground {
            return false;
        }
        window.rect.width() > self.min_width && window.rect.height() > self.min_height
    }
}

/// Changes between two consecutive filtered snapshots.
#[derive(Debug, Clone, Default)]
pub struct WindowDiff {
    /// Present now, absent from the previous snapshot
    pub opened: Vec<WindowRecord>,
    /// Present previously, absent now
    pub closed: Vec<WindowRecord>,
    /// Present in both with a different foreground flag
    pub foreground_changed: Vec<WindowRecord>,
    /// Size of the new snapshot
    pub current_count: usize,
}

impl WindowDiff {
    pub fn is_empty(&self) -> bool {
        self.opened.is_empty() && self.closed.is_empty() && self.foreground_changed.is_empty()
    }
}

/// Tracks the filtered window set across polls.
///
/// Owns its source and previous snapshot exclusively; single-threaded
/// access only. Multiple independent trackers can watch different filters
/// over separate sources.
pub struct WindowTracker<S: WindowSource> {
    source: S,
    filter: WindowFilter,
    previous: Vec<WindowRecord>,
}

impl<S: WindowSource> WindowTracker<S> {
    pub fn new(source: S, filter: WindowFilter) -> Self {
        Self {
            source,
            filter,
            previous: Vec::new(),
        }
    }

    /// Enumerate, filter, diff, and return the current matching count.
    ///
    /// Emits one structured log record per opened/closed/changed window and
    /// a count summary whenever the diff is non-empty. Idempotent when the
    /// OS window set has not changed: same count, no emissions.
    pub fn update(&mut self) -> Result<usize, SourceError> {
        let snapshot: Vec<WindowRecord> = self
            .source
            .visible_windows()?
            .into_iter()
            .filter(|w| self.filter.matches(w))
            .collect();

        let diff = diff_snapshots(&self.previous, &snapshot);

        if !diff.is_empty() {
            for window in &diff.opened {
                log_window("OPEN", window);
            }
            for window in &diff.closed {
                log_window("CLOSE", window);
            }
            for window in &diff.foreground_changed {
                log_window("CHANGE", window);
            }
            info!(count = snapshot.len(), "matching window count");
            self.previous = snapshot;
        }

        Ok(diff.current_count)
    }

    /// The idle timer of the underlying source.
    pub fn idle_duration(&self) -> Result<std::time::Duration, SourceError> {
        self.source.idle_duration()
    }

    /// The last stored snapshot.
    pub fn snapshot(&self) -> &[WindowRecord] {
        &self.previous
    }
}

/// Diff two snapshots by handle identity and foreground flag.
pub fn diff_snapshots(previous: &[WindowRecord], current: &[WindowRecord]) -> WindowDiff {
    let opened = current
        .iter()
        .filter(|w| previous.iter().all(|p| p.handle != w.handle))
        .cloned()
        .collect();

    let closed = previous
        .iter()
        .filter(|p| current.iter().all(|w| w.handle != p.handle))
        .cloned()
        .collect();

    let foreground_changed = current
        .iter()
        .filter(|w| {
            previous
                .iter()
                .any(|p| p.handle == w.handle && p.is_foreground != w.is_foreground)
        })
        .cloned()
        .collect();

    WindowDiff {
        opened,
        closed,
        foreground_changed,
        current_count: current.len(),
    }
}

fn log_window(action: &str, window: &WindowRecord) {
    info!(
        action,
        handle = %window.handle,
        title = %window.title,
        process = %window.process_name,
        size = %window.size_display(),
        position = %window.position_display(),
        class = %window.class_name,
        foreground = window.is_foreground,
        "window changed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::{test_window, ScriptedSource};
    use crate::source::{WindowHandle, WindowRect};

    fn tracker_with(source: &ScriptedSource) -> WindowTracker<ScriptedSource> {
        WindowTracker::new(source.clone(), WindowFilter::default())
    }

    #[test]
    fn test_open_then_close_is_diffed_by_handle() {
        let source = ScriptedSource::new();
        let mut tracker = tracker_with(&source);

        assert_eq!(tracker.update().unwrap(), 0);

        source.set_windows(vec![test_window(1, "Time Doctor", false)]);
        assert_eq!(tracker.update().unwrap(), 1);
        assert_eq!(tracker.snapshot().len(), 1);
        assert_eq!(tracker.snapshot()[0].handle, WindowHandle(1));

        source.set_windows(vec![]);
        assert_eq!(tracker.update().unwrap(), 0);
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_update_is_idempotent_without_os_change() {
        let source = ScriptedSource::new();
        source.set_windows(vec![test_window(1, "Time Doctor", false)]);
        let mut tracker = tracker_with(&source);

        assert_eq!(tracker.update().unwrap(), 1);
        let snapshot_before = tracker.snapshot().to_vec();

        // Second call with identical OS state: same count, snapshot untouched.
        assert_eq!(tracker.update().unwrap(), 1);
        assert_eq!(tracker.snapshot(), snapshot_before.as_slice());
    }

    #[test]
    fn test_two_windows_in_one_cycle() {
        let source = ScriptedSource::new();
        let mut tracker = tracker_with(&source);
        assert_eq!(tracker.update().unwrap(), 0);

        source.set_windows(vec![
            test_window(1, "Time Doctor", false),
            test_window(2, "Time Doctor", true),
        ]);

        let diff = diff_snapshots(tracker.snapshot(), &source.visible_windows().unwrap());
        assert_eq!(diff.opened.len(), 2);
        assert!(diff.closed.is_empty());

        assert_eq!(tracker.update().unwrap(), 2);
    }

    #[test]
    fn test_foreground_change_detected() {
        let source = ScriptedSource::new();
        source.set_windows(vec![test_window(1, "Time Doctor", false)]);
        let mut tracker = tracker_with(&source);
        tracker.update().unwrap();

        source.set_windows(vec![test_window(1, "Time Doctor", true)]);
        let diff = diff_snapshots(tracker.snapshot(), &source.visible_windows().unwrap());
        assert!(diff.opened.is_empty());
        assert!(diff.closed.is_empty());
        assert_eq!(diff.foreground_changed.len(), 1);

        // The changed flag must be stored so the next poll is quiet again.
        assert_eq!(tracker.update().unwrap(), 1);
        assert!(tracker.snapshot()[0].is_foreground);
        assert_eq!(tracker.update().unwrap(), 1);
    }

    #[test]
    fn test_filter_rejects_wrong_process_and_small_windows() {
        let filter = WindowFilter::default();

        assert!(filter.matches(&test_window(1, "Time Doctor", false)));
        assert!(!filter.matches(&test_window(2, "notepad", false)));

        let mut small = test_window(3, "Time Doctor", false);
        small.rect = WindowRect::new(0, 0, 500, 400);
        assert!(!filter.matches(&small));

        let mut flat = test_window(4, "Time Doctor", false);
        flat.rect = WindowRect::new(0, 0, 800, 90);
        assert!(!filter.matches(&flat));
    }

    #[test]
    fn test_foreground_only_filter() {
        let filter = WindowFilter {
            foreground_only: true,
            ..WindowFilter::default()
        };

        assert!(filter.matches(&test_window(1, "Time Doctor", true)));
        assert!(!filter.matches(&test_window(1, "Time Doctor", false)));
    }

    #[test]
    fn test_any_filter_matches_everything() {
        let filter = WindowFilter::any();
        let mut tiny = test_window(1, "whatever", false);
        tiny.rect = WindowRect::new(0, 0, 1, 1);
        assert!(filter.matches(&tiny));
    }
}
