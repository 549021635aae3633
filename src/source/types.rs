//! Window snapshot types shared by every `WindowSource` implementation.
//!
//! A `WindowRecord` is a point-in-time capture of one visible top-level
//! window. All fields except the handle may be stale immediately after
//! enumeration; identity is the handle alone.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of a top-level window.
///
/// On Windows this wraps the HWND value; the scripted source hands out
/// arbitrary numbers. Only used for identity comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Bounding rectangle of a window in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Snapshot of one visible top-level window at enumeration time.
///
/// Created fresh on every poll and never mutated; the tracker replaces
/// whole snapshots rather than updating records in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    /// Opaque window identity
    pub handle: WindowHandle,
    /// Window title at capture time
    pub title: String,
    /// Name of the owning process (without extension)
    pub process_name: String,
    /// Bounding rectangle in screen coordinates
    pub rect: WindowRect,
    /// Window class name
    pub class_name: String,
    /// Whether this window was the foreground window at capture time
    pub is_foreground: bool,
}

impl WindowRecord {
    /// Size as a `WxH` display string, matching the log record format.
    pub fn size_display(&self) -> String {
        format!("{}x{}", self.rect.width(), self.rect.height())
    }

    /// Position as a `left;top` display string.
    pub fn position_display(&self) -> String {
        format!("{};{}", self.rect.left, self.rect.top)
    }
}

/// Errors reported by a `WindowSource`.
///
/// A single window with unresolvable attributes is skipped inside the
/// source and never surfaces here; these variants cover failures of the
/// whole query.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The enumeration pass itself failed.
    #[error("window enumeration failed: {0}")]
    Enumeration(String),

    /// The idle-input query failed; inactivity cannot be confirmed.
    #[error("idle time unavailable: {0}")]
    IdleUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let rect = WindowRect::new(100, 200, 700, 350);
        assert_eq!(rect.width(), 600);
        assert_eq!(rect.height(), 150);
    }

    #[test]
    fn test_record_display_helpers() {
        let record = WindowRecord {
            handle: WindowHandle(0x1a2b),
            title: "Break reminder".to_string(),
            process_name: "Time Doctor".to_string(),
            rect: WindowRect::new(10, 20, 610, 220),
            class_name: "Chrome_WidgetWin_1".to_string(),
            is_foreground: true,
        };

        assert_eq!(record.size_display(), "600x200");
        assert_eq!(record.position_display(), "10;20");
        assert_eq!(record.handle.to_string(), "0x1a2b");
    }
}
