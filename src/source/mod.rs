//! OS window and idle-input capability interface.
//!
//! The tracker and alert controller only ever talk to a [`WindowSource`];
//! the Win32 implementation lives behind `cfg(target_os = "windows")`, a
//! no-op stands in on other targets, and [`scripted::ScriptedSource`]
//! drives the test suite with synthetic snapshots.

pub mod scripted;
pub mod types;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(not(target_os = "windows"))]
pub mod noop;

use std::time::Duration;

pub use types::{SourceError, WindowHandle, WindowRecord, WindowRect};

/// Access to the OS window set and the global idle timer.
///
/// Both queries are stateless and safe to call repeatedly; implementations
/// must tolerate a window's owning process exiting between enumeration and
/// attribute resolution by skipping that window.
pub trait WindowSource: Send + Sync {
    /// Enumerate all currently visible top-level windows.
    ///
    /// Windows whose attributes cannot be resolved (process already gone,
    /// access denied) are silently excluded; a returned error means the
    /// enumeration pass itself failed.
    fn visible_windows(&self) -> Result<Vec<WindowRecord>, SourceError>;

    /// Elapsed time since the last global keyboard or mouse input.
    fn idle_duration(&self) -> Result<Duration, SourceError>;
}

#[cfg(target_os = "windows")]
pub use windows::Win32Source;

/// Platform-agnostic source type alias
#[cfg(target_os = "windows")]
pub type SystemSource = Win32Source;

#[cfg(not(target_os = "windows"))]
pub use noop::NoopSource;

/// Platform-agnostic source type alias
#[cfg(not(target_os = "windows"))]
pub type SystemSource = NoopSource;

pub use scripted::ScriptedSource;
