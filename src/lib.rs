//! Window Alarm - background agent that sounds an alarm while a target
//! application window is open and the user is ignoring it.
//!
//! The agent polls the OS window set, diffs it against the previous poll,
//! and when a matching window appears it runs a bounded alert episode:
//! an audible alarm that keeps sounding until the window disappears, the
//! user becomes active, a timeout elapses, or the agent shuts down.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Window Alarm                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌─────────────┐   ┌──────────────────┐  │
//! │  │ WindowSource │──▶│   Tracker   │──▶│     Monitor      │  │
//! │  │ (Win32/fake) │   │  (diffing)  │   │  (poll loop)     │  │
//! │  └──────────────┘   └─────────────┘   └────────┬─────────┘  │
//! │         │                                      ▼            │
//! │  ┌──────────────┐                     ┌──────────────────┐  │
//! │  │  idle timer  │────────────────────▶│ AlertController  │  │
//! │  └──────────────┘                     │   └─ alarm task  │  │
//! │                                       └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancellation is hierarchical: the host cancels one root token, the
//! monitor forwards it to any in-flight episode, and the episode cancels
//! and awaits its alarm playback task before returning.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use window_alarm::alarm::SystemSink;
//! use window_alarm::core::{AlertController, AlertPolicy, Monitor, WindowFilter, WindowTracker};
//! use window_alarm::source::SystemSource;
//!
//! # async fn run() {
//! let tracker = WindowTracker::new(SystemSource::new(), WindowFilter::default());
//! let controller = AlertController::new(AlertPolicy::default(), Arc::new(SystemSink::new()));
//! let mut monitor = Monitor::new(tracker, controller, Duration::from_millis(500));
//!
//! let shutdown = CancellationToken::new();
//! monitor.run(shutdown.clone()).await;
//! # }
//! ```

pub mod alarm;
pub mod config;
pub mod core;
pub mod source;

// Re-export key types at crate root for convenience
pub use crate::alarm::{SystemSink, ToneSink};
pub use crate::config::{Config, ConfigError};
pub use crate::core::{
    AlertController, AlertOutcome, AlertPolicy, Monitor, WindowFilter, WindowTracker,
};
pub use crate::source::{SystemSource, WindowRecord, WindowSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
