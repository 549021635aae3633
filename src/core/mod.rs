//! Core monitoring pipeline: tracker, monitor loop, and alert control.

pub mod alert;
pub mod monitor;
pub mod tracker;

pub use alert::{AlertController, AlertOutcome, AlertPolicy, AudioMode, IdleMode};
pub use monitor::Monitor;
pub use tracker::{diff_snapshots, WindowDiff, WindowFilter, WindowTracker};
