//! Non-Windows (noop) implementation of the window source.
//!
//! This exists so the crate (and binary) can compile on non-Windows targets
//! without pulling in Win32 dependencies. It reports an empty window set
//! and an unavailable idle timer.

use std::time::Duration;

use crate::source::types::{SourceError, WindowRecord};
use crate::source::WindowSource;

/// A source that never sees any windows.
#[derive(Debug, Default)]
pub struct NoopSource;

impl NoopSource {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSource for NoopSource {
    fn visible_windows(&self) -> Result<Vec<WindowRecord>, SourceError> {
        Ok(Vec::new())
    }

    fn idle_duration(&self) -> Result<Duration, SourceError> {
        Err(SourceError::IdleUnavailable(
            "no idle-input query on this platform".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_source_is_empty() {
        let source = NoopSource::new();
        assert!(source.visible_windows().unwrap().is_empty());
        assert!(matches!(
            source.idle_duration(),
            Err(SourceError::IdleUnavailable(_))
        ));
    }
}
