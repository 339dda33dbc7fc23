//! Editor options.
//!
//! | Option             | Type  | Default | Meaning                                  |
//! |--------------------|-------|---------|------------------------------------------|
//! | `tab_stop`         | usize | 8       | Tab width for the render column          |
//! | `quit_times`       | u32   | 3       | Extra confirmations to drop unsaved work |
//! | `initial_capacity` | usize | 10      | Starting gap buffer capacity             |
//!
//! Options are fixed when an [`Editor`](crate::editor::Editor) is created.
//! The builder setters validate as they go, so an `EditorOptions` value that
//! exists is always usable.

use thiserror::Error;

use crate::gap_buffer::DEFAULT_CAPACITY;

pub const DEFAULT_TAB_STOP: usize = 8;
pub const DEFAULT_QUIT_TIMES: u32 = 3;

/// Rejected option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("tab stop must be at least 1")]
    ZeroTabStop,

    #[error("initial buffer capacity must be at least 1")]
    ZeroCapacity,
}

/// Per-editor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    tab_stop: usize,
    quit_times: u32,
    initial_capacity: usize,
}

impl EditorOptions {
    /// Set the tab width.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::ZeroTabStop`] for a width of 0.
    pub fn with_tab_stop(self, tab_stop: usize) -> Result<Self, OptionsError> {
        Self { tab_stop, ..self }.validate()
    }

    /// Set how many extra close requests a modified document needs.
    #[must_use]
    pub const fn with_quit_times(self, quit_times: u32) -> Self {
        Self { quit_times, ..self }
    }

    /// Set the starting gap buffer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::ZeroCapacity`] for a capacity of 0.
    pub fn with_initial_capacity(self, initial_capacity: usize) -> Result<Self, OptionsError> {
        Self {
            initial_capacity,
            ..self
        }
        .validate()
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub const fn validate(self) -> Result<Self, OptionsError> {
        if self.tab_stop == 0 {
            return Err(OptionsError::ZeroTabStop);
        }
        if self.initial_capacity == 0 {
            return Err(OptionsError::ZeroCapacity);
        }
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    #[inline]
    #[must_use]
    pub const fn quit_times(&self) -> u32 {
        self.quit_times
    }

    #[inline]
    #[must_use]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: DEFAULT_QUIT_TIMES,
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = EditorOptions::default();
        assert_eq!(opts.tab_stop(), 8);
        assert_eq!(opts.quit_times(), 3);
        assert_eq!(opts.initial_capacity(), 10);
        assert_eq!(opts.validate(), Ok(opts));
    }

    #[test]
    fn setters_chain() {
        let opts = EditorOptions::default()
            .with_tab_stop(4)
            .and_then(|o| o.with_initial_capacity(1))
            .map(|o| o.with_quit_times(0))
            .unwrap();
        assert_eq!(opts.tab_stop(), 4);
        assert_eq!(opts.initial_capacity(), 1);
        assert_eq!(opts.quit_times(), 0);
    }

    #[test]
    fn zero_tab_stop_rejected() {
        assert_eq!(
            EditorOptions::default().with_tab_stop(0),
            Err(OptionsError::ZeroTabStop)
        );
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            EditorOptions::default().with_initial_capacity(0),
            Err(OptionsError::ZeroCapacity)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(OptionsError::ZeroTabStop.to_string(), "tab stop must be at least 1");
        assert_eq!(
            OptionsError::ZeroCapacity.to_string(),
            "initial buffer capacity must be at least 1"
        );
    }
}
