//! Construction-time search parameters.

use crate::error::{Error, Result};

/// Default wavefront round cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;
/// Default number of requests the compute backend preallocates for.
pub const DEFAULT_MAX_BATCH: u32 = 64;
/// Default capacity, in cells, of the compute backend's shared result buffer.
pub const DEFAULT_RESULT_CAPACITY: u32 = 4 * 1024;

/// Fixed per-backend parameters.
///
/// The CPU backend only reads `max_iterations`; the compute backend sizes its
/// device buffers from all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Maximum number of wavefront rounds. A destination further than this
    /// many steps from its source is reported as unreachable.
    pub max_iterations: u32,
    /// Maximum number of requests per `find_paths` call.
    pub max_batch: u32,
    /// Total cells the shared result buffer can hold across one batch.
    pub result_capacity: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_batch: DEFAULT_MAX_BATCH,
            result_capacity: DEFAULT_RESULT_CAPACITY,
        }
    }
}

impl SearchConfig {
    /// Set the wavefront round cap.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the maximum batch size.
    pub fn with_max_batch(mut self, max_batch: u32) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Set the result buffer capacity in cells.
    pub fn with_result_capacity(mut self, result_capacity: u32) -> Self {
        self.result_capacity = result_capacity;
        self
    }

    /// Reject configurations no backend can honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be at least 1"));
        }
        if self.max_iterations == u32::MAX {
            return Err(Error::InvalidConfig("max_iterations leaves no room for stamps"));
        }
        if self.max_batch == 0 {
            return Err(Error::InvalidConfig("max_batch must be at least 1"));
        }
        if self.result_capacity == 0 {
            return Err(Error::InvalidConfig("result_capacity must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = SearchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_iterations, 10_000);
        assert_eq!(cfg.result_capacity, 4096);
    }

    #[test]
    fn builder_setters() {
        let cfg = SearchConfig::default()
            .with_max_iterations(2000)
            .with_max_batch(8)
            .with_result_capacity(100);
        assert_eq!(
            cfg,
            SearchConfig {
                max_iterations: 2000,
                max_batch: 8,
                result_capacity: 100
            }
        );
    }

    #[test]
    fn zero_fields_are_rejected() {
        for cfg in [
            SearchConfig::default().with_max_iterations(0),
            SearchConfig::default().with_max_batch(0),
            SearchConfig::default().with_result_capacity(0),
        ] {
            assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));
        }
    }
}
