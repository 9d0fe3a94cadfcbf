//! crates/summarizer_core/src/progress.rs
//!
//! The synthetic progress curve shown while a summary is being generated.
//! The remote service reports no progress, so the value only approaches completion.

/// Highest value the estimate reaches before the real outcome arrives.
pub const PROGRESS_CEILING: f64 = 95.0;
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Each tick closes this fraction of the remaining distance to 100.
const STEP_DIVISOR: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressEstimate {
    value: f64,
}

impl ProgressEstimate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn at_ceiling(&self) -> bool {
        self.value >= PROGRESS_CEILING
    }

    /// Advances by one tick and returns the new value.
    pub fn advance(&mut self) -> f64 {
        if !self.at_ceiling() {
            let next = self.value + (PROGRESS_COMPLETE - self.value) / STEP_DIVISOR;
            self.value = next.min(PROGRESS_CEILING);
        }
        self.value
    }
}
