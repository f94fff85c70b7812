//! Typed failures returned by the engine entry points
//!
//! Every variant rejects the entire request atomically; per-transaction
//! validation failures are data (an "invalid" bucket), not errors.

use thiserror::Error;

/// Request-level failure from an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Two expenses in one parse batch share a date.
    #[error("duplicate transaction date found in expenses")]
    DuplicateDate,

    /// A Q/P/K period is inverted. `label` is the rule set (`q`, `p`, `k`),
    /// `index` the position within that set as declared.
    #[error("{label}[{index}] has start > end")]
    PeriodStartAfterEnd { label: &'static str, index: usize },

    /// A Q/P/K period falls outside the [min, max] transaction date span.
    #[error("{label}[{index}] is outside transaction date bounds")]
    PeriodOutOfBounds { label: &'static str, index: usize },

    /// Channel identifier does not resolve to a known investable channel.
    #[error("unsupported investment channel '{0}'")]
    UnsupportedChannel(String),
}
