//! # Error taxonomy
//!
//! The engine distinguishes four kinds of failure, following the layered
//! `thiserror` taxonomies used elsewhere in the pack rather than ad-hoc
//! `String` or `Box<dyn Error>` returns: configuration mistakes caught at
//! load time, invariant violations that abort a running simulation,
//! dynamics/feature combinations that were never implemented, and numeric
//! breakdowns that are sometimes recoverable and sometimes not.

use thiserror::Error;

/// Top-level error type threaded through engine-facing code.
///
/// IO and (de)serialization failures are caught at the IO boundary as
/// `Box<dyn std::error::Error>` and wrapped into [`EdmdError::Io`] the moment
/// they cross into engine code, so that everything above the IO layer only
/// ever has to match on this one enum.
#[derive(Debug, Error)]
pub enum EdmdError {
    /// Bad or missing configuration: a missing attribute, an out-of-range
    /// parameter (`Lambda ∉ [0,1]`, `N_i < 3`), or an unsupported
    /// combination such as orientation data loaded into a dynamics variant
    /// that doesn't track orientation.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A correctness invariant the engine assumes was violated: a stored
    /// local clock disagrees with the expected value, a stale event slipped
    /// past the filter, a predicted time is negative beyond numeric slack,
    /// or a binary particle stream's id sequence doesn't match what was
    /// expected. Not recoverable — the simulation aborts with diagnostics.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A predictor or resolver that the active dynamics variant does not
    /// implement was invoked. This always indicates a misconfiguration
    /// (e.g. requesting a line-line collision resolver under `Newtonian`),
    /// never a transient condition.
    #[error("{operation} is not supported for {dynamics} dynamics")]
    UnsupportedForThisDynamics {
        /// Name of the liouvillean operation that was called.
        operation: &'static str,
        /// Name of the active dynamics variant.
        dynamics: &'static str,
    },

    /// A predicted event time came out infinite or NaN. Individual
    /// occurrences are dropped with a counter increment; repeated
    /// consecutive overflows for the same particle are promoted to
    /// [`EdmdError::InvariantViolation`] by the caller.
    #[error("numeric overflow computing event time for particle {particle_id}")]
    NumericOverflow {
        /// Particle whose predicted event produced the overflow.
        particle_id: u64,
    },

    /// Wrapped IO or (de)serialization failure from the config/state
    /// loader, the binary particle codec, or checkpoint persistence.
    #[error("io error: {0}")]
    Io(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EdmdError>;
