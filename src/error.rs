//! Error types for the decision engine.

use crate::markov::JailPolicy;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors the engine can report. All three kinds named in the
/// specification's error-handling design are fail-fast: the engine
/// never retries, falls back, or times out internally.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A game-state snapshot violates one of the documented invariants
    /// (house-count parity, mortgaged-with-houses, owner index out of
    /// range, houses on an unowned or non-monopoly square). Programmer
    /// or host bug; the host must not retry the same snapshot.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A tuning parameter in `EngineConfig` is out of its documented
    /// range. Caught at `Engine::new`; no decisions are served until
    /// resolved.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Power iteration over the Markov transition matrix did not reach
    /// the convergence tolerance within the iteration budget. Indicates
    /// a bug in the transition construction, not a transient condition.
    #[error("markov chain failed to converge for {policy:?} after {iterations} iterations")]
    MarkovNonConvergent {
        policy: JailPolicy,
        iterations: usize,
    },

    /// A caller passed a malformed argument outside the snapshot (an
    /// unknown policy name, an out-of-range square index).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A transition matrix failed to be row-stochastic after
    /// construction. This can only happen from a bug in the matrix
    /// builder itself, never from caller input.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}
