use qchain_sim::SimError;
use thiserror::Error;

/// Failures surfaced by block and chain operations.
///
/// Validation outcomes are ordinary booleans, not errors; this type covers
/// the cases where a computation could not run at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// The simulation backend could not produce a result.
    #[error("quantum simulation failed: {0}")]
    Provider(#[from] SimError),

    /// Bounded mining ran out of attempts before hitting the target.
    #[error("mining exhausted after {attempts} attempts at difficulty {difficulty}")]
    MiningExhausted { difficulty: usize, attempts: u64 },
}
