use thiserror::Error;

/// Errors reported by the LWE layer.
///
/// Torus wraparound is never one of these: it is the group law.
#[derive(Debug, Error)]
pub enum LweError {
  /// A sample, key or coefficient vector does not have the expected length
  #[error("dimension mismatch: expected {expected}, got {actual}")]
  DimensionMismatch { expected: usize, actual: usize },

  #[error("invalid message space size {0}, must be positive")]
  InvalidMessageSpace(i32),

  /// Noise standard deviation (or external noise value) is out of range
  #[error("invalid noise parameter {0}")]
  InvalidNoiseParameter(f64),

  #[error("entropy source failure: {0}")]
  EntropySource(#[from] rand::Error),

  /// Key switching decomposition needs `t >= 1`, `base_bit >= 1` and `t * base_bit < 32`
  #[error("invalid key switching decomposition: t = {t}, base_bit = {base_bit}")]
  InvalidDecomposition { t: usize, base_bit: usize },
}

pub type Result<T> = std::result::Result<T, LweError>;

/// Fails with `DimensionMismatch` unless `actual == expected`.
pub(crate) fn ensure_dimension(expected: usize, actual: usize) -> Result<()> {
  if expected == actual {
    Ok(())
  } else {
    Err(LweError::DimensionMismatch { expected, actual })
  }
}
