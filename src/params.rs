use serde::{Deserialize, Serialize};

use crate::lwe::LweParams;

/// Security presets for the LWE parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityLevel {
  Bit80,
  Bit128,
}

impl Default for SecurityLevel {
  fn default() -> Self {
    SecurityLevel::Bit128
  }
}

impl LweParams {
  pub fn with(level: SecurityLevel) -> Self {
    match level {
      SecurityLevel::Bit80 => {
        const N: usize = 500;
        // Standard deviation
        const STDEV: f64 = 2.44e-5;
        Self::new(N, STDEV)
      }
      SecurityLevel::Bit128 => {
        const N: usize = 630;
        // Standard deviation, 2^-15
        const STDEV: f64 = 3.051_757_812_5e-5;
        Self::new(N, STDEV)
      }
    }
  }
}

impl Default for LweParams {
  fn default() -> Self {
    Self::with(SecurityLevel::default())
  }
}
