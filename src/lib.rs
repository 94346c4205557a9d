//! Symmetric LWE encryption over the 32-bit discretized torus.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use torus_lwe::{mod_switch_to_torus32, LweKey, LweParams};
//! let params = Arc::new(LweParams::default());
//! let key = LweKey::generate(&params)?;
//! let message = mod_switch_to_torus32(1, 4)?;
//! let sample = key.encrypt_default(message)?;
//! assert_eq!(key.decrypt(&sample, 4)?, message);
//! # Ok::<(), torus_lwe::LweError>(())
//! ```
#![forbid(unsafe_code)]

pub mod error;
pub mod extension;
pub mod keyswitch;
pub mod lwe;
pub mod numerics;
pub mod params;
pub mod random;

pub use error::{LweError, Result};
pub use extension::{bootstrap, Bootstrap, KeyExtract, KeySwitch, RingScheme, SampleExtract};
pub use keyswitch::LweKeySwitchKey;
pub use lwe::{lwe_linear_combination, lwe_phase, LweKey, LweParams, LweSample};
pub use numerics::{
  approximate_phase, f64_to_torus_32, mod_switch_from_torus32,
  mod_switch_to_torus32, torus_32_to_f64, Torus32,
};
pub use params::SecurityLevel;
pub use random::gaussian32;
