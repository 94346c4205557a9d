use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, trace};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_dimension, LweError, Result};
use crate::numerics::{
  approximate_phase, ensure_message_space, f64_to_torus_32, mod_switch_from_torus32, wrapping_dot,
  Torus32,
};
use crate::random;

// This structure contains Lwe parameters.
// It is constant once initialized: wrap it in an `Arc`
// and hand it to all the Lwe keys that use these params.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LweParams {
  /// Length of the secret key and of the mask of every sample
  pub(crate) n: usize,
  /// Smallest noise such that the samples are secure
  pub(crate) alpha_min: f64,
}

impl LweParams {
  pub fn new(n: usize, alpha_min: f64) -> Self {
    Self { n, alpha_min }
  }

  pub fn n(&self) -> usize {
    self.n
  }

  /// Default standard deviation of the encryption noise
  pub fn alpha_min(&self) -> f64 {
    self.alpha_min
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LweSample {
  /// The coefficients of the mask
  pub(crate) coefficients: Vec<Torus32>,
  pub(crate) b: Torus32,
  /// Average noise of the sample
  pub(crate) current_variance: f64,
}

impl LweSample {
  /// The sample `(0, 0)` of the right dimension
  pub fn new(params: &LweParams) -> Self {
    Self {
      coefficients: vec![0; params.n],
      b: 0,
      current_variance: 0f64,
    }
  }

  /// Assembles a sample from a mask and its right term. The variance is unknown and set to 0.
  pub fn from_parts(coefficients: Vec<Torus32>, b: Torus32) -> Self {
    Self {
      coefficients,
      b,
      current_variance: 0f64,
    }
  }

  /// Trivial encryption of `mu`: the mask is 0 so every key decrypts it to `mu`.
  pub fn noiseless_trivial(mu: Torus32, params: &LweParams) -> Self {
    Self {
      b: mu,
      ..Self::new(params)
    }
  }

  pub fn coefficients(&self) -> &[Torus32] {
    &self.coefficients
  }

  pub fn b(&self) -> Torus32 {
    self.b
  }

  pub fn current_variance(&self) -> f64 {
    self.current_variance
  }

  pub fn n(&self) -> usize {
    self.coefficients.len()
  }

  /// `self += other`
  pub fn add_to(&mut self, other: &LweSample) -> Result<()> {
    self.add_mul_to(1, other)
  }

  /// `self -= other`
  pub fn sub_to(&mut self, other: &LweSample) -> Result<()> {
    self.add_mul_to(-1, other)
  }

  /// `self += p * other`
  pub fn add_mul_to(&mut self, p: i32, other: &LweSample) -> Result<()> {
    ensure_dimension(self.n(), other.n())?;
    for (a, &c) in self.coefficients.iter_mut().zip(other.coefficients.iter()) {
      *a = a.wrapping_add(p.wrapping_mul(c));
    }
    self.b = self.b.wrapping_add(p.wrapping_mul(other.b));
    self.current_variance += (p as f64).powi(2) * other.current_variance;
    Ok(())
  }
}

impl std::ops::Mul<i32> for LweSample {
  type Output = Self;
  fn mul(self, p: i32) -> Self {
    let LweSample {
      coefficients,
      b,
      current_variance,
    } = self;

    Self {
      coefficients: coefficients.iter().map(|c| c.wrapping_mul(p)).collect(),
      b: b.wrapping_mul(p),
      current_variance: (p as f64).powi(2) * current_variance,
    }
  }
}

impl std::ops::Neg for LweSample {
  type Output = Self;
  fn neg(self) -> Self {
    let Self {
      coefficients,
      b,
      current_variance,
    } = self;
    Self {
      coefficients: coefficients.iter().map(|c| c.wrapping_neg()).collect(),
      b: b.wrapping_neg(),
      current_variance,
    }
  }
}

/// A binary secret key.
///
/// Never printed: the `Debug` output only shows the parameters.
pub struct LweKey {
  pub(crate) params: Arc<LweParams>,
  pub(crate) key: Vec<i32>,
}

impl fmt::Debug for LweKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LweKey")
      .field("params", &self.params)
      .field("key", &"<redacted>")
      .finish()
  }
}

impl LweKey {
  /// Uses thread-local randomness to generate a key with the given parameters
  pub fn generate(params: &Arc<LweParams>) -> Result<Self> {
    Self::generate_with(params, &mut rand::thread_rng())
  }

  /// Generates a key with `params.n` independent uniform bits drawn from `rng`
  pub fn generate_with<R>(params: &Arc<LweParams>, rng: &mut R) -> Result<Self>
  where
    R: RngCore + CryptoRng + ?Sized,
  {
    let mut rng = random::expand(rng)?;
    let key = random::binary(&mut rng, params.n);
    debug!("generated LWE key of dimension {}", params.n);

    Ok(Self {
      params: Arc::clone(params),
      key,
    })
  }

  /// Builds a key from known bits
  pub fn from_bits(params: &Arc<LweParams>, bits: &[bool]) -> Result<Self> {
    ensure_dimension(params.n, bits.len())?;
    Ok(Self {
      params: Arc::clone(params),
      key: bits.iter().map(|&bit| bit as i32).collect(),
    })
  }

  pub fn params(&self) -> &Arc<LweParams> {
    &self.params
  }

  pub fn n(&self) -> usize {
    self.key.len()
  }

  /// Encrypts `message` with stdev `alpha`, using thread-local randomness
  pub fn encrypt(&self, message: Torus32, alpha: f64) -> Result<LweSample> {
    self.encrypt_with(message, alpha, &mut rand::thread_rng())
  }

  /// Encrypts `message` with the default stdev of the parameters
  pub fn encrypt_default(&self, message: Torus32) -> Result<LweSample> {
    self.encrypt(message, self.params.alpha_min)
  }

  /// This function encrypts message by using key, with stdev alpha
  pub fn encrypt_with<R>(&self, message: Torus32, alpha: f64, rng: &mut R) -> Result<LweSample>
  where
    R: RngCore + CryptoRng + ?Sized,
  {
    let d = random::normal(alpha)?;
    let mut rng = random::expand(rng)?;
    trace!("encrypting under LWE key of dimension {}, alpha = {}", self.n(), alpha);

    let b = random::noisy(message, &d, &mut rng);
    Ok(self.mask(b, alpha, &mut rng))
  }

  /// This function encrypts a message by using key and a given noise value.
  ///
  /// `alpha` only feeds the variance estimate of the sample, a noise of 0 is allowed.
  pub fn encrypt_with_external_noise<R>(
    &self,
    message: Torus32,
    noise: f64,
    alpha: f64,
    rng: &mut R,
  ) -> Result<LweSample>
  where
    R: RngCore + CryptoRng + ?Sized,
  {
    ensure_external_noise(noise, alpha)?;
    let mut rng = random::expand(rng)?;
    self.encrypt_expanded(message, noise, alpha, &mut rng)
  }

  /// Same as `encrypt_with_external_noise`, drawing the mask straight from `rng`.
  pub(crate) fn encrypt_expanded<R: Rng + ?Sized>(
    &self,
    message: Torus32,
    noise: f64,
    alpha: f64,
    rng: &mut R,
  ) -> Result<LweSample> {
    ensure_external_noise(noise, alpha)?;
    let b = message.wrapping_add(f64_to_torus_32(noise));
    Ok(self.mask(b, alpha, rng))
  }

  /// Draws a uniform mask and adds its product with the key to `b`
  fn mask<R: Rng + ?Sized>(&self, b: Torus32, alpha: f64, rng: &mut R) -> LweSample {
    let coefficients = random::uniform_torus(rng, self.n());
    let b = b.wrapping_add(wrapping_dot(&coefficients, &self.key));
    LweSample {
      coefficients,
      b,
      current_variance: alpha * alpha,
    }
  }

  /// Phase of `sample` under this key, see [`lwe_phase`]
  pub fn phase(&self, sample: &LweSample) -> Result<Torus32> {
    lwe_phase(sample, self)
  }

  /// This function computes the decryption of sample by using key.
  /// `message_size` indicates the message space and is used to approximate the phase
  pub fn decrypt(&self, sample: &LweSample, message_size: i32) -> Result<Torus32> {
    ensure_message_space(message_size)?;
    let phi = lwe_phase(sample, self)?;
    approximate_phase(phi, message_size)
  }

  /// Decrypts `sample` to the index of its slot in `[0, message_size)`
  pub fn decrypt_message(&self, sample: &LweSample, message_size: i32) -> Result<i32> {
    ensure_message_space(message_size)?;
    let phi = lwe_phase(sample, self)?;
    mod_switch_from_torus32(phi, message_size)
  }
}

fn ensure_external_noise(noise: f64, alpha: f64) -> Result<()> {
  if !noise.is_finite() {
    return Err(LweError::InvalidNoiseParameter(noise));
  }
  if !(alpha.is_finite() && alpha >= 0f64) {
    return Err(LweError::InvalidNoiseParameter(alpha));
  }
  Ok(())
}

/// This function computes the phase of sample by using key : phi = b - a.s
pub fn lwe_phase(sample: &LweSample, key: &LweKey) -> Result<Torus32> {
  ensure_dimension(key.n(), sample.n())?;
  let axs = wrapping_dot(&sample.coefficients, &key.key);
  Ok(sample.b.wrapping_sub(axs))
}

/// `sum(coefficients[i] * samples[i])`
///
/// The phase of the result is the same combination of the phases of `samples`,
/// and so is its variance with squared coefficients.
pub fn lwe_linear_combination(
  coefficients: &[i32],
  samples: &[LweSample],
  params: &LweParams,
) -> Result<LweSample> {
  ensure_dimension(samples.len(), coefficients.len())?;
  for sample in samples {
    ensure_dimension(params.n, sample.n())?;
  }

  let mut result = LweSample::new(params);
  for (&p, sample) in coefficients.iter().zip_eq(samples) {
    result.add_mul_to(p, sample)?;
  }
  Ok(result)
}
