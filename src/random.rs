//! Randomness used by key generation and encryption.
//!
//! Every randomized operation takes the caller's source explicitly. The source is asked
//! for a single 32-byte seed through `try_fill_bytes`, which is then expanded with
//! ChaCha20. A failing source therefore surfaces as [`LweError::EntropySource`] before
//! anything is sampled.
//!
//! The convenience entry points of this crate use [`rand::thread_rng`], which is
//! thread-local and seeded independently on every thread.

use rand::distributions::{Distribution, Uniform};
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{LweError, Result};
use crate::numerics::{f64_to_torus_32, Torus32};

/// Draws a seed from `rng` and expands it into a fresh ChaCha20 stream.
pub(crate) fn expand<R>(rng: &mut R) -> Result<ChaCha20Rng>
where
  R: RngCore + CryptoRng + ?Sized,
{
  let mut seed = <ChaCha20Rng as SeedableRng>::Seed::default();
  rng.try_fill_bytes(&mut seed)?;
  Ok(ChaCha20Rng::from_seed(seed))
}

pub(crate) fn ensure_stdev(stdev: f64) -> Result<()> {
  if stdev.is_finite() && stdev > 0f64 {
    Ok(())
  } else {
    Err(LweError::InvalidNoiseParameter(stdev))
  }
}

/// Normal distribution with mean 0 and standard deviation `stdev`.
pub(crate) fn normal(stdev: f64) -> Result<rand_distr::Normal<f64>> {
  ensure_stdev(stdev)?;
  rand_distr::Normal::new(0f64, stdev).map_err(|_| LweError::InvalidNoiseParameter(stdev))
}

/// Gaussian sample centered in message, with standard deviation `sigma`
///
/// The error is drawn as a real number and folded onto the torus, so
/// all the implementation uses the stdev instead of the gaussian fourier param.
pub fn gaussian32<R>(message: Torus32, sigma: f64, rng: &mut R) -> Result<Torus32>
where
  R: RngCore + CryptoRng + ?Sized,
{
  let d = normal(sigma)?;
  let mut rng = expand(rng)?;
  Ok(noisy(message, &d, &mut rng))
}

pub(crate) fn noisy<R: Rng + ?Sized>(
  message: Torus32,
  d: &rand_distr::Normal<f64>,
  rng: &mut R,
) -> Torus32 {
  message.wrapping_add(f64_to_torus_32(d.sample(rng)))
}

/// Uniform torus elements, drawn as uniform reals in `[-0.5, 0.5)`.
pub(crate) fn uniform_torus<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<Torus32> {
  let d = Uniform::new(-0.5f64, 0.5f64);
  (0..len).map(|_| f64_to_torus_32(d.sample(rng))).collect()
}

/// Independent uniform bits, as integers 0 or 1.
pub(crate) fn binary<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<i32> {
  let d = Uniform::new_inclusive(0, 1);
  (0..len).map(|_| d.sample(rng)).collect()
}
