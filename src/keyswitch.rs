use std::sync::Arc;

use log::debug;
use rand::distributions::Distribution;
use rand::{CryptoRng, RngCore};

use crate::error::{ensure_dimension, LweError, Result};
use crate::extension::KeySwitch;
use crate::lwe::{LweKey, LweParams, LweSample};
use crate::numerics::Torus32;
use crate::random;

/// Largest supported `log_2(base)`, the key holds `base` samples per digit
pub const MAX_BASE_BIT: usize = 8;

/// Switches samples from an input key `s'` to an output key `s`.
#[derive(Clone, Debug)]
pub struct LweKeySwitchKey {
  /// length of the input key: s'
  n: usize,
  /// decomposition length
  t: usize,
  /// log_2(base)
  base_bit: usize,
  /// decomposition base: a power of 2
  base: usize,
  /// params of the output key s
  out_params: Arc<LweParams>,
  /// the keyswitch elements: a n.t.base matrix
  ks: Vec<Vec<Vec<LweSample>>>,
}

impl LweKeySwitchKey {
  /// Creates the key switching key from `in_key` to `out_key` with thread-local randomness.
  pub fn create(in_key: &LweKey, out_key: &LweKey, t: usize, base_bit: usize) -> Result<Self> {
    Self::create_with(in_key, out_key, t, base_bit, &mut rand::thread_rng())
  }

  /// `ks[i][j][h]` encrypts `in_key[i] * h / base^(j+1)` under `out_key`
  /// with stdev `out_key.params.alpha_min`.
  ///
  /// Needs `t >= 1`, `1 <= base_bit <= MAX_BASE_BIT` and `t * base_bit < 32`.
  pub fn create_with<R>(
    in_key: &LweKey,
    out_key: &LweKey,
    t: usize,
    base_bit: usize,
    rng: &mut R,
  ) -> Result<Self>
  where
    R: RngCore + CryptoRng + ?Sized,
  {
    let precision = t.checked_mul(base_bit).unwrap_or(usize::max_value());
    if t == 0 || base_bit == 0 || base_bit > MAX_BASE_BIT || precision >= 32 {
      return Err(LweError::InvalidDecomposition { t, base_bit });
    }
    let alpha = out_key.params.alpha_min;
    let d = random::normal(alpha)?;
    let mut rng = random::expand(rng)?;

    let n = in_key.n();
    let base = 1 << base_bit;
    let size_ks = n * t * (base - 1);

    // Choose a random vector of gaussian noises
    let noise: Vec<f64> = (0..size_ks).map(|_| d.sample(&mut rng)).collect();
    let error: f64 = noise.iter().sum::<f64>() / size_ks.max(1) as f64;
    // Recenter the noises
    let noise: Vec<f64> = noise.iter().map(|e| e - error).collect();

    let mut ks = vec![vec![vec![LweSample::new(&out_key.params); base]; t]; n];
    let mut index = 0;
    for i in 0..n {
      for j in 0..t {
        // term h=0 stays a trivial encryption of 0, it is never used when switching
        for h in 1..base {
          let shift = (32 - (j + 1) * base_bit) as u32;
          let message = ((in_key.key[i] * h as i32) as u32).wrapping_shl(shift) as Torus32;
          ks[i][j][h] = out_key.encrypt_expanded(message, noise[index], alpha, &mut rng)?;
          index += 1;
        }
      }
    }
    debug!(
      "created key switching key {} -> {}, t = {}, base_bit = {}",
      n,
      out_key.n(),
      t,
      base_bit
    );

    Ok(Self {
      n,
      t,
      base_bit,
      base,
      out_params: Arc::clone(&out_key.params),
      ks,
    })
  }

  pub fn t(&self) -> usize {
    self.t
  }

  pub fn base_bit(&self) -> usize {
    self.base_bit
  }

  /// Length of the keys this key switches from
  pub fn in_n(&self) -> usize {
    self.n
  }
}

impl KeySwitch for LweKeySwitchKey {
  fn out_params(&self) -> &LweParams {
    &self.out_params
  }

  fn key_switch(&self, sample: &LweSample) -> Result<LweSample> {
    ensure_dimension(self.n, sample.n())?;

    let base_bit = self.base_bit as u32;
    let prec_offset: u32 = 1 << (32 - (1 + base_bit * self.t as u32));
    let mask = (self.base - 1) as u32;

    let mut result = LweSample::noiseless_trivial(sample.b, &self.out_params);
    for (i, &a) in sample.coefficients.iter().enumerate() {
      let aibar = (a as u32).wrapping_add(prec_offset);
      for j in 0..self.t {
        let aij = (aibar >> (32 - (j as u32 + 1) * base_bit)) & mask;
        if aij != 0 {
          result.sub_to(&self.ks[i][j][aij as usize])?;
        }
      }
    }
    Ok(result)
  }
}
