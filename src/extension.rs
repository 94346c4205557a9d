//! Capabilities that higher layers provide on top of LWE keys and samples.
//!
//! Implementations keep the torus arithmetic of [`crate::numerics`] untouched. Ring-LWE,
//! ring-GSW and sample extraction plug in through [`RingScheme`], [`KeyExtract`] and
//! [`SampleExtract`], and build their LWE keys and samples through
//! [`LweKey::from_bits`] and [`LweSample::from_parts`].

use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::lwe::{LweKey, LweParams, LweSample};
use crate::numerics::Torus32;

/// Turns a sample decryptable under one key into a sample of the same message
/// decryptable under another key, at the cost of extra noise.
pub trait KeySwitch {
  /// Parameters of the samples produced by [`KeySwitch::key_switch`]
  fn out_params(&self) -> &LweParams;

  fn key_switch(&self, sample: &LweSample) -> Result<LweSample>;
}

/// Noise refresh.
pub trait Bootstrap {
  /// returns = LWE(mu) iff phase(x)>0, LWE(-mu) iff phase(x)<0,
  /// under the extracted key of the bootstrapping key
  fn bootstrap_without_key_switching(&self, mu: Torus32, x: &LweSample) -> Result<LweSample>;
}

/// Bootstraps `x` and switches the result back to the key of `ks`.
pub fn bootstrap<B, K>(bk: &B, ks: &K, mu: Torus32, x: &LweSample) -> Result<LweSample>
where
  B: Bootstrap + ?Sized,
  K: KeySwitch + ?Sized,
{
  let res = bk.bootstrap_without_key_switching(mu, x)?;
  ks.key_switch(&res)
}

/// An encryption scheme over a ring of torus polynomials, such as ring-LWE or ring-GSW.
pub trait RingScheme {
  type Key;
  type Sample;
  type Message;

  fn generate_key<R>(&self, rng: &mut R) -> Result<Self::Key>
  where
    R: RngCore + CryptoRng + ?Sized;

  /// Encrypts `message` under `key` with noise of stdev `alpha`
  fn encrypt<R>(
    &self,
    key: &Self::Key,
    message: &Self::Message,
    alpha: f64,
    rng: &mut R,
  ) -> Result<Self::Sample>
  where
    R: RngCore + CryptoRng + ?Sized;

  fn phase(&self, key: &Self::Key, sample: &Self::Sample) -> Result<Self::Message>;
}

/// Reads a ring key as an LWE key.
pub trait KeyExtract: RingScheme {
  fn extract_key(&self, key: &Self::Key) -> Result<LweKey>;
}

/// Turns a ring sample into an LWE sample of one coefficient of its message,
/// decryptable under the key returned by [`KeyExtract::extract_key`].
pub trait SampleExtract: RingScheme {
  fn extract_sample(&self, sample: &Self::Sample) -> Result<LweSample>;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::keyswitch::LweKeySwitchKey;
  use crate::numerics::encode_message;
  use crate::random::gaussian32;
  use rand::{Rng, SeedableRng};
  use rand_chacha::ChaCha20Rng;
  use std::cell::RefCell;
  use std::sync::Arc;

  /// Refreshes by decrypting and re-encrypting under the extracted key
  struct ReEncrypt {
    in_key: LweKey,
    extracted_key: LweKey,
    rng: RefCell<ChaCha20Rng>,
  }

  impl Bootstrap for ReEncrypt {
    fn bootstrap_without_key_switching(&self, mu: Torus32, x: &LweSample) -> Result<LweSample> {
      let phase = self.in_key.phase(x)?;
      let message = if phase > 0 { mu } else { mu.wrapping_neg() };
      let alpha = self.extracted_key.params().alpha_min();
      self
        .extracted_key
        .encrypt_with(message, alpha, &mut *self.rng.borrow_mut())
    }
  }

  #[test]
  fn test_bootstrap_then_key_switch() {
    const MU: Torus32 = encode_message(1, 8);
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let in_params = Arc::new(LweParams::new(30, 1e-6));
    let extracted_params = Arc::new(LweParams::new(50, 1e-6));
    let bits: Vec<bool> = (0..30).map(|_| rng.gen()).collect();
    let in_key = LweKey::from_bits(&in_params, &bits).unwrap();
    let extracted_key = LweKey::generate_with(&extracted_params, &mut rng).unwrap();
    let ks = LweKeySwitchKey::create_with(&extracted_key, &in_key, 8, 2, &mut rng).unwrap();
    let bk = ReEncrypt {
      in_key: LweKey::from_bits(&in_params, &bits).unwrap(),
      extracted_key,
      rng: RefCell::new(ChaCha20Rng::seed_from_u64(22)),
    };

    for &(message, expected) in [(MU, MU), (-MU, -MU)].iter() {
      let x = in_key.encrypt_with(message, 1e-6, &mut rng).unwrap();
      let refreshed = bootstrap(&bk, &ks, MU, &x).unwrap();
      assert_eq!(refreshed.n(), 30);
      assert_eq!(in_key.decrypt(&refreshed, 8).unwrap(), expected);
    }
  }

  /// Ring Z[X]/(X^2 + 1) over the torus, with one binary key polynomial
  struct DegreeTwo;

  struct RingSample {
    a: [Torus32; 2],
    b: [Torus32; 2],
  }

  /// (a0 + a1.X) * (s0 + s1.X) mod X^2 + 1
  fn mul_negacyclic(a: [Torus32; 2], s: [i32; 2]) -> [Torus32; 2] {
    [
      a[0].wrapping_mul(s[0]).wrapping_sub(a[1].wrapping_mul(s[1])),
      a[0].wrapping_mul(s[1]).wrapping_add(a[1].wrapping_mul(s[0])),
    ]
  }

  impl RingScheme for DegreeTwo {
    type Key = [i32; 2];
    type Sample = RingSample;
    type Message = [Torus32; 2];

    fn generate_key<R>(&self, rng: &mut R) -> Result<[i32; 2]>
    where
      R: RngCore + CryptoRng + ?Sized,
    {
      let mut bits = [0u8; 1];
      rng.try_fill_bytes(&mut bits)?;
      Ok([(bits[0] & 1) as i32, ((bits[0] >> 1) & 1) as i32])
    }

    fn encrypt<R>(
      &self,
      key: &[i32; 2],
      message: &[Torus32; 2],
      alpha: f64,
      rng: &mut R,
    ) -> Result<RingSample>
    where
      R: RngCore + CryptoRng + ?Sized,
    {
      let a = [rng.next_u32() as Torus32, rng.next_u32() as Torus32];
      let sa = mul_negacyclic(a, *key);
      let b = [
        gaussian32(message[0].wrapping_add(sa[0]), alpha, rng)?,
        gaussian32(message[1].wrapping_add(sa[1]), alpha, rng)?,
      ];
      Ok(RingSample { a, b })
    }

    fn phase(&self, key: &[i32; 2], sample: &RingSample) -> Result<[Torus32; 2]> {
      let sa = mul_negacyclic(sample.a, *key);
      Ok([sample.b[0].wrapping_sub(sa[0]), sample.b[1].wrapping_sub(sa[1])])
    }
  }

  impl KeyExtract for DegreeTwo {
    fn extract_key(&self, key: &[i32; 2]) -> Result<LweKey> {
      let params = Arc::new(LweParams::new(2, 1e-6));
      LweKey::from_bits(&params, &[key[0] == 1, key[1] == 1])
    }
  }

  impl SampleExtract for DegreeTwo {
    /// Constant coefficient, its mask is (a0, -a1)
    fn extract_sample(&self, sample: &RingSample) -> Result<LweSample> {
      Ok(LweSample::from_parts(
        vec![sample.a[0], sample.a[1].wrapping_neg()],
        sample.b[0],
      ))
    }
  }

  #[test]
  fn test_extracted_sample_decrypts_constant_coefficient() {
    const M: i32 = 8;
    let mut rng = ChaCha20Rng::seed_from_u64(23);
    let ring = DegreeTwo;
    for _ in 0..8 {
      let key = ring.generate_key(&mut rng).unwrap();
      let lwe_key = ring.extract_key(&key).unwrap();
      assert_eq!(lwe_key.n(), 2);

      for mu in 0..M {
        let message = [encode_message(mu, M), encode_message(M - 1 - mu, M)];
        let sample = ring.encrypt(&key, &message, 1e-6, &mut rng).unwrap();
        let phase = ring.phase(&key, &sample).unwrap();
        assert_eq!(crate::numerics::approximate_phase(phase[1], M).unwrap(), message[1]);

        let extracted = ring.extract_sample(&sample).unwrap();
        assert_eq!(lwe_key.phase(&extracted).unwrap(), phase[0]);
        assert_eq!(lwe_key.decrypt(&extracted, M).unwrap(), message[0]);
      }
    }
  }
}
