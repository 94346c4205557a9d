use num_traits::{WrappingAdd, WrappingMul, Zero};

use crate::error::{LweError, Result};

/// An element of the torus `R/Z`, read as `value / 2^32 (mod 1)`.
///
/// All arithmetic on it wraps. Use `wrapping_*` operations, never the checked ones.
pub type Torus32 = i32;

// 2 ^ 32
const TWO_32: f64 = 4_294_967_296.0;

/// Converts a real number to the torus.
///
/// The integer part is removed by truncation toward zero (not floor), so negative
/// inputs keep their sign before being rescaled by 2^32.
pub fn f64_to_torus_32(d: f64) -> Torus32 {
  let inner = d - ((d as i64) as f64);
  let x = (inner * TWO_32) as i64;
  x as Torus32
}

/// Converts a torus element to a real number in `[-0.5, 0.5)`.
pub fn torus_32_to_f64(x: Torus32) -> f64 {
  (x as f64) / TWO_32
}

/// Width of one of `message_size` intervals on the torus, lifted to 64 bits:
/// `floor(2^63 / message_size) * 2`.
///
/// Computed on 63 bits and doubled, which keeps power-of-two message spaces exact.
/// `None` for a single message: its interval is the whole torus, 2^64.
/// `message_size` must be positive.
const fn interval_64(message_size: i32) -> Option<u64> {
  if message_size == 1 {
    None
  } else {
    Some(((1u64 << 63) / (message_size as u64)) * 2)
  }
}

pub(crate) fn ensure_message_space(message_size: i32) -> Result<()> {
  if message_size <= 0 {
    return Err(LweError::InvalidMessageSpace(message_size));
  }
  Ok(())
}

/// Used to approximate the phase to the nearest message possible in the message space.
/// `message_size` indicates how many messages are possible.
///
/// The phase is lifted to 64 bits, shifted by half an interval of width
/// `floor(2^63 / message_size) * 2` and floored to a multiple of that width.
/// If `message_size` does not divide 2^32 the intervals do not tile the torus evenly
/// and the one wrapping around 0 absorbs the remainder. This bias is kept as is.
/// A single message always decodes to 0.
pub fn approximate_phase(phase: Torus32, message_size: i32) -> Result<Torus32> {
  ensure_message_space(message_size)?;

  // Width of each interval
  let interval = match interval_64(message_size) {
    Some(interval) => interval,
    None => return Ok(0),
  };

  // Beginning of the first interval
  let half_interval = interval / 2;

  let mut phase64 = ((phase as u64) << 32).wrapping_add(half_interval);

  // Floor to the nearest multiples of interval
  phase64 -= phase64 % interval;

  // Rescale to torus32
  Ok((phase64 >> 32) as Torus32)
}

/// Representative of the slot `mu` in a message space of size `message_size`.
///
/// `message_size` must be positive, callers outside the crate go through
/// [`mod_switch_to_torus32`]. This is the `const` form for message constants.
pub(crate) const fn encode_message(mu: i32, message_size: i32) -> Torus32 {
  match interval_64(message_size) {
    Some(interval) => ((mu as u64).wrapping_mul(interval) >> 32) as Torus32,
    None => 0,
  }
}

/// Representative of the slot `mu` in a message space of size `message_size`.
pub fn mod_switch_to_torus32(mu: i32, message_size: i32) -> Result<Torus32> {
  ensure_message_space(message_size)?;
  Ok(encode_message(mu, message_size))
}

/// Index in `[0, message_size)` of the slot nearest to `phase`.
pub fn mod_switch_from_torus32(phase: Torus32, message_size: i32) -> Result<i32> {
  ensure_message_space(message_size)?;
  let interval = match interval_64(message_size) {
    Some(interval) => interval,
    None => return Ok(0),
  };
  let half_interval = interval / 2;
  let phase64 = ((phase as u64) << 32).wrapping_add(half_interval);
  Ok(((phase64 / interval) % message_size as u64) as i32)
}

/// `sum(lhs[i] * rhs[i])` with wraparound. Extra elements of the longer slice are ignored.
pub(crate) fn wrapping_dot<T>(lhs: &[T], rhs: &[T]) -> T
where
  T: WrappingAdd + WrappingMul + Zero,
{
  lhs
    .iter()
    .zip(rhs)
    .fold(T::zero(), |acc, (a, b)| acc.wrapping_add(&a.wrapping_mul(b)))
}
