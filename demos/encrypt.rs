use std::sync::Arc;

use torus_lwe::{mod_switch_to_torus32, LweKey, LweParams, Result};

fn main() -> Result<()> {
  env_logger::init();

  const M: i32 = 8;
  let message = mod_switch_to_torus32(3, M)?;
  let params = Arc::new(LweParams::default());
  let secret_key = LweKey::generate(&params)?;
  let encrypted = secret_key.encrypt_default(message)?;
  let decrypted = secret_key.decrypt(&encrypted, M)?;

  assert_eq!(message, decrypted);
  println!("decrypted slot {} of {}", secret_key.decrypt_message(&encrypted, M)?, M);
  Ok(())
}
