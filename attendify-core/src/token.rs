//! Session token generation

use rand::{rngs::OsRng, RngCore};

/// Generate an unguessable token of `bytes` random bytes, hex encoded
pub fn generate_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}
