//! Identifier generation.

use rand::RngCore;

/// Length of generated ids, in hex characters.
const ID_LEN: usize = 16;

/// Generate a fresh opaque id: a hex prefix of the Blake3 hash of random bytes.
pub fn generate_id() -> String {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut seed);
    let hash = blake3::hash(&seed);
    hex::encode(&hash.as_bytes()[..ID_LEN / 2])
}
