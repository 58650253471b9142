//! API secret generation

use rand::RngCore;
use zeroize::Zeroizing;

/// Number of random bytes in a generated API secret
pub const SECRET_BYTES: usize = 64;

/// Generate a fresh hex-encoded API secret for a new project.
///
/// Bytes come from the thread-local CSPRNG; both the raw bytes and the
/// returned string are wiped on drop.
pub fn generate_api_secret() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; SECRET_BYTES]);
    rand::thread_rng().fill_bytes(bytes.as_mut());
    Zeroizing::new(hex::encode(bytes.as_ref()))
}
