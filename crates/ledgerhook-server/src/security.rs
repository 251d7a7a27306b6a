//! Timing-safe comparison for the metrics bearer token.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compare a presented secret against the expected one in constant time.
///
/// Both sides are reduced to SHA-256 digests first so the comparison always
/// runs over equal-length values; neither the content nor the length of
/// either input leaks through timing.
pub fn constant_time_eq(presented: &[u8], expected: &[u8]) -> bool {
    let presented = Sha256::digest(presented);
    let expected = Sha256::digest(expected);
    presented.ct_eq(&expected).into()
}
