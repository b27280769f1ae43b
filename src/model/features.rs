//! Hashed character n-gram features.
//!
//! A key's bytes are scanned with fixed window lengths (3, 5 and 7 by
//! default). Every window is hashed with 32-bit xxHash and the hash is
//! reinterpreted as a signed code, so the sign of the hash itself carries one
//! extra bit of information for the [`Perceptron`](super::Perceptron).
//!
//! ```text
//!   key = "user:42"              windows = [3, 5, 7]
//!
//!   w=3: "use" "ser" "er:" "r:4" ":42"     → 5 codes
//!   w=5: "user:" "ser:4" "er:42"           → 3 codes
//!   w=7: "user:42"                         → 1 code
//! ```
//!
//! Keys shorter than the smallest window produce no features; the model then
//! scores them as `0.0`.

use std::hash::Hasher;

use twox_hash::XxHash32;

/// Window lengths used when none are configured.
pub const DEFAULT_WINDOWS: [usize; 3] = [3, 5, 7];

/// Hashes one byte window to a signed feature code.
#[inline]
pub fn hash_window(bytes: &[u8]) -> i32 {
    let mut hasher = XxHash32::with_seed(0);
    hasher.write(bytes);
    hasher.finish() as u32 as i32
}

/// Appends the feature codes of `key` for every window length to `out`.
///
/// `out` is cleared first so callers can reuse one buffer across lookups.
pub fn extract_into(key: &[u8], windows: &[usize], out: &mut Vec<i32>) {
    out.clear();
    for &width in windows {
        if width == 0 || width > key.len() {
            continue;
        }
        out.extend(key.windows(width).map(hash_window));
    }
}

/// Returns the feature codes of `key` for the default windows.
pub fn extract(key: &[u8]) -> Vec<i32> {
    let mut out = Vec::new();
    extract_into(key, &DEFAULT_WINDOWS, &mut out);
    out
}

/// Number of features `extract_into` yields for a key of `len` bytes.
pub fn feature_count(len: usize, windows: &[usize]) -> usize {
    windows
        .iter()
        .filter(|&&w| w > 0 && w <= len)
        .map(|&w| len - w + 1)
        .sum()
}
