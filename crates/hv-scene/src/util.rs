//! Small random helpers shared by the scene and its hosts.

use rand::Rng;

/// Engine version reported in the startup banner.
pub const ENGINE_VERSION: &str = "1.0.0";

/// Default length of ids produced by [`make_id`].
pub const DEFAULT_ID_LEN: usize = 6;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random integer in `min..=max`. The bounds may be given in either order.
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Random alphanumeric identifier of `len` characters.
pub fn make_id<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
