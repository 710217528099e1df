use rand::{rng, Rng};

/// Characters a short id may contain: A-Z, a-z, 0-9
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of every short id the service hands out
pub const DEFAULT_SHORT_ID_LENGTH: usize = 8;

/// Generates a random short id of exactly `length` characters.
///
/// Each character is drawn independently and uniformly from [`ALPHABET`].
/// Nothing here guarantees uniqueness: with 62^8 possible ids a collision is
/// left to the store to reject.
pub fn generate_short_id(length: usize) -> String {
    let mut rng = rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
