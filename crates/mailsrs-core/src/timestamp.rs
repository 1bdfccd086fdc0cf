//! SRS0 timestamp codec
//!
//! A timestamp is the number of whole days since the Unix epoch, truncated
//! to 10 bits and written as two base32 characters, most significant first.
//! The clock wraps every 1024 days, so only relative age can be recovered.
//!
//! Known limitation: an address older than one full period (about 2.8
//! years) decodes as if it were recent again. Rejecting those would change
//! the wire format shared with existing deployments, so it is left as is.

use chrono::{DateTime, Utc};

/// Base32 alphabet shared with libsrs2
pub const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Number of characters in an encoded timestamp
pub const TIMESTAMP_LEN: usize = 2;

const BASE_BITS: u32 = 5;
const BASE_MASK: u32 = (1 << BASE_BITS) - 1;
const PRECISION_SECS: i64 = 60 * 60 * 24;

/// Number of distinct day values before the clock wraps
pub const TIMESTAMP_SLOTS: u32 = 1 << (BASE_BITS * TIMESTAMP_LEN as u32);

/// Day number of `now`, reduced modulo [`TIMESTAMP_SLOTS`]
pub fn day_slot(now: DateTime<Utc>) -> u32 {
    let days = now.timestamp().div_euclid(PRECISION_SECS);
    days.rem_euclid(i64::from(TIMESTAMP_SLOTS)) as u32
}

/// Encode the day containing `now`
pub fn encode(now: DateTime<Utc>) -> String {
    let slot = day_slot(now);
    let high = BASE32_ALPHABET[((slot >> BASE_BITS) & BASE_MASK) as usize];
    let low = BASE32_ALPHABET[(slot & BASE_MASK) as usize];
    [high as char, low as char].iter().collect()
}

/// Position of `c` in the alphabet, ignoring case
pub fn base32_value(c: u8) -> Option<u32> {
    let upper = c.to_ascii_uppercase();
    BASE32_ALPHABET
        .iter()
        .position(|&a| a == upper)
        .map(|p| p as u32)
}

/// Decode a timestamp token back into its day slot
pub fn decode(token: &str) -> Option<u32> {
    let bytes = token.as_bytes();
    if bytes.len() != TIMESTAMP_LEN {
        return None;
    }
    bytes
        .iter()
        .try_fold(0u32, |acc, &c| Some((acc << BASE_BITS) | base32_value(c)?))
}

/// Whether `token` lies no more than `max_age` days before `now`
///
/// Undecodable tokens are never valid.
pub fn is_within(token: &str, max_age: u32, now: DateTime<Utc>) -> bool {
    let Some(then) = decode(token) else {
        return false;
    };

    let mut today = day_slot(now);
    if today < then {
        today += TIMESTAMP_SLOTS;
    }

    u64::from(today) <= u64::from(then) + u64::from(max_age)
}
