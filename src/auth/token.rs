use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::{rngs::OsRng, RngCore};
use regex::Regex;

/// Verification links are honored for 24 hours from issuance.
pub const VERIFICATION_TOKEN_HOURS: i64 = 24;

/// Reset links are honored for 10 minutes from issuance.
pub const RESET_TOKEN_MINUTES: i64 = 10;

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{64}$").expect("token pattern is a valid regex"));

/// 32 random bytes from the OS RNG, hex-encoded: 256 bits of entropy.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Cheap shape check so obviously bogus link tokens are rejected before
/// a store round trip.
pub fn is_well_formed_token(token: &str) -> bool {
    TOKEN_REGEX.is_match(token)
}

pub fn verification_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(VERIFICATION_TOKEN_HOURS)
}

pub fn reset_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(RESET_TOKEN_MINUTES)
}
