use rand::{rngs::OsRng, RngCore};
use time::{Duration, OffsetDateTime};

/// Reset links sent by mail are valid for 15 minutes.
pub const RESET_TOKEN_TTL: Duration = Duration::minutes(15);

/// Opaque one-time token: 32 bytes from the OS CSPRNG, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn reset_token_expiry() -> OffsetDateTime {
    OffsetDateTime::now_utc() + RESET_TOKEN_TTL
}
