//! Sign-up username format.

use uuid::{Uuid, Variant, Version};

/// Username is not a well-formed RFC 4122 version 4 UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Username must be a valid UUID string")]
pub struct InvalidUsername;

/// Accept only RFC 4122 version 4 UUIDs (hyphenated, simple, braced or urn form).
pub fn validate_username(username: &str) -> Result<Uuid, InvalidUsername> {
    let uuid = Uuid::parse_str(username).map_err(|_| InvalidUsername)?;
    if uuid.get_variant() != Variant::RFC4122 || uuid.get_version() != Some(Version::Random) {
        return Err(InvalidUsername);
    }
    Ok(uuid)
}
