//! Validation helpers for DTOs.

use validator::ValidationError;

/// Upper bound on a nick, in bytes.
pub const MAX_NICK_BYTES: usize = 32;

/// Validates that a nick is 1-32 bytes and carries no control characters.
///
/// Nicks are case-sensitive and compared byte-for-byte everywhere, so no
/// normalization happens here.
pub fn validate_nick(nick: &str) -> Result<(), ValidationError> {
    if nick.is_empty() {
        let mut err = ValidationError::new("nick_empty");
        err.message = Some("nick must not be empty".into());
        return Err(err);
    }

    if nick.len() > MAX_NICK_BYTES {
        let mut err = ValidationError::new("nick_length");
        err.message = Some(
            format!(
                "nick must be at most {MAX_NICK_BYTES} bytes (got {})",
                nick.len()
            )
            .into(),
        );
        return Err(err);
    }

    if nick.chars().any(char::is_control) {
        let mut err = ValidationError::new("nick_format");
        err.message = Some("nick must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
