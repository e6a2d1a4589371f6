//! State parameter generation.
//!
//! The state parameter is the anti-forgery value round-tripped between the
//! state cookie and the `state` query parameter Clef echoes back. Its only
//! security property is that nobody can guess it.

use crate::constants::DEFAULT_STATE_SIZE;
use crate::error::{AuthError, Result};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Generate a state parameter of `size` random bytes, base64 encoded.
///
/// `None` and `Some(0)` both fall back to 24 bytes. Bytes come from the
/// operating system's CSPRNG.
///
/// # Errors
///
/// Returns [`AuthError::RandomSource`] if the operating system cannot
/// provide random bytes.
///
/// # Examples
///
/// ```
/// use base64::Engine;
/// use clef_auth::utils::generate_state_parameter;
///
/// let state = generate_state_parameter(None).unwrap();
/// let bytes = base64::engine::general_purpose::STANDARD.decode(&state).unwrap();
/// assert_eq!(bytes.len(), 24);
/// ```
pub fn generate_state_parameter(size: Option<usize>) -> Result<String> {
    let size = match size {
        Some(size) if size > 0 => size,
        _ => DEFAULT_STATE_SIZE,
    };

    let mut bytes = vec![0u8; size];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::RandomSource(e.to_string()))?;

    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
