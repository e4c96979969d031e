use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use thiserror::Error;

/// Error type for signing secret decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("Signing secret is empty")]
    Empty,

    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// HMAC key material decoded from configuration.
///
/// Accepts either a raw secret or a base64-encoded one. A value that decodes as
/// standard base64 to at least [`SigningSecret::MIN_LENGTH`] bytes is taken as
/// encoded; anything else is used verbatim as UTF-8 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// HS256 needs a 256-bit key.
    pub const MIN_LENGTH: usize = 32;

    /// Decode a configured secret, detecting base64 encoding.
    ///
    /// # Errors
    /// * `Empty` - Secret is blank
    /// * `TooShort` - Key material is shorter than 32 bytes
    pub fn decode(raw: &str) -> Result<Self, SecretError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SecretError::Empty);
        }

        let bytes = Self::decode_base64(trimmed).unwrap_or_else(|| trimmed.as_bytes().to_vec());

        if bytes.len() < Self::MIN_LENGTH {
            return Err(SecretError::TooShort {
                min: Self::MIN_LENGTH,
                actual: bytes.len(),
            });
        }

        Ok(Self(bytes))
    }

    fn decode_base64(value: &str) -> Option<Vec<u8>> {
        STANDARD
            .decode(value)
            .or_else(|_| STANDARD_NO_PAD.decode(value))
            .ok()
            .filter(|bytes| bytes.len() >= Self::MIN_LENGTH)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret([redacted; {} bytes])", self.0.len())
    }
}
