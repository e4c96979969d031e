use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use serde::Deserialize;

use super::errors::PasswordError;

/// One-way hash used for newly stored passwords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// `$2b$` modular crypt format, the format existing directory records use.
    #[default]
    Bcrypt,
    /// Argon2id PHC string.
    Argon2,
}

/// Password hashing implementation.
///
/// Hashes with the configured algorithm but verifies any supported format, so
/// records keep working after the default algorithm changes.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    algorithm: HashAlgorithm,
}

impl PasswordHasher {
    /// Matches the work factor of the hashes already held by the directory.
    pub const BCRYPT_COST: u32 = 10;

    /// Create a new password hasher instance.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash a plaintext password securely.
    ///
    /// A random salt is generated for every call.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Self-describing hash string (algorithm, parameters, salt and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        match self.algorithm {
            HashAlgorithm::Bcrypt => bcrypt::hash(password, Self::BCRYPT_COST)
                .map_err(|e| PasswordError::HashingFailed(e.to_string())),
            HashAlgorithm::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);

                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::HashingFailed(e.to_string()))
            }
        }
    }

    /// Verify a password against a stored hash.
    ///
    /// The algorithm is detected from the hash itself. A leading `{bcrypt}` or
    /// `{argon2}` encoder id is accepted and ignored.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `CorruptHash` - Hash has a known prefix but cannot be parsed
    /// * `UnrecognizedHash` - Hash is in no supported format
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let hash = strip_encoder_id(hash);

        if is_bcrypt(hash) {
            bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::CorruptHash(format!("bcrypt: {}", e)))
        } else if hash.starts_with("$argon2") {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|e| PasswordError::CorruptHash(format!("argon2: {}", e)))?;

            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok())
        } else {
            Err(PasswordError::UnrecognizedHash)
        }
    }
}

fn strip_encoder_id(hash: &str) -> &str {
    ["{bcrypt}", "{argon2}"]
        .iter()
        .find_map(|id| hash.strip_prefix(id))
        .unwrap_or(hash)
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}
