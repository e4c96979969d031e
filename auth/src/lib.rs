//! Authentication utilities library
//!
//! Provides the token and password primitives used by the auth service:
//! - Signing secret decoding (raw or base64 key material)
//! - JWT token generation and validation (HS256)
//! - Password hashing and verification (bcrypt, Argon2id)
//!
//! The service composes these into its own flows; nothing here knows about
//! users, directories or HTTP.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashAlgorithm, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashAlgorithm::Bcrypt);
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler, SigningSecret};
//!
//! let secret = SigningSecret::decode("secret_key_at_least_32_bytes_long!").unwrap();
//! let handler = JwtHandler::new(&secret).with_issuer("auth-service");
//! let claims = Claims::issued(chrono::Utc::now(), chrono::Duration::minutes(15))
//!     .unwrap()
//!     .with_subject("alice@example.com")
//!     .with_issuer("auth-service");
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.sub.as_deref(), Some("alice@example.com"));
//! ```

pub mod jwt;
pub mod password;
pub mod secret;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashAlgorithm;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::SecretError;
pub use secret::SigningSecret;
