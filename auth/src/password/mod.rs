//! One-way password hashing with algorithm detection on verify.

pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::HashAlgorithm;
pub use hasher::PasswordHasher;
