//! HS256 token encoding and verification.
//!
//! [`JwtHandler`] is generic over the claims type; [`Claims`] is the default
//! payload with registered claims plus free-form custom fields.

pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
