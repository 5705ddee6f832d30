#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod verifier;

pub use error::AuthError;
pub use verifier::IdentityVerifier;
