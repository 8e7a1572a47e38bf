//! Authentication primitives.
//!
//! Tokens are issued by the identity service; this server only verifies
//! them. [`jwt::generate_access_token`] exists for tooling and tests that
//! need a token signed with the shared secret.

pub mod jwt;
