//! Credentials: Argon2id passwords, JWT access tokens, and opaque refresh tokens.

pub mod jwt;
pub mod password;
