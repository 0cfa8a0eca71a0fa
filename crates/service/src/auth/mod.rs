//! Auth module: domain types and the credential check service.
//!
//! Credentials are stored and compared in plaintext. This mirrors the
//! existing `users.json` format; there is no hashing and no session issuance.

pub mod domain;
pub mod service;

pub use service::CredentialService;
