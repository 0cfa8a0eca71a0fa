//! Service layer for the portfolio backend.
//! - `storage`: durable JSON documents on disk, one file per resource.
//! - `resources`: the closed set of public resources and their read/replace operations.
//! - `auth`: plaintext credential check against the `users` document.

pub mod errors;
pub mod storage;
pub mod resources;
pub mod auth;
