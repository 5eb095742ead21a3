//! Audit logging
//!
//! One entry per anonymization call. Literals are recorded only as SHA-256
//! hashes next to the token that replaced them.

pub mod logger;

pub use logger::{hash_literal, AuditLogger};
