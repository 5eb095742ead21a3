//! Domain models and types for Shroud.
//!
//! The domain layer provides:
//! - **Rules** ([`Rule`]) describing what to find and how to name its token
//! - **Error types** ([`ShroudError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, ShroudError>`]:
//!
//! ```rust
//! use shroud::domain::{Result, ShroudError};
//!
//! fn example() -> Result<()> {
//!     Err(ShroudError::Rules("rulesheet is not valid JSON".to_string()))
//! }
//! ```

pub mod context;
pub mod errors;
pub mod result;
pub mod rule;

pub use errors::ShroudError;
pub use result::Result;
pub use rule::{Rule, INDEX_PLACEHOLDER};
