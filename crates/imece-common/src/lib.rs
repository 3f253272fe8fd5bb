//! Imece Common Library
//!
//! Shared foundation for the imece workspace members.
//!
//! # Overview
//!
//! - **Error Handling**: the workspace-level error type and result alias
//! - **Logging**: tracing subscriber configuration and initialization
//! - **Checksums**: sha-256 fingerprints used to identify uploaded files in
//!   audit logs
//!
//! # Example
//!
//! ```no_run
//! use imece_common::{Result, checksum};
//!
//! fn fingerprint(path: &str) -> Result<()> {
//!     let digest = checksum::sha256_file(path)?;
//!     tracing::info!(%digest, "source file fingerprint");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{ImeceError, Result};
