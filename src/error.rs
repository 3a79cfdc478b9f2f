//! Error types for TideKV
//!
//! Provides a unified error type for all operations.
//!
//! "Key not found" and "key deleted" are deliberately absent: both are
//! ordinary results (`Ok(None)` from [`crate::Store::get`]), not failures.

use thiserror::Error;

/// Result type alias using TideError
pub type Result<T> = std::result::Result<T, TideError>;

/// Unified error type for TideKV operations
#[derive(Debug, Error)]
pub enum TideError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    /// A key or value does not fit in the 32-bit length field of the header
    #[error("Record too large: {field} is {len} bytes (max {max})", max = u32::MAX)]
    RecordTooLarge { field: &'static str, len: usize },

    /// A record buffer did not match the lengths its header declares
    #[error("Record corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
