//! Stable exit codes for the `ukmodulus` CLI.

/// Command succeeded, or the account passed its modulus check.
pub const OK: i32 = 0;
/// Configuration, table or I/O error.
pub const ERROR: i32 = 1;
/// `ukmodulus check` ran and the account failed its modulus check.
pub const CHECK_FAILED: i32 = 2;
/// Sort code or account number is malformed.
pub const INVALID_INPUT: i32 = 3;
