//! # Exit Codes
//!
//! Standard exit codes for the recast CLI, meaningful to scripts and
//! pre-commit hooks.

/// Clean run: no file rewritten, no violation reported.
pub const EXIT_CLEAN: i32 = 0;

/// Dirty run: at least one file was rewritten or one violation reported.
pub const EXIT_DIRTY: i32 = 1;

/// Configuration error (missing or invalid config, bad modifier setup).
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Runtime error (unreadable input, parse failure, write failure).
pub const EXIT_RUNTIME_ERROR: i32 = 3;
