//! Discord interaction handlers
//!
//! Autocomplete providers plus the small helpers commands share for resolving
//! names and sending replies.

/// Autocomplete handlers for project names, client names and catalog codes
pub mod autocomplete;
/// Project and budget-version resolution
pub mod lookup;
/// Long replies and input parsing
pub mod reply;
