//! Discord command implementations organized by area.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Budget editor, revisions and catalog search
pub mod budget;

/// AI consultant commands
pub mod consultant;

/// Realized costs and reference tables
pub mod cost;

/// General utility commands
pub mod general;

/// Projects and clients
pub mod project;

// Export commands
pub use budget::*;
pub use consultant::*;
pub use cost::*;
pub use general::*;
pub use project::*;
