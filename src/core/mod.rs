//! Core business logic, independent of Discord.
//!
//! Every function takes the store connection explicitly and returns
//! [`crate::errors::Result`].

/// Budget totals, version lineage and revisions
pub mod budget;
/// Reference composition catalog
pub mod catalog;
/// Client records
pub mod client;
/// Consultant facade and conversations
pub mod consultant;
/// Realized costs and budgeted vs. actual
pub mod cost;
/// Budget line items
pub mod item;
/// Projects and their initial budget
pub mod project;
/// Reference table import
pub mod reference;
/// Dashboards and text rendering
pub mod report;
/// Store seeding
pub mod seed;
