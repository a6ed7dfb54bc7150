//! `roster` - browse and export record dumps from the HR dashboard.
//!
//! The binary reads a JSON dump of one of the dashboard's tables (candidates,
//! ranking results or the audit log) and runs it through the
//! [`roster_seeker`] pipeline: filter, sort, paginate, and either print a page
//! or export the whole filtered view as CSV.

pub mod cli;
pub mod commands;
pub mod config;
pub mod records;
pub mod render;
