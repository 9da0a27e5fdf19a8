//! Local web shell for interactive runs.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
