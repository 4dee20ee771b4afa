//! `lead-scout` library crate.
//!
//! The binary (`leads`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - record sources can be swapped (live listing, scripted test doubles)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod fit;
pub mod io;
pub mod models;
pub mod plot;
pub mod report;
