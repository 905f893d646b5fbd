//! taskpad library
//!
//! Exports the core components for the binary and for integration tests.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod server;
pub mod types;
pub mod validation;
pub mod views;
