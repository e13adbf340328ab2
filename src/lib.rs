// lib.rs - Library exports for the CLI and integration tests

pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod deploy;
pub mod error;
pub mod frontend;
pub mod governance;
pub mod models;
pub mod scripts;
pub mod setup;

pub use error::{DeployError, Result};
