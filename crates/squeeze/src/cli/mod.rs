//! Command implementations.

pub mod compress;
pub mod config;
pub mod run;
