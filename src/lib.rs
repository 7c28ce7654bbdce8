pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod gitlab;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod resolve;
pub mod source;

pub use error::{CiDiffError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_DIFFERENCES: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
