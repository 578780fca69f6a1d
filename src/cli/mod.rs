//! Command-line interface module.

pub mod apply;
mod args;
pub mod common;
pub mod url;

pub use args::{CanonicalArgs, Cli, Commands};
