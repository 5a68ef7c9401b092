//! Command implementations.
//!
//! - [`build`] - bake the bundler output into the final page
//! - [`check`] - configuration and input validation
//! - [`init`] - write an example config
//!
//! Each command provides an `execute` function taking its parsed arguments.

pub mod build;
pub mod check;
pub mod init;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use init::execute as init_execute;
