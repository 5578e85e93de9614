//! Library parts of the `breath` command-line tool.

pub mod logging;
pub mod settings;
