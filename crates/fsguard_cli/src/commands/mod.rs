//! CLI commands.

pub mod file;
pub mod init;
pub mod memory;
pub mod stress;
