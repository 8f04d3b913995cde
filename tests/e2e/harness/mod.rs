//! E2E test harness for fsguard.
//!
//! This module contains test infrastructure with helpers that not every
//! scenario uses.

#![allow(dead_code)]

pub mod assertions;
pub mod workspace;

// Re-export commonly used types
pub use assertions::FileAssertion;
pub use concurrency::{run_concurrently, timed};
pub use workspace::TestWorkspace;
