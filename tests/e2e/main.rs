//! End-to-end tests driving fsguard_core from many threads.

mod harness;
