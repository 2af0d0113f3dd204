//! End-to-end integration tests for the cfreg registry
//!
//! Exercises commit, reveal and presentation across the primitives, store,
//! registry and presentation crates.

#![forbid(unsafe_code)]
