//! Cross-layer integration tests for Concuma
//!
//! Tests that verify correct interaction between multiple crates.

mod programs;
mod runtime;
mod stdlib;
