//! Integration tests for Layer 1: Language
//!
//! Tests for the program decoder, skip traversal, and the interpreter driven
//! by hand-assembled byte images.

mod asm;
mod decoder;
