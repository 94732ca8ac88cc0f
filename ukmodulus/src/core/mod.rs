//! Deterministic, pure logic for modulus checking.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! tables and return deterministic outputs suitable for tests.

pub mod check;
pub mod normalize;
pub mod selector;
pub mod tables;
pub mod types;
