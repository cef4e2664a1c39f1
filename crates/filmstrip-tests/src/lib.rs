//! Integration test crate for Filmstrip.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every filmstrip library crate to verify they work together.

#[cfg(test)]
mod filmstrip;

#[cfg(test)]
mod manifest;
