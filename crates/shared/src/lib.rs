//! Shared utilities and common types for the reporting backend.
//!
//! This crate provides functionality used across the other crates:
//! - Identifier format validation

pub mod validation;
