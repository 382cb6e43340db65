//! Persistence layer for the reporting backend.
//!
//! This crate contains:
//! - Database connection management and schema migrations
//! - Entity definitions (database row mappings)
//! - The PostgreSQL user report fetcher

pub mod db;
pub mod entities;
pub mod repositories;
