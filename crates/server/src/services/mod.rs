//! Business logic for the three core operations.
//!
//! Each service is a stateless function over the database pool. Business
//! outcomes (duplicate registration, uncovered region, expired trial, ...)
//! are returned as enum variants, never as errors: only infrastructure
//! failures surface as [`crate::db::RepositoryError`].

pub mod ingestion;
pub mod personalization;
pub mod registration;
