//! Test utilities for Tollgate services.
//!
//! Provides the contract fixture loader and `DirectoryUser` builders.
//! Import from dev-dependencies only.

pub mod directory;
pub mod fixture;
