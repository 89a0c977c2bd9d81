//! Domain types shared across Tollgate services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; adapters convert into these at the edge.

pub mod directory;
pub mod pagination;
pub mod username;
