//! Domain model for gallery projects.
//!
//! # Responsibility
//! - Define the project record shared by store, façade and callers.
//! - Own title-to-slug normalization and input validation rules.
//!
//! # Invariants
//! - Every project is identified by a store-assigned `ProjectId`.
//! - Media folders are always stored as relative slugs, never absolute paths.

pub mod project;
