//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate project store and media store calls into use-case APIs.
//! - Keep UI/CLI layers decoupled from storage details.

pub mod gallery_service;
