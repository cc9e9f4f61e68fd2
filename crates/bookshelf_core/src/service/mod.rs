//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, renderer and search into shelf operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod shelf_service;
