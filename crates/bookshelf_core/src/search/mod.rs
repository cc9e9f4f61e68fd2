//! Title search.
//!
//! # Responsibility
//! - Filter books by case-insensitive title substring.
//!
//! # Invariants
//! - Search never mutates the shelf.

pub mod title;
