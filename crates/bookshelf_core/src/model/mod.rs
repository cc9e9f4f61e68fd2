//! Domain model for bookshelf records.
//!
//! # Responsibility
//! - Define the canonical book record shared by store, renderer and storage.
//! - Own id generation and edit-input resolution rules.
//!
//! # Invariants
//! - Every book is identified by an epoch-millisecond `BookId`.
//! - Ids issued in one process are strictly increasing.

pub mod book;
