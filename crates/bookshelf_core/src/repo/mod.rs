//! Repository layer over the local key/value storage.
//!
//! # Responsibility
//! - Define the whole-shelf persistence contract.
//! - Isolate the JSON wire format from the store service.
//!
//! # Invariants
//! - Loaded records are returned in stored order.

pub mod book_repo;
