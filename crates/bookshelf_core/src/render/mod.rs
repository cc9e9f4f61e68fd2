//! Shelf rendering.
//!
//! # Responsibility
//! - Partition books into incomplete/complete card lists.
//! - Format a view as plain text for terminal callers.
//!
//! # Invariants
//! - Rendering is a full rebuild; no state is kept between renders.
//! - Card order follows the input iteration order.

pub mod view;
