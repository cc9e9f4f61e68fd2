//! Flutter-facing FFI surface for the bookshelf core.

pub mod api;
