//! ExhibitStore facade integration tests
//!
//! Tests are organized by concern: per-level CRUD, invalidation events,
//! failed writes, concurrent edits of one collection, and whole-exhibit
//! workflows.

mod failures;
mod nodes;
