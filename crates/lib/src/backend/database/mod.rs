//! Database-style backend implementations
//!
//! These backends hold root documents and implement the `DocumentStore`
//! contract over them.

mod in_memory;

pub use in_memory::InMemory;
