//! Repository Layer
//!
//! Backend implementations of [`crate::commands::CategoryBackend`].

mod memory;

pub use memory::MemoryCategoryRepository;
