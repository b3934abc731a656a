//! FFI Type Definitions
//!
//! This crate contains the declaration model a header front end hands to the
//! binding generator: qualified names, type descriptors, function declarations
//! with their calling-convention metadata, and parse diagnostics. It is pure data,
//! without any file I/O or code generation logic.

pub mod decl;
pub mod name;
pub mod types;

// Re-export commonly used types at the crate root
pub use decl::*;
pub use name::*;
pub use types::*;
