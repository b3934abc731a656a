//! Declaration Loading and Import Resolution
//!
//! This crate is the boundary to the header front end: it reads the declaration
//! descriptions produced for a header, resolves imports between them through the
//! include directories, collects diagnostics, and attaches calling-convention
//! metadata to function declarations before code generation.

pub mod conventions;
pub mod error;
pub mod file;
pub mod parser;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use conventions::ConventionRules;
pub use error::LoadError;
pub use file::{DeclarationFile, HeaderMetadata, Import};
pub use parser::{DeclarationParser, HeaderParser};
pub use resolver::ImportResolver;

// Re-export ffi_types for convenience
pub use ffi_types;
