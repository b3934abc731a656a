//! Python binding generation
//!
//! Turns a declaration set into two Python modules: a ctypes binding module that
//! loads the native library and wraps every exported function, and an enumeration
//! module with one `enum.IntEnum` class per C enumeration.

pub mod cmds;
pub mod codegen;
pub mod config;
pub mod dependency;
pub mod error;

pub use codegen::python::{GeneratedBindings, PythonCodeGenerator, PythonCodeGeneratorOptions};
pub use config::{ConfigError, GeneratorConfig, LibraryConfig, PlatformLibrary};
pub use dependency::{EmissionStep, StructureResolver};
pub use error::GenError;
