pub mod definitions;
pub mod enums;
pub mod functions;
pub mod helpers;
pub mod prelude;
pub mod types;

// Re-export main public functions
pub use definitions::{emit_structure_definitions, emit_type_definitions};
pub use enums::emit_enum_module;
pub use functions::{FunctionEmitter, emit_function_definitions};
pub use prelude::{emit_epilogue, emit_prelude};
pub use types::{ExactPosition, TypeRenderer, UNKNOWN_TYPE};
