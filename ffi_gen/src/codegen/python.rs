use crate::codegen::python_gen::{
    TypeRenderer, emit_enum_module, emit_epilogue, emit_function_definitions, emit_prelude,
    emit_structure_definitions, emit_type_definitions,
};
use crate::config::{GeneratorConfig, LibraryConfig};
use crate::dependency::StructureResolver;
use crate::error::GenError;
use ffi_types::ParsedResult;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub struct PythonCodeGenerator<'a> {
    model: &'a ParsedResult,
    options: PythonCodeGeneratorOptions,
    renderer: TypeRenderer,
}

#[derive(Debug, Clone)]
pub struct PythonCodeGeneratorOptions {
    pub library: LibraryConfig,
    /* Routine `free_string` and unannotated string results release through */
    pub string_free_routine: String,
}

impl Default for PythonCodeGeneratorOptions {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for PythonCodeGeneratorOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            library: config.library.clone(),
            string_free_routine: config.conventions.generic_free.clone(),
        }
    }
}

/// The two rendered artifacts, held in memory until both are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBindings {
    pub bindings: String,
    pub enums: String,
}

impl GeneratedBindings {
    pub fn write(&self, bindings_path: &Path, enums_path: &Path) -> std::io::Result<()> {
        fs::write(bindings_path, &self.bindings)?;
        fs::write(enums_path, &self.enums)?;
        Ok(())
    }
}

impl<'a> PythonCodeGenerator<'a> {
    pub fn new(model: &'a ParsedResult, options: PythonCodeGeneratorOptions) -> Self {
        let renderer = TypeRenderer::new(options.library.name_prefix.clone());
        Self {
            model,
            options,
            renderer,
        }
    }

    pub fn renderer(&self) -> &TypeRenderer {
        &self.renderer
    }

    /// Render both modules. Nothing is written; a failure leaves no partial output.
    pub fn generate(&self) -> Result<GeneratedBindings, GenError> {
        let steps = StructureResolver::new(self.model).resolve()?;
        debug!("resolved {} structure step(s)", steps.len());

        let mut bindings = emit_prelude(&self.options.library, &self.options.string_free_routine);
        bindings.push_str(&emit_type_definitions(self.model, &self.renderer));
        bindings.push_str(&emit_structure_definitions(&steps, self.model, &self.renderer)?);
        bindings.push_str(&emit_function_definitions(
            self.model,
            &self.renderer,
            &self.options.string_free_routine,
        ));
        bindings.push_str(&emit_epilogue(&self.options.library));

        let enums = emit_enum_module(self.model, &self.renderer);

        info!(
            "generated bindings for {} function(s) and {} type(s)",
            self.model.functions.len(),
            self.model.types.len()
        );

        Ok(GeneratedBindings { bindings, enums })
    }
}
