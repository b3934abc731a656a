use ffi_types::{Diagnostic, FunctionDecl, TypeDecl};
use serde_derive::{Deserialize, Serialize};

/* ============================================================================
   Declaration File
   ============================================================================ */

/* Another description file whose declarations precede this file's */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Import {
    /* Path relative to the importing file or to one of the include directories */
    pub path: String,
}

/* Metadata describing where a declaration set came from */
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderMetadata {
    /* Header the front end parsed (e.g., "core.h") */
    #[serde(default)]
    pub name: String,

    /* Optional human-readable description */
    #[serde(default)]
    pub description: Option<String>,
}

/* Declarations the header front end extracted from one header */
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct DeclarationFile {
    #[serde(default)]
    pub header: HeaderMetadata,

    #[serde(default)]
    pub imports: Vec<Import>,

    #[serde(default)]
    pub types: Vec<TypeDecl>,

    #[serde(default)]
    pub variables: Vec<TypeDecl>,

    #[serde(default)]
    pub functions: Vec<FunctionDecl>,

    /* Problems the front end reported while parsing the header */
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl DeclarationFile {
    /* Parse a declaration file from YAML text */
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /* Name of the header, falling back to the given label when unset */
    pub fn header_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.header.name.is_empty() {
            fallback
        } else {
            &self.header.name
        }
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn declaration_count(&self) -> usize {
        self.types.len() + self.variables.len() + self.functions.len()
    }
}
