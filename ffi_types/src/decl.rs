use crate::name::QualifiedName;
use crate::types::TypeDescriptor;
use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// A named type declaration.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct TypeDecl {
    pub name: QualifiedName,
    #[serde(rename = "type", with = "serde_yaml::with::singleton_map_recursive")]
    pub ty: TypeDescriptor,
}

/// Variadic logging entry points get pass-through wrappers instead of typed ones.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingConvention {
    /// Every argument is a message fragment.
    Plain,
    /// The first fixed argument (the level) is forwarded unconverted.
    Leveled,
}

/// Calling-convention metadata attached to a function by the parsing stage.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionConventions {
    /// Releases a natively allocated string; arguments are passed through untouched.
    /// Unset means "not annotated", so an explicit `false` survives merging.
    #[serde(default)]
    pub string_free: Option<bool>,
    /// Allocates a buffer for a callback to hand back; returns a raw opaque pointer.
    #[serde(default)]
    pub allocator: Option<bool>,
    /// Routine that releases a string returned by this function.
    #[serde(default)]
    pub release_with: Option<String>,
    #[serde(default)]
    pub logging: Option<LoggingConvention>,
}

impl FunctionConventions {
    /// Union of two annotation sets; `self` wins where both name a value.
    pub fn merged(&self, other: &FunctionConventions) -> FunctionConventions {
        FunctionConventions {
            string_free: self.string_free.or(other.string_free),
            allocator: self.allocator.or(other.allocator),
            release_with: self.release_with.clone().or_else(|| other.release_with.clone()),
            logging: self.logging.or(other.logging),
        }
    }

    pub fn is_string_free(&self) -> bool {
        self.string_free.unwrap_or(false)
    }

    pub fn is_allocator(&self) -> bool {
        self.allocator.unwrap_or(false)
    }
}

/// A function declaration together with its convention metadata.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionDecl {
    pub name: QualifiedName,
    #[serde(rename = "type", with = "serde_yaml::with::singleton_map_recursive")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub conventions: FunctionConventions,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// A problem reported while producing the declaration set.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub column: u64,
    pub message: String,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, line: u64, column: u64, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn warning(file: impl Into<String>, line: u64, column: u64, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}:{}:{} - {}",
            self.severity, self.file, self.line, self.column, self.message
        )
    }
}

/// Everything the header front end produced for one header, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ParsedResult {
    pub types: IndexMap<QualifiedName, TypeDescriptor>,
    pub variables: IndexMap<QualifiedName, TypeDescriptor>,
    pub functions: IndexMap<QualifiedName, FunctionDecl>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, name: impl Into<QualifiedName>, ty: TypeDescriptor) {
        self.types.insert(name.into(), ty);
    }

    pub fn add_function(&mut self, name: impl Into<QualifiedName>, ty: TypeDescriptor) {
        let name = name.into();
        self.functions.insert(
            name.clone(),
            FunctionDecl {
                name,
                ty,
                conventions: FunctionConventions::default(),
            },
        );
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn get_type(&self, name: &QualifiedName) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
