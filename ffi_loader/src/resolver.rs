use ffi_types::{Diagnostic, FunctionDecl, ParsedResult, QualifiedName, TypeDecl, TypeDescriptor};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::LoadError;
use crate::file::DeclarationFile;

/* Import resolver for loading and merging declaration files */
pub struct ImportResolver {
    /* Track loaded files to detect circular imports */
    loaded_files: HashSet<PathBuf>,

    /* Include directories for searching imports */
    include_dirs: Vec<PathBuf>,

    /* Merged declarations and diagnostics */
    result: ParsedResult,

    /* File each declaration was first seen in, for conflict reports */
    type_origins: HashMap<QualifiedName, String>,
    function_origins: HashMap<QualifiedName, String>,
}

impl ImportResolver {
    /* Create a new import resolver with the given include directories */
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self {
            loaded_files: HashSet::new(),
            include_dirs,
            result: ParsedResult::new(),
            type_origins: HashMap::new(),
            function_origins: HashMap::new(),
        }
    }

    /* Resolve an import path relative to a base file or include directories */
    fn resolve_import_path(&self, import_path: &str, base_file: &Path) -> Option<PathBuf> {
        /* First try relative to the base file's directory */
        if let Some(parent) = base_file.parent() {
            let relative_path = parent.join(import_path);
            if relative_path.exists() {
                return Some(relative_path);
            }
        }

        /* Then try each include directory */
        self.include_dirs
            .iter()
            .map(|dir| dir.join(import_path))
            .find(|path| path.exists())
    }

    /* Load the root declaration file and, recursively, everything it imports.
     * Only an unreadable root file is an error; everything else becomes a diagnostic. */
    pub fn load_root(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let contents = std::fs::read_to_string(file_path).map_err(|source| LoadError::Unreadable {
            path: file_path.to_path_buf(),
            source,
        })?;
        self.load_contents(file_path, &contents);
        Ok(())
    }

    fn load_import(&mut self, file_path: &Path, importer: &str) {
        match std::fs::read_to_string(file_path) {
            Ok(contents) => self.load_contents(file_path, &contents),
            Err(err) => self.result.add_diagnostic(Diagnostic::error(
                importer,
                0,
                0,
                format!("unable to read import {}: {}", file_path.display(), err),
            )),
        }
    }

    fn load_contents(&mut self, file_path: &Path, contents: &str) {
        /* Canonicalize the path to detect duplicates */
        let canonical_path = file_path
            .canonicalize()
            .unwrap_or_else(|_| file_path.to_path_buf());

        /* Skip if already loaded */
        if !self.loaded_files.insert(canonical_path) {
            debug!("skipping already loaded file {}", file_path.display());
            return;
        }

        let label = file_path.display().to_string();
        debug!("loading declaration file {}", label);

        let file = match DeclarationFile::from_yaml(contents) {
            Ok(file) => file,
            Err(err) => {
                let (line, column) = err
                    .location()
                    .map(|loc| (loc.line() as u64, loc.column() as u64))
                    .unwrap_or((0, 0));
                self.result
                    .add_diagnostic(Diagnostic::error(label, line, column, err.to_string()));
                return;
            }
        };

        /* Imports come first so their declarations precede ours */
        for import in file.imports() {
            match self.resolve_import_path(&import.path, file_path) {
                Some(import_path) => {
                    debug!("resolved import {} -> {}", import.path, import_path.display());
                    self.load_import(&import_path, &label);
                }
                None => self.result.add_diagnostic(Diagnostic::error(
                    label.clone(),
                    0,
                    0,
                    format!(
                        "import '{}' not found relative to '{}' or in include directories",
                        import.path, label
                    ),
                )),
            }
        }

        debug!(
            "{} declares {} item(s) for header {}",
            label,
            file.declaration_count(),
            file.header_name(&label)
        );

        let DeclarationFile {
            types,
            variables,
            functions,
            diagnostics,
            ..
        } = file;

        for TypeDecl { name, ty } in types {
            let conflict = insert_unique(&mut self.result.types, &mut self.type_origins, name.clone(), ty, &label);
            self.report_conflict(conflict, "type", &name, &label);
        }

        for TypeDecl { name, ty } in variables {
            merge_variable(&mut self.result.variables, name, ty);
        }

        for decl in functions {
            let name = decl.name.clone();
            let conflict = insert_unique_function(&mut self.result.functions, &mut self.function_origins, decl, &label);
            self.report_conflict(conflict, "function", &name, &label);
        }

        for diagnostic in diagnostics {
            self.result.add_diagnostic(diagnostic);
        }
    }

    fn report_conflict(&mut self, first_seen: Option<String>, what: &str, name: &QualifiedName, label: &str) {
        if let Some(origin) = first_seen {
            self.result.add_diagnostic(Diagnostic::error(
                label,
                0,
                0,
                format!("conflicting definition of {} '{}' (first defined in {})", what, name, origin),
            ));
        }
    }

    /* Get the number of loaded files */
    pub fn loaded_file_count(&self) -> usize {
        self.loaded_files.len()
    }

    pub fn result(&self) -> &ParsedResult {
        &self.result
    }

    pub fn into_result(self) -> ParsedResult {
        self.result
    }
}

/* Insert a type unless a different definition already exists; returns the first origin on conflict */
fn insert_unique(
    map: &mut IndexMap<QualifiedName, TypeDescriptor>,
    origins: &mut HashMap<QualifiedName, String>,
    name: QualifiedName,
    ty: TypeDescriptor,
    label: &str,
) -> Option<String> {
    match map.get(&name) {
        Some(existing) if *existing == ty => None,
        Some(_) => Some(origins.get(&name).cloned().unwrap_or_default()),
        None => {
            origins.insert(name.clone(), label.to_string());
            map.insert(name, ty);
            None
        }
    }
}

fn insert_unique_function(
    map: &mut IndexMap<QualifiedName, FunctionDecl>,
    origins: &mut HashMap<QualifiedName, String>,
    decl: FunctionDecl,
    label: &str,
) -> Option<String> {
    let key = decl.name.clone();
    match map.get(&key) {
        Some(existing) if existing.ty == decl.ty => None,
        Some(_) => Some(origins.get(&key).cloned().unwrap_or_default()),
        None => {
            origins.insert(key.clone(), label.to_string());
            map.insert(key, decl);
            None
        }
    }
}

/* Variables never reach the generated bindings; the first declaration wins */
fn merge_variable(map: &mut IndexMap<QualifiedName, TypeDescriptor>, name: QualifiedName, ty: TypeDescriptor) {
    map.entry(name).or_insert(ty);
}
