use ffi_types::ParsedResult;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::conventions::ConventionRules;
use crate::error::LoadError;
use crate::resolver::ImportResolver;

/* Front end that turns a header into a declaration set */
pub trait HeaderParser {
    /* Parse the header at `header`. Only unreadable input is an `Err`; problems inside
     * the input are reported as diagnostics on the result. */
    fn parse(&self, header: &Path) -> Result<ParsedResult, LoadError>;
}

/* Reads the declaration description a header front end produced, following imports
 * through the include directories and annotating calling conventions */
pub struct DeclarationParser {
    include_dirs: Vec<PathBuf>,
    rules: ConventionRules,
}

impl DeclarationParser {
    pub fn new(include_dirs: Vec<PathBuf>, rules: ConventionRules) -> Self {
        Self { include_dirs, rules }
    }
}

impl HeaderParser for DeclarationParser {
    fn parse(&self, header: &Path) -> Result<ParsedResult, LoadError> {
        for dir in &self.include_dirs {
            debug!("include directory {}", dir.display());
        }

        let mut resolver = ImportResolver::new(self.include_dirs.clone());
        resolver.load_root(header)?;

        info!(
            "loaded {} file(s): {} type(s), {} variable(s), {} function(s)",
            resolver.loaded_file_count(),
            resolver.result().types.len(),
            resolver.result().variables.len(),
            resolver.result().functions.len()
        );

        let mut result = resolver.into_result();
        self.rules.annotate(&mut result);
        Ok(result)
    }
}
