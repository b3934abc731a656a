//! Calling-convention rules.
//!
//! A handful of native entry points need wrappers that differ from the general
//! policy: the string release routines, the string allocator used by callbacks,
//! the runtime-owned string family and the variadic logging family. The rules
//! below are configuration data; `annotate` turns them into metadata on each
//! function declaration so code generation never inspects symbol names.

use ffi_types::{FunctionConventions, FunctionDecl, LoggingConvention, ParsedResult};
use serde_derive::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConventionRules {
    /// Functions that release a natively allocated string.
    pub string_free: Vec<String>,
    /// Functions that allocate a string on behalf of a callback.
    pub allocators: Vec<String>,
    /// Symbols with this prefix hand out strings owned by the secondary runtime.
    pub runtime_prefix: String,
    /// Release routine for strings returned by runtime-prefixed symbols.
    pub runtime_free: String,
    /// Release routine for every other returned string.
    pub generic_free: String,
    /// Variadic functions with this prefix form the logging family.
    pub logging_prefix: String,
    /// Logging functions whose first fixed argument is a level, not a message.
    pub leveled_logging: Vec<String>,
}

impl Default for ConventionRules {
    fn default() -> Self {
        Self {
            string_free: vec!["BNFreeString".to_string(), "BNRustFreeString".to_string()],
            allocators: vec!["BNAllocString".to_string()],
            runtime_prefix: "BNRust".to_string(),
            runtime_free: "BNRustFreeString".to_string(),
            generic_free: "BNFreeString".to_string(),
            logging_prefix: "BNLog".to_string(),
            leveled_logging: vec!["BNLog".to_string()],
        }
    }
}

impl ConventionRules {
    /// Conventions implied by the rules for one function.
    pub fn conventions_for(&self, decl: &FunctionDecl) -> FunctionConventions {
        let Some(name) = decl.name.single() else {
            return FunctionConventions::default();
        };

        let is_listed = |list: &[String]| list.iter().any(|entry| entry == name);

        let release_with = if !self.runtime_prefix.is_empty() && name.starts_with(&self.runtime_prefix) {
            self.runtime_free.clone()
        } else {
            self.generic_free.clone()
        };

        let variadic = decl.ty.callable().map(|f| f.variadic).unwrap_or(false);
        let logging = if variadic && !self.logging_prefix.is_empty() && name.starts_with(&self.logging_prefix) {
            if is_listed(&self.leveled_logging) {
                Some(LoggingConvention::Leveled)
            } else {
                Some(LoggingConvention::Plain)
            }
        } else {
            None
        };

        FunctionConventions {
            string_free: is_listed(&self.string_free).then_some(true),
            allocator: is_listed(&self.allocators).then_some(true),
            release_with: Some(release_with),
            logging,
        }
    }

    /// Attach convention metadata to every function. Annotations already present
    /// in the declarations take precedence over the derived ones.
    pub fn annotate(&self, result: &mut ParsedResult) {
        for decl in result.functions.values_mut() {
            let derived = self.conventions_for(decl);
            decl.conventions = decl.conventions.merged(&derived);
            let conventions = &decl.conventions;
            if conventions.is_string_free() || conventions.is_allocator() || conventions.logging.is_some() {
                debug!("{} carries convention {:?}", decl.name, decl.conventions);
            }
        }
    }
}
