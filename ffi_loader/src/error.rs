use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop loading before any declaration could be read.
///
/// Problems inside readable files are not errors here; they are collected as
/// diagnostics on the parse result.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unable to open {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
