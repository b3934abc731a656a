/* Diagnostic reporting shared by the generate command */

use colored::*;
use ffi_types::{Diagnostic, ParsedResult, Severity};
use std::path::Path;

/* One `\tSeverity: file:line:col - message` line with a colored severity */
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
  let severity = match diagnostic.severity {
    Severity::Error => "Error".red(),
    Severity::Warning => "Warning".yellow(),
  };
  format!(
    "\t{}: {}:{}:{} - {}",
    severity, diagnostic.file, diagnostic.line, diagnostic.column, diagnostic.message
  )
}

/* Print every diagnostic to stderr; a failed parse gets a header line first */
pub fn report_diagnostics(result: &ParsedResult, header: &Path) {
  if result.has_errors() {
    eprintln!(
      "{}",
      format!(
        "Failed to parse {} while generating python bindings!",
        header.display()
      )
      .red()
    );
  }

  for diagnostic in &result.diagnostics {
    eprintln!("{}", format_diagnostic(diagnostic));
  }
}
