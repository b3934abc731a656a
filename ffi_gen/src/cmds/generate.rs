/* Generate command - render the binding and enumeration modules for one header */

use super::common::report_diagnostics;
use crate::codegen::python::{PythonCodeGenerator, PythonCodeGeneratorOptions};
use crate::config::GeneratorConfig;
use anyhow::{Context, bail};
use ffi_loader::{DeclarationParser, HeaderParser};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct GenerateArgs {
  pub header: PathBuf,
  pub output: PathBuf,
  pub output_enum: PathBuf,
  pub include_dir: Option<PathBuf>,
  pub config: Option<PathBuf>,
}

/* Execute the generate command */
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
  let config = GeneratorConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
  if let Some(path) = &args.config {
    debug!("configuration loaded from {}", path.display());
  }

  let include_dirs: Vec<PathBuf> = args.include_dir.iter().cloned().collect();
  let parser = DeclarationParser::new(include_dirs, config.conventions.clone());

  info!("parsing {}", args.header.display());
  let result = parser
    .parse(&args.header)
    .with_context(|| format!("Unable to open {}", args.header.display()))?;

  report_diagnostics(&result, &args.header);
  if result.has_errors() {
    bail!(
      "{} error(s) while parsing {}",
      result.error_count(),
      args.header.display()
    );
  }

  let generator = PythonCodeGenerator::new(&result, PythonCodeGeneratorOptions::from(&config));
  let generated = generator.generate()?;

  generated
    .write(&args.output, &args.output_enum)
    .with_context(|| {
      format!(
        "Failed to write {} and {}",
        args.output.display(),
        args.output_enum.display()
      )
    })?;

  info!(
    "wrote {} and {}",
    args.output.display(),
    args.output_enum.display()
  );
  Ok(())
}
