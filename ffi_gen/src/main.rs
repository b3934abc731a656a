use clap::Parser;
use ffi_gen::cmds;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "ffi-gen")]
#[command(about = "Generate Python ctypes bindings from a parsed C header", long_about = None)]
struct Cli {
    /* Declaration description produced for the header */
    #[arg(value_name = "HEADER")]
    header: PathBuf,

    /* Binding module to write */
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /* Enumeration module to write */
    #[arg(value_name = "OUTPUT_ENUM")]
    output_enum: PathBuf,

    /* Directory searched for imported descriptions */
    #[arg(value_name = "INCLUDE_DIR")]
    include_dir: Option<PathBuf>,

    /* Generator configuration file */
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "FFI_GEN_CONFIG")]
    config: Option<PathBuf>,

    /* Enable verbose output */
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    cmds::generate::run(cmds::generate::GenerateArgs {
        header: cli.header,
        output: cli.output,
        output_enum: cli.output_enum,
        include_dir: cli.include_dir,
        config: cli.config,
    })?;

    Ok(())
}
