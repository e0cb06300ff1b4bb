//! sourcegen — scaffold .NET binding sources from CLib headers.
//!
//! Inputs are existing C headers (`*.h`) and YAML header recipes
//! (`*_auto.yaml`). Every run writes, into the output directory:
//!
//! - `Interop.<library>.<header>.g.cs` per header
//! - `Interop.Handles.<header>.g.cs` per header that releases handles
//! - `Interop.Handles.g.cs` with the derived-handle hierarchy
//! - `<WrapperClass>.g.cs` per configured wrapper class
//!
//! Usage: `sourcegen -o out/ include/cantera/clib/ ctsol_auto.yaml`

mod classify;
mod config;
mod crosswalk;
mod error;
mod generate;
mod model;
mod parser;
mod render;
mod template;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "sourcegen",
    about = "Generate .NET binding sources from CLib headers and YAML recipes"
)]
struct Cli {
    /// Input files, directories or glob patterns
    #[arg(required = true)]
    files: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Generator configuration; the bundled C# configuration when omitted
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Skip headers that fail to parse instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// More output: -v for progress, -vv for classification details
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::bundled()?,
    };

    let input_files = expand_globs(&cli.files)?;
    if input_files.is_empty() {
        anyhow::bail!("no input files found");
    }
    info!("generating from {} input files", input_files.len());

    let units = parser::load_units(&input_files, &config, cli.keep_going)?;
    let artifacts = generate::generate(&units, &config)?;

    fs::create_dir_all(&cli.output).with_context(|| {
        format!("failed to create output directory: {}", cli.output.display())
    })?;
    for artifact in &artifacts {
        let out_path = cli.output.join(&artifact.file_name);
        info!("  writing {}", out_path.display());
        fs::write(&out_path, &artifact.contents)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// Expand glob patterns into a list of input files.
/// Directories are scanned (non-recursively) for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            files.extend(
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file() && is_supported(p)),
            );
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| parser::SUPPORTED_EXTENSIONS.contains(&ext))
}
