//! Parser module — declaration parsing and input dispatch by file extension.

pub mod decl;
pub mod header;
pub mod snippet;
pub mod yaml;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::HeaderUnit;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as inputs.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["h", "yaml", "yml"];

enum Input {
    Cabinet(yaml::Cabinet),
    Header { path: PathBuf, text: String },
}

/// Load every input into header units, in input order.
///
/// All YAML cabinets are read and validated before any declaration is parsed.
/// With `keep_going`, a header that fails to parse is skipped with a warning.
pub fn load_units(paths: &[PathBuf], config: &Config, keep_going: bool) -> Result<Vec<HeaderUnit>> {
    let mut inputs = Vec::new();
    for path in paths {
        let name = file_name(path);
        if config.ignores_file(&name) {
            info!("  ignoring {}", name);
            continue;
        }
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        inputs.push(read_input(path, text, config)?);
    }

    let mut units = Vec::new();
    for input in inputs {
        let (path, parsed) = match input {
            Input::Cabinet(cabinet) => {
                let path = cabinet.path().to_path_buf();
                (path, cabinet.into_unit().map(Some))
            }
            Input::Header { path, text } => {
                let ignored = config.ignored_funcs(&file_name(&path));
                let parsed = header::parse(&path, &text, &config.export_marker, ignored);
                (path, parsed)
            }
        };
        match parsed {
            Ok(Some(unit)) => units.push(unit),
            Ok(None) => {}
            Err(e) if keep_going && e.is_parse() => {
                warn!("skipping {}: {}", path.display(), e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(units)
}

fn read_input(path: &Path, text: String, config: &Config) -> Result<Input> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => {
            let ignored = config.ignored_funcs(&file_name(path));
            Ok(Input::Cabinet(yaml::load(path, &text, ignored)?))
        }
        Some("h") => Ok(Input::Header {
            path: path.to_path_buf(),
            text,
        }),
        _ => Err(Error::config(
            path.display().to_string(),
            "unsupported file type",
        )),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
