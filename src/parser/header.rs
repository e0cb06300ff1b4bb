//! Extraction of exported declarations from existing C header text.
//!
//! A declaration starts at the export marker and runs to the next `;`. A
//! documentation block directly in front of the marker is kept and parsed
//! together with the declaration. Preprocessor lines are blanked first, so a
//! marker defined or tested by `#define`/`#ifdef` never opens a declaration.

use crate::error::{Error, Result};
use crate::model::*;
use crate::parser::snippet;
use log::{debug, info};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_DECL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());

/// Parse header text; `None` when it exports nothing after filtering.
pub fn parse(
    path: &Path,
    text: &str,
    marker: &str,
    ignore_funcs: &[String],
) -> Result<Option<HeaderUnit>> {
    let re_export = Regex::new(&format!(r"(?s){}\b.*?;", regex::escape(marker)))
        .map_err(|e| Error::config("export_marker", e.to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    info!("  parsing {}", file_name);
    if !ignore_funcs.is_empty() {
        info!("    ignoring {:?}", ignore_funcs);
    }

    let text = blank_directives(text);
    let text = text.as_str();

    let mut funcs = Vec::new();
    let mut previous_end = 0;
    for m in re_export.find_iter(text) {
        let preceding = &text[previous_end..m.start()];
        previous_end = m.end();

        let decl = RE_WHITESPACE.replace_all(m.as_str(), " ");
        let decl = decl[marker.len()..].trim();

        if let Some(caps) = RE_DECL_NAME.captures(decl) {
            if ignore_funcs.iter().any(|f| f == &caps[1]) {
                debug!("    skipping ignored {}", &caps[1]);
                continue;
            }
        }

        let func = match doc_block(preceding) {
            Some(doc) => snippet::parse(&format!("{}\n{}", doc, decl))?,
            None => snippet::parse(decl)?,
        };
        funcs.push(func);
    }

    if funcs.is_empty() {
        debug!("    no exported functions in {}", file_name);
        return Ok(None);
    }
    Ok(Some(HeaderUnit::new(path, funcs)))
}

/// Replace preprocessor directives, including backslash-continued lines, by
/// empty lines; line numbering is kept.
fn blank_directives(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut continued = false;
    for line in text.split('\n') {
        let directive = continued || line.trim_start().starts_with('#');
        continued = directive && line.trim_end().ends_with('\\');
        if !directive {
            out.push_str(line);
        }
        out.push('\n');
    }
    out.pop();
    out
}

/// The `/* ... */` block that ends right before a declaration, if any.
fn doc_block(preceding: &str) -> Option<&str> {
    let trimmed = preceding.trim_end();
    if !trimmed.ends_with("*/") {
        return None;
    }
    let start = trimmed.rfind("/*")?;
    Some(&trimmed[start..])
}
