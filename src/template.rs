//! Named text templates with `${name}` substitution.
//!
//! Templates have no control flow. A multi-line value whose placeholder starts
//! a line is indented to the placeholder's column on every line.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Templates {
    texts: BTreeMap<String, String>,
}

impl Templates {
    pub fn new(texts: BTreeMap<String, String>) -> Self {
        Templates { texts }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.texts.contains_key(name)
    }

    /// Render the named template; trailing whitespace is trimmed.
    pub fn render(&self, name: &str, values: &[(&str, &str)]) -> Result<String> {
        let text = self
            .texts
            .get(name)
            .ok_or_else(|| Error::template(name, "not defined in configuration"))?;
        substitute(text, values)
            .map(|out| out.trim_end().to_string())
            .map_err(|reason| Error::template(name, reason))
    }
}

fn substitute(text: &str, values: &[(&str, &str)]) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            return Err("unterminated placeholder".to_string());
        };
        let key = &rest[start + 2..start + 2 + len];
        let value = values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .ok_or_else(|| format!("no value for `${{{}}}`", key))?;

        out.push_str(&rest[..start]);
        let line_start = out.rfind('\n').map_or(0, |i| i + 1);
        let indent = &out[line_start..];
        if !indent.is_empty() && indent.trim().is_empty() {
            let indent = indent.to_string();
            push_indented(&mut out, value, &indent);
        } else {
            out.push_str(value);
        }

        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Continuation lines get `indent`; empty lines stay empty.
fn push_indented(out: &mut String, value: &str, indent: &str) {
    for (i, line) in value.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
}
