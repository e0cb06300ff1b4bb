//! Emitter — renders classified functions into binding source files.
//!
//! Per header: interop declarations and, when the header releases handles,
//! handle classes. Across all headers: the derived-handle hierarchy and one
//! wrapper class per configured area.

mod handles;
mod interop;
mod wrapper;

use crate::config::Config;
use crate::crosswalk::Crosswalk;
use crate::error::{Error, Result};
use crate::template::Templates;

const PREAMBLE: &str = "csharp-preamble";

/// Every template a run may render.
const REQUIRED_TEMPLATES: &[&str] = &[
    PREAMBLE,
    interop::FUNCTION,
    interop::SCAFFOLD,
    handles::BASE_HANDLE,
    handles::DERIVED_HANDLE,
    handles::SCAFFOLD,
    wrapper::PROPERTY_SCALAR,
    "csharp-property-int-double-readonly",
    wrapper::PROPERTY_STRING,
    "csharp-property-string-readonly",
    wrapper::SCAFFOLD,
];

/// A generated file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

pub struct Emitter<'a> {
    config: &'a Config,
    crosswalk: &'a Crosswalk,
    templates: &'a Templates,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a Config, crosswalk: &'a Crosswalk, templates: &'a Templates) -> Self {
        Emitter {
            config,
            crosswalk,
            templates,
        }
    }

    /// Fail before rendering anything when the configuration lacks a template.
    pub fn check_templates(&self) -> Result<()> {
        match REQUIRED_TEMPLATES.iter().find(|name| !self.templates.contains(name)) {
            Some(name) => Err(Error::template(*name, "not defined in configuration")),
            None => Ok(()),
        }
    }

    fn preamble(&self, file_name: &str, source: &str) -> Result<String> {
        self.templates
            .render(PREAMBLE, &[("file_name", file_name), ("source", source)])
    }

    /// Render the outer template of a file, with the preamble filled in.
    fn artifact(
        &self,
        file_name: String,
        source: &str,
        template: &str,
        values: &[(&str, &str)],
    ) -> Result<Artifact> {
        let preamble = self.preamble(&file_name, source)?;
        let mut all = vec![("preamble", preamble.as_str())];
        all.extend_from_slice(values);
        let mut contents = self.templates.render(template, &all)?;
        contents.push('\n');
        Ok(Artifact {
            file_name,
            contents,
        })
    }
}
