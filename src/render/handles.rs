//! Handle classes released by a header's destructors, and the derived-handle
//! hierarchy.

use super::{Artifact, Emitter};
use crate::error::Result;
use crate::model::{BindingFunction, HeaderUnit};

pub(super) const BASE_HANDLE: &str = "csharp-base-handle";
pub(super) const DERIVED_HANDLE: &str = "csharp-derived-handle";
pub(super) const SCAFFOLD: &str = "csharp-scaffold-handles";

/// Handle class → release function, in order of first appearance.
pub fn released_handles(funcs: &[BindingFunction]) -> Vec<(&str, &str)> {
    let mut handles: Vec<(&str, &str)> = Vec::new();
    for func in funcs {
        let Some(class) = func.release_handle.as_deref() else {
            continue;
        };
        match handles.iter_mut().find(|(c, _)| *c == class) {
            Some(entry) => entry.1 = func.name.as_str(),
            None => handles.push((class, func.name.as_str())),
        }
    }
    handles
}

impl Emitter<'_> {
    /// `None` when no function of the header releases a handle.
    pub fn handles(&self, unit: &HeaderUnit, funcs: &[BindingFunction]) -> Result<Option<Artifact>> {
        let handles = released_handles(funcs);
        if handles.is_empty() {
            return Ok(None);
        }

        let mut rendered = Vec::with_capacity(handles.len());
        for (class_name, release_func_name) in handles {
            rendered.push(self.templates.render(
                BASE_HANDLE,
                &[
                    ("class_name", class_name),
                    ("release_func_name", release_func_name),
                ],
            )?);
        }

        let header = unit.header_name();
        let handles_text = rendered.join("\n\n");
        let file_name = format!("Interop.Handles.{}.g.cs", header);
        self.artifact(
            file_name,
            &header,
            SCAFFOLD,
            &[("cs_handles", handles_text.as_str())],
        )
        .map(Some)
    }

    pub fn derived_handles(&self) -> Result<Artifact> {
        let mut rendered = Vec::new();
        for (derived_class_name, base_class_name) in self.config.derived_handles.iter() {
            rendered.push(self.templates.render(
                DERIVED_HANDLE,
                &[
                    ("derived_class_name", derived_class_name),
                    ("base_class_name", base_class_name.as_str()),
                ],
            )?);
        }

        let handles_text = rendered.join("\n\n");
        self.artifact(
            "Interop.Handles.g.cs".to_string(),
            "configuration",
            SCAFFOLD,
            &[("cs_handles", handles_text.as_str())],
        )
    }
}
