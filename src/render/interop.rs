//! Interop declarations: one file per input header.

use super::{Artifact, Emitter};
use crate::error::Result;
use crate::model::{BindingFunction, HeaderUnit};

pub(super) const FUNCTION: &str = "csharp-interop-func";
pub(super) const SCAFFOLD: &str = "csharp-scaffold-interop";

impl Emitter<'_> {
    pub fn interop(&self, unit: &HeaderUnit, funcs: &[BindingFunction]) -> Result<Artifact> {
        let header = unit.header_name();
        let mut rendered = Vec::with_capacity(funcs.len());
        for func in funcs {
            let declaration = func.declaration();
            let unsafe_marker = if func.is_unsafe() { "unsafe " } else { "" };
            rendered.push(self.templates.render(
                FUNCTION,
                &[("unsafe", unsafe_marker), ("declaration", declaration.as_str())],
            )?);
        }

        let functions = rendered.join("\n\n");
        let file_name = format!("Interop.{}.{}.g.cs", self.config.library, header);
        self.artifact(
            file_name,
            &header,
            SCAFFOLD,
            &[("cs_functions", functions.as_str())],
        )
    }
}
