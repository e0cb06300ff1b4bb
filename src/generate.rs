//! One generation run: classify every header, emit per-header files, then the
//! cross-header files that need the complete registry.

use crate::classify;
use crate::config::Config;
use crate::crosswalk::Crosswalk;
use crate::error::{Error, Result};
use crate::model::{BindingFunction, HeaderUnit};
use crate::render::{Artifact, Emitter};
use crate::template::Templates;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Classified functions of every header processed so far, by name.
#[derive(Debug, Default)]
pub struct Registry {
    funcs: BTreeMap<String, (String, BindingFunction)>,
}

impl Registry {
    /// Record a function; a later definition replaces an earlier one.
    pub fn insert(&mut self, header: &str, func: BindingFunction) {
        let name = func.name.clone();
        if let Some((previous, _)) = self.funcs.insert(name.clone(), (header.to_string(), func)) {
            warn!("{} from {} replaces the definition from {}", name, header, previous);
        }
    }

    pub fn get(&self, name: &str) -> Option<&BindingFunction> {
        self.funcs.get(name).map(|(_, func)| func)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }
}

/// Produce every output file for `units`, in emission order.
pub fn generate(units: &[HeaderUnit], config: &Config) -> Result<Vec<Artifact>> {
    let crosswalk = Crosswalk::with_overrides(&config.ret_type_crosswalk, &config.prop_type_crosswalk);
    let templates = Templates::new(config.templates.clone());
    let emitter = Emitter::new(config, &crosswalk, &templates);
    emitter.check_templates()?;

    let mut registry = Registry::default();
    let mut artifacts = Vec::new();

    for unit in units {
        let header = unit.header_name();
        info!("scaffolding {}", header);
        if !unit.prefix.is_empty() {
            debug!(
                "  cabinet {} for {} (parents: {:?}, derived: {:?})",
                unit.prefix, unit.base, unit.parents, unit.derived
            );
        }
        for line in &unit.docstring {
            debug!("  # {}", line);
        }
        for recipe in &unit.recipes {
            debug!("  recipe {} on {}", recipe.name, recipe.bases().join(", "));
        }
        let mut funcs = Vec::with_capacity(unit.funcs.len());
        for annotated in &unit.funcs {
            debug!("  {}", annotated.short_declaration());
            funcs.push(classify::transform(&annotated.func, config, &crosswalk)?);
        }
        debug!(
            "  {} functions, {} release handles",
            funcs.len(),
            funcs.iter().filter(|f| f.is_handle_release()).count()
        );
        for func in &funcs {
            registry.insert(&header, func.clone());
        }

        artifacts.push(emitter.interop(unit, &funcs)?);
        if let Some(handles) = emitter.handles(unit, &funcs)? {
            artifacts.push(handles);
        }
    }
    info!("registry holds {} functions", registry.len());

    artifacts.push(emitter.derived_handles()?);
    for (area, props) in config.wrapper_classes.iter() {
        artifacts.push(emitter.wrapper_class(area, props, &registry)?);
    }

    check_unique(&artifacts)?;
    Ok(artifacts)
}

fn check_unique(artifacts: &[Artifact]) -> Result<()> {
    let mut seen = std::collections::BTreeSet::new();
    for artifact in artifacts {
        if !seen.insert(artifact.file_name.as_str()) {
            return Err(Error::config(
                "input set",
                format!("two inputs generate `{}`", artifact.file_name),
            ));
        }
    }
    Ok(())
}
