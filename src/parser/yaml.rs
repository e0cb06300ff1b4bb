//! YAML header recipes ("cabinets").
//!
//! Loading validates the cabinet; building the unit parses the `code` blocks
//! of its recipes. The two steps are separate so every cabinet is validated
//! before any declaration text is parsed.

use crate::config::Ordered;
use crate::error::{Error, Result};
use crate::model::*;
use crate::parser::snippet;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RecipeFile {
    cabinet: Option<CabinetSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CabinetSpec {
    prefix: Option<String>,
    base: Option<String>,
    #[serde(default)]
    parents: Vec<String>,
    #[serde(default)]
    derived: Ordered<String>,
    #[serde(default)]
    uses: OneOrMany,
    #[serde(default)]
    functions: Vec<RecipeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeSpec {
    name: Option<String>,
    #[serde(default)]
    implements: String,
    #[serde(default)]
    uses: OneOrMany,
    #[serde(default)]
    relates: OneOrMany,
    #[serde(default)]
    what: String,
    #[serde(default)]
    brief: String,
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::None => Vec::new(),
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// A validated cabinet whose recipes have not been parsed yet.
#[derive(Debug)]
pub struct Cabinet {
    path: PathBuf,
    prefix: String,
    base: String,
    parents: Vec<String>,
    derived: Vec<(String, String)>,
    recipes: Vec<Recipe>,
    docstring: Vec<String>,
}

/// Deserialize and validate a cabinet file.
pub fn load(path: &Path, text: &str, ignore_funcs: &[String]) -> Result<Cabinet> {
    let origin = path.display().to_string();
    let file: RecipeFile = serde_yaml::from_str(text).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = file
        .cabinet
        .ok_or_else(|| Error::config(&origin, "missing `cabinet`"))?;
    let prefix = required(spec.prefix, &origin, "prefix")?;
    let base = required(spec.base, &origin, "base")?;
    let cabinet_uses: Vec<String> = spec.uses.into();

    let mut recipes = Vec::new();
    for (i, entry) in spec.functions.into_iter().enumerate() {
        let short = entry
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| Error::config(&origin, format!("function #{} has no `name`", i + 1)))?;
        let name = format!("{}_{}", prefix, short);
        if ignore_funcs.contains(&name) {
            debug!("    skipping ignored recipe {}", name);
            continue;
        }
        if recipes.iter().any(|r: &Recipe| r.name == name) {
            return Err(Error::config(&origin, format!("duplicate recipe `{}`", name)));
        }

        let mut uses = cabinet_uses.clone();
        uses.extend(Vec::<String>::from(entry.uses));
        recipes.push(Recipe {
            name,
            prefix: prefix.clone(),
            base: base.clone(),
            parents: spec.parents.clone(),
            derived: spec.derived.0.clone(),
            uses,
            implements: entry.implements,
            relates: entry.relates.into(),
            what: entry.what,
            brief: entry.brief,
            code: entry.code,
        });
    }

    Ok(Cabinet {
        path: path.to_path_buf(),
        prefix,
        base,
        parents: spec.parents,
        derived: spec.derived.0,
        recipes,
        docstring: leading_comments(text),
    })
}

fn required(value: Option<String>, origin: &str, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::config(origin, format!("cabinet is missing `{}`", field)))
}

/// Comment lines at the top of the file, without the `#` marker.
fn leading_comments(text: &str) -> Vec<String> {
    text.lines()
        .map_while(|line| line.strip_prefix('#'))
        .map(|line| line.strip_prefix(' ').unwrap_or(line).to_string())
        .collect()
}

impl Cabinet {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse recipe code blocks into functions and build the header unit.
    pub fn into_unit(self) -> Result<HeaderUnit> {
        let mut funcs = Vec::new();
        for recipe in &self.recipes {
            let Some(code) = recipe.code.as_deref() else {
                debug!("    {} has no code block; nothing to parse", recipe.name);
                continue;
            };
            let mut func = snippet::parse(code)?;
            if func.name() != recipe.name {
                return Err(Error::parse(
                    code,
                    format!("declares `{}` instead of `{}`", func.name(), recipe.name),
                ));
            }
            if !recipe.implements.is_empty() {
                func.implements = Some(recipe.implements.clone());
            }
            if !recipe.brief.is_empty() {
                func.brief = recipe.brief.clone();
            }
            func.base = recipe.base.clone();
            funcs.push(func);
        }

        Ok(HeaderUnit {
            path: self.path,
            funcs,
            prefix: self.prefix,
            base: self.base,
            parents: self.parents,
            derived: self.derived,
            recipes: self.recipes,
            docstring: self.docstring,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const CABINET: &str = indoc! {"
        # Auto-generated CLib API for Cantera's Solution class.
        # Implements a replacement for CLib's traditional @c ct library.

        cabinet:
          prefix: sol
          base: Solution
          parents: [Base]
          derived:
            Interface: interface
          uses: [thermo, kinetics]
          functions:
          - name: newSolution
            implements: newSolution(const string&, const string&, const string&)
          - name: name
            implements: Solution::name
            relates: [setName]
          - name: del
            what: destructor
            brief: Destroy the solution.
            code: |
              /**
               * Delete object.
               * @param[in] handle  Handle to Solution.
               */
              int sol_del(int handle)
              {
                  return 0;
              }
    "};

    #[test]
    fn loads_cabinet() {
        let cabinet = load(Path::new("ctsol_auto.yaml"), CABINET, &[]).unwrap();
        assert_eq!(cabinet.recipes.len(), 3);
        let recipe = &cabinet.recipes[1];
        assert_eq!(recipe.name, "sol_name");
        assert_eq!(recipe.prefix, "sol");
        assert_eq!(recipe.relates, vec!["setName"]);
        assert_eq!(recipe.uses, vec!["thermo", "kinetics"]);
        assert_eq!(recipe.bases(), vec!["Solution", "Base", "Interface"]);
        assert_eq!(cabinet.docstring.len(), 2);
        assert!(cabinet.docstring[0].starts_with("Auto-generated"));
    }

    #[test]
    fn code_blocks_become_functions() {
        let unit = load(Path::new("ctsol_auto.yaml"), CABINET, &[])
            .unwrap()
            .into_unit()
            .unwrap();
        assert_eq!(unit.funcs.len(), 1);
        let del = &unit.funcs[0];
        assert_eq!(del.name(), "sol_del");
        assert_eq!(del.brief, "Destroy the solution.");
        assert_eq!(del.base, "Solution");
        assert_eq!(del.code.as_deref(), Some("return 0;"));
        assert_eq!(del.func.args.params[0].direction, Direction::In);
        assert_eq!(unit.header_name(), "ctsol.h");
        assert_eq!(unit.derived, vec![("Interface".to_string(), "interface".to_string())]);
    }

    #[test]
    fn ignored_recipes_are_dropped() {
        let ignore = vec!["sol_name".to_string()];
        let cabinet = load(Path::new("ctsol_auto.yaml"), CABINET, &ignore).unwrap();
        assert!(cabinet.recipes.iter().all(|r| r.name != "sol_name"));
    }

    #[test]
    fn missing_prefix_fails() {
        let err = load(Path::new("x.yaml"), "cabinet:\n  base: Solution\n", &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration in x.yaml: cabinet is missing `prefix`"
        );
    }

    #[test]
    fn missing_base_fails() {
        assert!(load(Path::new("x.yaml"), "cabinet:\n  prefix: sol\n", &[]).is_err());
    }

    #[test]
    fn unnamed_function_fails() {
        let text = "cabinet:\n  prefix: sol\n  base: Solution\n  functions:\n  - what: getter\n";
        assert!(load(Path::new("x.yaml"), text, &[]).is_err());
    }

    #[test]
    fn code_with_wrong_name_fails() {
        let text = indoc! {"
            cabinet:
              prefix: sol
              base: Solution
              functions:
              - name: del
                code: |
                  int sol_remove(int handle)
                  {
                      return 0;
                  }
        "};
        let err = load(Path::new("x.yaml"), text, &[]).unwrap().into_unit().unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("instead of `sol_del`"));
    }
}
