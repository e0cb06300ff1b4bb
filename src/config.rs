//! Generator configuration, read from YAML.
//!
//! When no configuration file is given, the bundled `config/csharp.yaml` is used.

use crate::error::{Error, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

const BUNDLED: &str = include_str!("../config/csharp.yaml");

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Area whose functions are emitted without handle rewriting.
    pub global_area: String,
    /// Token that introduces an exported declaration in header text.
    pub export_marker: String,
    /// Library name used in interop file names.
    pub library: String,
    /// Area → wrapper class name.
    pub class_crosswalk: BTreeMap<String, String>,
    /// Function name → accessor return type.
    pub class_accessors: BTreeMap<String, String>,
    /// Derived handle class → base handle class.
    pub derived_handles: Ordered<String>,
    /// Area → (native property name → binding property name).
    pub wrapper_classes: Ordered<Ordered<String>>,
    pub ret_type_crosswalk: BTreeMap<String, String>,
    pub prop_type_crosswalk: BTreeMap<String, String>,
    pub pair_setters: Vec<PairSetter>,
    pub ignore_files: Vec<String>,
    pub ignore_funcs: BTreeMap<String, Vec<String>>,
    pub templates: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            global_area: "ct".to_string(),
            export_marker: "CANTERA_CAPI".to_string(),
            library: "LibCantera".to_string(),
            class_crosswalk: BTreeMap::new(),
            class_accessors: BTreeMap::new(),
            derived_handles: Ordered::default(),
            wrapper_classes: Ordered::default(),
            ret_type_crosswalk: BTreeMap::new(),
            prop_type_crosswalk: BTreeMap::new(),
            pair_setters: Vec::new(),
            ignore_files: Vec::new(),
            ignore_funcs: BTreeMap::new(),
            templates: BTreeMap::new(),
        }
    }
}

/// Area whose `set_XY` methods take a fixed-size pair instead of an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PairSetter {
    pub area: String,
    #[serde(rename = "type")]
    pub p_type: String,
}

impl Config {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate(&path.display().to_string())
    }

    /// The configuration shipped with the generator.
    pub fn bundled() -> Result<Config> {
        let config: Config = serde_yaml::from_str(BUNDLED)
            .map_err(|e| Error::config("bundled configuration", e.to_string()))?;
        config.validate("bundled configuration")
    }

    fn validate(self, origin: &str) -> Result<Config> {
        if self.global_area.is_empty() {
            return Err(Error::config(origin, "`global_area` must not be empty"));
        }
        if self.export_marker.trim().is_empty() {
            return Err(Error::config(origin, "`export_marker` must not be empty"));
        }
        if let Some((area, _)) = self
            .wrapper_classes
            .iter()
            .find(|(area, _)| *area == self.global_area)
        {
            return Err(Error::config(
                origin,
                format!("global area `{}` cannot have a wrapper class", area),
            ));
        }
        Ok(self)
    }

    pub fn ignores_file(&self, file_name: &str) -> bool {
        self.ignore_files.iter().any(|f| f == file_name)
    }

    /// Function names to drop from the given input file.
    pub fn ignored_funcs(&self, file_name: &str) -> &[String] {
        self.ignore_funcs
            .get(file_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Wrapper class name for an area; unconfigured areas are capitalized.
    pub fn wrapper_class_name(&self, area: &str) -> String {
        self.class_crosswalk
            .get(area)
            .cloned()
            .unwrap_or_else(|| capitalize(area))
    }

    pub fn handle_class_name(&self, area: &str) -> String {
        format!("{}Handle", self.wrapper_class_name(area))
    }

    /// Fixed pair type for `set_XY` methods of the given area, if configured.
    pub fn pair_setter_type(&self, area: &str) -> Option<&str> {
        self.pair_setters
            .iter()
            .find(|p| p.area == area)
            .map(|p| p.p_type.as_str())
    }
}

/// Upper-case the first character, keep the rest as is.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A YAML mapping that keeps document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered<V>(pub Vec<(String, V)>);

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Ordered(Vec::new())
    }
}

impl<V> Ordered<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(Ordered::default())
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate key `{}`",
                            key
                        )));
                    }
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_any(OrderedVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_loads() {
        let config = Config::bundled().unwrap();
        assert_eq!(config.global_area, "ct");
        assert_eq!(config.wrapper_class_name("thermo"), "ThermoPhase");
        assert!(config.templates.contains_key("csharp-preamble"));
        assert!(config.ignores_file("clib_defs.h"));
    }

    #[test]
    fn unconfigured_area_is_capitalized() {
        let config = Config::default();
        assert_eq!(config.handle_class_name("foo"), "FooHandle");
    }

    #[test]
    fn ordered_mappings_keep_document_order() {
        let config: Config = serde_yaml::from_str(
            "wrapper_classes:\n  thermo:\n    temperature: Temperature\n    density: Density\n  sol:\n    name: Name\n",
        )
        .unwrap();
        let areas: Vec<&str> = config.wrapper_classes.iter().map(|(a, _)| a).collect();
        assert_eq!(areas, vec!["thermo", "sol"]);
        let props: Vec<&str> = config
            .wrapper_classes
            .get("thermo")
            .unwrap()
            .iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(props, vec!["temperature", "density"]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result: std::result::Result<Config, _> =
            serde_yaml::from_str("derived_handles:\n  A: B\n  A: C\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: std::result::Result<Config, _> = serde_yaml::from_str("global: ct\n");
        assert!(result.is_err());
    }

    #[test]
    fn global_area_cannot_wrap() {
        let config: Config =
            serde_yaml::from_str("wrapper_classes:\n  ct:\n    version: Version\n").unwrap();
        let err = config.validate("test").unwrap_err();
        assert!(err.to_string().contains("global area `ct`"));
    }

    #[test]
    fn ignore_lists() {
        let config: Config = serde_yaml::from_str(
            "ignore_files: [ctmatlab.h]\nignore_funcs:\n  ctthermo.h: [thermo_print]\n",
        )
        .unwrap();
        assert!(config.ignores_file("ctmatlab.h"));
        assert_eq!(config.ignored_funcs("ctthermo.h"), ["thermo_print".to_string()]);
        assert!(config.ignored_funcs("ctkin.h").is_empty());
    }

    #[test]
    fn capitalize_keeps_camel_case() {
        assert_eq!(capitalize("moleFractions"), "MoleFractions");
        assert_eq!(capitalize(""), "");
    }
}
