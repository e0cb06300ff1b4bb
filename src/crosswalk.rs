//! Native → binding type crosswalks.

use std::collections::BTreeMap;

/// Native type spelling → binding type spelling, for return values and parameters.
const RET_TYPES: &[(&str, &str)] = &[
    ("const char*", "string"),
    ("char*", "byte*"),
    ("const double*", "double*"),
    ("const int*", "int*"),
    ("size_t", "nuint"),
    ("int32_t", "int"),
    ("int", "int"),
    ("double", "double"),
    ("bool", "int"),
];

/// Binding type of a getter's buffer parameter → binding property type.
const PROP_TYPES: &[(&str, &str)] = &[("byte*", "string"), ("char*", "string")];

/// How a property is scaffolded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKind {
    /// `int` or `double`: plain get/set.
    Scalar(String),
    /// Buffer-filling getter; the cast depends on its size parameter.
    Str,
}

#[derive(Debug, Clone)]
pub struct Crosswalk {
    ret_types: BTreeMap<String, String>,
    prop_types: BTreeMap<String, String>,
}

impl Default for Crosswalk {
    fn default() -> Self {
        Crosswalk::with_overrides(&BTreeMap::new(), &BTreeMap::new())
    }
}

impl Crosswalk {
    /// Built-in tables with configured entries taking precedence.
    pub fn with_overrides(
        ret_types: &BTreeMap<String, String>,
        prop_types: &BTreeMap<String, String>,
    ) -> Self {
        let merge = |builtin: &[(&str, &str)], extra: &BTreeMap<String, String>| {
            let mut table: BTreeMap<String, String> = builtin
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            table.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
            table
        };
        Crosswalk {
            ret_types: merge(RET_TYPES, ret_types),
            prop_types: merge(PROP_TYPES, prop_types),
        }
    }

    /// Unmapped types pass through unchanged.
    pub fn binding_type<'a>(&'a self, native: &'a str) -> &'a str {
        self.ret_types.get(native).map_or(native, String::as_str)
    }

    /// Property type of a getter's buffer parameter, if it can be scaffolded.
    pub fn prop_type(&self, buffer_type: &str) -> Option<&str> {
        self.prop_types.get(buffer_type).map(String::as_str)
    }

    /// Generation strategy for a resolved property type.
    pub fn prop_kind(prop_type: &str) -> Option<PropKind> {
        match prop_type {
            "int" | "double" => Some(PropKind::Scalar(prop_type.to_string())),
            "string" => Some(PropKind::Str),
            _ => None,
        }
    }
}
