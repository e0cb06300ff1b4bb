//! Signature model for parsed declarations — language-agnostic value types.

use std::path::{Path, PathBuf};

/// Direction of a parameter, taken from its `@param[...]` documentation tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    None,
    In,
    Out,
    InOut,
}

impl Direction {
    /// Map the text between the brackets of `@param[...]`.
    pub fn from_tag(tag: &str) -> Option<Direction> {
        let compact: String = tag.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.as_str() {
            "" => Some(Direction::None),
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            "in,out" | "inout" => Some(Direction::InOut),
            _ => None,
        }
    }
}

/// A single function parameter.
///
/// `name` is empty only for placeholders, i.e. a bare type such as a return
/// value or an unnamed prototype argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Param {
    pub p_type: String,
    pub name: String,
    pub description: String,
    pub direction: Direction,
    pub default: Option<String>,
    /// Owning scope when the parameter stands for a member variable.
    pub base: Option<String>,
}

impl Param {
    pub fn new(p_type: impl Into<String>, name: impl Into<String>) -> Self {
        Param {
            p_type: p_type.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn placeholder(p_type: impl Into<String>) -> Self {
        Param::new(p_type, "")
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }

    pub fn short_str(&self) -> &str {
        &self.p_type
    }

    /// Type and name; placeholders render as their type alone.
    pub fn long_str(&self) -> String {
        match (&self.base, self.is_placeholder()) {
            (_, true) => self.p_type.clone(),
            (Some(base), false) => format!("{} {}::{}", self.p_type, base, self.name),
            (None, false) => format!("{} {}", self.p_type, self.name),
        }
    }
}

/// Ordered parameters plus the qualifier trailing the closing parenthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgList {
    pub params: Vec<Param>,
    /// e.g. `const`
    pub spec: String,
}

impl ArgList {
    pub fn new(params: Vec<Param>) -> Self {
        ArgList {
            params,
            spec: String::new(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    pub fn short_str(&self) -> String {
        let args: Vec<&str> = self.params.iter().map(Param::short_str).collect();
        format!("({}) {}", args.join(", "), self.spec).trim().to_string()
    }

    pub fn long_str(&self) -> String {
        let args: Vec<String> = self.params.iter().map(Param::long_str).collect();
        format!("({}) {}", args.join(", "), self.spec).trim().to_string()
    }
}

/// A function declaration as found in a C header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    /// May carry leading specifiers; empty when the declaration has none.
    pub ret_type: String,
    pub name: String,
    pub args: ArgList,
}

impl Function {
    /// Declaration text without the terminating semicolon.
    pub fn declaration(&self) -> String {
        format!("{} {}{}", self.ret_type, self.name, self.args.long_str())
            .trim()
            .to_string()
    }

    /// Split `<area>_<method>`; `None` when the name has no underscore.
    pub fn area_and_method(&self) -> Option<(&str, &str)> {
        self.name.split_once('_')
    }
}

/// A function declaration enriched with its documentation block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedFunction {
    pub func: Function,
    pub brief: String,
    /// Native function or method being wrapped.
    pub implements: Option<String>,
    pub returns: String,
    /// Owning scope, e.g. a class name.
    pub base: String,
    /// Auxiliary functions referenced through `@uses`.
    pub uses: Vec<AnnotatedFunction>,
    /// Hand-written body that replaces the generated one.
    pub code: Option<String>,
}

impl From<Function> for AnnotatedFunction {
    fn from(func: Function) -> Self {
        AnnotatedFunction {
            func,
            ..Default::default()
        }
    }
}

impl AnnotatedFunction {
    pub fn name(&self) -> &str {
        &self.func.name
    }

    /// Return type, optional base scope, name and parameter types.
    pub fn short_declaration(&self) -> String {
        let tail = format!("{}{}", self.func.name, self.func.args.short_str());
        let scoped = if self.base.is_empty() {
            tail
        } else {
            format!("{}::{}", self.base, tail)
        };
        format!("{} {}", self.func.ret_type, scoped).trim().to_string()
    }
}

/// Declarative description of one generated function, read from a YAML cabinet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    /// Full name including the cabinet prefix, e.g. `thermo_setTemperature`.
    pub name: String,
    pub prefix: String,
    pub base: String,
    pub parents: Vec<String>,
    /// Derived class → alternative prefix, in document order.
    pub derived: Vec<(String, String)>,
    pub uses: Vec<String>,
    pub implements: String,
    pub relates: Vec<String>,
    /// Overrides auto-detection of the recipe type.
    pub what: String,
    pub brief: String,
    pub code: Option<String>,
}

impl Recipe {
    /// `[base] + parents + derived classes`.
    pub fn bases(&self) -> Vec<&str> {
        std::iter::once(self.base.as_str())
            .chain(self.parents.iter().map(String::as_str))
            .chain(self.derived.iter().map(|(class, _)| class.as_str()))
            .collect()
    }
}

/// Everything parsed from one input header (a `.h` file or a YAML cabinet).
#[derive(Debug, Clone, Default)]
pub struct HeaderUnit {
    pub path: PathBuf,
    pub funcs: Vec<AnnotatedFunction>,
    pub prefix: String,
    pub base: String,
    pub parents: Vec<String>,
    pub derived: Vec<(String, String)>,
    pub recipes: Vec<Recipe>,
    pub docstring: Vec<String>,
}

impl HeaderUnit {
    pub fn new(path: impl AsRef<Path>, funcs: Vec<AnnotatedFunction>) -> Self {
        HeaderUnit {
            path: path.as_ref().to_path_buf(),
            funcs,
            ..Default::default()
        }
    }

    /// Path of a file generated from this unit.
    ///
    /// The `_auto` marker of the input name is replaced by the part of `suffix`
    /// before its first dot and the extension by the rest:
    /// `ctsol_auto.yaml` with `"3.cpp"` becomes `ctsol3.cpp`, and with `".h"`
    /// becomes `ctsol.h`.
    pub fn output_name(&self, suffix: &str) -> PathBuf {
        let (auto, ext) = suffix.split_once('.').unwrap_or((suffix, ""));
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().replace("_auto", auto))
            .unwrap_or_default();
        self.path.with_file_name(name).with_extension(ext)
    }

    /// File name of the C header this unit describes.
    pub fn header_name(&self) -> String {
        self.output_name(".h")
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Reserved C# keywords; parameters with these names are emitted as `@name`.
const RESERVED_NAMES: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// A function after classification, expressed in binding-language types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingFunction {
    pub ret_type: String,
    pub name: String,
    pub args: ArgList,
    /// Handle class released by this function, if it is a destructor.
    pub release_handle: Option<String>,
}

impl BindingFunction {
    pub fn is_handle_release(&self) -> bool {
        self.release_handle.is_some()
    }

    /// Raw pointers in the signature require an `unsafe` context.
    pub fn is_unsafe(&self) -> bool {
        self.ret_type.contains('*') || self.args.iter().any(|p| p.p_type.contains('*'))
    }

    pub fn declaration(&self) -> String {
        let params: Vec<String> = self
            .args
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let name = match p.name.as_str() {
                    "" => format!("arg{}", i),
                    n if RESERVED_NAMES.contains(&n) => format!("@{}", n),
                    n => n.to_string(),
                };
                format!("{} {}", p.p_type, name)
            })
            .collect();
        format!("{} {}({})", self.ret_type, self.name, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tags() {
        assert_eq!(Direction::from_tag("in"), Some(Direction::In));
        assert_eq!(Direction::from_tag("out"), Some(Direction::Out));
        assert_eq!(Direction::from_tag("in, out"), Some(Direction::InOut));
        assert_eq!(Direction::from_tag(""), Some(Direction::None));
        assert_eq!(Direction::from_tag("sideways"), None);
    }

    #[test]
    fn param_long_str_with_base() {
        let mut p = Param::new("double", "m_temp");
        p.base = Some("ThermoPhase".to_string());
        assert_eq!(p.long_str(), "double ThermoPhase::m_temp");
        assert_eq!(Param::placeholder("int").long_str(), "int");
    }

    #[test]
    fn arglist_renderings() {
        let args = ArgList {
            params: vec![Param::new("int", "n"), Param::new("double*", "x")],
            spec: "const".to_string(),
        };
        assert_eq!(args.short_str(), "(int, double*) const");
        assert_eq!(args.long_str(), "(int n, double* x) const");
        assert_eq!(ArgList::default().long_str(), "()");
    }

    #[test]
    fn short_declaration_with_base() {
        let func = AnnotatedFunction {
            func: Function {
                ret_type: "double".to_string(),
                name: "temperature".to_string(),
                args: ArgList::default(),
            },
            base: "ThermoPhase".to_string(),
            ..Default::default()
        };
        assert_eq!(func.short_declaration(), "double ThermoPhase::temperature()");
    }

    #[test]
    fn recipe_bases() {
        let recipe = Recipe {
            base: "ThermoPhase".to_string(),
            parents: vec!["Phase".to_string()],
            derived: vec![("IdealGasPhase".to_string(), "ig".to_string())],
            ..Default::default()
        };
        assert_eq!(recipe.bases(), vec!["ThermoPhase", "Phase", "IdealGasPhase"]);
    }

    #[test]
    fn output_name_replaces_auto_marker() {
        let unit = HeaderUnit::new("data/ctsol_auto.yaml", vec![]);
        assert_eq!(unit.output_name("3.cpp"), PathBuf::from("data/ctsol3.cpp"));
        assert_eq!(unit.output_name(".h"), PathBuf::from("data/ctsol.h"));
        assert_eq!(unit.output_name(""), PathBuf::from("data/ctsol"));
        assert_eq!(unit.header_name(), "ctsol.h");
    }

    #[test]
    fn output_name_for_plain_header() {
        let unit = HeaderUnit::new("include/ctthermo.h", vec![]);
        assert_eq!(unit.header_name(), "ctthermo.h");
    }

    #[test]
    fn binding_declaration_escapes_keywords() {
        let func = BindingFunction {
            ret_type: "int".to_string(),
            name: "thermo_setState".to_string(),
            args: ArgList::new(vec![
                Param::new("ThermoPhaseHandle", "n"),
                Param::new("double[]", "params"),
            ]),
            release_handle: None,
        };
        assert_eq!(
            func.declaration(),
            "int thermo_setState(ThermoPhaseHandle n, double[] @params)"
        );
        assert!(!func.is_unsafe());
    }

    #[test]
    fn names_legal_in_c_but_reserved_in_csharp_are_escaped() {
        let func = BindingFunction {
            ret_type: "int".to_string(),
            name: "func_new".to_string(),
            args: ArgList::new(vec![
                Param::new("string", "new"),
                Param::new("int", "class"),
                Param::new("double", "decimal"),
                Param::new("int", "namespace"),
                Param::new("int", "count"),
            ]),
            release_handle: None,
        };
        assert_eq!(
            func.declaration(),
            "int func_new(string @new, int @class, double @decimal, int @namespace, int count)"
        );
    }

    #[test]
    fn binding_pointer_is_unsafe() {
        let func = BindingFunction {
            ret_type: "int".to_string(),
            name: "thermo_getName".to_string(),
            args: ArgList::new(vec![Param::new("byte*", "buf")]),
            release_handle: None,
        };
        assert!(func.is_unsafe());
    }
}
