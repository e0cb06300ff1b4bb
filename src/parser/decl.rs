//! Single-line declaration parsing: prototypes, argument lists, parameters.
//!
//! The accepted grammar is plain C-linkage prototypes:
//! `<return type> <name>(<type> <name>, ...) <qualifier>;`

use crate::error::{Error, Result};
use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static RE_FUNC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::~?[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

static RE_PARAM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@param(?:\[([^\]]*)\])?$").unwrap());

/// Leading words that never stand alone as a type.
const QUALIFIERS: &[&str] = &["const", "virtual", "static", "unsigned", "signed", "struct"];

/// Parse a single-line declaration such as `int thermo_nSpecies(int n);`.
pub fn parse_function(text: &str) -> Result<Function> {
    let decl = text.trim().trim_end_matches(';').trim();
    let (head, rest) = match decl.find('(') {
        Some(pos) => (&decl[..pos], &decl[pos..]),
        None => (decl, ""),
    };
    let args = parse_arglist(rest).map_err(|e| reword(e, decl))?;

    let (ret_type, name) = split_type_and_name(head.trim());
    if !RE_FUNC_NAME.is_match(&name) {
        return Err(Error::parse(decl, "missing function name"));
    }

    Ok(Function {
        ret_type,
        name,
        args,
    })
}

/// Parse `(<params>) <qualifier>` into an argument list.
pub fn parse_arglist(text: &str) -> Result<ArgList> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(ArgList::default());
    }

    let open = text
        .find('(')
        .ok_or_else(|| Error::parse(text, "expected `(`"))?;
    let close = text
        .rfind(')')
        .filter(|&close| close > open)
        .ok_or_else(|| Error::parse(text, "unbalanced parentheses"))?;

    let inner = text[open + 1..close].trim();
    let spec = text[close + 1..].trim().to_string();

    if inner.is_empty() || inner == "void" {
        return Ok(ArgList {
            params: Vec::new(),
            spec,
        });
    }

    let mut params = Vec::new();
    for piece in split_top_level(inner) {
        if piece.trim().is_empty() {
            return Err(Error::parse(text, "empty parameter"));
        }
        params.push(parse_param(piece));
    }

    Ok(ArgList { params, spec })
}

/// Parse one parameter; a piece without an identifier-like name is a placeholder.
pub fn parse_param(text: &str) -> Param {
    let text = text.trim();
    let (decl, default) = match text.split_once('=') {
        Some((decl, value)) => (decl.trim(), Some(value.trim().to_string())),
        None => (text, None),
    };

    let (p_type, name) = split_type_and_name(decl);
    if p_type.is_empty()
        || !RE_IDENT.is_match(&name)
        || QUALIFIERS.contains(&name.as_str())
        || QUALIFIERS.contains(&p_type.as_str())
    {
        let mut param = Param::placeholder(decl);
        param.default = default;
        return param;
    }

    Param {
        p_type,
        name,
        default,
        ..Default::default()
    }
}

/// Apply a `@param[dir] name description` line to a parsed parameter.
pub fn apply_param_doc(param: &Param, doc: &str) -> Result<Param> {
    let mut items = doc.split_whitespace();
    let tag = items.next().unwrap_or_default();
    let direction = RE_PARAM_TAG
        .captures(tag)
        .and_then(|caps| Direction::from_tag(caps.get(1).map_or("", |m| m.as_str())))
        .ok_or_else(|| Error::parse(doc, format!("malformed tag `{}`", tag)))?;

    let documented = items.next().unwrap_or_default();
    if documented != param.name {
        return Err(Error::parse(
            doc,
            format!(
                "documented variable `{}` does not match `{}`",
                documented, param.name
            ),
        ));
    }

    Ok(Param {
        description: items.collect::<Vec<_>>().join(" "),
        direction,
        ..param.clone()
    })
}

/// Split `<type> <name>` on the last space, moving pointer and reference
/// markers from the name onto the type (`double *x` → `double*`, `x`).
fn split_type_and_name(text: &str) -> (String, String) {
    let Some((ty, name)) = text.rsplit_once(char::is_whitespace) else {
        return (String::new(), text.to_string());
    };
    let stripped = name.trim_start_matches(['*', '&']);
    let markers = &name[..name.len() - stripped.len()];
    (
        format!("{}{}", ty.trim_end(), markers),
        stripped.to_string(),
    )
}

/// Split on commas that are not nested inside `<>`, `()` or `[]`.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Report argument-list errors against the whole declaration.
fn reword(err: Error, decl: &str) -> Error {
    match err {
        Error::Parse { reason, .. } => Error::parse(decl, reason),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_simple_prototype() {
        let func = parse_function("int foo_bar(int n);").unwrap();
        assert_eq!(func.ret_type, "int");
        assert_eq!(func.name, "foo_bar");
        assert_eq!(func.args.params, vec![Param::new("int", "n")]);
    }

    #[test]
    fn parse_without_return_type() {
        let func = parse_function("foo_bar(int n)").unwrap();
        assert_eq!(func.ret_type, "");
        assert_eq!(func.name, "foo_bar");
    }

    #[test]
    fn parse_without_arglist() {
        let func = parse_function("double temperature").unwrap();
        assert_eq!(func.ret_type, "double");
        assert_eq!(func.name, "temperature");
        assert!(func.args.params.is_empty());
    }

    #[test]
    fn parse_trailing_qualifier() {
        let func = parse_function("double ThermoPhase::temperature() const").unwrap();
        assert_eq!(func.name, "ThermoPhase::temperature");
        assert_eq!(func.args.spec, "const");
        assert_eq!(func.declaration(), "double ThermoPhase::temperature() const");

        let args = parse_arglist("(size_t k) const").unwrap();
        assert_eq!(args.spec, "const");
        assert_eq!(args.params, vec![Param::new("size_t", "k")]);
    }

    #[test]
    fn parse_pointer_types() {
        let func = parse_function("const char* thermo_name(int n, double *x, const double* y)")
            .unwrap();
        assert_eq!(func.ret_type, "const char*");
        let types: Vec<&str> = func.args.iter().map(|p| p.p_type.as_str()).collect();
        assert_eq!(types, vec!["int", "double*", "const double*"]);
        assert_eq!(func.args.params[1].name, "x");
    }

    #[test]
    fn parse_pointer_return_next_to_name() {
        let func = parse_function("double *thermo_data(int n)").unwrap();
        assert_eq!(func.ret_type, "double*");
        assert_eq!(func.name, "thermo_data");
    }

    #[test]
    fn void_arglist_is_empty() {
        let func = parse_function("int ct_resetStorage(void);").unwrap();
        assert!(func.args.params.is_empty());
        assert_eq!(func.declaration(), "int ct_resetStorage()");
    }

    #[test]
    fn unnamed_parameter_is_placeholder() {
        let func = parse_function("int foo_bar(double, const double* const)").unwrap();
        assert!(func.args.params[0].is_placeholder());
        assert_eq!(func.args.params[0].p_type, "double");
        assert_eq!(func.args.params[1].p_type, "const double* const");
        assert_eq!(func.declaration(), "int foo_bar(double, const double* const)");
    }

    #[test]
    fn default_values() {
        let p = parse_param("double value = 0.0");
        assert_eq!(p.name, "value");
        assert_eq!(p.default.as_deref(), Some("0.0"));
    }

    #[test]
    fn nested_commas_stay_together() {
        let args = parse_arglist("(const map<string, double>& comp, int n)").unwrap();
        assert_eq!(args.params.len(), 2);
        assert_eq!(args.params[0].p_type, "const map<string, double>&");
        assert_eq!(args.params[0].name, "comp");
    }

    #[test]
    fn unbalanced_parentheses_fail() {
        let err = parse_function("int foo_bar(int n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot parse `int foo_bar(int n`: unbalanced parentheses"
        );
    }

    #[test]
    fn empty_parameter_fails() {
        assert!(parse_function("int foo_bar(int a, , int b)").is_err());
    }

    #[test]
    fn missing_name_fails() {
        assert!(parse_function("(int a)").is_err());
    }

    #[test]
    fn param_doc_sets_direction() {
        let p = apply_param_doc(&Param::new("int", "n"), "@param[in] n count").unwrap();
        assert_eq!(p.direction, Direction::In);
        assert_eq!(p.description, "count");

        let p = apply_param_doc(&Param::new("double*", "x"), "@param[in,out] x  buffer of values")
            .unwrap();
        assert_eq!(p.direction, Direction::InOut);
        assert_eq!(p.description, "buffer of values");

        let p = apply_param_doc(&Param::new("int", "n"), "@param n count").unwrap();
        assert_eq!(p.direction, Direction::None);
    }

    #[test]
    fn param_doc_mismatch_fails() {
        let err = apply_param_doc(&Param::new("int", "n"), "@param[in] m count").unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn param_doc_bad_direction_fails() {
        assert!(apply_param_doc(&Param::new("int", "n"), "@param[up] n count").is_err());
    }

    fn c_type() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("int".to_string()),
            Just("double".to_string()),
            Just("size_t".to_string()),
            Just("double*".to_string()),
            Just("const double*".to_string()),
            Just("const char*".to_string()),
        ]
    }

    fn ident() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z0-9]{0,8}".prop_filter("qualifiers are not names", |s| {
            !QUALIFIERS.contains(&s.as_str())
        })
    }

    proptest! {
        #[test]
        fn declaration_round_trips(
            ret in c_type(),
            area in "[a-z]{1,6}",
            method in ident(),
            params in proptest::collection::vec((c_type(), ident()), 0..5),
        ) {
            let args: Vec<String> = params.iter().map(|(t, n)| format!("{} {}", t, n)).collect();
            let text = format!("{} {}_{}({});", ret, area, method, args.join(", "));
            let func = parse_function(&text).unwrap();
            prop_assert_eq!(format!("{};", func.declaration()), text);
            prop_assert_eq!(func.args.params.len(), params.len());
        }
    }
}
