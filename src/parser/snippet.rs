//! Annotated declaration blocks: a `/** ... */` comment, the declaration, and
//! an optional body.
//!
//! Recognized tags: `@param[dir] name text`, `@returns text`, `@uses decl`.
//! The first untagged content line is the brief description.

use crate::error::{Error, Result};
use crate::model::*;
use crate::parser::decl;

#[derive(Default)]
struct DocBlock {
    brief: String,
    params: Vec<String>,
    returns: String,
    uses: Vec<AnnotatedFunction>,
}

/// Parse a documented declaration, with an optional `{ ... }` body.
pub fn parse(text: &str) -> Result<AnnotatedFunction> {
    let lines: Vec<&str> = text.lines().skip_while(|l| l.trim().is_empty()).collect();
    if lines.len() <= 1 {
        let line = lines.first().copied().unwrap_or_default();
        return Ok(decl::parse_function(line)?.into());
    }

    let mut rest = lines.as_slice();
    let doc = if rest[0].trim_start().starts_with("/*") {
        let (doc, consumed) = parse_doc_block(rest)?;
        rest = &rest[consumed..];
        doc
    } else {
        DocBlock::default()
    };

    let rest: Vec<&str> = rest.iter().copied().skip_while(|l| l.trim().is_empty()).collect();
    let Some((decl_line, body)) = rest.split_first() else {
        return Err(Error::parse(text, "missing declaration after documentation block"));
    };

    let decl_line = decl_line.trim();
    let (decl_text, opens_body) = match decl_line.strip_suffix('{') {
        Some(head) => (head.trim_end(), true),
        None => (decl_line, false),
    };
    let func = decl::parse_function(decl_text)?;
    let func = Function {
        args: document_params(&func, &doc.params)?,
        ..func
    };

    Ok(AnnotatedFunction {
        func,
        brief: doc.brief,
        returns: doc.returns,
        uses: doc.uses,
        code: extract_body(body, opens_body).map_err(|reason| Error::parse(text, reason))?,
        ..Default::default()
    })
}

/// Consume the comment block; returns the block and the number of lines used.
fn parse_doc_block(lines: &[&str]) -> Result<(DocBlock, usize)> {
    let mut doc = DocBlock::default();

    for (i, raw) in lines.iter().enumerate() {
        let mut line = raw.trim();
        if let Some(rest) = line.strip_prefix("/**").or_else(|| line.strip_prefix("/*")) {
            line = rest;
        }
        let closes = line.ends_with("*/");
        if closes {
            line = &line[..line.len() - 2];
        }
        let content = line.trim_start_matches('*').trim();

        if content.starts_with("@param") {
            doc.params.push(content.to_string());
        } else if let Some(text) = strip_tag(content, &["@returns", "@return"]) {
            doc.returns = text.to_string();
        } else if let Some(text) = strip_tag(content, &["@uses"]) {
            let text = text.trim_start_matches(':').trim();
            let text = text.split_once(": ").map_or(text, |(_, decl)| decl);
            doc.uses.push(parse_used(text)?);
        } else if doc.brief.is_empty() && !content.is_empty() {
            doc.brief = content.to_string();
        }

        if closes {
            return Ok((doc, i + 1));
        }
    }

    Err(Error::parse(
        lines.join("\n"),
        "unterminated documentation block",
    ))
}

fn strip_tag<'a>(content: &'a str, tags: &[&str]) -> Option<&'a str> {
    tags.iter().find_map(|tag| {
        content
            .strip_prefix(tag)
            .filter(|rest| rest.is_empty() || rest.starts_with([' ', '\t', ':']))
            .map(str::trim)
    })
}

/// `@uses` entries are single-line declarations, possibly scope-qualified.
fn parse_used(text: &str) -> Result<AnnotatedFunction> {
    let mut func = decl::parse_function(text)?;
    let mut base = String::new();
    if let Some((scope, name)) = func.name.rsplit_once("::") {
        base = scope.to_string();
        func.name = name.to_string();
    }
    Ok(AnnotatedFunction {
        func,
        base,
        ..Default::default()
    })
}

/// Match each `@param` line onto exactly one parsed parameter.
fn document_params(func: &Function, docs: &[String]) -> Result<ArgList> {
    let mut params = func.args.params.clone();
    let mut seen: Vec<&str> = Vec::new();

    for doc in docs {
        let documented = doc
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::parse(doc.as_str(), "`@param` without a variable name"))?;
        if seen.contains(&documented) {
            return Err(Error::parse(
                doc.as_str(),
                format!("variable `{}` is documented more than once", documented),
            ));
        }
        let index = params
            .iter()
            .position(|p| !p.is_placeholder() && p.name == documented)
            .ok_or_else(|| {
                Error::parse(
                    doc.as_str(),
                    format!(
                        "documented variable `{}` not found in `{}`",
                        documented,
                        func.declaration()
                    ),
                )
            })?;
        params[index] = decl::apply_param_doc(&params[index], doc)?;
        seen.push(documented);
    }

    Ok(ArgList {
        params,
        spec: func.args.spec.clone(),
    })
}

/// Body lines following the declaration, braces removed and left margin stripped.
fn extract_body(lines: &[&str], opened: bool) -> std::result::Result<Option<String>, String> {
    let mut body: Vec<&str> = lines.to_vec();
    while body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }
    if body.is_empty() {
        return if opened {
            Err("missing closing `}`".to_string())
        } else {
            Ok(None)
        };
    }

    let opened = opened || body[0].trim() == "{";
    if body[0].trim() == "{" {
        body.remove(0);
    }
    if opened {
        match body.last() {
            Some(last) if last.trim() == "}" => {
                body.pop();
            }
            _ => return Err("missing closing `}`".to_string()),
        }
    }

    Ok(Some(unindent(&body.join("\n"))))
}

/// Strip the smallest common indentation from all non-empty lines.
fn unindent(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| if l.len() >= min_indent { &l[min_indent..] } else { l.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}
