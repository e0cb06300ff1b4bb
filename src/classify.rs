//! Function classification by naming convention, and rewriting into the
//! binding-language signature.
//!
//! Names follow `<area>_<method>`. Outside the global area, `new*` methods
//! construct a handle, `del*` methods release one, configured accessors return
//! a related handle, and every other method takes the handle as its first
//! parameter.

use crate::config::Config;
use crate::crosswalk::Crosswalk;
use crate::error::{Error, Result};
use crate::model::*;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

const CONSTRUCTOR_MARKER: &str = "new";
const DESTRUCTOR_MARKER: &str = "del";
const SETTER_MARKER: &str = "set";

/// Binding type of a raw mutable floating-point pointer.
const DOUBLE_POINTER: &str = "double*";
const DOUBLE_ARRAY: &str = "double[]";

/// Two-value state setters such as `thermo_set_TP`.
static RE_PAIR_SETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set_[A-Z]{2}$").unwrap());

/// Binding-language role of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Belongs to the global area; emitted as is.
    Global,
    /// Returns a new handle.
    Constructor,
    /// Releases a handle.
    Destructor,
    /// Returns a handle of the given class for the receiver.
    Accessor(String),
    /// Ordinary instance method (receiver first) or parameterless function.
    Plain,
}

/// Decide the role of `func` from its name.
pub fn shape(func: &Function, config: &Config) -> Result<Shape> {
    let (area, method) = split_name(func)?;
    if area == config.global_area {
        return Ok(Shape::Global);
    }
    if method.starts_with(DESTRUCTOR_MARKER) {
        return Ok(Shape::Destructor);
    }
    if method.starts_with(CONSTRUCTOR_MARKER) {
        return Ok(Shape::Constructor);
    }
    if let Some(ret_type) = config.class_accessors.get(&func.name) {
        return Ok(Shape::Accessor(ret_type.clone()));
    }
    Ok(Shape::Plain)
}

/// Rewrite `func` into its binding-language form.
pub fn transform(func: &Function, config: &Config, crosswalk: &Crosswalk) -> Result<BindingFunction> {
    let (area, method) = split_name(func)?;
    let handle = config.handle_class_name(area);
    let shape = shape(func, config)?;
    debug!("{} classified as {:?}", func.name, shape);

    let mut ret_type = func.ret_type.clone();
    let mut params = func.args.params.clone();
    let mut release_handle = None;

    match shape {
        Shape::Global => {}
        Shape::Destructor => release_handle = Some(handle),
        Shape::Constructor => ret_type = handle,
        Shape::Accessor(accessor) => {
            if params.is_empty() {
                return Err(Error::classify(
                    &func.name,
                    "accessor has no receiver parameter",
                ));
            }
            ret_type = accessor;
            params[0] = Param::new(handle, params[0].name.clone());
        }
        Shape::Plain => {
            if let Some(first) = params.first_mut() {
                *first = Param::new(handle, first.name.clone());
            }
        }
    }

    let ret_type = crosswalk.binding_type(&ret_type).to_string();

    let mut array_count = 0;
    for param in params.iter_mut() {
        let mut p_type = crosswalk.binding_type(&param.p_type).to_string();

        if p_type == DOUBLE_POINTER && method.starts_with(SETTER_MARKER) {
            array_count += 1;
            if array_count > 1 {
                return Err(Error::classify(
                    &func.name,
                    "more than one array of doubles in a setter",
                ));
            }
            p_type = match config.pair_setter_type(area) {
                Some(pair) if RE_PAIR_SETTER.is_match(method) => pair.to_string(),
                _ => DOUBLE_ARRAY.to_string(),
            };
        }

        param.p_type = p_type;
    }

    Ok(BindingFunction {
        ret_type,
        name: func.name.clone(),
        args: ArgList::new(params),
        release_handle,
    })
}

fn split_name(func: &Function) -> Result<(&str, &str)> {
    func.area_and_method()
        .filter(|(area, method)| !area.is_empty() && !method.is_empty())
        .ok_or_else(|| Error::classify(&func.name, "name does not follow `<area>_<method>`"))
}
