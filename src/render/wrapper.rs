//! Wrapper classes exposing native getters and setters as properties.
//!
//! Accessors are found by name in the registry of every classified function:
//! `<area>_<name>` for a scalar getter, `<area>_get<Name>` for a buffer-filling
//! getter and `<area>_set<Name>` for the setter.

use super::{Artifact, Emitter};
use crate::config::{capitalize, Ordered};
use crate::crosswalk::{Crosswalk, PropKind};
use crate::error::{Error, Result};
use crate::generate::Registry;
use crate::model::BindingFunction;
use log::debug;

pub(super) const PROPERTY_SCALAR: &str = "csharp-property-int-double";
pub(super) const PROPERTY_STRING: &str = "csharp-property-string";
pub(super) const SCAFFOLD: &str = "csharp-scaffold-wrapper-class";

/// Suffix of the template used for properties without a setter.
const READONLY: &str = "-readonly";

impl Emitter<'_> {
    pub fn wrapper_class(
        &self,
        area: &str,
        props: &Ordered<String>,
        registry: &Registry,
    ) -> Result<Artifact> {
        let wrapper_class_name = self.config.wrapper_class_name(area);
        let handle_class_name = self.config.handle_class_name(area);
        if props.is_empty() {
            debug!("{} has no properties", wrapper_class_name);
        }

        let mut properties = Vec::new();
        for (c_name, cs_name) in props.iter() {
            properties.push(self.property_text(area, c_name, cs_name, registry)?);
        }

        let properties = properties.join("\n\n");
        self.artifact(
            format!("{}.g.cs", wrapper_class_name),
            "configuration",
            SCAFFOLD,
            &[
                ("wrapper_class_name", wrapper_class_name.as_str()),
                ("handle_class_name", handle_class_name.as_str()),
                ("cs_properties", properties.as_str()),
            ],
        )
    }

    fn property_text(
        &self,
        area: &str,
        c_name: &str,
        cs_name: &str,
        registry: &Registry,
    ) -> Result<String> {
        let (getter, prop_type) = self.resolve_getter(area, c_name, registry)?;
        let setter = registry.get(&format!("{}_set{}", area, capitalize(c_name)));
        debug!(
            "property {}.{}: getter {}, setter {:?}",
            area,
            cs_name,
            getter.name,
            setter.map(|s| s.name.as_str())
        );
        let setter_name = setter.map_or("", |s| s.name.as_str());

        let (template, text) = match Crosswalk::prop_kind(&prop_type) {
            Some(PropKind::Scalar(prop_type)) => {
                let template = template_name(PROPERTY_SCALAR, setter.is_some());
                let text = self.templates.render(
                    &template,
                    &[
                        ("prop_type", prop_type.as_str()),
                        ("cs_name", cs_name),
                        ("getter", getter.name.as_str()),
                        ("setter", setter_name),
                    ],
                );
                (template, text)
            }
            Some(PropKind::Str) => {
                // The size argument is `int` for some getters and `nuint` for others.
                let size = getter.args.params.get(1).ok_or_else(|| {
                    Error::classify(&getter.name, "string getter has no size parameter")
                })?;
                let template = template_name(PROPERTY_STRING, setter.is_some());
                let text = self.templates.render(
                    &template,
                    &[
                        ("cs_name", cs_name),
                        ("p_type", size.p_type.as_str()),
                        ("getter", getter.name.as_str()),
                        ("setter", setter_name),
                    ],
                );
                (template, text)
            }
            None => {
                return Err(Error::classify(
                    &getter.name,
                    format!("unable to scaffold properties of type `{}`", prop_type),
                ))
            }
        };
        debug!("    rendered with {}", template);
        text
    }

    /// The getter and the binding type of the property it reads.
    fn resolve_getter<'r>(
        &self,
        area: &str,
        c_name: &str,
        registry: &'r Registry,
    ) -> Result<(&'r BindingFunction, String)> {
        if let Some(getter) = registry.get(&format!("{}_{}", area, c_name)) {
            return Ok((getter, getter.ret_type.clone()));
        }

        let name = format!("{}_get{}", area, capitalize(c_name));
        let getter = registry
            .get(&name)
            .ok_or_else(|| Error::classify(&name, format!("no getter for property `{}`", c_name)))?;
        let buffer = getter
            .args
            .params
            .last()
            .ok_or_else(|| Error::classify(&name, "getter has no buffer parameter"))?;
        let prop_type = self.crosswalk.prop_type(&buffer.p_type).ok_or_else(|| {
            Error::classify(
                &name,
                format!("unable to scaffold properties of type `{}`", buffer.p_type),
            )
        })?;
        Ok((getter, prop_type.to_string()))
    }
}

fn template_name(base: &str, has_setter: bool) -> String {
    if has_setter {
        base.to_string()
    } else {
        format!("{}{}", base, READONLY)
    }
}
