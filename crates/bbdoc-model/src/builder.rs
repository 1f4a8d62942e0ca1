//! Class record parsing.

use std::path::Path;

use crate::entity::{
    ClassEntity, ConstantEntity, EnumEntity, MemberEntity, MethodEntity, Parameter,
    PropertyEntity, SignalEntity, Status, Tutorial,
};
use crate::error::ModelError;
use crate::xml::XmlElement;

/// Parse one class record.
///
/// `source_id` identifies the record in diagnostics and is stored on the entity.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the root is not `<class>`, or
/// the class has no name.
pub fn parse_class(xml: &str, source_id: &str) -> Result<ClassEntity, ModelError> {
    parse_class_inner(xml, source_id).map_err(|e| e.in_record(source_id))
}

fn parse_class_inner(xml: &str, source_id: &str) -> Result<ClassEntity, ModelError> {
    let root = XmlElement::parse(xml)?;
    if root.tag != "class" {
        return Err(ModelError::UnexpectedRoot {
            expected: "class",
            found: root.tag,
        });
    }

    let name = required_attr(&root, "name")?.to_owned();

    let properties = root
        .child("members")
        .map(|members| {
            members
                .children_named("member")
                .map(parse_property)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let methods = root
        .child("methods")
        .map(|methods| {
            methods
                .children_named("method")
                .map(parse_method)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let signals = root
        .child("signals")
        .map(|signals| {
            signals
                .children_named("signal")
                .map(parse_signal)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let mut constants = Vec::new();
    let mut enums: Vec<EnumEntity> = Vec::new();
    if let Some(container) = root.child("constants") {
        for element in container.children_named("constant") {
            let constant = parse_constant(element)?;
            match constant.enum_name.clone() {
                Some(enum_name) => {
                    let index = match enums.iter().position(|e| e.name == enum_name) {
                        Some(index) => index,
                        None => {
                            enums.push(EnumEntity {
                                name: enum_name,
                                ..EnumEntity::default()
                            });
                            enums.len() - 1
                        }
                    };
                    let group = &mut enums[index];
                    group.is_bitfield |= constant.is_bitfield;
                    group.items.push(constant);
                }
                None => constants.push(constant),
            }
        }
    }

    let tutorials = root
        .child("tutorials")
        .map(|tutorials| tutorials.children_named("link").map(parse_tutorial).collect())
        .unwrap_or_default();

    let class = ClassEntity {
        name,
        parent_name: root.attr("inherits").unwrap_or_default().trim().to_owned(),
        brief_description: root.child_text("brief_description").to_owned(),
        description: root.child_text("description").to_owned(),
        experimental: status(&root, "is_experimental", "experimental"),
        deprecated: status(&root, "is_deprecated", "deprecated"),
        tutorials,
        properties,
        methods,
        signals,
        constants,
        enums,
        is_local: true,
        source_id: source_id.to_owned(),
    };

    tracing::debug!(
        class = %class.name,
        properties = class.properties.len(),
        methods = class.methods.len(),
        source = source_id,
        "Parsed class record"
    );
    Ok(class)
}

/// Parse every `*.xml` record in `dir`, in file name order.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be read, a record is
/// invalid, or two records declare the same class.
pub fn load_classes(dir: &Path) -> Result<Vec<ClassEntity>, ModelError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ModelError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ModelError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut classes: Vec<ClassEntity> = Vec::with_capacity(paths.len());
    for path in paths {
        let xml = std::fs::read_to_string(&path).map_err(|e| ModelError::io(&path, e))?;
        let class = parse_class(&xml, &path.display().to_string())?;
        if let Some(first) = classes.iter().find(|c| c.name == class.name) {
            return Err(ModelError::DuplicateClass {
                name: class.name,
                first: first.source_id.clone(),
                second: class.source_id,
            });
        }
        classes.push(class);
    }

    tracing::info!(count = classes.len(), dir = %dir.display(), "Loaded class records");
    Ok(classes)
}

fn required_attr<'a>(element: &'a XmlElement, attribute: &'static str) -> Result<&'a str, ModelError> {
    element
        .attr(attribute)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ModelError::MissingAttribute {
            element: element.tag.clone(),
            attribute,
        })
}

fn status(element: &XmlElement, flag: &str, message: &str) -> Status {
    Status::from_markers(element.attr(flag), element.attr(message))
}

fn member(element: &XmlElement, description: &str) -> Result<MemberEntity, ModelError> {
    Ok(MemberEntity {
        name: required_attr(element, "name")?.to_owned(),
        description: description.to_owned(),
        deprecated: status(element, "is_deprecated", "deprecated"),
        experimental: status(element, "is_experimental", "experimental"),
    })
}

fn optional_attr(element: &XmlElement, key: &str) -> Option<String> {
    element.attr(key).map(str::to_owned)
}

fn parse_parameters(element: &XmlElement) -> Result<Vec<Parameter>, ModelError> {
    element
        .children
        .iter()
        .filter(|c| c.tag == "param" || c.tag == "argument")
        .map(|p| {
            Ok(Parameter {
                name: required_attr(p, "name")?.to_owned(),
                type_name: p.attr("type").unwrap_or("Variant").to_owned(),
                default: optional_attr(p, "default"),
            })
        })
        .collect()
}

fn parse_property(element: &XmlElement) -> Result<PropertyEntity, ModelError> {
    Ok(PropertyEntity {
        member: member(element, &element.text)?,
        type_name: element.attr("type").unwrap_or("Variant").to_owned(),
        default: optional_attr(element, "default"),
        enum_name: optional_attr(element, "enum"),
        setter: optional_attr(element, "setter").filter(|s| !s.is_empty()),
        getter: optional_attr(element, "getter").filter(|s| !s.is_empty()),
    })
}

fn parse_method(element: &XmlElement) -> Result<MethodEntity, ModelError> {
    let return_type = element
        .child("return")
        .and_then(|r| r.attr("type"))
        .unwrap_or("void")
        .to_owned();
    Ok(MethodEntity {
        member: member(element, element.child_text("description"))?,
        parameters: parse_parameters(element)?,
        return_type,
        qualifiers: optional_attr(element, "qualifiers").filter(|q| !q.is_empty()),
    })
}

fn parse_signal(element: &XmlElement) -> Result<SignalEntity, ModelError> {
    Ok(SignalEntity {
        member: member(element, element.child_text("description"))?,
        parameters: parse_parameters(element)?,
    })
}

fn parse_constant(element: &XmlElement) -> Result<ConstantEntity, ModelError> {
    Ok(ConstantEntity {
        member: member(element, &element.text)?,
        value: element.attr("value").unwrap_or_default().to_owned(),
        enum_name: optional_attr(element, "enum").filter(|e| !e.is_empty()),
        is_bitfield: element.attr("is_bitfield") == Some("true"),
    })
}

fn parse_tutorial(element: &XmlElement) -> Tutorial {
    let link = element.text.trim().to_owned();
    let title = element
        .attr("title")
        .filter(|t| !t.is_empty())
        .map_or_else(|| link.clone(), str::to_owned);
    Tutorial { title, link }
}
