//! Class page rendering.
//!
//! A page is laid out as:
//! - header: title, parent and children links, status banners
//! - brief and long descriptions, tutorials
//! - summary tables for properties, methods and signals
//! - signal details, enumerations and constants, each with an anchor
//! - detailed property and method descriptions, each with an anchor
//! - footer

use std::fmt::Write;

use bbdoc_markup::markdown::{escape_cell, make_anchor, make_internal_link, make_table};
use bbdoc_markup::{MarkupError, RefKind, RenderContext, format_optional_text, format_text_for_table};
use bbdoc_model::{ClassEntity, ConstantEntity, DocModel, MemberEntity, Parameter, PropertyEntity, Status};

/// Options shared by every generated page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Date shown in the footer. No footer is written when absent.
    pub generated_on: Option<String>,
}

impl PageOptions {
    pub(crate) fn write_footer(&self, out: &mut String) {
        if let Some(date) = &self.generated_on {
            let _ = writeln!(out, "_Generated on {date}_");
        }
    }
}

/// Render the page of one class.
///
/// References without a class name resolve against `class`. The output only
/// depends on the arguments, so rendering twice gives identical text.
///
/// # Errors
///
/// Returns an error if a description holds a reference that cannot be resolved.
pub fn render_class_page(
    class: &ClassEntity,
    model: &DocModel,
    ctx: &RenderContext<'_>,
    options: &PageOptions,
) -> Result<String, MarkupError> {
    let ctx = ctx.with_current_class(&class.name);
    let mut page = ClassPage {
        class,
        model,
        ctx,
        out: String::new(),
    };

    page.header()?;
    page.descriptions()?;
    page.tutorials();
    page.property_summary()?;
    page.method_summary()?;
    page.signals()?;
    page.enumerations()?;
    page.constants()?;
    page.property_descriptions()?;
    page.method_descriptions()?;
    options.write_footer(&mut page.out);

    Ok(page.out)
}

struct ClassPage<'a, 'c> {
    class: &'a ClassEntity,
    model: &'a DocModel,
    ctx: RenderContext<'c>,
    out: String,
}

impl ClassPage<'_, '_> {
    fn header(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        let _ = write!(self.out, "# {}\n\n", class.name);

        if class.has_parent() {
            let _ = write!(
                self.out,
                "Inherits: {}\n\n",
                self.ctx.type_link(&class.parent_name)
            );
        }

        let children = self.model.children(&class.name);
        if !children.is_empty() {
            let links: Vec<String> = children.iter().map(|c| self.ctx.type_link(c)).collect();
            let _ = write!(self.out, "Inherited by: {}\n\n", links.join(", "));
        }

        self.banners(&class.experimental, &class.deprecated, "class")
    }

    fn banners(&mut self, experimental: &Status, deprecated: &Status, what: &str) -> Result<(), MarkupError> {
        let experimental_default = format!("This {what} may be changed or removed in future versions.");
        let deprecated_default = format!("This {what} may be removed in a future version.");
        for (label, status, default) in [
            ("Experimental", experimental, experimental_default),
            ("Deprecated", deprecated, deprecated_default),
        ] {
            if let Some(banner) = banner(label, status, &default, &self.ctx)? {
                self.out.push_str(&banner);
                self.out.push_str("\n\n");
            }
        }
        Ok(())
    }

    fn descriptions(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if let Some(brief) = format_optional_text(&class.brief_description, &self.ctx)? {
            self.out.push_str(&brief);
            self.out.push_str("\n\n");
        }
        if let Some(description) = format_optional_text(&class.description, &self.ctx)? {
            let _ = write!(self.out, "## Description\n\n{description}\n\n");
        }
        Ok(())
    }

    fn tutorials(&mut self) {
        let class = self.class;
        if class.tutorials.is_empty() {
            return;
        }
        self.out.push_str("## Tutorials\n\n");
        for tutorial in &class.tutorials {
            let _ = writeln!(self.out, "- [{}]({})", tutorial.title, tutorial.link);
        }
        self.out.push('\n');
    }

    fn property_summary(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.properties.is_empty() {
            return Ok(());
        }
        let mut rows = vec![vec!["Type".to_owned(), "Name".to_owned(), "Default".to_owned()]];
        for property in &class.properties {
            rows.push(vec![
                property_type(property, &self.ctx)?,
                make_internal_link(&property.member.name) + &status_marker(&property.member),
                property.default.as_deref().map(escape_cell).unwrap_or_default(),
            ]);
        }
        let _ = write!(self.out, "## Properties\n\n{}\n\n", make_table(&rows));
        Ok(())
    }

    fn method_summary(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.methods.is_empty() {
            return Ok(());
        }
        let mut rows = vec![vec!["Return".to_owned(), "Signature".to_owned()]];
        for method in &class.methods {
            let mut signature = format!(
                "{} {}",
                make_internal_link(&method.member.name),
                escape_cell(&arglist(&method.parameters, &self.ctx))
            );
            if let Some(qualifiers) = &method.qualifiers {
                signature.push(' ');
                signature.push_str(qualifiers);
            }
            signature.push_str(&status_marker(&method.member));
            rows.push(vec![self.ctx.type_link(&method.return_type), signature]);
        }
        let _ = write!(self.out, "## Methods\n\n{}\n\n", make_table(&rows));
        Ok(())
    }

    fn signals(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.signals.is_empty() {
            return Ok(());
        }
        let mut rows = vec![vec!["Signal".to_owned(), "Parameters".to_owned()]];
        for signal in &class.signals {
            rows.push(vec![
                make_internal_link(&signal.member.name) + &status_marker(&signal.member),
                escape_cell(&arglist(&signal.parameters, &self.ctx)),
            ]);
        }
        let _ = write!(self.out, "## Signals\n\n{}\n\n", make_table(&rows));
        for signal in &class.signals {
            let _ = write!(
                self.out,
                "- {}**{}**{}\n\n",
                make_anchor(&signal.member.name),
                signal.member.name,
                arglist(&signal.parameters, &self.ctx)
            );
            self.member_body(&signal.member, "signal")?;
        }
        Ok(())
    }

    fn enumerations(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.enums.is_empty() {
            return Ok(());
        }
        self.out.push_str("## Enumerations\n\n");
        for group in &class.enums {
            let keyword = if group.is_bitfield { "flags" } else { "enum" };
            let _ = write!(
                self.out,
                "{keyword} {}**{}**:\n\n",
                make_anchor(&group.name),
                group.name
            );
            self.constant_list(&group.items)?;
            self.out.push('\n');
        }
        Ok(())
    }

    fn constants(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.constants.is_empty() {
            return Ok(());
        }
        self.out.push_str("## Constants\n\n");
        self.constant_list(&class.constants)?;
        self.out.push('\n');
        Ok(())
    }

    fn constant_list(&mut self, constants: &[ConstantEntity]) -> Result<(), MarkupError> {
        for constant in constants {
            let _ = write!(
                self.out,
                "- {}**{}** = **{}**",
                make_anchor(&constant.member.name),
                constant.member.name,
                constant.value
            );
            let description = format_text_for_table(&constant.member.description, &self.ctx)?;
            if !description.is_empty() {
                let _ = write!(self.out, " --- {description}");
            }
            self.out.push_str(&status_marker(&constant.member));
            self.out.push('\n');
        }
        Ok(())
    }

    fn property_descriptions(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.properties.is_empty() {
            return Ok(());
        }
        self.out.push_str("## Property Descriptions\n\n");
        for property in &class.properties {
            let _ = write!(
                self.out,
                "- {}{} **{}**",
                property_type(property, &self.ctx)?,
                make_anchor(&property.member.name),
                property.member.name
            );
            if let Some(default) = &property.default {
                let _ = write!(self.out, " = {default}");
            }
            self.out.push_str("\n\n");
            if let Some(setter) = &property.setter {
                let _ = write!(self.out, "`{setter}(value)` setter\n\n");
            }
            if let Some(getter) = &property.getter {
                let _ = write!(self.out, "`{getter}()` getter\n\n");
            }
            self.member_body(&property.member, "property")?;
            self.out.push('\n');
        }
        Ok(())
    }

    fn method_descriptions(&mut self) -> Result<(), MarkupError> {
        let class = self.class;
        if class.methods.is_empty() {
            return Ok(());
        }
        self.out.push_str("## Method Descriptions\n\n");
        for method in &class.methods {
            let _ = write!(
                self.out,
                "- {}{} **{}**{}",
                self.ctx.type_link(&method.return_type),
                make_anchor(&method.member.name),
                method.member.name,
                arglist(&method.parameters, &self.ctx)
            );
            if let Some(qualifiers) = &method.qualifiers {
                let _ = write!(self.out, " {qualifiers}");
            }
            self.out.push_str("\n\n");
            self.member_body(&method.member, "method")?;
            self.out.push('\n');
        }
        Ok(())
    }

    /// Status banners and description of a member.
    fn member_body(&mut self, member: &MemberEntity, what: &str) -> Result<(), MarkupError> {
        self.banners(&member.experimental, &member.deprecated, what)?;
        if let Some(description) = format_optional_text(&member.description, &self.ctx)? {
            self.out.push_str(&description);
            self.out.push_str("\n\n");
        }
        Ok(())
    }
}

/// Blockquote announcing a flagged status, or `None` when `status` is stable.
fn banner(
    label: &str,
    status: &Status,
    default: &str,
    ctx: &RenderContext<'_>,
) -> Result<Option<String>, MarkupError> {
    if !status.is_flagged() {
        return Ok(None);
    }
    let message = match status.message() {
        Some(message) => format_optional_text(message, ctx)?,
        None => None,
    };
    let text = format!("**{label}**: {}", message.as_deref().unwrap_or(default));
    let quoted: Vec<String> = text
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_owned()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    Ok(Some(quoted.join("\n")))
}

/// Marker appended to a member name in summaries.
fn status_marker(member: &MemberEntity) -> String {
    let mut marker = String::new();
    if member.experimental.is_flagged() {
        marker.push_str(" *(experimental)*");
    }
    if member.deprecated.is_flagged() {
        marker.push_str(" *(deprecated)*");
    }
    marker
}

/// Type of a property, linking to its enum when it has one.
fn property_type(property: &PropertyEntity, ctx: &RenderContext<'_>) -> Result<String, MarkupError> {
    let Some(enum_name) = &property.enum_name else {
        return Ok(ctx.type_link(&property.type_name));
    };
    match enum_name.split_once('.') {
        Some((class, name)) => Ok(ctx.member_link(RefKind::Enum, class, name)),
        None => {
            let class = ctx.current_class().ok_or_else(|| MarkupError::MissingClassContext {
                tag: "enum".to_owned(),
                symbol: enum_name.clone(),
            })?;
            Ok(ctx.member_link(RefKind::Enum, class, enum_name))
        }
    }
}

/// Parameter list such as `( [int](...) a, [int](...) b=0 )`.
fn arglist(parameters: &[Parameter], ctx: &RenderContext<'_>) -> String {
    let mut out = String::from("(");
    for (index, parameter) in parameters.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        let _ = write!(out, " {} {}", ctx.type_link(&parameter.type_name), parameter.name);
        if let Some(default) = &parameter.default {
            let _ = write!(out, "={default}");
        }
    }
    out.push_str(" )");
    out
}
