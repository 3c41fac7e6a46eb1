//! Single-file component compilation.
//!
//! A `.vue` file is split into blocks, each block is compiled by a
//! [`ComponentCompiler`], and the pieces are assembled into one ES module
//! whose default export is the component options object.

pub mod builtin;
pub mod parse;

pub use builtin::BuiltinCompiler;

use crate::error::{CompileError, Error, Result};
use std::fmt::Write;
use std::path::Path;

/// Name of the component object in assembled output.
pub const COMPONENT_BINDING: &str = "__sfc_main";
/// Name of the compiled template constant in assembled output.
pub const TEMPLATE_BINDING: &str = "__sfc_template";

/// One top-level block of a component file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Text between the opening and closing tag.
    pub content: String,
    /// Raw attribute text of the opening tag.
    pub attrs: String,
    /// Byte offset of `content` in the component source.
    pub start: usize,
}

impl Block {
    /// Whether the opening tag carries `name`, with or without a value.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr_pairs().any(|(key, _)| key == name)
    }

    /// Value of attribute `name`, quotes stripped.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attr_pairs()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value)
    }

    fn attr_pairs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        AttrIter {
            rest: self.attrs.as_str(),
        }
    }
}

struct AttrIter<'a> {
    rest: &'a str,
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.trim_start();
        if rest.is_empty() {
            return None;
        }

        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        let after_key = rest[key_end..].trim_start();

        let Some(value_part) = after_key.strip_prefix('=') else {
            self.rest = after_key;
            return Some((key, None));
        };

        let value_part = value_part.trim_start();
        let (value, remaining) = match value_part.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &value_part[1..];
                match body.find(q) {
                    Some(end) => (&body[..end], &body[end + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let end = value_part.find(char::is_whitespace).unwrap_or(value_part.len());
                (&value_part[..end], &value_part[end..])
            }
        };

        self.rest = remaining;
        Some((key, Some(value)))
    }
}

/// The blocks of one component file.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    /// Request path or file name, used in error messages.
    pub filename: String,
    pub template: Option<Block>,
    pub script: Option<Block>,
    pub styles: Vec<Block>,
}

/// The three steps of component compilation.
///
/// Output contract:
/// - `compile_template` returns code declaring a `const` named
///   [`TEMPLATE_BINDING`].
/// - `compile_script` returns code declaring a `const` named
///   [`COMPONENT_BINDING`] holding the component options object.
pub trait ComponentCompiler: Send + Sync {
    fn parse(&self, source: &str, filename: &str) -> Result<Descriptor, CompileError>;

    fn compile_template(&self, template: &Block, descriptor: &Descriptor, id: &str) -> Result<String, CompileError>;

    fn compile_script(&self, descriptor: &Descriptor, id: &str) -> Result<String, CompileError>;
}

/// Derive a component id from its request path: every character that is
/// not an ASCII letter or digit becomes `_`.
#[must_use]
pub fn component_id(request_path: &str) -> String {
    request_path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Compile component source into an ES module.
pub fn assemble_component(
    compiler: &dyn ComponentCompiler,
    source: &str,
    filename: &str,
    id: &str,
) -> Result<String, CompileError> {
    let descriptor = compiler.parse(source, filename)?;

    let template = descriptor
        .template
        .as_ref()
        .map(|block| compiler.compile_template(block, &descriptor, id))
        .transpose()?;
    let script = compiler.compile_script(&descriptor, id)?;

    let mut out = String::new();
    if let Some(template) = &template {
        out.push_str(template);
        out.push('\n');
    }
    out.push_str(&script);
    out.push('\n');

    if template.is_some() {
        let _ = writeln!(out, "{COMPONENT_BINDING}.template = {TEMPLATE_BINDING};");
    }
    let _ = writeln!(out, "{COMPONENT_BINDING}.__hmrId = {};", js_string(id));
    let _ = writeln!(out, "{COMPONENT_BINDING}.__file = {};", js_string(filename));

    if !descriptor.styles.is_empty() {
        let css: Vec<&str> = descriptor.styles.iter().map(|s| s.content.as_str()).collect();
        out.push_str(&style_injection(id, &css.join("\n")));
    }

    let _ = writeln!(out, "export default {COMPONENT_BINDING};");
    Ok(out)
}

/// Read a component from disk and compile it.
pub async fn compile_component(
    compiler: &dyn ComponentCompiler,
    path: &Path,
    request_path: &str,
) -> Result<String> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::read(path, e))?;
    let id = component_id(request_path);
    Ok(assemble_component(compiler, &source, request_path, &id)?)
}

fn style_injection(id: &str, css: &str) -> String {
    format!(
        "const __sfc_style = document.createElement('style');\n\
         __sfc_style.setAttribute('data-minivite-component', {id});\n\
         __sfc_style.textContent = {css};\n\
         document.head.appendChild(__sfc_style);\n",
        id = js_string(id),
        css = js_string(css),
    )
}

/// A JSON string literal is also a valid JS string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
