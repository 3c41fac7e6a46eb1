//! The built-in component compiler.
//!
//! Templates are shipped as strings for the runtime template compiler
//! (the full `vue.esm-browser.js` build), so no render function is
//! generated here. The script block's default export becomes the
//! component object.

use super::{js_string, parse, Block, ComponentCompiler, Descriptor, COMPONENT_BINDING, TEMPLATE_BINDING};
use crate::error::CompileError;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCompiler;

impl ComponentCompiler for BuiltinCompiler {
    fn parse(&self, source: &str, filename: &str) -> Result<Descriptor, CompileError> {
        parse::parse_descriptor(source, filename)
    }

    fn compile_template(&self, template: &Block, descriptor: &Descriptor, _id: &str) -> Result<String, CompileError> {
        reject_external(template, "template", descriptor)?;
        if let Some(lang) = template.attr("lang").filter(|l| *l != "html") {
            return Err(invalid(descriptor, format!("<template lang=\"{lang}\"> is not supported")));
        }

        Ok(format!("const {TEMPLATE_BINDING} = {};", js_string(template.content.trim())))
    }

    fn compile_script(&self, descriptor: &Descriptor, _id: &str) -> Result<String, CompileError> {
        let Some(script) = &descriptor.script else {
            return Ok(format!("const {COMPONENT_BINDING} = {{}};"));
        };

        reject_external(script, "script", descriptor)?;
        if let Some(lang) = script.attr("lang").filter(|l| !matches!(*l, "js" | "javascript")) {
            return Err(invalid(descriptor, format!("<script lang=\"{lang}\"> is not supported")));
        }

        let code = script.content.trim();
        match find_default_export(code) {
            Some((start, end)) => Ok(format!("{}const {COMPONENT_BINDING} ={}", &code[..start], &code[end..])),
            None => Ok(format!("{code}\nconst {COMPONENT_BINDING} = {{}};")),
        }
    }
}

fn reject_external(block: &Block, tag: &str, descriptor: &Descriptor) -> Result<(), CompileError> {
    match block.attr("src") {
        Some(src) => Err(invalid(descriptor, format!("<{tag} src=\"{src}\"> is not supported"))),
        None => Ok(()),
    }
}

fn invalid(descriptor: &Descriptor, message: String) -> CompileError {
    CompileError::Invalid {
        file: descriptor.filename.clone(),
        message,
    }
}

/// Byte range of the `export default` keywords, outside comments and strings.
fn find_default_export(code: &str) -> Option<(usize, usize)> {
    let bytes = code.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = memchr::memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |p| i + p);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = memchr::memmem::find(&bytes[i + 2..], b"*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            }
            quote @ (b'"' | b'\'' | b'`') => i = skip_string(bytes, i + 1, quote),
            b'e' if is_word_at(bytes, i, b"export") => {
                let mut j = i + b"export".len();
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j > i + b"export".len() && is_word_at(bytes, j, b"default") {
                    return Some((i, j + b"default".len()));
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    None
}

fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn is_word_at(bytes: &[u8], i: usize, word: &[u8]) -> bool {
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';

    bytes[i..].starts_with(word)
        && (i == 0 || !is_ident(bytes[i - 1]))
        && bytes.get(i + word.len()).map_or(true, |&b| !is_ident(b))
}
