//! Splits a component file into its top-level blocks.
//!
//! Uses memchr rather than a full HTML parser. `<template>` blocks may nest
//! (`<template v-if>` inside the root template); `<script>` and `<style>`
//! end at their first closing tag. Unknown top-level blocks are skipped.

use super::{Block, Descriptor};
use crate::error::CompileError;
use memchr::{memchr, memmem};

pub fn parse_descriptor(source: &str, filename: &str) -> Result<Descriptor, CompileError> {
    let bytes = source.as_bytes();
    let mut descriptor = Descriptor {
        filename: filename.to_string(),
        ..Descriptor::default()
    };
    let mut pointer = 0;

    while let Some(offset) = memchr(b'<', &bytes[pointer..]) {
        let tag_start = pointer + offset;

        if bytes[tag_start..].starts_with(b"<!--") {
            pointer = match memmem::find(&bytes[tag_start..], b"-->") {
                Some(end) => tag_start + end + 3,
                None => return Err(unclosed(filename, "!--", tag_start)),
            };
            continue;
        }

        let name_end = tag_name_end(bytes, tag_start + 1);
        let name = &source[tag_start + 1..name_end];
        if name.is_empty() {
            // `</...>` or a stray `<`
            pointer = tag_start + 1;
            continue;
        }

        let open_end = find_closing_angle(bytes, name_end)
            .ok_or_else(|| unclosed(filename, name, tag_start))?;
        let attrs = source[name_end..open_end].trim().trim_end_matches('/').trim();
        let self_closing = bytes[open_end - 1] == b'/';
        let content_start = open_end + 1;

        let (content_end, next) = if self_closing {
            (content_start, content_start)
        } else if name == "template" {
            find_template_end(bytes, content_start)
                .ok_or_else(|| unclosed(filename, name, tag_start))?
        } else {
            let close = format!("</{name}>");
            let end = memmem::find(&bytes[content_start..], close.as_bytes())
                .map(|p| content_start + p)
                .ok_or_else(|| unclosed(filename, name, tag_start))?;
            (end, end + close.len())
        };

        let block = Block {
            content: source[content_start..content_end].to_string(),
            attrs: attrs.to_string(),
            start: content_start,
        };

        match name {
            "template" => {
                if descriptor.template.is_some() {
                    return Err(duplicate(filename, name));
                }
                descriptor.template = Some(block);
            }
            "script" => {
                if block.has_attr("setup") {
                    return Err(CompileError::ScriptSetup {
                        file: filename.to_string(),
                    });
                }
                if descriptor.script.is_some() {
                    return Err(duplicate(filename, name));
                }
                descriptor.script = Some(block);
            }
            "style" => descriptor.styles.push(block),
            _ => {}
        }

        pointer = next;
    }

    if descriptor.template.is_none() && descriptor.script.is_none() {
        return Err(CompileError::Invalid {
            file: filename.to_string(),
            message: "a component needs at least one <template> or <script> block".to_string(),
        });
    }

    Ok(descriptor)
}

fn tag_name_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    i
}

/// The `>` ending an opening tag, skipping quoted attribute values.
fn find_closing_angle(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match (byte, quote) {
            (b'"' | b'\'', None) => quote = Some(byte),
            (b, Some(q)) if b == q => quote = None,
            (b'>', None) => return Some(start + i),
            _ => {}
        }
    }

    None
}

/// Match nested `<template>` tags; returns (content end, offset after `</template>`).
fn find_template_end(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    const OPEN: &[u8] = b"<template";
    const CLOSE: &[u8] = b"</template>";

    let mut depth = 0usize;
    let mut i = start;

    loop {
        let next_close = memmem::find(&bytes[i..], CLOSE).map(|p| i + p)?;
        let next_open = memmem::find(&bytes[i..next_close], OPEN)
            .map(|p| i + p)
            .filter(|&p| is_tag_boundary(bytes, p + OPEN.len()));

        match next_open {
            Some(open) => {
                let open_end = find_closing_angle(bytes, open + OPEN.len())?;
                if bytes[open_end - 1] != b'/' {
                    depth += 1;
                }
                i = open_end + 1;
            }
            None if depth == 0 => return Some((next_close, next_close + CLOSE.len())),
            None => {
                depth -= 1;
                i = next_close + CLOSE.len();
            }
        }
    }
}

fn is_tag_boundary(bytes: &[u8], i: usize) -> bool {
    matches!(bytes.get(i), Some(b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/'))
}

fn unclosed(file: &str, tag: &str, offset: usize) -> CompileError {
    CompileError::UnclosedBlock {
        file: file.to_string(),
        tag: tag.to_string(),
        offset,
    }
}

fn duplicate(file: &str, tag: &str) -> CompileError {
    CompileError::DuplicateBlock {
        file: file.to_string(),
        tag: tag.to_string(),
    }
}
