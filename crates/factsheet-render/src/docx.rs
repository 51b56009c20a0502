//! DOCX template rendering
//!
//! A DOCX template is a zip package. The main document part and any header
//! and footer parts are rendered as templates; every other entry is copied
//! unchanged.

use crate::error::RenderError;
use minijinja::Environment;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Whether a package entry holds renderable text
fn is_template_part(name: &str) -> bool {
    if name == "word/document.xml" {
        return true;
    }
    let Some(part) = name.strip_prefix("word/") else {
        return false;
    };
    (part.starts_with("header") || part.starts_with("footer")) && part.ends_with(".xml") && !part.contains('/')
}

pub(crate) fn render_docx(
    env: &Environment<'static>,
    template_path: &Path,
    values: &BTreeMap<&str, &str>,
) -> Result<Vec<u8>, RenderError> {
    let package_error = |e: zip::result::ZipError| RenderError::template(template_path, e);

    let file = File::open(template_path).map_err(|e| RenderError::io(template_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(package_error)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    // Fixed timestamp keeps repeated renders byte-identical
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for index in 0..archive.len() {
        let name = archive.by_index_raw(index).map_err(package_error)?.name().to_string();

        if !is_template_part(&name) {
            let entry = archive.by_index_raw(index).map_err(package_error)?;
            writer.raw_copy_file(entry).map_err(package_error)?;
            continue;
        }

        let mut xml = String::new();
        archive
            .by_index(index)
            .map_err(package_error)?
            .read_to_string(&mut xml)
            .map_err(|e| RenderError::template(template_path, format!("{}: {}", name, e)))?;

        let source = merge_split_placeholders(&xml);
        let rendered = env
            .render_str(&source, values)
            .map_err(|e| RenderError::template(template_path, format!("{}: {}", name, e)))?;

        writer.start_file(name.as_str(), options).map_err(package_error)?;
        writer
            .write_all(rendered.as_bytes())
            .map_err(|e| RenderError::template(template_path, e))?;
    }

    let cursor = writer.finish().map_err(package_error)?;
    Ok(cursor.into_inner())
}

/// Rejoin template expressions that Word split across runs.
///
/// Word freely inserts run boundaries inside text, so `{{ phase }}` may be
/// stored as `{{</w:t></w:r><w:r><w:t>phase }}`. Markup inside an
/// expression is dropped (it always comes in close/open pairs) and XML
/// entities inside it are decoded so the template engine sees plain syntax.
pub(crate) fn merge_split_placeholders(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;

    while let Some(rel) = xml[pos..].find('{') {
        let brace = pos + rel;
        out.push_str(&xml[pos..brace]);

        let next = skip_tags(xml, brace + 1);
        let opener = xml[next..].chars().next();
        let close = match opener {
            Some('{') => Some('}'),
            Some('%') => Some('%'),
            Some('#') => Some('#'),
            _ => None,
        };

        if let (Some(opener), Some(close)) = (opener, close) {
            if let Some((expr, end)) = collect_expression(xml, next + 1, close) {
                out.push('{');
                out.push(opener);
                out.push_str(&decode_entities(&expr));
                out.push(close);
                out.push('}');
                pos = end;
                continue;
            }
        }

        out.push('{');
        pos = brace + 1;
    }

    out.push_str(&xml[pos..]);
    out
}

fn skip_tags(xml: &str, mut pos: usize) -> usize {
    while xml[pos..].starts_with('<') {
        match xml[pos..].find('>') {
            Some(end) => pos += end + 1,
            None => return xml.len(),
        }
    }
    pos
}

/// Collect expression text up to `close` + `}`, skipping markup.
/// Returns the text and the index just past the closing brace.
fn collect_expression(xml: &str, start: usize, close: char) -> Option<(String, usize)> {
    let mut expr = String::new();
    let mut pos = start;

    while let Some(ch) = xml[pos..].chars().next() {
        if ch == '<' {
            pos += xml[pos..].find('>')? + 1;
            continue;
        }
        if ch == close {
            let after = skip_tags(xml, pos + 1);
            if xml[after..].starts_with('}') {
                return Some((expr, after + 1));
            }
        }
        expr.push(ch);
        pos += ch.len_utf8();
    }

    None
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parts() {
        assert!(is_template_part("word/document.xml"));
        assert!(is_template_part("word/header1.xml"));
        assert!(is_template_part("word/footer2.xml"));
        assert!(!is_template_part("word/styles.xml"));
        assert!(!is_template_part("word/_rels/header1.xml.rels"));
        assert!(!is_template_part("[Content_Types].xml"));
    }

    #[test]
    fn test_intact_placeholder_is_unchanged() {
        let xml = "<w:t>Phase: {{ s1_study_phase }}</w:t>";
        assert_eq!(merge_split_placeholders(xml), xml);
    }

    #[test]
    fn test_split_placeholder_is_merged() {
        let xml = "<w:r><w:t>{</w:t></w:r><w:r><w:t>{ s1_</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>phase }</w:t></w:r><w:r><w:t>}</w:t></w:r>";
        assert_eq!(
            merge_split_placeholders(xml),
            "<w:r><w:t>{{ s1_phase }}</w:t></w:r>"
        );
    }

    #[test]
    fn test_block_tags_and_entities() {
        let xml = "<w:t>{% if x == &quot;a&quot; %}yes{% endif %}</w:t>";
        assert_eq!(
            merge_split_placeholders(xml),
            "<w:t>{% if x == \"a\" %}yes{% endif %}</w:t>"
        );
    }

    #[test]
    fn test_lone_braces_are_kept() {
        let xml = "<w:t>a { b } c {</w:t>";
        assert_eq!(merge_split_placeholders(xml), xml);
    }

    #[test]
    fn test_unterminated_expression_is_kept() {
        let xml = "<w:t>{{ open</w:t>";
        assert_eq!(merge_split_placeholders(xml), xml);
    }

    #[test]
    fn test_non_ascii_text() {
        let xml = "<w:t>Étude {{ titre }} – phase</w:t>";
        assert_eq!(merge_split_placeholders(xml), xml);
    }
}
