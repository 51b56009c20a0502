//! Text extraction per container format

use crate::error::DocumentError;
use crate::format::DocumentFormat;
use crate::upload::validate_file_size;
use pdf::file::FileOptions;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, error, info};

/// Default upload size limit (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Limits and normalization applied by [`DocumentReader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLimits {
    /// Largest accepted file, in bytes
    pub max_file_size_bytes: u64,

    /// Replace line breaks with spaces in the extracted text
    pub flatten_newlines: bool,
}

impl DocumentLimits {
    /// Limits with a size cap given in MiB
    pub fn with_max_size_mb(mb: u64) -> Self {
        Self {
            max_file_size_bytes: mb.saturating_mul(1024 * 1024),
            ..Self::default()
        }
    }
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            flatten_newlines: true,
        }
    }
}

/// Reads uploaded documents into plain text
#[derive(Debug, Clone, Default)]
pub struct DocumentReader {
    limits: DocumentLimits,
}

impl DocumentReader {
    /// Create a reader with the given limits
    pub fn new(limits: DocumentLimits) -> Self {
        Self { limits }
    }

    /// Extract text, enforcing the size limit and normalizing line breaks
    pub fn read(&self, path: impl AsRef<Path>) -> Result<String, DocumentError> {
        let path = path.as_ref();
        // Reject unknown formats before touching the file
        DocumentFormat::from_path(path)?;

        let size = fs::metadata(path)
            .map_err(|e| DocumentError::io(path, e))?
            .len();
        if !validate_file_size(size, self.limits.max_file_size_bytes) {
            error!("Rejected {}: {} bytes exceeds limit", path.display(), size);
            return Err(DocumentError::FileTooLarge {
                size,
                limit: self.limits.max_file_size_bytes,
            });
        }

        let text = extract_input_text(path)?;
        if self.limits.flatten_newlines {
            Ok(flatten_newlines(&text))
        } else {
            Ok(text)
        }
    }
}

/// Extract the raw text of a PDF, DOCX or TXT file
pub fn extract_input_text(path: impl AsRef<Path>) -> Result<String, DocumentError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path).inspect_err(|e| {
        error!("Cannot read {}: {}", path.display(), e);
    })?;

    let text = match format {
        DocumentFormat::Pdf => extract_from_pdf(path)?,
        DocumentFormat::Docx => extract_from_docx(path)?,
        DocumentFormat::Txt => fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?,
    };

    info!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Extracts text from all pages of a PDF.
fn extract_from_pdf(path: &Path) -> Result<String, DocumentError> {
    let data = fs::read(path).map_err(|e| DocumentError::io(path, e))?;
    let file = FileOptions::cached()
        .load(data.as_slice())
        .map_err(|e| DocumentError::Pdf(e.to_string()))?;
    let resolver = file.resolver();
    let mut full_text = String::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        if let Some(content) = &page.contents {
            let operations = content
                .operations(&resolver)
                .map_err(|e| DocumentError::Pdf(e.to_string()))?;
            for op in operations.iter() {
                if let pdf::content::Op::TextDraw { text } = op {
                    full_text.push_str(&text.to_string_lossy());
                }
            }
        }
        full_text.push('\n');
    }

    debug!("Read {} PDF pages from {}", file.num_pages(), path.display());
    Ok(full_text)
}

/// Extracts paragraph text from the main document part of a DOCX package.
fn extract_from_docx(path: &Path) -> Result<String, DocumentError> {
    let file = fs::File::open(path).map_err(|e| DocumentError::io(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentError::Docx(format!("missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::io(path, e))?;

    Ok(docx_xml_to_text(&xml))
}

fn docx_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:tab/>|<w:br/>")
            .expect("static regex is valid")
    })
}

/// Paragraphs joined by newlines, runs concatenated
pub(crate) fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();

    for caps in docx_token_regex().captures_iter(xml) {
        match caps.get(1) {
            Some(run) => text.push_str(&unescape_xml(run.as_str())),
            None => match &caps[0] {
                "</w:p>" | "<w:br/>" => text.push('\n'),
                "<w:tab/>" => text.push('\t'),
                _ => {}
            },
        }
    }

    if text.ends_with('\n') {
        text.pop();
    }
    text
}

fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_xml_to_text() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Study </w:t></w:r><w:r><w:t xml:space="preserve">Title</w:t></w:r></w:p>
            <w:p><w:r><w:t>Phase&amp;I</w:t><w:tab/><w:t>x</w:t></w:r></w:p>
            <w:p><w:pPr/></w:p>
        </w:body></w:document>"#;

        assert_eq!(docx_xml_to_text(xml), "Study Title\nPhase&I\tx\n");
    }

    #[test]
    fn test_docx_ignores_similar_tags() {
        let xml = "<w:p><w:tbl/><w:tblPr/><w:t>a</w:t><w:tabs/></w:p>";
        assert_eq!(docx_xml_to_text(xml), "a");
    }

    #[test]
    fn test_unescape_xml() {
        assert_eq!(unescape_xml("a &lt;b&gt; &quot;c&quot; &apos;d&apos;"), "a <b> \"c\" 'd'");
        assert_eq!(unescape_xml("&#65;&#x42;"), "AB");
        assert_eq!(unescape_xml("&unknown; & tail"), "&unknown; & tail");
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten_newlines("a\nb\r\nc"), "a b c");
    }

    #[test]
    fn test_limits_in_mb() {
        let limits = DocumentLimits::with_max_size_mb(2);
        assert_eq!(limits.max_file_size_bytes, 2 * 1024 * 1024);
        assert!(limits.flatten_newlines);
    }

    #[test]
    fn test_huge_limit_saturates() {
        let limits = DocumentLimits::with_max_size_mb(u64::MAX);
        assert_eq!(limits.max_file_size_bytes, u64::MAX);

        let limits = DocumentLimits::with_max_size_mb(u64::MAX / 1024);
        assert_eq!(limits.max_file_size_bytes, u64::MAX);
    }
}
