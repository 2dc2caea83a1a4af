//! Rich-text transcoding
//!
//! Converts one rich document into a plain-text projection plus an optional
//! portable RTF serialization. Conversion never fails outright: when the
//! serializer cannot represent the document, the result degrades to plain
//! text and the caller decides whether that is worth a warning.

pub mod rtf;

use serde::{Deserialize, Serialize};

/// 24-bit color carried by a formatting run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Character-level formatting attributes of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAttrs {
    /// Font family override; None means the document default
    pub font: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Option<Rgb>,
    pub link: Option<String>,
}

impl RunAttrs {
    /// True when the run carries nothing beyond plain-run defaults
    pub fn is_plain(&self) -> bool {
        self.font.is_none()
            && !self.bold
            && !self.italic
            && !self.underline
            && !self.strikethrough
            && self.color.is_none()
            && self.link.is_none()
    }
}

/// A formatting run over `[start, start + len)` in character offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRun {
    pub start: usize,
    pub len: usize,
    pub attrs: RunAttrs,
}

/// Paragraph alignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

/// A paragraph-level attribute run, in character offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphRun {
    pub start: usize,
    pub len: usize,
    pub alignment: Alignment,
}

/// One rich document: a character sequence plus non-overlapping formatting
/// runs and paragraph attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub text: String,
    pub runs: Vec<FormatRun>,
    pub paragraphs: Vec<ParagraphRun>,
}

impl RichText {
    /// A document with no formatting at all
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            runs: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    /// True when the document carries at least one recognized formatting
    /// attribute beyond plain-run defaults
    pub fn has_formatting(&self) -> bool {
        self.runs.iter().any(|r| r.len > 0 && !r.attrs.is_plain())
            || self
                .paragraphs
                .iter()
                .any(|p| p.len > 0 && p.alignment != Alignment::Left)
    }

    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            text,
            runs: self.runs.clone(),
            paragraphs: self.paragraphs.clone(),
        }
    }
}

/// Result of one transcode call
#[derive(Debug, Clone)]
pub struct TranscodeResult {
    /// Plain-text projection, always present
    pub plain_text: String,
    /// Portable RTF bytes, when formatting was present and serializable
    pub formatted: Option<Vec<u8>>,
    /// True when the document carried formatting but serialization failed
    /// and the result fell back to plain text
    pub degraded: bool,
}

/// Convert a rich document into `(plain text, optional RTF bytes)`.
///
/// The plain projection is always produced. RTF bytes are produced only
/// when `preserve_formatting` is set and the document carries formatting.
/// Serializer failure is absorbed here: the caller gets `degraded = true`
/// and a plain-only result, never an error.
pub fn convert(doc: &RichText, preserve_formatting: bool) -> TranscodeResult {
    let plain_text = scrub_text(&doc.text);

    if !preserve_formatting || !doc.has_formatting() {
        return TranscodeResult {
            plain_text,
            formatted: None,
            degraded: false,
        };
    }

    // RTF readers collapse consecutive plain spaces, so runs of two or more
    // are rewritten to non-breaking spaces before serialization. The
    // replacement is one-to-one per character, keeping run offsets valid.
    let hardened = doc.with_text(harden_spaces(&doc.text));

    match rtf::encode(&hardened) {
        Ok(bytes) => TranscodeResult {
            plain_text,
            formatted: Some(bytes),
            degraded: false,
        },
        Err(e) => {
            tracing::debug!(error = %e, "rich text serialization failed, keeping plain text");
            TranscodeResult {
                plain_text,
                formatted: None,
                degraded: true,
            }
        }
    }
}

/// Attempt to decode RTF bytes back into a rich document.
///
/// Used by tests and diagnostics only; the import path never verifies its
/// own output.
pub fn verify(bytes: &[u8]) -> bool {
    rtf::decode(bytes).is_ok()
}

/// Content-neutral cleanup: normalize line endings to LF and drop control
/// characters that carry no text (NUL, object replacement).
pub fn scrub_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\0' | '\u{FFFC}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Rewrite every run of two or more consecutive plain spaces to
/// non-breaking spaces
fn harden_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ' ' {
            let mut j = i;
            while j < chars.len() && chars[j] == ' ' {
                j += 1;
            }
            if j - i >= 2 {
                for _ in i..j {
                    out.push('\u{00A0}');
                }
            } else {
                out.push(' ');
            }
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold_run(start: usize, len: usize) -> FormatRun {
        FormatRun {
            start,
            len,
            attrs: RunAttrs {
                bold: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn plain_document_produces_no_bytes() {
        let doc = RichText::plain("just words");
        let result = convert(&doc, true);
        assert_eq!(result.plain_text, "just words");
        assert!(result.formatted.is_none());
        assert!(!result.degraded);
    }

    #[test]
    fn preserve_formatting_false_skips_serialization() {
        let doc = RichText {
            text: "bold here".into(),
            runs: vec![bold_run(0, 4)],
            paragraphs: Vec::new(),
        };
        let result = convert(&doc, false);
        assert!(result.formatted.is_none());
        assert!(!result.degraded);
    }

    #[test]
    fn formatted_document_serializes_and_verifies() {
        let doc = RichText {
            text: "bold here".into(),
            runs: vec![bold_run(0, 4)],
            paragraphs: Vec::new(),
        };
        let result = convert(&doc, true);
        let bytes = result.formatted.expect("formatted bytes");
        assert!(verify(&bytes));
    }

    #[test]
    fn zero_length_runs_do_not_count_as_formatting() {
        let doc = RichText {
            text: "words".into(),
            runs: vec![bold_run(0, 0)],
            paragraphs: Vec::new(),
        };
        assert!(!doc.has_formatting());
    }

    #[test]
    fn invalid_runs_degrade_to_plain() {
        let doc = RichText {
            text: "short".into(),
            runs: vec![bold_run(0, 50)],
            paragraphs: Vec::new(),
        };
        let result = convert(&doc, true);
        assert!(result.formatted.is_none());
        assert!(result.degraded);
        assert_eq!(result.plain_text, "short");
    }

    #[test]
    fn whitespace_runs_survive_round_trip() {
        let doc = RichText {
            text: "a  b   c".into(),
            runs: vec![bold_run(0, 1)],
            paragraphs: Vec::new(),
        };
        let result = convert(&doc, true);
        let bytes = result.formatted.expect("formatted bytes");
        let decoded = rtf::decode(&bytes).expect("decodable");

        let nbsp_run: String = decoded
            .text
            .chars()
            .filter(|c| *c == '\u{00A0}')
            .collect();
        // 2-space run and 3-space run both preserved character-for-character
        assert_eq!(nbsp_run.chars().count(), 5);
        assert_eq!(decoded.text.chars().count(), doc.text.chars().count());
    }

    #[test]
    fn scrub_normalizes_line_endings() {
        assert_eq!(scrub_text("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(scrub_text("x\0y\u{FFFC}z"), "xyz");
    }

    #[test]
    fn harden_spaces_leaves_single_spaces_alone() {
        assert_eq!(harden_spaces("a b"), "a b");
        assert_eq!(harden_spaces("a  b"), "a\u{00A0}\u{00A0}b");
        assert_eq!(harden_spaces("  "), "\u{00A0}\u{00A0}");
    }
}
