//! Portable rich-text serialization (RTF 1.x subset)
//!
//! The encoder writes the attribute set the transcoder models: font
//! override, bold/italic, underline, strikethrough, color, hyperlinks, and
//! paragraph alignment. The decoder reads the same subset back and is used
//! only for verification and tests, never on the import path.

use super::{Alignment, FormatRun, ParagraphRun, Rgb, RichText, RunAttrs};
use thiserror::Error;

/// Document default font, index 0 of the font table
const DEFAULT_FONT: &str = "Helvetica";

#[derive(Debug, Error)]
pub enum RtfError {
    #[error("not an RTF document")]
    NotRtf,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unbalanced group nesting")]
    UnbalancedGroup,
    #[error("formatting run {index} out of bounds")]
    RunOutOfBounds { index: usize },
    #[error("malformed RTF: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize a rich document to RTF bytes.
///
/// Fails only on structurally invalid input (runs extending past the text).
pub fn encode(doc: &RichText) -> Result<Vec<u8>, RtfError> {
    let chars: Vec<char> = doc.text.chars().collect();

    for (index, run) in doc.runs.iter().enumerate() {
        if run.start + run.len > chars.len() {
            return Err(RtfError::RunOutOfBounds { index });
        }
    }
    for (index, para) in doc.paragraphs.iter().enumerate() {
        if para.start + para.len > chars.len() {
            return Err(RtfError::RunOutOfBounds { index });
        }
    }

    // Font table: index 0 is the document default, overrides follow in
    // first-appearance order
    let mut fonts: Vec<&str> = vec![DEFAULT_FONT];
    for run in &doc.runs {
        if let Some(font) = &run.attrs.font {
            if !fonts.contains(&font.as_str()) {
                fonts.push(font);
            }
        }
    }

    // Color table: RTF reserves entry 0 for "auto"
    let mut colors: Vec<Rgb> = Vec::new();
    for run in &doc.runs {
        if let Some(color) = run.attrs.color {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
    }

    let mut out = String::new();
    out.push_str("{\\rtf1\\ansi\\ansicpg1252\\deff0");
    out.push_str("{\\fonttbl");
    for (i, font) in fonts.iter().enumerate() {
        out.push_str(&format!("{{\\f{}\\fnil {};}}", i, font));
    }
    out.push('}');
    if !colors.is_empty() {
        out.push_str("{\\colortbl ;");
        for c in &colors {
            out.push_str(&format!("\\red{}\\green{}\\blue{};", c.r, c.g, c.b));
        }
        out.push('}');
    }
    out.push('\n');

    let spans = paragraph_spans(&chars);
    let last = spans.len().saturating_sub(1);
    for (i, (start, end)) in spans.iter().copied().enumerate() {
        out.push_str("\\pard");
        match alignment_for(doc, start, end) {
            Alignment::Left => {}
            Alignment::Center => out.push_str("\\qc"),
            Alignment::Right => out.push_str("\\qr"),
            Alignment::Justified => out.push_str("\\qj"),
        }
        out.push(' ');
        emit_range(&mut out, &chars, start, end, doc, &fonts, &colors);
        if i != last {
            out.push_str("\\par\n");
        }
    }
    out.push('}');

    Ok(out.into_bytes())
}

/// Paragraph spans (newline-exclusive) covering the whole text
fn paragraph_spans(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (i, c) in chars.iter().enumerate() {
        if *c == '\n' {
            spans.push((start, i));
            start = i + 1;
        }
    }
    spans.push((start, chars.len()));
    spans
}

/// Alignment of the paragraph covering `[start, end)`; the first paragraph
/// run intersecting the span wins
fn alignment_for(doc: &RichText, start: usize, end: usize) -> Alignment {
    doc.paragraphs
        .iter()
        .find(|p| p.start < end.max(start + 1) && p.start + p.len > start)
        .map(|p| p.alignment)
        .unwrap_or(Alignment::Left)
}

/// Active non-plain run covering a position, if any
fn run_at(doc: &RichText, pos: usize) -> Option<&FormatRun> {
    doc.runs
        .iter()
        .find(|r| pos >= r.start && pos < r.start + r.len && !r.attrs.is_plain())
}

fn emit_range(
    out: &mut String,
    chars: &[char],
    start: usize,
    end: usize,
    doc: &RichText,
    fonts: &[&str],
    colors: &[Rgb],
) {
    let mut pos = start;
    while pos < end {
        let run = run_at(doc, pos);
        let mut seg_end = pos + 1;
        while seg_end < end {
            let next = run_at(doc, seg_end);
            let same = match (run, next) {
                (None, None) => true,
                (Some(a), Some(b)) => std::ptr::eq(a, b),
                _ => false,
            };
            if !same {
                break;
            }
            seg_end += 1;
        }

        match run {
            None => {
                for c in &chars[pos..seg_end] {
                    escape_into(out, *c);
                }
            }
            Some(run) => {
                let codes = control_words(&run.attrs, fonts, colors);
                if let Some(url) = &run.attrs.link {
                    out.push_str("{\\field{\\*\\fldinst{HYPERLINK \"");
                    for c in url.chars() {
                        escape_into(out, c);
                    }
                    out.push_str("\"}}{\\fldrslt {");
                    out.push_str(&codes);
                    out.push(' ');
                    for c in &chars[pos..seg_end] {
                        escape_into(out, *c);
                    }
                    out.push_str("}}}");
                } else {
                    out.push('{');
                    out.push_str(&codes);
                    out.push(' ');
                    for c in &chars[pos..seg_end] {
                        escape_into(out, *c);
                    }
                    out.push('}');
                }
            }
        }
        pos = seg_end;
    }
}

/// Character-formatting control words for one run (link handled separately)
fn control_words(attrs: &RunAttrs, fonts: &[&str], colors: &[Rgb]) -> String {
    let mut codes = String::new();
    if let Some(font) = &attrs.font {
        if let Some(idx) = fonts.iter().position(|f| *f == font.as_str()) {
            codes.push_str(&format!("\\f{}", idx));
        }
    }
    if attrs.bold {
        codes.push_str("\\b");
    }
    if attrs.italic {
        codes.push_str("\\i");
    }
    if attrs.underline {
        codes.push_str("\\ul");
    }
    if attrs.strikethrough {
        codes.push_str("\\strike");
    }
    if let Some(color) = attrs.color {
        if let Some(idx) = colors.iter().position(|c| *c == color) {
            codes.push_str(&format!("\\cf{}", idx + 1));
        }
    }
    codes
}

fn escape_into(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '{' => out.push_str("\\{"),
        '}' => out.push_str("\\}"),
        '\t' => out.push_str("\\tab "),
        '\u{00A0}' => out.push_str("\\~"),
        '\n' => {}
        c if (c as u32) < 0x80 => out.push(c),
        c => {
            let cp = c as u32;
            if cp < 0x10000 {
                out.push_str(&format!("\\u{}?", signed16(cp)));
            } else {
                // Encode as a UTF-16 surrogate pair
                let v = cp - 0x10000;
                let high = 0xD800 + (v >> 10);
                let low = 0xDC00 + (v & 0x3FF);
                out.push_str(&format!("\\u{}?\\u{}?", signed16(high), signed16(low)));
            }
        }
    }
}

fn signed16(cp: u32) -> i32 {
    if cp > 32767 {
        cp as i32 - 65536
    } else {
        cp as i32
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dest {
    Normal,
    FontTable,
    ColorTable,
    FieldInst,
    FieldResult,
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ParseAttrs {
    font: Option<usize>,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
    color: Option<usize>,
}

#[derive(Debug, Clone)]
struct GroupState {
    attrs: ParseAttrs,
    alignment: Alignment,
    dest: Dest,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            attrs: ParseAttrs::default(),
            alignment: Alignment::Left,
            dest: Dest::Normal,
        }
    }
}

struct Decoder {
    fonts: Vec<(usize, String)>,
    colors: Vec<Option<Rgb>>,
    pending_color: Option<Rgb>,
    font_index: Option<usize>,
    font_name: String,
    text: String,
    out_len: usize,
    runs: Vec<FormatRun>,
    open_run: Option<(usize, RunAttrs)>,
    paragraphs: Vec<ParagraphRun>,
    para_start: usize,
    field_url: Option<String>,
    fldinst_buf: String,
    pending_high_surrogate: Option<u32>,
}

/// Decode RTF bytes back into a rich document.
///
/// Understands the subset [`encode`] writes plus the common escapes
/// (`\'hh` hex bytes, `\uN` with surrogate pairs, `\~`, `\tab`).
pub fn decode(bytes: &[u8]) -> Result<RichText, RtfError> {
    let src = std::str::from_utf8(bytes).map_err(|_| RtfError::Malformed("not UTF-8".into()))?;
    if !src.trim_start().starts_with("{\\rtf") {
        return Err(RtfError::NotRtf);
    }

    let chars: Vec<char> = src.chars().collect();
    let mut decoder = Decoder {
        fonts: Vec::new(),
        colors: Vec::new(),
        pending_color: None,
        font_index: None,
        font_name: String::new(),
        text: String::new(),
        out_len: 0,
        runs: Vec::new(),
        open_run: None,
        paragraphs: Vec::new(),
        para_start: 0,
        field_url: None,
        fldinst_buf: String::new(),
        pending_high_surrogate: None,
    };

    let mut stack: Vec<GroupState> = Vec::new();
    let mut cur = GroupState::default();
    let mut star_pending = false;
    let mut depth_seen = false;

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' => {
                stack.push(cur.clone());
                depth_seen = true;
                i += 1;
            }
            '}' => {
                let leaving = cur.dest;
                if leaving == Dest::FontTable {
                    decoder.finish_font_entry();
                }
                cur = stack.pop().ok_or(RtfError::UnbalancedGroup)?;
                if leaving == Dest::FieldInst && cur.dest != Dest::FieldInst {
                    decoder.field_url = parse_hyperlink(&decoder.fldinst_buf);
                    decoder.fldinst_buf.clear();
                }
                if leaving == Dest::FieldResult && cur.dest != Dest::FieldResult {
                    decoder.field_url = None;
                }
                i += 1;
                if stack.is_empty() {
                    // Top-level group closed; only whitespace may follow
                    if chars[i..].iter().any(|c| !c.is_whitespace()) {
                        return Err(RtfError::Malformed("content after final group".into()));
                    }
                    break;
                }
            }
            '\\' => {
                i = parse_control(&chars, i, &mut cur, &mut decoder, &mut star_pending)?;
            }
            '\n' | '\r' => {
                i += 1;
            }
            c => {
                decoder.consume_char(c, &cur);
                i += 1;
            }
        }
    }

    if !stack.is_empty() || !depth_seen {
        return Err(RtfError::UnbalancedGroup);
    }

    decoder.finish(&cur);

    Ok(RichText {
        text: decoder.text,
        runs: decoder.runs,
        paragraphs: decoder.paragraphs,
    })
}

/// Parse one control word or symbol starting at the backslash; returns the
/// index just past it
fn parse_control(
    chars: &[char],
    start: usize,
    cur: &mut GroupState,
    decoder: &mut Decoder,
    star_pending: &mut bool,
) -> Result<usize, RtfError> {
    let mut i = start + 1;
    if i >= chars.len() {
        return Err(RtfError::UnexpectedEof);
    }

    let c = chars[i];
    if !c.is_ascii_alphabetic() {
        // Control symbol
        i += 1;
        match c {
            '\\' | '{' | '}' => decoder.consume_char(c, cur),
            '~' => decoder.consume_char('\u{00A0}', cur),
            '\'' => {
                if i + 1 >= chars.len() {
                    return Err(RtfError::UnexpectedEof);
                }
                let hex: String = chars[i..i + 2].iter().collect();
                let byte = u8::from_str_radix(&hex, 16)
                    .map_err(|_| RtfError::Malformed(format!("bad hex escape \\'{}", hex)))?;
                decoder.consume_char(byte as char, cur);
                i += 2;
            }
            '*' => *star_pending = true,
            _ => {}
        }
        return Ok(i);
    }

    // Control word: letters, optional signed parameter, optional delimiter
    let word_start = i;
    while i < chars.len() && chars[i].is_ascii_alphabetic() {
        i += 1;
    }
    let word: String = chars[word_start..i].iter().collect();

    let mut param: Option<i32> = None;
    let param_start = i;
    if i < chars.len() && (chars[i] == '-' || chars[i].is_ascii_digit()) {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let digits: String = chars[param_start..i].iter().collect();
        param = digits.parse::<i32>().ok();
    }
    if i < chars.len() && chars[i] == ' ' {
        i += 1;
    }

    if *star_pending {
        *star_pending = false;
        cur.dest = if word == "fldinst" {
            Dest::FieldInst
        } else {
            Dest::Skip
        };
        return Ok(i);
    }

    match word.as_str() {
        "fonttbl" => cur.dest = Dest::FontTable,
        "colortbl" => cur.dest = Dest::ColorTable,
        "fldrslt" => cur.dest = Dest::FieldResult,
        "red" => {
            let v = param.unwrap_or(0).clamp(0, 255) as u8;
            decoder.pending_color.get_or_insert(Rgb { r: 0, g: 0, b: 0 }).r = v;
        }
        "green" => {
            let v = param.unwrap_or(0).clamp(0, 255) as u8;
            decoder.pending_color.get_or_insert(Rgb { r: 0, g: 0, b: 0 }).g = v;
        }
        "blue" => {
            let v = param.unwrap_or(0).clamp(0, 255) as u8;
            decoder.pending_color.get_or_insert(Rgb { r: 0, g: 0, b: 0 }).b = v;
        }
        "f" => {
            if cur.dest == Dest::FontTable {
                decoder.finish_font_entry();
                decoder.font_index = param.map(|p| p.max(0) as usize);
            } else {
                cur.attrs.font = param.map(|p| p.max(0) as usize);
            }
        }
        "b" => cur.attrs.bold = param != Some(0),
        "i" => cur.attrs.italic = param != Some(0),
        "ul" => cur.attrs.underline = param != Some(0),
        "ulnone" => cur.attrs.underline = false,
        "strike" => cur.attrs.strikethrough = param != Some(0),
        "cf" => cur.attrs.color = param.map(|p| p.max(0) as usize),
        "plain" => cur.attrs = ParseAttrs::default(),
        "pard" => cur.alignment = Alignment::Left,
        "ql" => cur.alignment = Alignment::Left,
        "qc" => cur.alignment = Alignment::Center,
        "qr" => cur.alignment = Alignment::Right,
        "qj" => cur.alignment = Alignment::Justified,
        "par" | "line" => decoder.end_paragraph(cur),
        "tab" => decoder.consume_char('\t', cur),
        "u" => {
            let p = param.ok_or_else(|| RtfError::Malformed("\\u without parameter".into()))?;
            let cp = if p < 0 { (p + 65536) as u32 } else { p as u32 };
            decoder.consume_unicode(cp, cur);
            // Skip the ANSI fallback character (either raw or \'hh)
            if i + 3 < chars.len() && chars[i] == '\\' && chars[i + 1] == '\'' {
                i += 4;
            } else if i < chars.len() && !matches!(chars[i], '{' | '}' | '\\') {
                i += 1;
            }
        }
        _ => {}
    }

    Ok(i)
}

/// Extract the quoted URL from a `HYPERLINK "..."` field instruction
fn parse_hyperlink(buf: &str) -> Option<String> {
    let rest = buf.split("HYPERLINK").nth(1)?;
    let first = rest.find('"')?;
    let rest = &rest[first + 1..];
    let second = rest.find('"')?;
    Some(rest[..second].to_string())
}

impl Decoder {
    fn consume_char(&mut self, c: char, group: &GroupState) {
        match group.dest {
            Dest::Normal | Dest::FieldResult => {
                let mut attrs = self.resolve(&group.attrs);
                if group.dest == Dest::FieldResult {
                    attrs.link = self.field_url.clone();
                }
                self.append(c, attrs);
            }
            Dest::FontTable => {
                if c == ';' {
                    self.finish_font_entry();
                } else {
                    self.font_name.push(c);
                }
            }
            Dest::ColorTable => {
                if c == ';' {
                    self.colors.push(self.pending_color.take());
                }
            }
            Dest::FieldInst => self.fldinst_buf.push(c),
            Dest::Skip => {}
        }
    }

    fn consume_unicode(&mut self, cp: u32, group: &GroupState) {
        if (0xD800..0xDC00).contains(&cp) {
            self.pending_high_surrogate = Some(cp);
            return;
        }
        let cp = if let Some(high) = self.pending_high_surrogate.take() {
            if (0xDC00..0xE000).contains(&cp) {
                0x10000 + ((high - 0xD800) << 10) + (cp - 0xDC00)
            } else {
                cp
            }
        } else {
            cp
        };
        if let Some(c) = char::from_u32(cp) {
            self.consume_char(c, group);
        }
    }

    fn resolve(&self, attrs: &ParseAttrs) -> RunAttrs {
        let font = match attrs.font {
            Some(idx) if idx > 0 => self
                .fonts
                .iter()
                .find(|(i, _)| *i == idx)
                .map(|(_, name)| name.clone()),
            _ => None,
        };
        let color = match attrs.color {
            Some(idx) if idx > 0 => self.colors.get(idx).and_then(|c| *c),
            _ => None,
        };
        RunAttrs {
            font,
            bold: attrs.bold,
            italic: attrs.italic,
            underline: attrs.underline,
            strikethrough: attrs.strikethrough,
            color,
            link: None,
        }
    }

    fn append(&mut self, c: char, attrs: RunAttrs) {
        let extend = matches!(&self.open_run, Some((_, open)) if *open == attrs);
        if !extend {
            self.close_run();
            if !attrs.is_plain() {
                self.open_run = Some((self.out_len, attrs));
            }
        }
        self.text.push(c);
        self.out_len += 1;
    }

    fn close_run(&mut self) {
        if let Some((start, attrs)) = self.open_run.take() {
            if self.out_len > start {
                self.runs.push(FormatRun {
                    start,
                    len: self.out_len - start,
                    attrs,
                });
            }
        }
    }

    fn end_paragraph(&mut self, group: &GroupState) {
        if group.alignment != Alignment::Left && self.out_len > self.para_start {
            self.paragraphs.push(ParagraphRun {
                start: self.para_start,
                len: self.out_len - self.para_start,
                alignment: group.alignment,
            });
        }
        self.append('\n', RunAttrs::default());
        self.para_start = self.out_len;
    }

    fn finish_font_entry(&mut self) {
        if let Some(idx) = self.font_index.take() {
            let name = self.font_name.trim().to_string();
            if !name.is_empty() {
                self.fonts.push((idx, name));
            }
        }
        self.font_name.clear();
    }

    fn finish(&mut self, group: &GroupState) {
        if group.alignment != Alignment::Left && self.out_len > self.para_start {
            self.paragraphs.push(ParagraphRun {
                start: self.para_start,
                len: self.out_len - self.para_start,
                alignment: group.alignment,
            });
        }
        self.close_run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str, runs: Vec<FormatRun>) -> RichText {
        RichText {
            text: text.into(),
            runs,
            paragraphs: Vec::new(),
        }
    }

    fn attrs() -> RunAttrs {
        RunAttrs::default()
    }

    #[test]
    fn encode_decode_bold_run() {
        let source = doc(
            "plain bold plain",
            vec![FormatRun {
                start: 6,
                len: 4,
                attrs: RunAttrs {
                    bold: true,
                    ..attrs()
                },
            }],
        );
        let bytes = encode(&source).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "plain bold plain");
        assert_eq!(decoded.runs.len(), 1);
        assert_eq!(decoded.runs[0].start, 6);
        assert_eq!(decoded.runs[0].len, 4);
        assert!(decoded.runs[0].attrs.bold);
    }

    #[test]
    fn encode_decode_color_and_font() {
        let source = doc(
            "red mono",
            vec![
                FormatRun {
                    start: 0,
                    len: 3,
                    attrs: RunAttrs {
                        color: Some(Rgb { r: 255, g: 0, b: 0 }),
                        ..attrs()
                    },
                },
                FormatRun {
                    start: 4,
                    len: 4,
                    attrs: RunAttrs {
                        font: Some("Courier New".into()),
                        ..attrs()
                    },
                },
            ],
        );
        let bytes = encode(&source).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "red mono");
        assert_eq!(
            decoded.runs[0].attrs.color,
            Some(Rgb { r: 255, g: 0, b: 0 })
        );
        assert_eq!(decoded.runs[1].attrs.font.as_deref(), Some("Courier New"));
    }

    #[test]
    fn encode_decode_paragraph_alignment() {
        let source = RichText {
            text: "title\nbody".into(),
            runs: vec![FormatRun {
                start: 0,
                len: 5,
                attrs: RunAttrs {
                    bold: true,
                    ..attrs()
                },
            }],
            paragraphs: vec![ParagraphRun {
                start: 0,
                len: 5,
                alignment: Alignment::Center,
            }],
        };
        let bytes = encode(&source).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "title\nbody");
        assert_eq!(decoded.paragraphs.len(), 1);
        assert_eq!(decoded.paragraphs[0].alignment, Alignment::Center);
        assert_eq!(decoded.paragraphs[0].start, 0);
        assert_eq!(decoded.paragraphs[0].len, 5);
    }

    #[test]
    fn encode_decode_link() {
        let source = doc(
            "see here",
            vec![FormatRun {
                start: 4,
                len: 4,
                attrs: RunAttrs {
                    underline: true,
                    link: Some("https://example.com".into()),
                    ..attrs()
                },
            }],
        );
        let bytes = encode(&source).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "see here");
        let link_run = decoded
            .runs
            .iter()
            .find(|r| r.attrs.link.is_some())
            .expect("link run");
        assert_eq!(link_run.attrs.link.as_deref(), Some("https://example.com"));
        assert_eq!(link_run.start, 4);
        assert_eq!(link_run.len, 4);
    }

    #[test]
    fn encode_decode_non_ascii() {
        let source = doc(
            "héllo — ✓ 🎉",
            vec![FormatRun {
                start: 0,
                len: 5,
                attrs: RunAttrs {
                    italic: true,
                    ..attrs()
                },
            }],
        );
        let bytes = encode(&source).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "héllo — ✓ 🎉");
    }

    #[test]
    fn nbsp_round_trips_as_control_symbol() {
        let source = doc(
            "a\u{00A0}\u{00A0}b",
            vec![FormatRun {
                start: 0,
                len: 1,
                attrs: RunAttrs {
                    bold: true,
                    ..attrs()
                },
            }],
        );
        let bytes = encode(&source).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\\~\\~"));
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "a\u{00A0}\u{00A0}b");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(b"not rtf at all").is_err());
        assert!(decode(b"{\\rtf1 unbalanced").is_err());
        assert!(decode(&[0xFF, 0xFE, 0x00]).is_err());
    }

    #[test]
    fn decode_handles_hex_escapes() {
        let decoded = decode(b"{\\rtf1\\ansi {\\b caf\\'e9}}").unwrap();
        assert_eq!(decoded.text, "caf\u{e9}");
    }

    #[test]
    fn encode_rejects_out_of_bounds_run() {
        let source = doc(
            "hi",
            vec![FormatRun {
                start: 0,
                len: 10,
                attrs: RunAttrs {
                    bold: true,
                    ..attrs()
                },
            }],
        );
        assert!(matches!(
            encode(&source),
            Err(RtfError::RunOutOfBounds { index: 0 })
        ));
    }
}
