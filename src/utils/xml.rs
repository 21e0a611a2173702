//! XML utility functions.
//!
//! - `escape()` / `cdata()` - make text safe for element content
//! - `is_valid_name()` - XML element/attribute name check
//! - `XmlWriter` - append-only markup builder used by the generators
//! - `format_xml()` - re-indent raw markup without building a tree

use crate::error::FeedError;
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// Indentation unit used by [`format_xml`].
const INDENT: &str = "  ";

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

// =============================================================================
// Escaping
// =============================================================================

/// Escape the five reserved characters `& < > " '`.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

/// Wrap text in a CDATA section.
///
/// An embedded `]]>` is split across two sections.
pub fn cdata(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + CDATA_OPEN.len() + CDATA_CLOSE.len());
    out.push_str(CDATA_OPEN);
    out.push_str(&s.replace(CDATA_CLOSE, "]]]]><![CDATA[>"));
    out.push_str(CDATA_CLOSE);
    out
}

/// Check an element or attribute name, allowing one namespace prefix.
pub fn is_valid_name(name: &str) -> bool {
    static RE_NAME: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9._-]*(:[A-Za-z_][A-Za-z0-9._-]*)?$").unwrap()
    });
    RE_NAME.is_match(name)
}

fn check_name(name: &str) -> Result<(), FeedError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(FeedError::InvalidTagName(name.to_string()))
    }
}

// =============================================================================
// XmlWriter
// =============================================================================

/// Append-only markup builder.
///
/// Produces compact markup (no whitespace between tags); run the result
/// through [`format_xml`] for readable output. Open elements are tracked on
/// a stack, so `close()` always emits the matching end tag.
#[derive(Debug)]
pub struct XmlWriter {
    buf: String,
    open: Vec<String>,
}

impl XmlWriter {
    /// Start a document with the XML declaration.
    pub fn new() -> Self {
        let mut buf = String::with_capacity(4096);
        buf.push_str(XML_DECLARATION);
        Self {
            buf,
            open: Vec::new(),
        }
    }

    /// Emit `<name attr="..">`. Attributes with a `None` value are skipped.
    pub fn open(&mut self, name: &str, attrs: &[(&str, Option<&str>)]) -> Result<(), FeedError> {
        self.start_tag(name, attrs)?;
        self.buf.push('>');
        self.open.push(name.to_string());
        Ok(())
    }

    /// Close the innermost open element.
    pub fn close(&mut self) {
        if let Some(name) = self.open.pop() {
            self.buf.push_str("</");
            self.buf.push_str(&name);
            self.buf.push('>');
        }
    }

    /// Emit a self-closing `<name attr=".."/>`.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, Option<&str>)]) -> Result<(), FeedError> {
        self.start_tag(name, attrs)?;
        self.buf.push_str("/>");
        Ok(())
    }

    /// Emit `<name>text</name>` with `text` escaped.
    pub fn text(&mut self, name: &str, text: &str) -> Result<(), FeedError> {
        self.text_with(name, &[], text)
    }

    /// Emit `<name attr="..">text</name>` with `text` escaped.
    pub fn text_with(
        &mut self,
        name: &str,
        attrs: &[(&str, Option<&str>)],
        text: &str,
    ) -> Result<(), FeedError> {
        self.open(name, attrs)?;
        self.buf.push_str(&escape(text));
        self.close();
        Ok(())
    }

    /// Emit `<name><![CDATA[text]]></name>`.
    pub fn cdata(&mut self, name: &str, text: &str) -> Result<(), FeedError> {
        self.cdata_with(name, &[], text)
    }

    /// Emit `<name attr=".."><![CDATA[text]]></name>`.
    pub fn cdata_with(
        &mut self,
        name: &str,
        attrs: &[(&str, Option<&str>)],
        text: &str,
    ) -> Result<(), FeedError> {
        self.open(name, attrs)?;
        self.buf.push_str(&cdata(text));
        self.close();
        Ok(())
    }

    /// Emit an optional text element.
    pub fn text_opt(&mut self, name: &str, text: Option<&str>) -> Result<(), FeedError> {
        match text {
            Some(text) => self.text(name, text),
            None => Ok(()),
        }
    }

    /// Close every open element and return the markup.
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        self.buf
    }

    fn start_tag(&mut self, name: &str, attrs: &[(&str, Option<&str>)]) -> Result<(), FeedError> {
        check_name(name)?;
        self.buf.push('<');
        self.buf.push_str(name);
        for (key, value) in attrs {
            let Some(value) = value else { continue };
            check_name(key)?;
            self.buf.push(' ');
            self.buf.push_str(key);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
        Ok(())
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Re-indentation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// `<?...?>` processing instruction (the XML declaration).
    Declaration(&'a str),
    /// `<name ...>`
    Open { tag: &'a str, name: &'a str },
    /// `</name>`
    Close { tag: &'a str, name: &'a str },
    /// `<name .../>`, comments and doctypes.
    SelfClosing(&'a str),
    /// Character data between tags, CDATA sections included. Kept verbatim.
    Text(&'a str),
}

/// Split raw markup on tag boundaries.
///
/// Whitespace-only text between tags is dropped.
fn tokenize(xml: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < xml.len() {
        let rest = &xml[pos..];

        if rest.starts_with('<') && !rest.starts_with(CDATA_OPEN) {
            let Some(end) = rest.find('>') else {
                // Unterminated tag: keep the remainder as text
                push_text(&mut tokens, rest);
                break;
            };
            let tag = &rest[..=end];
            tokens.push(classify_tag(tag));
            pos += end + 1;
            continue;
        }

        // Text run, swallowing CDATA sections whole
        let mut len = 0;
        while len < rest.len() {
            let tail = &rest[len..];
            if tail.starts_with(CDATA_OPEN) {
                len += tail
                    .find(CDATA_CLOSE)
                    .map_or(tail.len(), |end| end + CDATA_CLOSE.len());
            } else if tail.starts_with('<') {
                break;
            } else {
                len += tail.chars().next().map_or(1, char::len_utf8);
            }
        }
        push_text(&mut tokens, &rest[..len]);
        pos += len;
    }

    tokens
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.trim().is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn classify_tag(tag: &str) -> Token<'_> {
    if tag.starts_with("<?") {
        Token::Declaration(tag)
    } else if tag.starts_with("<!") || tag.ends_with("/>") {
        Token::SelfClosing(tag)
    } else if let Some(name) = tag.strip_prefix("</") {
        Token::Close {
            tag,
            name: name.trim_end_matches('>').trim(),
        }
    } else {
        let inner = &tag[1..tag.len() - 1];
        let name = inner
            .split(|c: char| c.is_whitespace())
            .next()
            .unwrap_or(inner);
        Token::Open { tag, name }
    }
}

/// Re-indent raw XML markup.
///
/// Works on the token stream only, no tree is built:
/// - the declaration stays on its own line
/// - `<a>text</a>` stays on one line
/// - every other tag or text run gets its own line, indented two spaces
///   per nesting level
pub fn format_xml(xml: &str) -> String {
    let tokens = tokenize(xml);
    let mut out = String::with_capacity(xml.len() + xml.len() / 2);
    let mut depth = 0usize;
    let mut prev_inline_text = false;

    for (i, token) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1);

        match *token {
            Token::Declaration(tag) => {
                out.push_str(tag);
                out.push('\n');
                prev_inline_text = false;
            }
            Token::Close { tag, .. } => {
                depth = depth.saturating_sub(1);
                if !prev_inline_text {
                    push_indent(&mut out, depth);
                }
                out.push_str(tag);
                out.push('\n');
                prev_inline_text = false;
            }
            Token::Open { tag, name } => {
                push_indent(&mut out, depth);
                out.push_str(tag);
                let simple_content = matches!(next, Some(Token::Text(_)))
                    && matches!(tokens.get(i + 2), Some(Token::Close { name: close, .. }) if *close == name);
                if !simple_content {
                    out.push('\n');
                }
                depth += 1;
                prev_inline_text = false;
            }
            Token::SelfClosing(tag) => {
                push_indent(&mut out, depth);
                out.push_str(tag);
                out.push('\n');
                prev_inline_text = false;
            }
            Token::Text(text) => {
                if matches!(next, Some(Token::Close { .. })) {
                    out.push_str(text);
                    prev_inline_text = true;
                } else {
                    // Mixed content: only the surrounding layout whitespace goes
                    push_indent(&mut out, depth);
                    out.push_str(text.trim());
                    out.push('\n');
                    prev_inline_text = false;
                }
            }
        }
    }

    out.trim().to_string()
}

#[inline]
fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
