//! Text sanitization for badge and summary text.
//!
//! The host selects a [`MarkupFormatter`] (escape everything, or allow a
//! safe subset of HTML). [`TextSanitizer`] applies it and never lets a
//! formatter failure reach the page: a fixed error fragment is rendered
//! instead.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rendered in place of text the formatter could not process.
pub const FORMAT_ERROR_FALLBACK: &str =
    "<b><font color=\"var(--error-color)\">Error preparing text for UI</font></b>";

// ---------------------------------------------------------------------------
// Formatter capability
// ---------------------------------------------------------------------------

/// The host markup formatter failed to translate a piece of text.
#[derive(Debug, thiserror::Error)]
#[error("Markup formatting failed: {0}")]
pub struct FormatError(pub String);

/// Host-selected translation of user text into page-safe HTML.
pub trait MarkupFormatter {
    fn translate(&self, text: &str) -> Result<String, FormatError>;
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Treats all text as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapedMarkupFormatter;

impl MarkupFormatter for EscapedMarkupFormatter {
    fn translate(&self, text: &str) -> Result<String, FormatError> {
        Ok(escape_html(text))
    }
}

/// Element added to the sanitizer's default allow-list: styled summary
/// text is wrapped in `<font color="..">`.
const EXTRA_TAGS: &[&str] = &["font"];

/// Parses the text as HTML and keeps only an allow-listed set of elements,
/// attributes and URL schemes. Script and style content is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeHtmlFormatter;

impl SafeHtmlFormatter {
    fn builder() -> ammonia::Builder<'static> {
        let mut builder = ammonia::Builder::default();
        builder
            .add_tags(EXTRA_TAGS)
            .add_tag_attributes("font", &["color"])
            .link_rel(None);
        builder
    }
}

impl MarkupFormatter for SafeHtmlFormatter {
    fn translate(&self, text: &str) -> Result<String, FormatError> {
        Ok(Self::builder().clean(text).to_string())
    }
}

// ---------------------------------------------------------------------------
// Sanitizer
// ---------------------------------------------------------------------------

/// Renders annotation text through the host formatter.
pub struct TextSanitizer<'a> {
    formatter: &'a dyn MarkupFormatter,
    escape_all: bool,
}

impl<'a> TextSanitizer<'a> {
    /// `escape_all` bypasses the formatter and escapes everything
    /// (the host's "disable HTML formatting" switch).
    pub fn new(formatter: &'a dyn MarkupFormatter, escape_all: bool) -> Self {
        Self {
            formatter,
            escape_all,
        }
    }

    /// Render `text` for the page. Blank text is returned unchanged.
    pub fn render(&self, text: Option<&str>) -> Option<String> {
        let text = text?;
        if text.trim().is_empty() {
            return Some(text.to_string());
        }
        if self.escape_all {
            return Some(escape_html(text));
        }
        match self.formatter.translate(text) {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::warn!(error = %e, "Error preparing text for UI");
                Some(FORMAT_ERROR_FALLBACK.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Summary text builder
// ---------------------------------------------------------------------------

/// Append-only summary text, kept in its pre-formatting form.
///
/// Fragments are escaped and wrapped as they are appended; the host
/// formatter runs over the whole buffer at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryText(String);

impl SummaryText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a fragment, HTML-escaping it first when `escape` is set.
    pub fn append_text(&mut self, text: &str, escape: bool) {
        if escape {
            self.0.push_str(&escape_html(text));
        } else {
            self.0.push_str(text);
        }
    }

    /// Append a styled fragment.
    ///
    /// Nesting is fixed: `<b><i><font color="..">text</font></i></b>`.
    pub fn append_text_styled(
        &mut self,
        text: &str,
        escape: bool,
        bold: bool,
        italic: bool,
        color: Option<&str>,
    ) {
        let mut fragment = if escape {
            escape_html(text)
        } else {
            text.to_string()
        };
        if let Some(color) = color {
            fragment = format!("<font color=\"{}\">{fragment}</font>", escape_html(color));
        }
        if italic {
            fragment = format!("<i>{fragment}</i>");
        }
        if bold {
            fragment = format!("<b>{fragment}</b>");
        }
        self.0.push_str(&fragment);
    }
}

impl From<String> for SummaryText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
