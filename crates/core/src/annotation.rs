//! Badge and summary annotations attached to a build.
//!
//! All kinds share a base shape (an id, an optional icon, some text) and
//! are dispatched by [`AnnotationKind`] rather than through a type
//! hierarchy. Stored fields keep what the caller supplied; the page-facing
//! values are produced by [`Annotation::render`], which resolves icons,
//! sanitizes text, validates links and composes legacy styling.

use serde::{Deserialize, Serialize};

use crate::context::RenderContext;
use crate::error::CoreError;
use crate::markup::SummaryText;
use crate::migration::{join_style, LegacyStyle};
use crate::types::{
    generate_id, id_or_generate, AnnotationId, AnnotationKind, SchemaVersion,
};

// ---------------------------------------------------------------------------
// Creation options
// ---------------------------------------------------------------------------

/// Full option set accepted by the badge step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeOptions {
    pub id: Option<String>,
    pub icon: Option<String>,
    pub text: Option<String>,
    pub css_class: Option<String>,
    pub style: Option<String>,
    pub link: Option<String>,
    pub target: Option<String>,
}

/// Options for an icon-less short text badge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortTextOptions {
    pub id: Option<String>,
    pub color: Option<String>,
    pub background: Option<String>,
    /// CSS border width, e.g. `1px`.
    pub border: Option<String>,
    pub border_color: Option<String>,
    pub link: Option<String>,
}

impl ShortTextOptions {
    /// Set the border width in pixels.
    pub fn border_px(mut self, width: u32) -> Self {
        self.border = Some(format!("{width}px"));
        self
    }
}

// ---------------------------------------------------------------------------
// Badge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    id: AnnotationId,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    css_class: Option<String>,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "LegacyStyle::is_empty")]
    legacy_style: LegacyStyle,
}

impl Badge {
    pub fn from_parts(
        id: AnnotationId,
        icon: Option<String>,
        text: Option<String>,
        css_class: Option<String>,
        style: Option<String>,
        link: Option<String>,
        target: Option<String>,
    ) -> Self {
        Self {
            id,
            icon,
            text,
            css_class,
            style,
            link,
            target,
            legacy_style: LegacyStyle::default(),
        }
    }

    /// Create an icon badge. The icon is resolved now; an unsafe link is
    /// an error.
    pub fn create(
        ctx: &RenderContext,
        icon: Option<&str>,
        text: Option<&str>,
        link: Option<&str>,
    ) -> Result<Self, CoreError> {
        let link = ctx.validate_link_strict(link)?;
        Ok(Self::from_parts(
            generate_id(),
            ctx.resolve_icon(icon),
            text.map(str::to_string),
            None,
            None,
            link,
            None,
        ))
    }

    /// Create a badge from the full option set. Unsafe links are dropped.
    pub fn from_options(ctx: &RenderContext, options: BadgeOptions) -> Self {
        let link = ctx.validate_link(options.link.as_deref());
        Self::from_parts(
            id_or_generate(options.id),
            ctx.resolve_icon(options.icon.as_deref()),
            options.text,
            options.css_class,
            options.style,
            link,
            options.target,
        )
    }

    /// Create a short text badge: no icon, legacy color fields kept raw and
    /// composed into a style when rendered. Unsafe links are dropped.
    pub fn short_text(ctx: &RenderContext, text: &str, options: ShortTextOptions) -> Self {
        let link = ctx.validate_link(options.link.as_deref());
        let mut badge = Self::from_parts(
            id_or_generate(options.id),
            None,
            Some(text.to_string()),
            None,
            None,
            link,
            None,
        );
        badge.legacy_style = LegacyStyle {
            color: options.color,
            background: options.background,
            border: options.border,
            border_color: options.border_color,
        };
        badge
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn css_class(&self) -> Option<&str> {
        self.css_class.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn legacy_style(&self) -> &LegacyStyle {
        &self.legacy_style
    }

    pub fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub fn set_css_class(&mut self, css_class: Option<String>) {
        self.css_class = css_class;
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.style = style;
    }

    pub fn set_link(&mut self, link: Option<String>) {
        self.link = link;
    }

    pub fn set_target(&mut self, target: Option<String>) {
        self.target = target;
    }

    pub fn set_legacy_style(&mut self, legacy_style: LegacyStyle) {
        self.legacy_style = legacy_style;
    }

    pub(crate) fn take_legacy_style(&mut self) -> LegacyStyle {
        std::mem::take(&mut self.legacy_style)
    }

    pub fn schema(&self) -> SchemaVersion {
        if self.legacy_style.is_empty() {
            SchemaVersion::Current
        } else {
            SchemaVersion::Legacy
        }
    }

    /// Style as rendered: the stored style followed by any legacy fields.
    pub fn effective_style(&self) -> Option<String> {
        join_style(self.style.as_deref(), &self.legacy_style.to_style())
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    id: AnnotationId,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    text: SummaryText,
}

impl Summary {
    pub fn from_parts(id: AnnotationId, icon: Option<String>, text: SummaryText) -> Self {
        Self { id, icon, text }
    }

    /// Create an empty summary with a resolved icon.
    pub fn create(ctx: &RenderContext, icon: Option<&str>) -> Self {
        Self::from_parts(generate_id(), ctx.resolve_icon(icon), SummaryText::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// The accumulated text before host formatting.
    pub fn raw_text(&self) -> &str {
        self.text.as_str()
    }

    pub fn append_text(&mut self, text: &str, escape: bool) {
        self.text.append_text(text, escape);
    }

    pub fn append_text_styled(
        &mut self,
        text: &str,
        escape: bool,
        bold: bool,
        italic: bool,
        color: Option<&str>,
    ) {
        self.text.append_text_styled(text, escape, bold, italic, color);
    }
}

// ---------------------------------------------------------------------------
// Deprecated HTML badge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlBadge {
    id: AnnotationId,
    html: String,
}

impl HtmlBadge {
    pub fn new(id: AnnotationId, html: String) -> Self {
        Self { id, html }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn raw_html(&self) -> &str {
        &self.html
    }
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    Badge(Badge),
    Summary(Summary),
    LegacyHtml(HtmlBadge),
}

/// Page-ready values of one annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationView {
    pub kind: AnnotationKind,
    pub id: String,
    pub icon: Option<String>,
    pub text: Option<String>,
    pub css_class: Option<String>,
    pub style: Option<String>,
    pub link: Option<String>,
    pub target: Option<String>,
    /// No icon slot is laid out.
    pub text_only: bool,
}

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::Badge(_) => AnnotationKind::Badge,
            Self::Summary(_) => AnnotationKind::Summary,
            Self::LegacyHtml(_) => AnnotationKind::LegacyHtml,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Badge(b) => b.id(),
            Self::Summary(s) => s.id(),
            Self::LegacyHtml(h) => h.id(),
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        match self {
            Self::Badge(b) => b.schema(),
            Self::Summary(_) | Self::LegacyHtml(_) => SchemaVersion::Current,
        }
    }

    /// Resolve every field for display.
    pub fn render(&self, ctx: &RenderContext) -> AnnotationView {
        let (icon, text, css_class, style, link, target) = match self {
            Self::Badge(b) => (
                ctx.resolve_icon(b.icon()),
                ctx.render_text(b.text()),
                b.css_class.clone(),
                b.effective_style(),
                ctx.validate_link(b.link()),
                b.target.clone(),
            ),
            Self::Summary(s) => (
                ctx.resolve_icon(s.icon()),
                ctx.render_text(Some(s.raw_text())),
                None,
                None,
                None,
                None,
            ),
            Self::LegacyHtml(h) => (
                None,
                ctx.render_text(Some(h.raw_html())),
                None,
                None,
                None,
                None,
            ),
        };

        AnnotationView {
            kind: self.kind(),
            id: self.id().to_string(),
            text_only: icon.is_none(),
            icon,
            text,
            css_class,
            style,
            link,
            target,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
