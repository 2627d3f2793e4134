//! Upgrade of annotations persisted in the legacy schema.
//!
//! Legacy records keep an `iconPath` (often an old `*.gif` name) and
//! separate `color` / `background` / `border` / `borderColor` fields. The
//! current schema has a resolved `icon` and a single `style` string.
//!
//! Migration is an explicit one-shot transition
//! ([`MigrationState::LoadedLegacy`] to [`MigrationState::Migrated`]) run by
//! whoever loads persisted builds. Re-running it on migrated data is a
//! no-op because the legacy fields are gone.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, Badge, HtmlBadge, Summary};
use crate::color::resolve_style_value;
use crate::icon::IconResolver;
use crate::markup::SummaryText;
use crate::store::AnnotationStore;
use crate::types::id_or_generate;

// ---------------------------------------------------------------------------
// Legacy style fields
// ---------------------------------------------------------------------------

/// Separate styling fields of the legacy schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

/// A stored field counts only when it holds something other than blanks.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl LegacyStyle {
    pub fn is_empty(&self) -> bool {
        present(&self.color).is_none()
            && present(&self.background).is_none()
            && present(&self.border).is_none()
            && present(&self.border_color).is_none()
    }

    /// Compose the equivalent `style` string.
    ///
    /// Order is fixed: border, background, color. `borderColor` alone
    /// contributes nothing.
    pub fn to_style(&self) -> String {
        let mut style = String::new();
        if let Some(border) = present(&self.border) {
            let border_color = present(&self.border_color).unwrap_or("");
            style.push_str(&format!("border: {border} solid {border_color};"));
        }
        if let Some(background) = present(&self.background) {
            style.push_str(&format!("background: {background};"));
        }
        if let Some(color) = present(&self.color) {
            style.push_str(&format!("color: {};", legacy_color_value(color)));
        }
        style
    }
}

/// CSS value for a stored legacy color.
///
/// Older releases stored already-resolved class names
/// (`jenkins-!-color-red`, `jenkins-!-warning-color`); those map back onto
/// their CSS variables. Anything else goes through the color resolver.
pub fn legacy_color_value(color: &str) -> String {
    if let Some(rest) = color.strip_prefix("jenkins-!-color-") {
        format!("var(--{rest})")
    } else if let Some(rest) = color.strip_prefix("jenkins-!-") {
        format!("var(--{rest})")
    } else {
        resolve_style_value(color)
    }
}

/// Append `extra` to an optional style, treating blank as absent.
pub(crate) fn join_style(style: Option<&str>, extra: &str) -> Option<String> {
    let base = style.unwrap_or("");
    let joined = format!("{base}{extra}");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

// ---------------------------------------------------------------------------
// Legacy records
// ---------------------------------------------------------------------------

/// A badge as persisted by the legacy schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, flatten)]
    pub style: LegacyStyle,
}

/// A summary as persisted by the legacy schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySummaryRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A deprecated raw-HTML badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyHtmlRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Any action found in a legacy build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyAction {
    Badge(LegacyRecord),
    Summary(LegacySummaryRecord),
    Html(LegacyHtmlRecord),
}

// ---------------------------------------------------------------------------
// Migration
// ---------------------------------------------------------------------------

/// Where a persisted annotation is in its upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationState {
    LoadedLegacy(LegacyAction),
    Migrated(Annotation),
}

impl MigrationState {
    pub fn is_migrated(&self) -> bool {
        matches!(self, Self::Migrated(_))
    }

    /// Perform the transition. `Migrated` is terminal.
    pub fn advance(self, migrator: &LegacyMigrator<'_>) -> Self {
        match self {
            Self::LoadedLegacy(action) => Self::Migrated(migrator.migrate_action(action)),
            migrated @ Self::Migrated(_) => migrated,
        }
    }
}

/// Rewrites legacy-schema annotations into the current schema.
pub struct LegacyMigrator<'a> {
    icons: &'a IconResolver,
}

impl<'a> LegacyMigrator<'a> {
    pub fn new(icons: &'a IconResolver) -> Self {
        Self { icons }
    }

    pub fn migrate_record(&self, record: LegacyRecord) -> Badge {
        let style = join_style(None, &record.style.to_style());
        Badge::from_parts(
            id_or_generate(record.id),
            self.icons.resolve(present(&record.icon_path)),
            record.text,
            None,
            style,
            record.link,
            None,
        )
    }

    pub fn migrate_summary(&self, record: LegacySummaryRecord) -> Summary {
        Summary::from_parts(
            id_or_generate(record.id),
            self.icons.resolve(present(&record.icon_path)),
            SummaryText::from(record.text.unwrap_or_default()),
        )
    }

    pub fn migrate_action(&self, action: LegacyAction) -> Annotation {
        match action {
            LegacyAction::Badge(record) => Annotation::Badge(self.migrate_record(record)),
            LegacyAction::Summary(record) => Annotation::Summary(self.migrate_summary(record)),
            LegacyAction::Html(record) => Annotation::LegacyHtml(HtmlBadge::new(
                id_or_generate(record.id),
                record.html.unwrap_or_default(),
            )),
        }
    }

    /// Fold a badge's legacy style fields into its `style`.
    ///
    /// Returns `false` (and changes nothing) when the badge is already in
    /// the current schema.
    pub fn migrate_badge(&self, badge: &mut Badge) -> bool {
        if badge.legacy_style().is_empty() {
            return false;
        }
        let legacy = badge.take_legacy_style();
        let style = join_style(badge.style(), &legacy.to_style());
        badge.set_style(style);
        true
    }

    /// Migrate every legacy-schema badge in `store`. Returns how many changed.
    pub fn migrate_store(&self, store: &mut AnnotationStore) -> usize {
        let mut migrated = 0;
        for annotation in store.iter_mut() {
            if let Annotation::Badge(badge) = annotation {
                if self.migrate_badge(badge) {
                    migrated += 1;
                }
            }
        }
        if migrated > 0 {
            store.mark_dirty();
            tracing::info!(count = migrated, "Migrated legacy badge styles");
        }
        migrated
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
