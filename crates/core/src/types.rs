use serde::{Deserialize, Serialize};

/// Annotation identifiers are opaque strings; generated ones are UUID v4.
pub type AnnotationId = String;

/// Generate a fresh random annotation id.
pub fn generate_id() -> AnnotationId {
    uuid::Uuid::new_v4().to_string()
}

/// Use a caller-supplied id unless it is missing or blank.
pub fn id_or_generate(id: Option<String>) -> AnnotationId {
    match id {
        Some(id) if !id.trim().is_empty() => id,
        _ => generate_id(),
    }
}

/// The kind of an annotation attached to a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Badge,
    Summary,
    LegacyHtml,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Badge => "badge",
            Self::Summary => "summary",
            Self::LegacyHtml => "legacy_html",
        }
    }

    /// The list this kind is shown in. Deprecated HTML badges share the
    /// badge row, so index-based removal counts them with badges.
    pub fn display_row(self) -> AnnotationKind {
        match self {
            Self::Badge | Self::LegacyHtml => Self::Badge,
            Self::Summary => Self::Summary,
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted schema an annotation is currently expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Separate color/background/border fields, old icon file names.
    Legacy,
    /// Single `style` string, resolved icon reference.
    Current,
}
