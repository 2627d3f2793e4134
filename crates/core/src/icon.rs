//! Icon reference resolution.
//!
//! Callers hand in anything from a decade-old `*.gif` file name to an
//! icon-font symbol or an absolute URL. [`IconResolver::resolve`] turns that
//! into a reference the build page can render:
//!
//! - already-renderable references pass through unchanged,
//! - the fixed legacy table maps old GIF names to symbols,
//! - anything else is probed as a file below the host's image directories.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Legacy GIF file names and the symbols that replace them.
pub const LEGACY_ICONS: &[(&str, &str)] = &[
    ("completed.gif", "symbol-status-blue"),
    ("db_in.gif", "symbol-cloud-upload-outline plugin-ionicons-api"),
    ("db_out.gif", "symbol-cloud-download-outline plugin-ionicons-api"),
    ("delete.gif", "symbol-trash"),
    ("error.gif", "symbol-status-red"),
    ("folder.gif", "symbol-folder"),
    ("green.gif", "symbol-green-square plugin-emoji-symbols-api"),
    ("info.gif", "symbol-information-circle"),
    ("red.gif", "symbol-red-square plugin-emoji-symbols-api"),
    ("save.gif", "symbol-save-outline plugin-ionicons-api"),
    ("success.gif", "symbol-status-blue"),
    ("text.gif", "symbol-document-text"),
    ("warning.gif", "symbol-status-yellow"),
    ("yellow.gif", "symbol-yellow-square plugin-emoji-symbols-api"),
];

/// Image directories probed for unrecognised icon names, in order.
pub const ICON_SEARCH_DIRS: &[&str] = &["images/16x16", "images/svgs"];

// ---------------------------------------------------------------------------
// Resource probe
// ---------------------------------------------------------------------------

/// A resource existence check failed (network or filesystem error).
#[derive(Debug, thiserror::Error)]
#[error("Resource probe failed for {path}: {message}")]
pub struct ProbeError {
    pub path: String,
    pub message: String,
}

/// Host capability answering whether a static resource path exists.
///
/// Implementations may block (HTTP HEAD, filesystem stat). An `Err` is
/// treated as "missing" by the resolver.
pub trait ResourceProbe {
    fn exists(&self, path: &str) -> Result<bool, ProbeError>;
}

impl<F> ResourceProbe for F
where
    F: Fn(&str) -> Result<bool, ProbeError>,
{
    fn exists(&self, path: &str) -> Result<bool, ProbeError> {
        self(path)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Whether `icon` is already a reference the page can render as-is.
pub fn is_renderable_reference(icon: &str) -> bool {
    icon.trim().is_empty()
        || icon.starts_with('/')
        || icon.starts_with("symbol-")
        || icon.starts_with("icon-")
        || icon.starts_with("http://")
        || icon.starts_with("https://")
}

/// Look up a legacy GIF name. Exact, case-sensitive match.
pub fn legacy_icon(icon: &str) -> Option<&'static str> {
    LEGACY_ICONS
        .iter()
        .find(|(name, _)| *name == icon)
        .map(|(_, symbol)| *symbol)
}

/// Maps caller-supplied icon references to renderable ones.
pub struct IconResolver {
    resource_path: String,
    probe: Box<dyn ResourceProbe + Send + Sync>,
}

impl std::fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconResolver")
            .field("resource_path", &self.resource_path)
            .finish_non_exhaustive()
    }
}

impl IconResolver {
    pub fn new(
        resource_path: impl Into<String>,
        probe: impl ResourceProbe + Send + Sync + 'static,
    ) -> Self {
        Self {
            resource_path: resource_path.into(),
            probe: Box::new(probe),
        }
    }

    /// Candidate resource paths probed for a plain file name.
    pub fn candidates(&self, icon: &str) -> Vec<String> {
        let prefix = self.resource_path.trim_end_matches('/');
        ICON_SEARCH_DIRS
            .iter()
            .map(|dir| format!("{prefix}/{dir}/{icon}"))
            .collect()
    }

    /// Resolve an icon reference. `None` stays `None` (text-only).
    ///
    /// Idempotent: every value this returns either passes through
    /// unchanged on a second call or is the unresolvable raw name again.
    pub fn resolve(&self, icon: Option<&str>) -> Option<String> {
        let icon = icon?;

        if is_renderable_reference(icon) {
            return Some(icon.to_string());
        }

        if let Some(symbol) = legacy_icon(icon) {
            return Some(symbol.to_string());
        }

        for candidate in self.candidates(icon) {
            match self.probe.exists(&candidate) {
                Ok(true) => return Some(candidate),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(path = %candidate, error = %e, "Icon resource probe failed, assuming missing");
                }
            }
        }

        tracing::warn!(icon = %icon, "No icon resource found, using reference unchanged");
        Some(icon.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
