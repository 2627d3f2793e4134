use std::path::PathBuf;
use std::str::FromStr;

use badgekit_core::config::BadgeConfig;
use badgekit_core::context::RenderContext;
use badgekit_core::markup::{
    EscapedMarkupFormatter, FormatError, MarkupFormatter, SafeHtmlFormatter,
};

use crate::error::{HostError, HostResult};
use crate::probe::{FsResourceProbe, HostProbe, HttpResourceProbe};

/// Which markup formatter the host applies to annotation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFormatter {
    /// Everything is plain text.
    Escaped,
    /// A safe subset of HTML is kept.
    SafeHtml,
}

impl FromStr for HostFormatter {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "escaped" => Ok(Self::Escaped),
            "safe_html" => Ok(Self::SafeHtml),
            other => Err(HostError::Config(format!(
                "BADGEKIT_MARKUP_FORMATTER must be escaped or safe_html, got {other:?}"
            ))),
        }
    }
}

impl MarkupFormatter for HostFormatter {
    fn translate(&self, text: &str) -> Result<String, FormatError> {
        match self {
            Self::Escaped => EscapedMarkupFormatter.translate(text),
            Self::SafeHtml => SafeHtmlFormatter.translate(text),
        }
    }
}

/// Host configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Directory holding one file per build.
    pub builds_dir: PathBuf,
    /// Directory served under `badge.resource_path`, for filesystem probing.
    pub resource_root: Option<PathBuf>,
    /// Base URL of a running server, for HTTP probing. Wins over
    /// `resource_root` when both are set.
    pub resource_base_url: Option<String>,
    pub formatter: HostFormatter,
    pub badge: BadgeConfig,
}

fn parse_bool(name: &str, value: Option<String>) -> HostResult<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(HostError::Config(format!(
            "{name} must be a boolean, got {other:?}"
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl HostConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                        | Default      |
    /// |--------------------------------|--------------|
    /// | `BADGEKIT_BUILDS_DIR`          | `./builds`   |
    /// | `BADGEKIT_RESOURCE_PATH`       | `/static`    |
    /// | `BADGEKIT_RESOURCE_ROOT`       | unset        |
    /// | `BADGEKIT_RESOURCE_BASE_URL`   | unset        |
    /// | `BADGEKIT_MARKUP_FORMATTER`    | `safe_html`  |
    /// | `BADGEKIT_DISABLE_FORMAT_HTML` | `false`      |
    /// | `BADGEKIT_ALLOW_UNSAFE_LINKS`  | `false`      |
    pub fn from_env() -> HostResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HostResult<Self> {
        let builds_dir = non_blank(lookup("BADGEKIT_BUILDS_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./builds"));

        let resource_path = non_blank(lookup("BADGEKIT_RESOURCE_PATH"))
            .unwrap_or_else(|| BadgeConfig::default().resource_path);

        let formatter = match non_blank(lookup("BADGEKIT_MARKUP_FORMATTER")) {
            None => HostFormatter::SafeHtml,
            Some(name) => name.trim().parse::<HostFormatter>()?,
        };

        let badge = BadgeConfig {
            disable_format_html: parse_bool(
                "BADGEKIT_DISABLE_FORMAT_HTML",
                lookup("BADGEKIT_DISABLE_FORMAT_HTML"),
            )?,
            allow_unsafe_links: parse_bool(
                "BADGEKIT_ALLOW_UNSAFE_LINKS",
                lookup("BADGEKIT_ALLOW_UNSAFE_LINKS"),
            )?,
            resource_path,
        };

        Ok(Self {
            builds_dir,
            resource_root: non_blank(lookup("BADGEKIT_RESOURCE_ROOT")).map(PathBuf::from),
            resource_base_url: non_blank(lookup("BADGEKIT_RESOURCE_BASE_URL")),
            formatter,
            badge,
        })
    }

    pub fn probe(&self) -> HostResult<HostProbe> {
        if let Some(base_url) = &self.resource_base_url {
            return Ok(HostProbe::Http(HttpResourceProbe::new(base_url.clone())?));
        }
        if let Some(root) = &self.resource_root {
            return Ok(HostProbe::Fs(FsResourceProbe::new(
                self.badge.resource_path.clone(),
                root.clone(),
            )));
        }
        Ok(HostProbe::Disabled)
    }

    /// Build the render context the core operations run against.
    pub fn render_context(&self) -> HostResult<RenderContext> {
        Ok(RenderContext::new(
            self.badge.clone(),
            self.probe()?,
            self.formatter,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.builds_dir, PathBuf::from("./builds"));
        assert_eq!(config.badge, BadgeConfig::default());
        assert_eq!(config.formatter, HostFormatter::SafeHtml);
        assert_matches!(config.probe().unwrap(), HostProbe::Disabled);
    }

    #[test]
    fn overrides() {
        let config = HostConfig::from_lookup(lookup(&[
            ("BADGEKIT_BUILDS_DIR", "/var/builds"),
            ("BADGEKIT_RESOURCE_PATH", "/static/xyz"),
            ("BADGEKIT_RESOURCE_ROOT", "/srv/www"),
            ("BADGEKIT_MARKUP_FORMATTER", "escaped"),
            ("BADGEKIT_DISABLE_FORMAT_HTML", "true"),
            ("BADGEKIT_ALLOW_UNSAFE_LINKS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.builds_dir, PathBuf::from("/var/builds"));
        assert_eq!(config.badge.resource_path, "/static/xyz");
        assert!(config.badge.disable_format_html);
        assert!(config.badge.allow_unsafe_links);
        assert_eq!(config.formatter, HostFormatter::Escaped);
        assert_matches!(config.probe().unwrap(), HostProbe::Fs(_));
    }

    #[test]
    fn base_url_selects_http_probe() {
        let config = HostConfig::from_lookup(lookup(&[
            ("BADGEKIT_RESOURCE_ROOT", "/srv/www"),
            ("BADGEKIT_RESOURCE_BASE_URL", "http://ci.local:8080"),
        ]))
        .unwrap();
        assert_matches!(config.probe().unwrap(), HostProbe::Http(_));
    }

    #[test]
    fn invalid_bool_rejected() {
        let err =
            HostConfig::from_lookup(lookup(&[("BADGEKIT_ALLOW_UNSAFE_LINKS", "maybe")])).unwrap_err();
        assert_matches!(err, HostError::Config(_));
        assert!(err.to_string().contains("BADGEKIT_ALLOW_UNSAFE_LINKS"));
    }

    #[test]
    fn invalid_formatter_rejected() {
        assert_matches!(
            HostConfig::from_lookup(lookup(&[("BADGEKIT_MARKUP_FORMATTER", "markdown")])),
            Err(HostError::Config(_))
        );
    }

    #[test]
    fn formatter_dispatch() {
        assert_eq!(HostFormatter::Escaped.translate("<b>").unwrap(), "&lt;b&gt;");
        assert_eq!(HostFormatter::SafeHtml.translate("<b>x</b>").unwrap(), "<b>x</b>");
        assert!(!HostFormatter::SafeHtml
            .translate("<svg/onload=alert(1)>")
            .unwrap()
            .contains("onload"));
    }
}
