/// Process-wide badge settings, passed explicitly into the resolvers and
/// validators that need them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeConfig {
    /// Escape all badge and summary text instead of handing it to the host
    /// markup formatter.
    pub disable_format_html: bool,
    /// Accept any link scheme. Back-compat escape hatch; off by default.
    pub allow_unsafe_links: bool,
    /// URL prefix under which the host serves static images
    /// (e.g. `/static/abc123`). Icon file names are probed below it.
    pub resource_path: String,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            disable_format_html: false,
            allow_unsafe_links: false,
            resource_path: "/static".to_string(),
        }
    }
}
