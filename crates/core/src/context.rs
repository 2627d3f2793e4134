//! Host capabilities and configuration needed to create and render
//! annotations, bundled so they can be injected in one piece.

use crate::config::BadgeConfig;
use crate::error::CoreError;
use crate::icon::{IconResolver, ResourceProbe};
use crate::link;
use crate::markup::{MarkupFormatter, TextSanitizer};

pub struct RenderContext {
    config: BadgeConfig,
    icons: IconResolver,
    formatter: Box<dyn MarkupFormatter + Send + Sync>,
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("config", &self.config)
            .field("icons", &self.icons)
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    pub fn new(
        config: BadgeConfig,
        probe: impl ResourceProbe + Send + Sync + 'static,
        formatter: impl MarkupFormatter + Send + Sync + 'static,
    ) -> Self {
        let icons = IconResolver::new(config.resource_path.clone(), probe);
        Self {
            config,
            icons,
            formatter: Box::new(formatter),
        }
    }

    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    pub fn sanitizer(&self) -> TextSanitizer<'_> {
        TextSanitizer::new(self.formatter.as_ref(), self.config.disable_format_html)
    }

    pub fn resolve_icon(&self, icon: Option<&str>) -> Option<String> {
        self.icons.resolve(icon)
    }

    pub fn render_text(&self, text: Option<&str>) -> Option<String> {
        self.sanitizer().render(text)
    }

    /// Lenient link validation (drops unsafe links).
    pub fn validate_link(&self, link: Option<&str>) -> Option<String> {
        link::validate_link(link, self.config.allow_unsafe_links)
    }

    /// Strict link validation (rejects unsafe links).
    pub fn validate_link_strict(&self, link: Option<&str>) -> Result<Option<String>, CoreError> {
        link::validate_link_strict(link, self.config.allow_unsafe_links)
    }
}
