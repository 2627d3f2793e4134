//! Script and pipeline-step facing operations on one build's annotations.
//!
//! Every mutating call updates the in-memory store and then hands it to the
//! host's [`Persist`] implementation. A failed persist is returned to the
//! caller; the in-memory change stays in place and the store keeps its
//! needs-persist flag.

use crate::annotation::{
    Annotation, AnnotationView, Badge, BadgeOptions, HtmlBadge, ShortTextOptions, Summary,
};
use crate::context::RenderContext;
use crate::error::CoreError;
use crate::store::AnnotationStore;
use crate::types::{id_or_generate, AnnotationId, AnnotationKind};

/// Legacy icon names used by the info/warning/error helpers.
pub const INFO_ICON: &str = "info.gif";
pub const WARNING_ICON: &str = "warning.gif";
pub const ERROR_ICON: &str = "error.gif";

/// Durably saves a build's annotation list after a mutation.
pub trait Persist {
    fn persist(&self, store: &AnnotationStore) -> Result<(), CoreError>;
}

/// Reference to a summary created through [`BadgeManager::create_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryHandle {
    id: AnnotationId,
}

impl SummaryHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

pub struct BadgeManager<'a> {
    store: &'a mut AnnotationStore,
    ctx: &'a RenderContext,
    persister: &'a dyn Persist,
}

impl<'a> BadgeManager<'a> {
    pub fn new(
        store: &'a mut AnnotationStore,
        ctx: &'a RenderContext,
        persister: &'a dyn Persist,
    ) -> Self {
        Self {
            store,
            ctx,
            persister,
        }
    }

    fn save(&mut self) -> Result<(), CoreError> {
        self.persister.persist(self.store)?;
        self.store.mark_persisted();
        Ok(())
    }

    fn push(&mut self, annotation: Annotation) -> Result<AnnotationId, CoreError> {
        let id = annotation.id().to_string();
        tracing::debug!(kind = %annotation.kind(), id = %id, "Adding annotation");
        self.store.add(annotation);
        self.save()?;
        Ok(id)
    }

    // -- badges -------------------------------------------------------------

    /// Add an icon badge. An unsafe link fails the call.
    pub fn add_badge(
        &mut self,
        icon: &str,
        text: &str,
        link: Option<&str>,
    ) -> Result<AnnotationId, CoreError> {
        let badge = Badge::create(self.ctx, Some(icon), Some(text), link)?;
        self.push(Annotation::Badge(badge))
    }

    /// Add a badge from the full option set. An unsafe link is dropped.
    pub fn add_badge_with(&mut self, options: BadgeOptions) -> Result<AnnotationId, CoreError> {
        let badge = Badge::from_options(self.ctx, options);
        self.push(Annotation::Badge(badge))
    }

    pub fn add_short_text(
        &mut self,
        text: &str,
        options: ShortTextOptions,
    ) -> Result<AnnotationId, CoreError> {
        let badge = Badge::short_text(self.ctx, text, options);
        self.push(Annotation::Badge(badge))
    }

    pub fn add_info_badge(
        &mut self,
        text: &str,
        link: Option<&str>,
    ) -> Result<AnnotationId, CoreError> {
        self.add_badge(INFO_ICON, text, link)
    }

    pub fn add_warning_badge(
        &mut self,
        text: &str,
        link: Option<&str>,
    ) -> Result<AnnotationId, CoreError> {
        self.add_badge(WARNING_ICON, text, link)
    }

    pub fn add_error_badge(
        &mut self,
        text: &str,
        link: Option<&str>,
    ) -> Result<AnnotationId, CoreError> {
        self.add_badge(ERROR_ICON, text, link)
    }

    /// Deprecated raw-HTML badge. The HTML is sanitized when rendered.
    pub fn add_html_badge(
        &mut self,
        html: &str,
        id: Option<&str>,
    ) -> Result<AnnotationId, CoreError> {
        let id = id_or_generate(id.map(str::to_string));
        self.push(Annotation::LegacyHtml(HtmlBadge::new(id, html.to_string())))
    }

    // -- summaries ----------------------------------------------------------

    pub fn create_summary(
        &mut self,
        icon: Option<&str>,
        text: Option<&str>,
    ) -> Result<SummaryHandle, CoreError> {
        let mut summary = Summary::create(self.ctx, icon);
        if let Some(text) = text {
            summary.append_text(text, false);
        }
        let id = self.push(Annotation::Summary(summary))?;
        Ok(SummaryHandle { id })
    }

    fn summary_mut(&mut self, handle: &SummaryHandle) -> Result<&mut Summary, CoreError> {
        self.store
            .summary_mut(handle.id())
            .ok_or_else(|| CoreError::NotFound {
                entity: "Summary",
                id: handle.id().to_string(),
            })
    }

    pub fn append_text(
        &mut self,
        handle: &SummaryHandle,
        text: &str,
        escape: bool,
    ) -> Result<(), CoreError> {
        self.summary_mut(handle)?.append_text(text, escape);
        self.store.mark_dirty();
        self.save()
    }

    pub fn append_text_styled(
        &mut self,
        handle: &SummaryHandle,
        text: &str,
        escape: bool,
        bold: bool,
        italic: bool,
        color: Option<&str>,
    ) -> Result<(), CoreError> {
        self.summary_mut(handle)?
            .append_text_styled(text, escape, bold, italic, color);
        self.store.mark_dirty();
        self.save()
    }

    // -- removal ------------------------------------------------------------

    /// Remove badges (including deprecated HTML badges) with `id`, or all
    /// of them when `id` is `None`.
    pub fn remove_badges(&mut self, id: Option<&str>) -> Result<usize, CoreError> {
        let removed = self.store.remove_by_id(AnnotationKind::Badge, id)
            + self.store.remove_by_id(AnnotationKind::LegacyHtml, id);
        self.save()?;
        Ok(removed)
    }

    pub fn remove_summaries(&mut self, id: Option<&str>) -> Result<usize, CoreError> {
        let removed = self.store.remove_by_id(AnnotationKind::Summary, id);
        self.save()?;
        Ok(removed)
    }

    /// Remove the `index`-th entry of [`badges`](Self::badges).
    pub fn remove_badge(&mut self, index: usize) -> Result<(), CoreError> {
        self.store.remove_at(AnnotationKind::Badge, index)?;
        self.save()
    }

    pub fn remove_summary(&mut self, index: usize) -> Result<(), CoreError> {
        self.store.remove_at(AnnotationKind::Summary, index)?;
        self.save()
    }

    // -- reading ------------------------------------------------------------

    /// Rendered badges, deprecated HTML badges included, in display order.
    pub fn badges(&self) -> Vec<AnnotationView> {
        self.store
            .row_of(AnnotationKind::Badge)
            .map(|a| a.render(self.ctx))
            .collect()
    }

    pub fn summaries(&self) -> Vec<AnnotationView> {
        self.store
            .all_of_kind(AnnotationKind::Summary)
            .map(|a| a.render(self.ctx))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
