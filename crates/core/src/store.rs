//! The ordered annotation list of one build.
//!
//! Insertion order is display order. Ids are not required to be unique.
//! The store is mutated through `&mut` by the single context that owns the
//! build, so it carries no locking; it only records that a persist is due.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, Summary};
use crate::error::CoreError;
use crate::types::AnnotationKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationStore {
    items: Vec<Annotation>,
    #[serde(skip)]
    dirty: bool,
}

impl PartialEq for AnnotationStore {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for AnnotationStore {}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_annotations(items: Vec<Annotation>) -> Self {
        Self {
            items,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Annotation> {
        self.items.iter_mut()
    }

    /// Whether the store changed since it was last persisted.
    pub fn needs_persist(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_persisted(&mut self) {
        self.dirty = false;
    }

    /// Append an annotation at the end of the display order.
    pub fn add(&mut self, annotation: Annotation) {
        self.items.push(annotation);
        self.dirty = true;
    }

    /// All annotations of `kind`, in display order.
    pub fn all_of_kind(&self, kind: AnnotationKind) -> impl Iterator<Item = &Annotation> {
        self.items.iter().filter(move |a| a.kind() == kind)
    }

    pub fn count_of_kind(&self, kind: AnnotationKind) -> usize {
        self.all_of_kind(kind).count()
    }

    /// Remove every annotation of `kind` whose id is `id`, or every
    /// annotation of `kind` when `id` is `None`. Returns how many went.
    pub fn remove_by_id(&mut self, kind: AnnotationKind, id: Option<&str>) -> usize {
        let before = self.items.len();
        self.items
            .retain(|a| !(a.kind() == kind && id.map_or(true, |id| a.id() == id)));
        let removed = before - self.items.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Annotations shown in the same row as `kind`, in display order.
    pub fn row_of(&self, kind: AnnotationKind) -> impl Iterator<Item = &Annotation> {
        let row = kind.display_row();
        self.items.iter().filter(move |a| a.kind().display_row() == row)
    }

    /// Remove the `index`-th annotation of the row `kind` is shown in.
    ///
    /// Indexes count badges and deprecated HTML badges together, matching
    /// the order the badge row is rendered in.
    pub fn remove_at(
        &mut self,
        kind: AnnotationKind,
        index: usize,
    ) -> Result<Annotation, CoreError> {
        let row = kind.display_row();
        let len = self.row_of(row).count();
        let position = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, a)| a.kind().display_row() == row)
            .nth(index)
            .map(|(pos, _)| pos)
            .ok_or(CoreError::IndexOutOfRange {
                kind: row,
                index,
                len,
            })?;
        self.dirty = true;
        Ok(self.items.remove(position))
    }

    /// The most recently added summary with `id`.
    pub fn summary_mut(&mut self, id: &str) -> Option<&mut Summary> {
        self.items.iter_mut().rev().find_map(|a| match a {
            Annotation::Summary(s) if s.id() == id => Some(s),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
