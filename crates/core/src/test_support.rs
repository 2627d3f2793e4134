//! Shared fixtures for unit tests.

use std::cell::Cell;

use crate::config::BadgeConfig;
use crate::context::RenderContext;
use crate::error::CoreError;
use crate::icon::ProbeError;
use crate::manager::Persist;
use crate::markup::{FormatError, MarkupFormatter, SafeHtmlFormatter};
use crate::store::AnnotationStore;

pub struct BrokenFormatter;

impl MarkupFormatter for BrokenFormatter {
    fn translate(&self, _text: &str) -> Result<String, FormatError> {
        Err(FormatError("formatter unavailable".to_string()))
    }
}

/// Context with no resources on disk and the safe HTML formatter.
pub fn context() -> RenderContext {
    context_with(BadgeConfig::default())
}

pub fn context_with(config: BadgeConfig) -> RenderContext {
    RenderContext::new(
        config,
        |_: &str| Ok::<bool, ProbeError>(false),
        SafeHtmlFormatter,
    )
}

#[derive(Default)]
pub struct RecordingPersist {
    calls: Cell<usize>,
    fail: bool,
}

impl RecordingPersist {
    pub fn failing() -> Self {
        Self {
            calls: Cell::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Persist for RecordingPersist {
    fn persist(&self, _store: &AnnotationStore) -> Result<(), CoreError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(CoreError::Persist("disk full".to_string()));
        }
        Ok(())
    }
}
