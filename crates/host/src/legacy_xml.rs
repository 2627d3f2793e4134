//! Reader for build files written in the legacy XML schema.
//!
//! A legacy build file lists its actions as elements named after their
//! implementing class. Only badge, summary and HTML badge actions are
//! returned; every other action is skipped. Each action's direct child
//! elements become fields.

use std::collections::HashMap;

use badgekit_core::migration::{
    LegacyAction, LegacyHtmlRecord, LegacyRecord, LegacyStyle, LegacySummaryRecord,
};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{HostError, HostResult};

/// Class-name suffixes of HTML badge actions. Checked first: they also end
/// in `BadgeAction`.
const HTML_SUFFIXES: &[&str] = &["HtmlBadgeAction"];

const SUMMARY_SUFFIXES: &[&str] = &["GroovyPostbuildSummaryAction", "BadgeSummaryAction"];

const BADGE_SUFFIXES: &[&str] = &["GroovyPostbuildAction", "BadgeAction"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionClass {
    Badge,
    Summary,
    Html,
}

fn classify(element: &str) -> Option<ActionClass> {
    let matches = |suffixes: &[&str]| suffixes.iter().any(|s| element.ends_with(s));
    if matches(HTML_SUFFIXES) {
        Some(ActionClass::Html)
    } else if matches(SUMMARY_SUFFIXES) {
        Some(ActionClass::Summary)
    } else if matches(BADGE_SUFFIXES) {
        Some(ActionClass::Badge)
    } else {
        None
    }
}

/// An action element being collected.
struct OpenAction {
    class: ActionClass,
    depth: usize,
    fields: HashMap<String, String>,
    field: Option<String>,
}

impl OpenAction {
    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Like [`take`](Self::take), but an empty or blank element counts as
    /// absent.
    fn take_value(&mut self, name: &str) -> Option<String> {
        self.take(name).filter(|v| !v.trim().is_empty())
    }

    fn finish(mut self) -> LegacyAction {
        match self.class {
            ActionClass::Badge => {
                let icon_path = self.take_value("iconPath").or_else(|| self.take_value("icon"));
                LegacyAction::Badge(LegacyRecord {
                    id: self.take_value("id"),
                    icon_path,
                    text: self.take("text"),
                    link: self.take_value("link"),
                    style: LegacyStyle {
                        color: self.take_value("color"),
                        background: self.take_value("background"),
                        border: self.take_value("border"),
                        border_color: self.take_value("borderColor"),
                    },
                })
            }
            ActionClass::Summary => {
                let icon_path = self.take_value("iconPath").or_else(|| self.take_value("icon"));
                let text = self
                    .take("textBuilder")
                    .or_else(|| self.take("summaryText"))
                    .or_else(|| self.take("text"));
                LegacyAction::Summary(LegacySummaryRecord {
                    id: self.take_value("id"),
                    icon_path,
                    text,
                })
            }
            ActionClass::Html => LegacyAction::Html(LegacyHtmlRecord {
                id: self.take_value("id"),
                html: self.take("html"),
            }),
        }
    }
}

fn xml_err(e: impl std::fmt::Display) -> HostError {
    HostError::Xml(e.to_string())
}

/// Parse the badge-related actions out of a legacy build file, in
/// document order.
pub fn read_legacy_actions(xml: &str) -> HostResult<Vec<LegacyAction>> {
    let mut reader = Reader::from_str(xml);
    let mut actions = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<OpenAction> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match open.as_mut() {
                    None => {
                        if let Some(class) = classify(&name) {
                            open = Some(OpenAction {
                                class,
                                depth,
                                fields: HashMap::new(),
                                field: None,
                            });
                        }
                    }
                    Some(action) if depth == action.depth + 1 => {
                        action.fields.entry(name.clone()).or_default();
                        action.field = Some(name);
                    }
                    Some(_) => {}
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match open.as_mut() {
                    Some(action) if depth == action.depth => {
                        action.fields.entry(name).or_default();
                    }
                    Some(_) => {}
                    None => {
                        if let Some(class) = classify(&name) {
                            actions.push(
                                OpenAction {
                                    class,
                                    depth: depth + 1,
                                    fields: HashMap::new(),
                                    field: None,
                                }
                                .finish(),
                            );
                        }
                    }
                }
            }
            Event::Text(t) => {
                if let Some(action) = open.as_mut() {
                    if let Some(field) = &action.field {
                        let text = t.unescape().map_err(xml_err)?;
                        action
                            .fields
                            .entry(field.clone())
                            .or_default()
                            .push_str(&text);
                    }
                }
            }
            Event::CData(c) => {
                if let Some(action) = open.as_mut() {
                    if let Some(field) = &action.field {
                        let text = String::from_utf8_lossy(&c).into_owned();
                        action
                            .fields
                            .entry(field.clone())
                            .or_default()
                            .push_str(&text);
                    }
                }
            }
            Event::End(_) => {
                if let Some(action) = open.as_mut() {
                    if depth == action.depth + 1 {
                        action.field = None;
                    } else if depth == action.depth {
                        if let Some(action) = open.take() {
                            actions.push(action.finish());
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if open.is_some() {
        return Err(HostError::Xml("unterminated action element".to_string()));
    }

    Ok(actions)
}
