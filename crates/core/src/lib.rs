//! Badge and summary annotations for build results.
//!
//! Pure domain logic: icon and color resolution, link validation, text
//! sanitization, the annotation model and its per-build store, and the
//! migration of legacy persisted annotations. Host capabilities (resource
//! probing, markup formatting, persistence) come in through traits.

pub mod annotation;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod icon;
pub mod link;
pub mod manager;
pub mod markup;
pub mod migration;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_support;
