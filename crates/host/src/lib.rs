//! Host-side collaborators for `badgekit_core`: resource probes, the
//! per-build file store, the legacy XML reader and environment
//! configuration.

pub mod build_store;
pub mod config;
pub mod error;
pub mod legacy_xml;
pub mod probe;
