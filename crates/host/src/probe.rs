//! Resource existence probes used to resolve plain icon file names.
//!
//! [`FsResourceProbe`] maps the static URL prefix onto a directory on disk;
//! [`HttpResourceProbe`] issues `HEAD` requests against a running server.
//! Both are blocking.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use badgekit_core::icon::{ProbeError, ResourceProbe};

use crate::error::{HostError, HostResult};

/// Connect and read timeout for HTTP probes.
pub const HTTP_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FsResourceProbe {
    url_prefix: String,
    root: PathBuf,
}

impl FsResourceProbe {
    /// Resource paths below `url_prefix` are looked up below `root`.
    pub fn new(url_prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            root: root.into(),
        }
    }

    /// The file a resource path maps to, or `None` when the path is outside
    /// the prefix or tries to escape the root.
    fn file_for(&self, path: &str) -> Option<PathBuf> {
        let prefix = self.url_prefix.trim_end_matches('/');
        let rest = path.strip_prefix(prefix)?;
        if !rest.starts_with('/') {
            return None;
        }
        let relative = Path::new(rest.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ResourceProbe for FsResourceProbe {
    fn exists(&self, path: &str) -> Result<bool, ProbeError> {
        let Some(file) = self.file_for(path) else {
            return Ok(false);
        };
        match std::fs::metadata(&file) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ProbeError {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpResourceProbe {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpResourceProbe {
    pub fn new(base_url: impl Into<String>) -> HostResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(HTTP_PROBE_TIMEOUT)
            .timeout(HTTP_PROBE_TIMEOUT)
            .build()
            .map_err(|e| HostError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl ResourceProbe for HttpResourceProbe {
    fn exists(&self, path: &str) -> Result<bool, ProbeError> {
        let url = self.url_for(path);
        match self.client.head(&url).send() {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => Err(ProbeError {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Host selection
// ---------------------------------------------------------------------------

/// The probe selected by configuration.
#[derive(Debug, Clone)]
pub enum HostProbe {
    Fs(FsResourceProbe),
    Http(HttpResourceProbe),
    /// No resources are available; every name is reported missing.
    Disabled,
}

impl ResourceProbe for HostProbe {
    fn exists(&self, path: &str) -> Result<bool, ProbeError> {
        match self {
            Self::Fs(probe) => probe.exists(path),
            Self::Http(probe) => probe.exists(path),
            Self::Disabled => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fs_probe() -> (tempfile::TempDir, FsResourceProbe) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images/16x16")).unwrap();
        std::fs::write(dir.path().join("images/16x16/star.png"), b"png").unwrap();
        std::fs::create_dir_all(dir.path().join("images/svgs/folder.svg")).unwrap();
        let probe = FsResourceProbe::new("/static/abc", dir.path());
        (dir, probe)
    }

    #[test]
    fn fs_finds_existing_file() {
        let (_dir, probe) = fs_probe();
        assert!(probe.exists("/static/abc/images/16x16/star.png").unwrap());
    }

    #[test]
    fn fs_missing_file() {
        let (_dir, probe) = fs_probe();
        assert!(!probe.exists("/static/abc/images/16x16/nope.png").unwrap());
    }

    #[test]
    fn fs_directory_is_not_a_resource() {
        let (_dir, probe) = fs_probe();
        assert!(!probe.exists("/static/abc/images/svgs/folder.svg").unwrap());
    }

    #[test]
    fn fs_outside_prefix_or_root() {
        let (_dir, probe) = fs_probe();
        assert!(!probe.exists("/other/images/16x16/star.png").unwrap());
        assert!(!probe.exists("/static/abcdef/images/16x16/star.png").unwrap());
        assert!(!probe.exists("/static/abc/../abc/images/16x16/star.png").unwrap());
    }

    #[test]
    fn http_url_joining() {
        let probe = HttpResourceProbe::new("http://ci.example.com/").unwrap();
        assert_eq!(
            probe.url_for("/static/a.png"),
            "http://ci.example.com/static/a.png"
        );
        assert_eq!(probe.url_for("a.png"), "http://ci.example.com/a.png");
    }

    #[test]
    fn disabled_reports_missing() {
        assert!(!HostProbe::Disabled.exists("/static/x.png").unwrap());
    }
}
