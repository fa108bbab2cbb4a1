use crate::config::ReportingConfig;
use crate::report::export::ReportDocument;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Failure reported by a [`ReportStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The key cannot be used by this store.
    #[error("invalid store key '{0}'")]
    InvalidKey(String),
    /// The backing store rejected or failed the write.
    #[error("store write failed: {0}")]
    Write(String),
}

/// Persistence collaborator for exported reports (object store, bucket, shared drive).
///
/// Implementations are opaque to the validator. Failures never affect a validation result.
pub trait ReportStore: Send + Sync {
    /// Persist `body` under `key`; return a location string for logging.
    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<String, StoreError>;
}

/// [`ReportStore`] backed by a local directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Store reports below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ReportStore for DirStore {
    fn put(&self, key: &str, body: &[u8], _content_type: &str) -> Result<String, StoreError> {
        let rel = normalize_key(key).ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Write(format!("create '{}': {e}", parent.display())))?;
        }
        std::fs::write(&path, body)
            .map_err(|e| StoreError::Write(format!("write '{}': {e}", path.display())))?;
        Ok(path.display().to_string())
    }
}

/// Keys are relative, `/`-separated and never escape the store root.
fn normalize_key(key: &str) -> Option<String> {
    let s = key.replace('\\', "/");
    if s.starts_with('/') {
        return None;
    }
    let parts: Vec<&str> = s.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    if parts.is_empty() || parts.contains(&"..") {
        return None;
    }
    Some(parts.join("/"))
}

/// Result of handing a report to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// `reporting.save_to_cloud` is off.
    Skipped,
    /// Stored at the given location.
    Stored {
        /// Store-reported location.
        location: String,
    },
    /// The store failed; the validation result is unaffected.
    Failed {
        /// Failure description.
        reason: String,
    },
}

/// Store key for a report: `<cloud_storage_path>/<scene id>.validation.<ext>`.
///
/// Scenes without an id use the stem `scene`. Use [`ReportKeys`] when several reports are written
/// in one run.
pub fn report_key(cfg: &ReportingConfig, scene_id: Option<&str>) -> String {
    let stem = scene_id
        .and_then(sanitize_stem)
        .unwrap_or_else(|| "scene".to_string());
    key_for(cfg, &stem)
}

/// Hands out distinct report keys within one run.
///
/// The stem is the sanitized scene id, else the sanitized `fallback` (typically the input file
/// stem), else `scene`. A key already handed out gets a `-2`, `-3`, ... suffix on its stem.
#[derive(Debug, Default)]
pub struct ReportKeys {
    used: HashSet<String>,
}

impl ReportKeys {
    /// Empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next unused key for a report of `scene_id`.
    pub fn allocate(&mut self, cfg: &ReportingConfig, scene_id: Option<&str>, fallback: &str) -> String {
        let stem = scene_id
            .and_then(sanitize_stem)
            .or_else(|| sanitize_stem(fallback))
            .unwrap_or_else(|| "scene".to_string());
        let mut key = key_for(cfg, &stem);
        let mut n = 1;
        while !self.used.insert(key.clone()) {
            n += 1;
            key = key_for(cfg, &format!("{stem}-{n}"));
        }
        key
    }
}

fn sanitize_stem(raw: &str) -> Option<String> {
    let stem: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    (!stem.is_empty()).then_some(stem)
}

fn key_for(cfg: &ReportingConfig, stem: &str) -> String {
    let file = format!("{stem}.validation.{}", cfg.format.extension());
    match cfg.cloud_storage_path.as_deref().map(|p| p.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{file}"),
        _ => file,
    }
}

/// Render `doc` in the configured format and hand it to `store` when `save_to_cloud` is set.
///
/// The key comes from [`report_key`].
pub fn publish(
    doc: &ReportDocument<'_>,
    cfg: &ReportingConfig,
    store: &dyn ReportStore,
) -> PublishOutcome {
    let key = report_key(cfg, doc.report().scene_id.as_deref());
    publish_as(doc, cfg, store, &key)
}

/// Like [`publish`], storing under a caller-chosen `key`.
pub fn publish_as(
    doc: &ReportDocument<'_>,
    cfg: &ReportingConfig,
    store: &dyn ReportStore,
    key: &str,
) -> PublishOutcome {
    if !cfg.save_to_cloud {
        return PublishOutcome::Skipped;
    }
    let body = match doc.render(cfg.format) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(%key, error = %e, "report render failed; not stored");
            return PublishOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };
    match store.put(key, body.as_bytes(), cfg.format.content_type()) {
        Ok(location) => {
            tracing::info!(%location, "validation report stored");
            PublishOutcome::Stored { location }
        }
        Err(e) => {
            tracing::warn!(%key, error = %e, "report store unavailable");
            PublishOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/report/store.rs"]
mod tests;
