//! Worker startup configuration.
//!
//! The browser build pipeline injects an asset manifest into the worker
//! script at build time; this module is the explicit form of that injected
//! state — bucket names, the manifest, the offline document, and the
//! third-party image denylist — deserializable from the injected JSON and
//! validated before the worker is constructed.
//!
//! URLs in the manifest (and the offline URL) are absolute; a platform
//! adapter resolves scope-relative asset paths before building the config.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Stable name of the statics bucket, shared by every worker version.
pub const DEFAULT_STATICS_BUCKET: &str = "statics-v1";

/// Prefix for per-generation page buckets.
const GENERATION_PREFIX: &str = "pages-";

/// Worker configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkerConfigError {
    #[error("failed to load worker configuration: {0}")]
    LoadFailed(String),

    #[error("invalid worker configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

/// Startup configuration for one worker version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Bucket holding the immutable build assets; its name is stable across
    /// versions so a new worker inherits the previous install's assets
    /// until its own install completes.
    #[serde(default = "default_statics_bucket")]
    pub statics_bucket: String,

    /// Bucket accumulating page responses; unique per worker version.
    pub generation_bucket: String,

    /// Static asset URLs cached at install time.
    pub manifest: Vec<String>,

    /// The document served when a navigation cannot be satisfied from
    /// network or cache. Must be part of the manifest.
    pub offline_url: String,

    /// Hosts of third-party image CDNs whose responses are never routed to
    /// the page strategy (the browser caches those opaquely on its own).
    #[serde(default)]
    pub image_origin_denylist: Vec<String>,
}

fn default_statics_bucket() -> String {
    DEFAULT_STATICS_BUCKET.to_string()
}

impl WorkerConfig {
    /// Build a configuration for the worker generation built at `built_at`.
    ///
    /// The generation bucket is named after the build timestamp, so each
    /// deployed worker version gets its own page cache and activation can
    /// recognize every other generation as stale.
    pub fn for_generation(built_at: DateTime<Utc>, manifest: Vec<String>, offline_url: impl Into<String>) -> Self {
        Self {
            statics_bucket: default_statics_bucket(),
            generation_bucket: format!(
                "{GENERATION_PREFIX}{}",
                built_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            manifest,
            offline_url: offline_url.into(),
            image_origin_denylist: Vec::new(),
        }
    }

    /// Deserialize and validate a configuration from the build-injected
    /// JSON.
    pub fn from_json(raw: &str) -> Result<Self, WorkerConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| WorkerConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `WorkerConfigError::Invalid` if:
    /// - either bucket name is empty, or the two names collide
    /// - the manifest is empty or contains a non-absolute URL
    /// - the offline document is not part of the manifest
    pub fn validate(&self) -> Result<(), WorkerConfigError> {
        if self.statics_bucket.is_empty() {
            return Err(WorkerConfigError::Invalid {
                field: "statics_bucket".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.generation_bucket.is_empty() {
            return Err(WorkerConfigError::Invalid {
                field: "generation_bucket".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.statics_bucket == self.generation_bucket {
            return Err(WorkerConfigError::Invalid {
                field: "generation_bucket".into(),
                reason: "must differ from statics_bucket".into(),
            });
        }

        if self.manifest.is_empty() {
            return Err(WorkerConfigError::Invalid { field: "manifest".into(), reason: "must not be empty".into() });
        }
        for asset in &self.manifest {
            if Url::parse(asset).is_err() {
                return Err(WorkerConfigError::Invalid {
                    field: "manifest".into(),
                    reason: format!("{asset} is not an absolute URL"),
                });
            }
        }

        // the offline document must be installable, or the navigation
        // fallback can never be served
        if !self.manifest.iter().any(|asset| asset == &self.offline_url) {
            return Err(WorkerConfigError::Invalid {
                field: "offline_url".into(),
                reason: format!("{} is not part of the manifest", self.offline_url),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manifest() -> Vec<String> {
        vec![
            "https://app.example/main.css".to_string(),
            "https://app.example/main.js".to_string(),
            "https://app.example/offline".to_string(),
        ]
    }

    #[test]
    fn test_for_generation_names_bucket_after_timestamp() {
        let built_at = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        let config = WorkerConfig::for_generation(built_at, manifest(), "https://app.example/offline");

        assert_eq!(config.statics_bucket, "statics-v1");
        assert_eq!(config.generation_bucket, "pages-2019-05-01T12:00:00.000Z");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_distinct_builds_get_distinct_generations() {
        let first = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2019, 5, 2, 9, 30, 0).unwrap();

        let a = WorkerConfig::for_generation(first, manifest(), "https://app.example/offline");
        let b = WorkerConfig::for_generation(second, manifest(), "https://app.example/offline");

        assert_ne!(a.generation_bucket, b.generation_bucket);
    }

    #[test]
    fn test_offline_url_must_be_in_manifest() {
        let built_at = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        let config = WorkerConfig::for_generation(built_at, manifest(), "https://app.example/elsewhere");

        let result = config.validate();
        assert!(matches!(result, Err(WorkerConfigError::Invalid { field, .. }) if field == "offline_url"));
    }

    #[test]
    fn test_empty_manifest_rejected() {
        let built_at = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        let config = WorkerConfig::for_generation(built_at, Vec::new(), "https://app.example/offline");

        let result = config.validate();
        assert!(matches!(result, Err(WorkerConfigError::Invalid { field, .. }) if field == "manifest"));
    }

    #[test]
    fn test_relative_manifest_entry_rejected() {
        let built_at = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        let mut config = WorkerConfig::for_generation(built_at, manifest(), "https://app.example/offline");
        config.manifest.push("/main.css".to_string());

        let result = config.validate();
        assert!(matches!(result, Err(WorkerConfigError::Invalid { field, .. }) if field == "manifest"));
    }

    #[test]
    fn test_bucket_names_must_differ() {
        let built_at = Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();
        let mut config = WorkerConfig::for_generation(built_at, manifest(), "https://app.example/offline");
        config.statics_bucket = config.generation_bucket.clone();

        let result = config.validate();
        assert!(matches!(result, Err(WorkerConfigError::Invalid { field, .. }) if field == "generation_bucket"));
    }

    #[test]
    fn test_from_json_round_trip() {
        let raw = r#"{
            "generation_bucket": "pages-2019-05-01T12:00:00.000Z",
            "manifest": ["https://app.example/main.css", "https://app.example/offline"],
            "offline_url": "https://app.example/offline"
        }"#;

        let config = WorkerConfig::from_json(raw).unwrap();
        assert_eq!(config.statics_bucket, "statics-v1");
        assert_eq!(config.manifest.len(), 2);
        assert!(config.image_origin_denylist.is_empty());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let raw = r#"{
            "generation_bucket": "",
            "manifest": ["https://app.example/offline"],
            "offline_url": "https://app.example/offline"
        }"#;

        assert!(WorkerConfig::from_json(raw).is_err());
    }
}
