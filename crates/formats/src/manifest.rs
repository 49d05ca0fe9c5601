use std::fmt;

use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";
pub const MANIFEST_FILE_NAME: &str = "story.manifest.json";

/// Versioned description of the five resources a story needs.
///
/// Paths are resolved by the [`ResourceSource`](crate::source::ResourceSource)
/// the bundle is loaded from (relative file paths or URL suffixes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetManifest {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub resources: ResourcePaths,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourcePaths {
    pub immigration: String,
    pub housing: String,
    pub unemployment: String,
    pub health: String,
    pub boundaries: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            immigration: "data/new-immigrants.csv".to_string(),
            housing: "data/house-prices.csv".to_string(),
            unemployment: "data/unemployment.csv".to_string(),
            health: "data/health-needs.csv".to_string(),
            boundaries: "data/canada-provinces.json".to_string(),
        }
    }
}

impl Default for DatasetManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            name: None,
            resources: ResourcePaths::default(),
        }
    }
}

#[derive(Debug)]
pub enum ManifestError {
    Parse(serde_json::Error),
    UnsupportedVersion { found: String },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Parse(err) => write!(f, "Manifest parse error: {err}"),
            ManifestError::UnsupportedVersion { found } => {
                write!(f, "Unsupported manifest version: {found}")
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Parse(err) => Some(err),
            ManifestError::UnsupportedVersion { .. } => None,
        }
    }
}

impl DatasetManifest {
    pub fn from_json_str(payload: &str) -> Result<Self, ManifestError> {
        let manifest: DatasetManifest =
            serde_json::from_str(payload).map_err(ManifestError::Parse)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: manifest.version,
            });
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetManifest, MANIFEST_VERSION, ManifestError};
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_default_manifest() {
        let mut manifest = DatasetManifest::default();
        manifest.name = Some("Canada".to_string());
        let payload = serde_json::to_string_pretty(&manifest).expect("serialize manifest");
        let back = DatasetManifest::from_json_str(&payload).expect("parse manifest");
        assert_eq!(back, manifest);
    }

    #[test]
    fn rejects_unsupported_manifest_version() {
        let mut manifest = DatasetManifest::default();
        manifest.version = "2.0".to_string();
        let payload = serde_json::to_string(&manifest).expect("serialize manifest");

        let err = DatasetManifest::from_json_str(&payload).expect_err("expect version error");
        match err {
            ManifestError::UnsupportedVersion { found } => {
                assert_eq!(found, "2.0");
                assert_ne!(found, MANIFEST_VERSION);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
