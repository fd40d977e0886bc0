// aim-common/src/model/properties.rs
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::version::Version;
use crate::error::{AimError, Result};

pub const VERSION_PROPERTY: &str = "version";
pub const FILE_NAME_PROPERTY: &str = "file";
pub const CHECKSUM_PROPERTY: &str = "sha256";
pub const SIZE_PROPERTY: &str = "size";
pub const AUTHENTICATION_REQUIRED_PROPERTY: &str = "authenticationRequired";
pub const SUBSCRIPTION_PROPERTY: &str = "subscription";

/// Keys every property set served by the repository must carry.
pub const PUBLIC_PROPERTIES: [&str; 3] = [VERSION_PROPERTY, FILE_NAME_PROPERTY, CHECKSUM_PROPERTY];

/// Remote description of one artifact version, as served under
/// `repository/properties/<artifact>[/<version>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactProperties {
    artifact: String,
    values: BTreeMap<String, String>,
}

impl ArtifactProperties {
    pub fn new(artifact: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            artifact: artifact.into(),
            values,
        }
    }

    /// Parses a flat JSON object. Scalars that are not strings are kept in their
    /// JSON text form (`true`, `1024`); nested values are rejected.
    pub fn from_json(artifact: &str, body: &str) -> Result<Self> {
        let object: BTreeMap<String, Value> = serde_json::from_str(body)?;
        let mut values = BTreeMap::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Bool(_) | Value::Number(_) => value.to_string(),
                Value::Null => continue,
                Value::Array(_) | Value::Object(_) => {
                    return Err(AimError::Generic(format!(
                        "Unexpected nested value for property '{key}' of the artifact '{artifact}'"
                    )))
                }
            };
            values.insert(key, text);
        }
        Ok(Self::new(artifact, values))
    }

    /// Rejects the whole set when any public key is missing.
    pub fn validate(&self, requested_version: Option<&Version>) -> Result<()> {
        for key in PUBLIC_PROPERTIES {
            if !self.values.contains_key(key) {
                return Err(AimError::PropertyValidation {
                    artifact: self.artifact.clone(),
                    version: requested_version.map(|v| v.to_string()),
                    property: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| AimError::PropertyValidation {
            artifact: self.artifact.clone(),
            version: self.get(VERSION_PROPERTY).map(str::to_string),
            property: key.to_string(),
        })
    }

    pub fn version(&self) -> Result<Version> {
        Version::parse(self.require(VERSION_PROPERTY)?)
    }

    /// A bare file name; separators, `..` and absolute paths are rejected so
    /// the binary always lands inside its version directory.
    pub fn file_name(&self) -> Result<&str> {
        let name = self.require(FILE_NAME_PROPERTY)?;
        if Path::new(name).file_name() != Some(OsStr::new(name)) {
            return Err(AimError::PropertyValidation {
                artifact: self.artifact.clone(),
                version: self.get(VERSION_PROPERTY).map(str::to_string),
                property: FILE_NAME_PROPERTY.to_string(),
            });
        }
        Ok(name)
    }

    pub fn checksum(&self) -> Result<&str> {
        self.require(CHECKSUM_PROPERTY)
    }

    pub fn size(&self) -> Option<u64> {
        self.get(SIZE_PROPERTY).and_then(|s| s.parse().ok())
    }

    pub fn authentication_required(&self) -> bool {
        self.get(AUTHENTICATION_REQUIRED_PROPERTY)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn subscription(&self) -> Option<&str> {
        self.get(SUBSCRIPTION_PROPERTY).filter(|s| !s.is_empty())
    }
}
