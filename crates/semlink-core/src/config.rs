//! Device file loading.
//!
//! The device file supplies the local device identity (optional; a node
//! without one is unconfigured and stays silent) and the hosted objects
//! with their tags.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::device::LocalDevice;
use crate::error::{ConfigError, Result};
use crate::types::{DeviceIdentity, LocalObject};

/// Valid object type strings: lowercase kebab-case
const TYPE_PATTERN: &str = r"^[a-z][a-z0-9-]*$";

/// Valid tag names: alphanumeric, dash, underscore only
const TAG_NAME_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

/// On-disk device description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFile {
    /// Local device identity; omit to run an unconfigured node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<DeviceIdentity>,
    /// Objects hosted by this device
    #[serde(default)]
    pub objects: Vec<LocalObject>,
}

impl DeviceFile {
    /// Validate identifiers, then build the runtime device with its
    /// sealed tag index.
    pub fn into_device(self) -> Result<LocalDevice> {
        self.validate()?;
        LocalDevice::build(self.identity, self.objects)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let type_regex = Regex::new(TYPE_PATTERN).unwrap();
        let tag_name_regex = Regex::new(TAG_NAME_PATTERN).unwrap();

        for object in &self.objects {
            if !type_regex.is_match(&object.id.object_type) {
                return Err(ConfigError::InvalidObjectId(object.id.to_string()));
            }
            for tag in &object.tags {
                if !tag_name_regex.is_match(&tag.name) {
                    return Err(ConfigError::InvalidTagName(format!(
                        "'{}' on {}",
                        tag.name, object.id
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Load a device file from `path`.
pub async fn load_device_file(path: &Path) -> std::result::Result<DeviceFile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).await.map_err(ConfigError::Io)?;
    let file: DeviceFile = serde_json::from_str(&content)?;
    Ok(file)
}

/// Default device file location in the platform config directory.
pub fn default_device_file_path() -> std::result::Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("", "", "semlink").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join("device.json"))
}
