//! Type definitions shared across the semlink core.
//!
//! These types appear in wire messages and in the device file, so they
//! are serialized/deserialized with serde.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one object hosted by a device: a (type, instance) pair.
///
/// The type is a lowercase kebab-case string chosen by the device file
/// (e.g. `analog-input`); the instance number is unique per type on one
/// device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    /// Object type string
    #[serde(rename = "type")]
    pub object_type: String,
    /// Instance number, unique per type on the hosting device
    pub instance: u32,
}

impl ObjectId {
    pub fn new(object_type: impl Into<String>, instance: u32) -> Self {
        Self {
            object_type: object_type.into(),
            instance,
        }
    }

    /// Identifier for the device object itself.
    pub fn device(instance: u32) -> Self {
        Self::new("device", instance)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.instance)
    }
}

/// A semantic tag: a name/value label attached to a local object and used
/// as a query predicate. Matching is exact on both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// An object hosted by the local device, with its human-readable name and
/// semantic tags. Created from the device file at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalObject {
    pub id: ObjectId,
    pub name: String,
    /// Tags carried by this object; deduplicated
    pub tags: Vec<Tag>,
}

/// Identity of the local device. A node without one is unconfigured and
/// must not answer discovery traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    /// Device instance number, the subject of identity-discovery range
    /// filters
    pub instance: u32,
    /// Device name
    pub name: String,
    /// Vendor identifier
    pub vendor_id: u16,
}

impl DeviceIdentity {
    /// Identifier of the device object announced in replies.
    pub fn object_id(&self) -> ObjectId {
        ObjectId::device(self.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_serialization() {
        let id = ObjectId::new("analog-input", 12);
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("\"type\":\"analog-input\""));
        assert!(json.contains("\"instance\":12"));

        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId::device(900).to_string(), "device:900");
        assert_eq!(ObjectId::new("analog-input", 3).to_string(), "analog-input:3");
    }

    #[test]
    fn test_tag_display() {
        let tag = Tag::new("a", "temperature_sensor");
        assert_eq!(tag.to_string(), "a=temperature_sensor");
    }

    #[test]
    fn test_device_identity_serialization() {
        let identity = DeviceIdentity {
            instance: 599,
            name: "roof-unit".to_string(),
            vendor_id: 15,
        };

        let json = serde_json::to_string(&identity).unwrap();
        assert!(json.contains("\"vendorId\":15"));

        let back: DeviceIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity);
        assert_eq!(back.object_id(), ObjectId::device(599));
    }
}
