//! The local device: identity, hosted objects, and their tag index.

use std::collections::HashMap;

use crate::error::{ConfigError, Result};
use crate::tags::TagIndex;
use crate::types::{DeviceIdentity, LocalObject, ObjectId};

/// Everything the discovery services need to know about the node they run
/// on. Built once from the device file; the tag index is sealed as part of
/// construction, so the device is immutable while serving.
#[derive(Debug)]
pub struct LocalDevice {
    identity: Option<DeviceIdentity>,
    objects: HashMap<ObjectId, LocalObject>,
    tag_index: TagIndex,
}

impl LocalDevice {
    /// Build a device from its identity and object list.
    ///
    /// `identity` may be `None`: an unconfigured node carries objects but
    /// answers no discovery traffic.
    pub fn build(identity: Option<DeviceIdentity>, objects: Vec<LocalObject>) -> Result<Self> {
        let mut table = HashMap::with_capacity(objects.len());
        let mut tag_index = TagIndex::new();

        for object in objects {
            if table.contains_key(&object.id) {
                return Err(ConfigError::DuplicateObjectId(object.id.to_string()).into());
            }
            for tag in &object.tags {
                tag_index.register(&object.id, tag)?;
            }
            table.insert(object.id.clone(), object);
        }

        tag_index.seal();

        Ok(Self {
            identity,
            objects: table,
            tag_index,
        })
    }

    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    pub fn object(&self, id: &ObjectId) -> Option<&LocalObject> {
        self.objects.get(id)
    }

    /// All hosted objects, no defined order.
    pub fn objects(&self) -> impl Iterator<Item = &LocalObject> {
        self.objects.values()
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tag_index
    }
}
