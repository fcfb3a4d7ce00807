//! The tag index: tag -> set of local object identifiers.
//!
//! Pure data structure with no protocol knowledge. Built while the device
//! file is loaded, then sealed before the node starts serving; lookups
//! after that point run without locking because mutation is refused.

use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, Result};
use crate::types::{ObjectId, Tag};

/// Tag value that would request wildcard matching. Wildcards are not
/// implemented; queries carrying this value are refused outright.
pub const WILDCARD_VALUE: &str = "*";

/// Mapping from semantic tag to the set of objects carrying it.
#[derive(Debug, Default)]
pub struct TagIndex {
    by_tag: HashMap<Tag, HashSet<ObjectId>>,
    sealed: bool,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one (object, tag) pair. Idempotent: registering the same
    /// pair twice leaves membership unchanged.
    pub fn register(&mut self, object: &ObjectId, tag: &Tag) -> Result<()> {
        self.check_mutable()?;
        self.by_tag
            .entry(tag.clone())
            .or_default()
            .insert(object.clone());
        Ok(())
    }

    /// Remove one (object, tag) pair; removing an absent pair is a no-op.
    pub fn unregister(&mut self, object: &ObjectId, tag: &Tag) -> Result<()> {
        self.check_mutable()?;
        if let Some(members) = self.by_tag.get_mut(tag) {
            members.remove(object);
            if members.is_empty() {
                self.by_tag.remove(tag);
            }
        }
        Ok(())
    }

    /// Seal the index. Serving starts after this point; further mutation
    /// is refused so lookups never observe a half-updated index.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn check_mutable(&self) -> Result<()> {
        if self.sealed {
            return Err(CoreError::Unsupported(
                "runtime tag mutation is not supported; the index is sealed".to_string(),
            ));
        }
        Ok(())
    }

    /// The (possibly empty) set of objects carrying `tag`.
    pub fn lookup(&self, tag: &Tag) -> HashSet<ObjectId> {
        self.by_tag.get(tag).cloned().unwrap_or_default()
    }

    /// Objects carrying *every* tag in `tags` (logical AND).
    ///
    /// Short-circuits to the empty set as soon as any single tag resolves
    /// to no objects. An empty tag sequence is invalid input, not a
    /// match-everything query.
    pub fn intersect_all(&self, tags: &[Tag]) -> Result<HashSet<ObjectId>> {
        if tags.is_empty() {
            return Err(CoreError::InconsistentParameters(
                "at least one tag is required".to_string(),
            ));
        }

        for tag in tags {
            if tag.value == WILDCARD_VALUE {
                return Err(CoreError::Unsupported(format!(
                    "tag value wildcards are not supported ('{}')",
                    tag
                )));
            }
        }

        let mut matches: Option<HashSet<ObjectId>> = None;
        for tag in tags {
            let members = match self.by_tag.get(tag) {
                Some(members) => members,
                None => return Ok(HashSet::new()),
            };

            matches = Some(match matches {
                None => members.clone(),
                Some(acc) => acc.intersection(members).cloned().collect(),
            });

            if matches.as_ref().is_some_and(|acc| acc.is_empty()) {
                return Ok(HashSet::new());
            }
        }

        Ok(matches.unwrap_or_default())
    }
}
