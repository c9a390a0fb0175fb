//! Atomicity group tracking
//!
//! Groups (changesets) must occupy one contiguous run of items. The cache
//! records each group's members in payload order, reports where runs start
//! and end, and expands group ids in `dependsOn` lists into member ids.

use hashbrown::HashMap;

use crate::error::{Error, Kind, Result};

#[derive(Debug, Clone, Default)]
pub struct AtomicGroupCache {
    groups: HashMap<String, Vec<String>>,
    order: Vec<String>,
    preceding_group_id: Option<String>,
    within_atomic_group: bool,
}

impl AtomicGroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message_id` as a member of `group_id`.
    ///
    /// Returns true when the item opens a new group. Must be called after
    /// [`is_changeset_end`](Self::is_changeset_end) for the same item.
    ///
    /// # Errors
    ///
    /// Returns `MessageIdPositionedIncorrectly` if `group_id` was seen before
    /// but is not the group of the preceding item.
    pub fn add_message_id_and_group_id(&mut self, message_id: &str, group_id: &str) -> Result<bool> {
        if self.preceding_group_id.as_deref() == Some(group_id) {
            if let Some(members) = self.groups.get_mut(group_id) {
                members.push(message_id.to_owned());
            }
            return Ok(false);
        }

        if self.groups.contains_key(group_id) {
            return Err(Error::new(Kind::MessageIdPositionedIncorrectly {
                message_id: message_id.to_owned(),
                group_id: group_id.to_owned(),
            }));
        }

        self.groups
            .insert(group_id.to_owned(), vec![message_id.to_owned()]);
        self.order.push(group_id.to_owned());
        self.preceding_group_id = Some(group_id.to_owned());
        self.within_atomic_group = true;
        Ok(true)
    }

    /// Returns true if an item in `group_id` (or in no group) closes the open group.
    ///
    /// Closing clears the open-group state, so a later sighting of the same
    /// group id is a positioning error.
    pub fn is_changeset_end(&mut self, group_id: Option<&str>) -> bool {
        if !self.within_atomic_group
            || (group_id.is_some() && group_id == self.preceding_group_id.as_deref())
        {
            return false;
        }
        self.within_atomic_group = false;
        self.preceding_group_id = None;
        true
    }

    /// The group `message_id` belongs to, if any.
    #[must_use]
    pub fn group_id(&self, message_id: &str) -> Option<&str> {
        self.order.iter().map(String::as_str).find(|group| {
            self.groups
                .get(*group)
                .is_some_and(|members| members.iter().any(|id| id == message_id))
        })
    }

    /// Expands group ids in `ids` into their members, in recorded order.
    ///
    /// Ids that do not name a group pass through unchanged.
    #[must_use]
    pub fn flattened_message_ids(&self, ids: &[String]) -> Vec<String> {
        let mut flattened = Vec::with_capacity(ids.len());
        for id in ids {
            match self.groups.get(id) {
                Some(members) => flattened.extend(members.iter().cloned()),
                None => flattened.push(id.clone()),
            }
        }
        flattened
    }

    #[must_use]
    pub fn is_group_id(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Members of `group_id` in payload order.
    #[must_use]
    pub fn members(&self, group_id: &str) -> Option<&[String]> {
        self.groups.get(group_id).map(Vec::as_slice)
    }

    /// Group ids in the order they first appeared.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_within_atomic_group(&self) -> bool {
        self.within_atomic_group
    }

    #[must_use]
    pub fn preceding_group_id(&self) -> Option<&str> {
        self.preceding_group_id.as_deref()
    }
}
