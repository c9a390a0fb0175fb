//! `dependsOn` validation
//!
//! Runs as a separate pass over ids already seen, before the list is
//! flattened. Each entry must name an earlier message or a group, must not
//! name the item itself or its own group, and must not reach into the
//! members of another group.

use hashbrown::HashSet;

use crate::atomic_group::AtomicGroupCache;
use crate::error::{Error, Kind, Result};

#[derive(Debug, Clone, Default)]
pub struct DependencyValidator {
    seen: HashSet<String>,
}

impl DependencyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every entry of `depends_on` for the message being emitted.
    ///
    /// # Errors
    ///
    /// `SelfGroupReferenceDependsOn`, `SelfReferenceDependsOn`,
    /// `DependsOnIdNotFound` or `DependsOnCrossesAtomicityGroup`, reported
    /// for the first offending entry.
    pub fn validate(
        &self,
        groups: &AtomicGroupCache,
        message_id: &str,
        group_id: Option<&str>,
        depends_on: &[String],
    ) -> Result<()> {
        for depends_on_id in depends_on {
            let depends_on_id = depends_on_id.as_str();

            if let Some(group_id) = group_id
                && depends_on_id == group_id
            {
                return Err(Error::new(Kind::SelfGroupReferenceDependsOn {
                    message_id: message_id.to_owned(),
                    group_id: group_id.to_owned(),
                }));
            }

            if depends_on_id == message_id {
                return Err(Error::new(Kind::SelfReferenceDependsOn {
                    message_id: message_id.to_owned(),
                }));
            }

            if !self.seen.contains(depends_on_id) && !groups.is_group_id(depends_on_id) {
                return Err(Error::new(Kind::DependsOnIdNotFound {
                    depends_on_id: depends_on_id.to_owned(),
                    message_id: message_id.to_owned(),
                }));
            }

            if let Some(owner) = groups.group_id(depends_on_id)
                && Some(owner) != group_id
            {
                return Err(Error::new(Kind::DependsOnCrossesAtomicityGroup {
                    depends_on_id: depends_on_id.to_owned(),
                    message_id: message_id.to_owned(),
                    group_id: owner.to_owned(),
                }));
            }
        }
        Ok(())
    }

    /// Marks `message_id` as available to later `dependsOn` entries.
    pub fn record(&mut self, message_id: &str) {
        self.seen.insert(message_id.to_owned());
    }

    #[must_use]
    pub fn has_seen(&self, message_id: &str) -> bool {
        self.seen.contains(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn accepts_earlier_messages_and_groups() {
        let mut groups = AtomicGroupCache::new();
        let mut validator = DependencyValidator::new();
        validator.record("0");
        groups.add_message_id_and_group_id("1", "g1").unwrap();
        validator.record("1");
        assert!(groups.is_changeset_end(None));

        validator
            .validate(&groups, "2", None, &ids(&["0", "g1"]))
            .unwrap();
    }

    #[test]
    fn rejects_forward_references() {
        let groups = AtomicGroupCache::new();
        let validator = DependencyValidator::new();
        let err = validator
            .validate(&groups, "1", None, &ids(&["2"]))
            .unwrap_err();
        assert!(matches!(err.kind(), Kind::DependsOnIdNotFound { .. }));
        assert!(err.is_ordering_violation());
    }

    #[test]
    fn own_group_is_checked_before_own_id() {
        let mut groups = AtomicGroupCache::new();
        groups.add_message_id_and_group_id("1", "g1").unwrap();
        let validator = DependencyValidator::new();
        let err = validator
            .validate(&groups, "1", Some("g1"), &ids(&["g1", "1"]))
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            Kind::SelfGroupReferenceDependsOn { .. }
        ));
    }

    #[test]
    fn members_of_the_same_group_may_depend_on_each_other() {
        let mut groups = AtomicGroupCache::new();
        let mut validator = DependencyValidator::new();
        groups.add_message_id_and_group_id("1", "g1").unwrap();
        validator.record("1");
        groups.add_message_id_and_group_id("2", "g1").unwrap();

        validator
            .validate(&groups, "2", Some("g1"), &ids(&["1"]))
            .unwrap();
    }
}
