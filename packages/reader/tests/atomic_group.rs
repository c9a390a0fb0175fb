//! Tests for atomicity group tracking

use odata_batch_reader::{AtomicGroupCache, Kind};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

#[test]
fn test_contiguous_members_extend_the_open_group() {
    let mut groups = AtomicGroupCache::new();
    assert!(!groups.is_changeset_end(Some("g1")));
    assert!(groups.add_message_id_and_group_id("1", "g1").expect("start"));
    assert!(groups.is_within_atomic_group());
    assert_eq!(groups.preceding_group_id(), Some("g1"));

    assert!(!groups.is_changeset_end(Some("g1")));
    assert!(!groups.add_message_id_and_group_id("2", "g1").expect("continue"));
    assert_eq!(groups.members("g1"), Some(&ids(&["1", "2"])[..]));
}

#[test]
fn test_changeset_end_on_new_group_or_ungrouped_item() {
    let mut groups = AtomicGroupCache::new();
    groups.add_message_id_and_group_id("1", "g1").expect("start");
    assert!(groups.is_changeset_end(Some("g2")));
    assert!(!groups.is_within_atomic_group());
    assert_eq!(groups.preceding_group_id(), None);
    // already closed
    assert!(!groups.is_changeset_end(None));

    groups.add_message_id_and_group_id("2", "g2").expect("start");
    assert!(groups.is_changeset_end(None));
}

#[test]
fn test_closed_group_cannot_reopen() {
    let mut groups = AtomicGroupCache::new();
    groups.add_message_id_and_group_id("1", "g1").expect("start");
    groups.is_changeset_end(Some("g2"));
    groups.add_message_id_and_group_id("2", "g2").expect("start");
    groups.is_changeset_end(Some("g1"));

    let err = groups
        .add_message_id_and_group_id("3", "g1")
        .expect_err("reopen");
    assert_eq!(
        err.kind(),
        &Kind::MessageIdPositionedIncorrectly {
            message_id: "3".to_owned(),
            group_id: "g1".to_owned(),
        }
    );
    assert!(err.is_ordering_violation());
}

#[test]
fn test_group_lookup_and_flattening() {
    let mut groups = AtomicGroupCache::new();
    groups.add_message_id_and_group_id("a", "g1").expect("start");
    groups.add_message_id_and_group_id("b", "g1").expect("continue");
    groups.is_changeset_end(Some("g2"));
    groups.add_message_id_and_group_id("c", "g2").expect("start");

    assert_eq!(groups.group_id("b"), Some("g1"));
    assert_eq!(groups.group_id("c"), Some("g2"));
    assert_eq!(groups.group_id("z"), None);
    assert!(groups.is_group_id("g2"));
    assert!(!groups.is_group_id("a"));

    let flattened = groups.flattened_message_ids(&ids(&["x", "g1", "c", "g2"]));
    assert_eq!(flattened, ["x", "a", "b", "c", "c"]);
    assert_eq!(groups.flattened_message_ids(&flattened), flattened);
    assert_eq!(groups.group_ids().collect::<Vec<_>>(), ["g1", "g2"]);
}
