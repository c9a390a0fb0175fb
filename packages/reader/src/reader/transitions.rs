//! State transition implementations
//!
//! Every state change of the reader goes through one of these functions so
//! statistics and logging stay in one place.

use super::engine::BatchReader;
use super::types::ReaderState;

fn transition<S>(reader: &mut BatchReader<S>, state: ReaderState) {
    tracing::debug!(
        target: "odata_batch::reader",
        from = %reader.state,
        to = %state,
        "reader state transition"
    );
    reader.state = state;
    reader.stats.state_transitions += 1;
}

/// Transition to ChangesetStart for a newly opened group
pub(super) fn transition_to_changeset_start<S>(reader: &mut BatchReader<S>, group_id: &str) {
    transition(reader, ReaderState::ChangesetStart);
    reader.current_group = Some(group_id.to_owned());
    reader.changeset_operations = 0;
    reader.stats.changesets_opened += 1;
}

pub(super) fn transition_to_operation<S>(reader: &mut BatchReader<S>) {
    transition(reader, ReaderState::Operation);
}

/// Transition to ChangesetEnd, returning the id of the closed group
pub(super) fn transition_to_changeset_end<S>(reader: &mut BatchReader<S>) -> String {
    transition(reader, ReaderState::ChangesetEnd);
    reader.stats.changesets_closed += 1;
    reader.current_group.take().unwrap_or_default()
}

pub(super) fn transition_to_completed<S>(reader: &mut BatchReader<S>) {
    transition(reader, ReaderState::Completed);
    reader.pending = None;
}

pub(super) fn transition_to_failed<S>(reader: &mut BatchReader<S>) {
    transition(reader, ReaderState::Failed);
    reader.pending = None;
}
