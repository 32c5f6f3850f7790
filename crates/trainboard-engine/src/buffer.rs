//! Inline edit buffer: the per-field optimistic edit ledger and the detail
//! session that owns it for one modal lifecycle.
//!
//! The buffer reconciles optimistic UI state against the batch commit
//! protocol: field edits accumulate per row onto the pending snapshot,
//! deletions are a toggle-set, and one commit flushes both as a single
//! batch payload. A failed commit leaves the buffer intact for retry.
//! Because commit takes `&mut self`, no other buffer mutation can race the
//! in-flight request.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use trainboard_core::{
    Field, GroupedEvent, RecordStore, RowIndex, StoreError, SubmitPayload, TrainingRecord,
};

/// Why an edit could not be buffered.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// The record has no row identity yet. Unsaved rows live in component
    /// state and go through the create path, never through this buffer.
    #[error("record is not persisted yet; unsaved rows are not bufferable")]
    NotPersisted,
}

/// Pending edits and deletions, keyed by row identity.
///
/// A row marked deleted keeps any pending modification; both are sent on
/// commit and the store resolves the conflict (delete wins, see
/// [`SubmitPayload::Batch`]).
#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    modified: BTreeMap<RowIndex, TrainingRecord>,
    deleted: BTreeSet<RowIndex>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Pending operations, as surfaced on the save button.
    pub fn pending_count(&self) -> usize {
        self.modified.len() + self.deleted.len()
    }

    /// The pending snapshot for a row, if any.
    pub fn modified(&self, row_index: RowIndex) -> Option<&TrainingRecord> {
        self.modified.get(&row_index)
    }

    pub fn is_deleted(&self, row_index: RowIndex) -> bool {
        self.deleted.contains(&row_index)
    }

    /// Record a single-field edit and return the updated full snapshot.
    ///
    /// When the row already has a pending snapshot the new field merges onto
    /// it, not onto the stale original, so successive edits to the same row
    /// accumulate.
    pub fn record_edit(
        &mut self,
        record: &TrainingRecord,
        field: Field,
        value: Option<String>,
    ) -> Result<TrainingRecord, EditError> {
        let row_index = record.row_index.ok_or(EditError::NotPersisted)?;

        let base = self.modified.get(&row_index).unwrap_or(record);
        let snapshot = base.with_field(field, value);
        self.modified.insert(row_index, snapshot.clone());
        Ok(snapshot)
    }

    /// Flip a row's membership in the deleted set. Returns whether the row
    /// is marked after the call; rows without an identity are ignored.
    /// Pending modifications are unaffected either way.
    pub fn toggle_delete(&mut self, record: &TrainingRecord) -> bool {
        let Some(row_index) = record.row_index else {
            return false;
        };
        if self.deleted.remove(&row_index) {
            false
        } else {
            self.deleted.insert(row_index);
            true
        }
    }

    /// Flush everything as one batch submit, then clear.
    ///
    /// No-op when nothing is pending. Both collections clear together and
    /// only after the store accepts the payload; on error the buffer is
    /// left exactly as it was so the user can retry.
    pub fn flush(&mut self, store: &mut dyn RecordStore) -> Result<(), StoreError> {
        if self.is_empty() {
            return Ok(());
        }

        let payload = SubmitPayload::batch(
            self.modified.values().cloned().collect(),
            self.deleted.iter().copied().collect(),
        );
        store.submit(payload)?;

        self.modified.clear();
        self.deleted.clear();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.modified.clear();
        self.deleted.clear();
    }
}

/// One campaign detail view and its edit buffer.
///
/// Owns the buffer for exactly one modal lifecycle: created when the detail
/// view opens, cleared by a successful commit, dropped on close. The held
/// [`GroupedEvent`] is the displayed copy; edits are mirrored into it
/// immediately (optimistic, pre-commit) while the buffer accumulates what
/// will actually be sent.
#[derive(Clone, Debug)]
pub struct DetailSession {
    group: GroupedEvent,
    buffer: EditBuffer,
}

impl DetailSession {
    pub fn open(group: GroupedEvent) -> Self {
        Self {
            group,
            buffer: EditBuffer::new(),
        }
    }

    /// The displayed group, including uncommitted edits.
    pub fn group(&self) -> &GroupedEvent {
        &self.group
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Apply a field edit: buffer it and mirror it into the displayed group.
    pub fn set_field(
        &mut self,
        record: &TrainingRecord,
        field: Field,
        value: Option<String>,
    ) -> Result<TrainingRecord, EditError> {
        let snapshot = self.buffer.record_edit(record, field, value.clone())?;

        // row_index is present, record_edit would have failed otherwise
        if let Some(entry) = record.row_index.and_then(|row| self.group.detail_mut(row)) {
            entry.apply_field(field, value);
        }

        Ok(snapshot)
    }

    pub fn toggle_delete(&mut self, record: &TrainingRecord) -> bool {
        self.buffer.toggle_delete(record)
    }

    pub fn is_deleted(&self, record: &TrainingRecord) -> bool {
        record
            .row_index
            .is_some_and(|row| self.buffer.is_deleted(row))
    }

    pub fn pending_count(&self) -> usize {
        self.buffer.pending_count()
    }

    /// Commit all pending operations as one batch.
    pub fn commit(&mut self, store: &mut dyn RecordStore) -> Result<(), StoreError> {
        let pending = self.buffer.pending_count();
        match self.buffer.flush(store) {
            Ok(()) => {
                if pending > 0 {
                    tracing::info!(campana = %self.group.campana, pending, "committed batch");
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(campana = %self.group.campana, %err, "commit failed, buffer kept");
                Err(err)
            }
        }
    }

    /// Abandon pending edits, per the modal-close lifecycle.
    pub fn discard(&mut self) {
        self.buffer.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trainboard_core::MasterData;
    use trainboard_core::NovedadesRecord;

    /// Store fake: records submissions, optionally refuses them.
    #[derive(Default)]
    struct FakeStore {
        submitted: Vec<SubmitPayload>,
        fail_next: bool,
    }

    impl RecordStore for FakeStore {
        fn fetch_training_records(&self) -> Result<Vec<TrainingRecord>, StoreError> {
            Ok(Vec::new())
        }
        fn fetch_master_data(&self) -> Result<MasterData, StoreError> {
            Ok(MasterData::default())
        }
        fn fetch_novedades(&self) -> Result<Vec<NovedadesRecord>, StoreError> {
            Ok(Vec::new())
        }
        fn submit(&mut self, payload: SubmitPayload) -> Result<(), StoreError> {
            if self.fail_next {
                return Err(StoreError::Network("connection reset".into()));
            }
            self.submitted.push(payload);
            Ok(())
        }
    }

    fn persisted(row: RowIndex) -> TrainingRecord {
        TrainingRecord::new()
            .cliente("Acme")
            .segmento("Retail")
            .estado("Pendiente")
            .row_index(row)
    }

    #[test]
    fn successive_edits_accumulate_on_pending_snapshot() {
        let mut buffer = EditBuffer::new();
        let record = persisted(7);

        buffer
            .record_edit(&record, Field::Estado, Some("X".into()))
            .unwrap();
        buffer
            .record_edit(&record, Field::Observaciones, Some("Y".into()))
            .unwrap();

        let pending = buffer.modified(7).unwrap();
        assert_eq!(pending.estado.as_deref(), Some("X"));
        assert_eq!(pending.observaciones.as_deref(), Some("Y"));
    }

    #[test]
    fn stale_caller_record_does_not_clobber_pending_edits() {
        let mut buffer = EditBuffer::new();
        let record = persisted(7);

        buffer
            .record_edit(&record, Field::Estado, Some("X".into()))
            .unwrap();
        // The caller re-sends the unedited record; the merge base must be
        // the pending snapshot, not this stale original.
        buffer
            .record_edit(&record, Field::Nombre, Some("Curso".into()))
            .unwrap();

        let pending = buffer.modified(7).unwrap();
        assert_eq!(pending.estado.as_deref(), Some("X"));
        assert_eq!(pending.nombre.as_deref(), Some("Curso"));
    }

    #[test]
    fn unsaved_rows_are_rejected() {
        let mut buffer = EditBuffer::new();
        let unsaved = TrainingRecord::new().cliente("Acme");

        let result = buffer.record_edit(&unsaved, Field::Estado, Some("X".into()));
        assert_eq!(result, Err(EditError::NotPersisted));
        assert!(buffer.is_empty());
    }

    #[test]
    fn toggle_delete_is_pairwise_idempotent() {
        let mut buffer = EditBuffer::new();
        let record = persisted(7);

        assert!(buffer.toggle_delete(&record));
        assert!(buffer.is_deleted(7));
        assert!(!buffer.toggle_delete(&record));
        assert!(!buffer.is_deleted(7));
        assert!(buffer.is_empty());
    }

    #[test]
    fn delete_mark_keeps_pending_modification() {
        let mut buffer = EditBuffer::new();
        let record = persisted(7);

        buffer
            .record_edit(&record, Field::Estado, Some("X".into()))
            .unwrap();
        buffer.toggle_delete(&record);

        assert!(buffer.modified(7).is_some());
        assert!(buffer.is_deleted(7));
        assert_eq!(buffer.pending_count(), 2);
    }

    #[test]
    fn empty_commit_is_a_no_op() {
        let mut store = FakeStore::default();
        let mut buffer = EditBuffer::new();

        buffer.flush(&mut store).unwrap();
        assert!(store.submitted.is_empty());
    }

    #[test]
    fn successful_commit_clears_both_collections() {
        let mut store = FakeStore::default();
        let mut buffer = EditBuffer::new();
        let record = persisted(7);

        buffer
            .record_edit(&record, Field::Estado, Some("X".into()))
            .unwrap();
        buffer.toggle_delete(&record);
        buffer.flush(&mut store).unwrap();

        assert!(buffer.is_empty());
        assert_eq!(store.submitted.len(), 1);
        // Rows present in both sets go out in both lists.
        let SubmitPayload::Batch {
            data,
            deleted_row_indices,
        } = &store.submitted[0]
        else {
            panic!("expected batch payload");
        };
        assert_eq!(data.len(), 1);
        assert_eq!(deleted_row_indices, &vec![7]);
    }

    #[test]
    fn failed_commit_leaves_buffer_intact() {
        let mut store = FakeStore {
            fail_next: true,
            ..FakeStore::default()
        };
        let mut buffer = EditBuffer::new();
        let record = persisted(7);

        buffer
            .record_edit(&record, Field::Estado, Some("X".into()))
            .unwrap();
        buffer.toggle_delete(&record);

        assert!(buffer.flush(&mut store).is_err());
        assert_eq!(buffer.pending_count(), 2);
        assert!(buffer.modified(7).is_some());
        assert!(buffer.is_deleted(7));
    }

    #[test]
    fn session_mirrors_edit_into_displayed_group() {
        let record = persisted(7);
        let mut group = GroupedEvent::seeded_from("Acme Retail", &record);
        group
            .desarrollos
            .push(trainboard_core::DevelopmentEntry::from_record(&record));

        let mut session = DetailSession::open(group);
        session
            .set_field(&record, Field::Estado, Some("En Proceso".into()))
            .unwrap();

        // Visible immediately, before any commit.
        assert_eq!(
            session.group().desarrollos[0].estado.as_deref(),
            Some("En Proceso")
        );
        assert_eq!(session.pending_count(), 1);
    }

    #[test]
    fn discard_drops_pending_state() {
        let record = persisted(7);
        let mut session = DetailSession::open(GroupedEvent::seeded_from("Acme Retail", &record));

        session
            .set_field(&record, Field::Estado, Some("X".into()))
            .unwrap();
        session.discard();

        assert_eq!(session.pending_count(), 0);
    }
}
