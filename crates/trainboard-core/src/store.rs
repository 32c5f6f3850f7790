//! External store contract.
//!
//! The spreadsheet transport is an external collaborator; this module owns
//! only the seam: the [`RecordStore`] trait the engine calls, the
//! [`SubmitPayload`] wire shapes, and the [`StoreError`] taxonomy. The
//! transport is fire-and-forget — callers observe overall success or a
//! network error, never row-level outcomes.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::{MasterData, NovedadesRecord, RowIndex, TrainingRecord};

/// Data source and sink for the board.
///
/// `fetch_*` load the flat record list, the master/option lists (including
/// holidays) and the anomaly windows; each is loaded once per session.
/// `submit` pushes one payload and reports only overall completion.
pub trait RecordStore {
    fn fetch_training_records(&self) -> Result<Vec<TrainingRecord>, StoreError>;

    fn fetch_master_data(&self) -> Result<MasterData, StoreError>;

    fn fetch_novedades(&self) -> Result<Vec<NovedadesRecord>, StoreError>;

    /// Apply one create/update/delete payload.
    ///
    /// Contract for [`SubmitPayload::Batch`]: a row present both in `data`
    /// and in `deleted_row_indices` is deleted — delete wins over the
    /// modification. The store is the final arbiter of that precedence.
    fn submit(&mut self, payload: SubmitPayload) -> Result<(), StoreError>;
}

/// One outgoing write, in the transport's three accepted shapes.
///
/// Every contained record carries `campana` derived from its live
/// `cliente`/`segmento` fields; the constructors stamp it so callers cannot
/// submit a stale grouping key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitPayload {
    /// Bulk create of not-yet-persisted records.
    Create { data: Vec<TrainingRecord> },
    /// Single-row update addressed by sheet row.
    Update {
        data: Box<TrainingRecord>,
        row_index: RowIndex,
    },
    /// Batch update plus deletions, flushed from the edit buffer in one
    /// request. Delete wins for a row present in both lists.
    Batch {
        data: Vec<TrainingRecord>,
        deleted_row_indices: Vec<RowIndex>,
    },
}

impl SubmitPayload {
    pub fn create(records: Vec<TrainingRecord>) -> Self {
        Self::Create {
            data: records.into_iter().map(stamp_campana).collect(),
        }
    }

    pub fn update(record: TrainingRecord, row_index: RowIndex) -> Self {
        Self::Update {
            data: Box::new(stamp_campana(record)),
            row_index,
        }
    }

    pub fn batch(modified: Vec<TrainingRecord>, deleted: Vec<RowIndex>) -> Self {
        Self::Batch {
            data: modified.into_iter().map(stamp_campana).collect(),
            deleted_row_indices: deleted,
        }
    }

    /// Whether the payload would change anything on the remote side.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Create { data } => data.is_empty(),
            Self::Update { .. } => false,
            Self::Batch {
                data,
                deleted_row_indices,
            } => data.is_empty() && deleted_row_indices.is_empty(),
        }
    }
}

/// `campana` is derived at submission time, not user-edited.
fn stamp_campana(mut record: TrainingRecord) -> TrainingRecord {
    record.campana = Some(record.campaign_key());
    record
}

// The wire envelope tags every shape with an `action` string; `Batch` shares
// the "update" action with single-row updates and is distinguished by its
// list-valued `data`, so this cannot be a derived tagged enum.
impl Serialize for SubmitPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Create { data } => {
                let mut st = serializer.serialize_struct("SubmitPayload", 2)?;
                st.serialize_field("action", "create")?;
                st.serialize_field("data", data)?;
                st.end()
            }
            Self::Update { data, row_index } => {
                let mut st = serializer.serialize_struct("SubmitPayload", 3)?;
                st.serialize_field("action", "update")?;
                st.serialize_field("data", data)?;
                st.serialize_field("rowIndex", row_index)?;
                st.end()
            }
            Self::Batch {
                data,
                deleted_row_indices,
            } => {
                let mut st = serializer.serialize_struct("SubmitPayload", 3)?;
                st.serialize_field("action", "update")?;
                st.serialize_field("data", data)?;
                st.serialize_field("deletedRowIndices", deleted_row_indices)?;
                st.end()
            }
        }
    }
}

/// Store failure taxonomy. Nothing here is fatal to the caller; the engine
/// keeps its local state intact so the operation can be retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store data: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ============================================================================
// Tests
// ============================================================================
