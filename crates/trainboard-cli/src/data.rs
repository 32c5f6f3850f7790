//! JSON-file data source for the CLI.
//!
//! A board file is one JSON document with the three collections the remote
//! spreadsheet transport would serve:
//!
//! ```json
//! {
//!   "records":   [ { "cliente": "Acme", "fechaInicio": "01/03/2024", ... } ],
//!   "festivos":  [ { "festivo": "19/03/2024", "festividad": "San José" } ],
//!   "novedades": [ { "desarrollador": "Ana", ... } ]
//! }
//! ```
//!
//! Date values are run through the normalizer on load, so a file may mix
//! the serialized `Date(y,m,d)` form, ISO and canonical dates just like the
//! real feed does.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use trainboard_core::dates;
use trainboard_core::{
    FestivoRecord, MasterData, NovedadesRecord, RecordStore, StoreError, SubmitPayload,
    TrainingRecord,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BoardFile {
    records: Vec<TrainingRecord>,
    festivos: Vec<FestivoRecord>,
    novedades: Vec<NovedadesRecord>,
}

/// Read-only [`RecordStore`] backed by a board file.
///
/// `submit` mirrors the real transport's fire-and-forget contract: the
/// payload is logged and accepted, row-level outcomes are not observable.
/// Nothing is written back to the file.
pub struct JsonFileStore {
    path: PathBuf,
    data: BoardFile,
}

impl JsonFileStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let mut data: BoardFile = serde_json::from_str(&raw)?;

        for record in &mut data.records {
            record.fecha_solicitud = dates::normalize(record.fecha_solicitud.as_deref());
            record.fecha_material = dates::normalize(record.fecha_material.as_deref());
            record.fecha_inicio = dates::normalize(record.fecha_inicio.as_deref());
            record.fecha_fin = dates::normalize(record.fecha_fin.as_deref());
        }
        for festivo in &mut data.festivos {
            festivo.festivo = dates::normalize(festivo.festivo.as_deref());
        }
        for novedad in &mut data.novedades {
            novedad.fecha_inicio = dates::normalize(novedad.fecha_inicio.as_deref());
            novedad.fecha_fin = dates::normalize(novedad.fecha_fin.as_deref());
        }

        tracing::debug!(
            path = %path.display(),
            records = data.records.len(),
            festivos = data.festivos.len(),
            novedades = data.novedades.len(),
            "loaded board file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }
}

impl RecordStore for JsonFileStore {
    fn fetch_training_records(&self) -> Result<Vec<TrainingRecord>, StoreError> {
        Ok(self.data.records.clone())
    }

    fn fetch_master_data(&self) -> Result<MasterData, StoreError> {
        // Option lists are distilled from the loaded records, sorted and
        // deduplicated the way the master sheet serves them.
        let mut master = MasterData {
            festivos: self.data.festivos.clone(),
            desarrolladores: collect_unique(&self.data.records, |r| r.desarrollador.as_deref()),
            coordinadores: collect_unique(&self.data.records, |r| r.coordinador.as_deref()),
            clientes: collect_unique(&self.data.records, |r| r.cliente.as_deref()),
            tipos_desarrollo: collect_unique(&self.data.records, |r| r.desarrollo.as_deref()),
            estados: collect_unique(&self.data.records, |r| r.estado.as_deref()),
        };
        master.festivos.retain(|f| f.festivo.is_some());
        Ok(master)
    }

    fn fetch_novedades(&self) -> Result<Vec<NovedadesRecord>, StoreError> {
        Ok(self.data.novedades.clone())
    }

    fn submit(&mut self, payload: SubmitPayload) -> Result<(), StoreError> {
        let body = serde_json::to_string(&payload)?;
        tracing::info!(path = %self.path.display(), %body, "submit accepted (not persisted)");
        Ok(())
    }
}

fn collect_unique<F>(records: &[TrainingRecord], get: F) -> Vec<String>
where
    F: Fn(&TrainingRecord) -> Option<&str>,
{
    let mut values: Vec<String> = records
        .iter()
        .filter_map(&get)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}
