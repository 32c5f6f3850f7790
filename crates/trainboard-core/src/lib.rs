//! # trainboard-core
//!
//! Core domain model for the trainboard scheduling board engine.
//!
//! This crate provides:
//! - Domain types: `TrainingRecord`, `GroupedEvent`, `FestivoRecord`,
//!   `NovedadesRecord`, `MasterData`
//! - The date normalizer ([`dates`]) bridging the spreadsheet's mixed date
//!   encodings and calendar math
//! - The external store contract ([`store`]) consumed by the engine
//!
//! ## Example
//!
//! ```rust
//! use trainboard_core::{Field, TrainingRecord};
//!
//! let record = TrainingRecord::new()
//!     .cliente("Acme")
//!     .segmento("Retail")
//!     .estado("Pendiente");
//!
//! assert_eq!(record.campaign_key(), "Acme Retail");
//!
//! // Patch, never mutate: the base record is untouched.
//! let patched = record.with_field(Field::Estado, Some("En Proceso".into()));
//! assert_eq!(record.estado.as_deref(), Some("Pendiente"));
//! assert_eq!(patched.estado.as_deref(), Some("En Proceso"));
//! ```

use serde::{Deserialize, Serialize};

pub mod dates;
pub mod store;

pub use store::{RecordStore, StoreError, SubmitPayload};

// ============================================================================
// Type Aliases
// ============================================================================

/// Spreadsheet row backing a record. 1-based and offset past the header row:
/// data row 0 lives in sheet row 2. Absent for not-yet-persisted records.
pub type RowIndex = u32;

/// Group key for records whose `campana` is missing or empty.
pub const UNASSIGNED_CAMPAIGN: &str = "Sin campaña";

// ============================================================================
// TrainingRecord
// ============================================================================

/// One development item: a flat spreadsheet row.
///
/// Header fields (coordinator through request date) are shared by every
/// development under the same campaign; development fields describe the one
/// work item this row tracks. All values are kept as the raw strings the
/// transport delivers; dates stay in storage form (`DD/MM/YYYY`) and are
/// interpreted on demand via [`dates::parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingRecord {
    /// Request date (header field)
    pub fecha_solicitud: Option<String>,
    pub coordinador: Option<String>,
    pub cliente: Option<String>,
    pub segmento: Option<String>,
    pub desarrollador: Option<String>,
    pub segmento_menu: Option<String>,
    /// Development type, e.g. "Evolutivo" or "Actualizacion"
    pub desarrollo: Option<String>,
    /// Topic name of the development
    pub nombre: Option<String>,
    pub cantidad: Option<String>,
    pub fecha_material: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub estado: Option<String>,
    pub formador: Option<String>,
    pub observaciones: Option<String>,
    /// Derived as `"{cliente} {segmento}"` by the transport at submission
    /// time; never edited directly.
    pub campana: Option<String>,
    /// Identity of the backing sheet row; `None` until first persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<RowIndex>,
}

impl TrainingRecord {
    /// Create an empty record (all fields unset).
    pub fn new() -> Self {
        Self::default()
    }

    /// The campaign grouping key: `"{cliente} {segmento}"` trimmed.
    ///
    /// This is the value the submit path derives into `campana`; reading it
    /// from the live fields keeps the two consistent even mid-edit.
    pub fn campaign_key(&self) -> String {
        format!(
            "{} {}",
            self.cliente.as_deref().unwrap_or(""),
            self.segmento.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    /// Whether this record is backed by a sheet row yet.
    pub fn is_persisted(&self) -> bool {
        self.row_index.is_some()
    }

    /// Produce a new record differing from `self` in exactly one field.
    ///
    /// The base record is never mutated; multi-field edits are expressed by
    /// chaining patches, which is what the edit buffer does when it merges
    /// successive edits onto the pending snapshot.
    pub fn with_field(&self, field: Field, value: Option<String>) -> Self {
        let mut patched = self.clone();
        *patched.field_mut(field) = value;
        patched
    }

    /// Read one field by name.
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::FechaSolicitud => self.fecha_solicitud.as_deref(),
            Field::Coordinador => self.coordinador.as_deref(),
            Field::Cliente => self.cliente.as_deref(),
            Field::Segmento => self.segmento.as_deref(),
            Field::Desarrollador => self.desarrollador.as_deref(),
            Field::SegmentoMenu => self.segmento_menu.as_deref(),
            Field::Desarrollo => self.desarrollo.as_deref(),
            Field::Nombre => self.nombre.as_deref(),
            Field::Cantidad => self.cantidad.as_deref(),
            Field::FechaMaterial => self.fecha_material.as_deref(),
            Field::FechaInicio => self.fecha_inicio.as_deref(),
            Field::FechaFin => self.fecha_fin.as_deref(),
            Field::Estado => self.estado.as_deref(),
            Field::Formador => self.formador.as_deref(),
            Field::Observaciones => self.observaciones.as_deref(),
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::FechaSolicitud => &mut self.fecha_solicitud,
            Field::Coordinador => &mut self.coordinador,
            Field::Cliente => &mut self.cliente,
            Field::Segmento => &mut self.segmento,
            Field::Desarrollador => &mut self.desarrollador,
            Field::SegmentoMenu => &mut self.segmento_menu,
            Field::Desarrollo => &mut self.desarrollo,
            Field::Nombre => &mut self.nombre,
            Field::Cantidad => &mut self.cantidad,
            Field::FechaMaterial => &mut self.fecha_material,
            Field::FechaInicio => &mut self.fecha_inicio,
            Field::FechaFin => &mut self.fecha_fin,
            Field::Estado => &mut self.estado,
            Field::Formador => &mut self.formador,
            Field::Observaciones => &mut self.observaciones,
        }
    }

    // Builder-style setters, mainly for tests and the composer.

    pub fn row_index(mut self, row_index: RowIndex) -> Self {
        self.row_index = Some(row_index);
        self
    }

    pub fn cliente(mut self, cliente: impl Into<String>) -> Self {
        self.cliente = Some(cliente.into());
        self
    }

    pub fn segmento(mut self, segmento: impl Into<String>) -> Self {
        self.segmento = Some(segmento.into());
        self
    }

    pub fn desarrollador(mut self, desarrollador: impl Into<String>) -> Self {
        self.desarrollador = Some(desarrollador.into());
        self
    }

    pub fn desarrollo(mut self, desarrollo: impl Into<String>) -> Self {
        self.desarrollo = Some(desarrollo.into());
        self
    }

    pub fn nombre(mut self, nombre: impl Into<String>) -> Self {
        self.nombre = Some(nombre.into());
        self
    }

    pub fn estado(mut self, estado: impl Into<String>) -> Self {
        self.estado = Some(estado.into());
        self
    }

    pub fn campana(mut self, campana: impl Into<String>) -> Self {
        self.campana = Some(campana.into());
        self
    }

    pub fn coordinador(mut self, coordinador: impl Into<String>) -> Self {
        self.coordinador = Some(coordinador.into());
        self
    }

    pub fn fechas(mut self, inicio: impl Into<String>, fin: impl Into<String>) -> Self {
        self.fecha_inicio = Some(inicio.into());
        self.fecha_fin = Some(fin.into());
        self
    }
}

/// Editable fields of a [`TrainingRecord`], named after their wire keys.
///
/// `campana` is deliberately absent: it is derived from `cliente`/`segmento`
/// at submission time and never edited directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FechaSolicitud,
    Coordinador,
    Cliente,
    Segmento,
    Desarrollador,
    SegmentoMenu,
    Desarrollo,
    Nombre,
    Cantidad,
    FechaMaterial,
    FechaInicio,
    FechaFin,
    Estado,
    Formador,
    Observaciones,
}

impl Field {
    /// Wire name of the field, as the transport spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FechaSolicitud => "fechaSolicitud",
            Field::Coordinador => "coordinador",
            Field::Cliente => "cliente",
            Field::Segmento => "segmento",
            Field::Desarrollador => "desarrollador",
            Field::SegmentoMenu => "segmentoMenu",
            Field::Desarrollo => "desarrollo",
            Field::Nombre => "nombre",
            Field::Cantidad => "cantidad",
            Field::FechaMaterial => "fechaMaterial",
            Field::FechaInicio => "fechaInicio",
            Field::FechaFin => "fechaFin",
            Field::Estado => "estado",
            Field::Formador => "formador",
            Field::Observaciones => "observaciones",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GroupedEvent
// ============================================================================

/// Day-scoped aggregate of the records sharing one `campana` value.
///
/// Header fields are hoisted from the first contributing record; headers are
/// assumed consistent across a campaign's rows, so later records only add
/// detail entries and their differing header values are silently ignored.
/// Grouped views are rebuilt from fresh data on every render, so details
/// reference their source record by `row_index` rather than holding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupedEvent {
    pub campana: String,
    pub coordinador: Option<String>,
    pub desarrollador: Option<String>,
    pub cliente: Option<String>,
    pub segmento: Option<String>,
    pub segmento_menu: Option<String>,
    pub formador: Option<String>,
    pub fecha_solicitud: Option<String>,
    pub fecha_material: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub desarrollos: Vec<DevelopmentEntry>,
}

impl GroupedEvent {
    /// Seed a group from its first contributing record. The record's own
    /// detail entry is appended separately by the grouping engine.
    pub fn seeded_from(campana: impl Into<String>, record: &TrainingRecord) -> Self {
        Self {
            campana: campana.into(),
            coordinador: record.coordinador.clone(),
            desarrollador: record.desarrollador.clone(),
            cliente: record.cliente.clone(),
            segmento: record.segmento.clone(),
            segmento_menu: record.segmento_menu.clone(),
            formador: record.formador.clone(),
            fecha_solicitud: record.fecha_solicitud.clone(),
            fecha_material: record.fecha_material.clone(),
            fecha_inicio: record.fecha_inicio.clone(),
            fecha_fin: record.fecha_fin.clone(),
            desarrollos: Vec::new(),
        }
    }

    /// Find the detail entry backed by `row_index`, if the group holds one.
    pub fn detail_mut(&mut self, row_index: RowIndex) -> Option<&mut DevelopmentEntry> {
        self.desarrollos
            .iter_mut()
            .find(|d| d.row_index == Some(row_index))
    }
}

/// One development line inside a [`GroupedEvent`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DevelopmentEntry {
    pub desarrollo: Option<String>,
    pub nombre: Option<String>,
    pub segmento: Option<String>,
    pub cantidad: Option<String>,
    pub estado: Option<String>,
    pub observaciones: Option<String>,
    /// Weak back-reference to the originating record. Mutating this entry
    /// does not by itself persist anything.
    pub row_index: Option<RowIndex>,
}

impl DevelopmentEntry {
    pub fn from_record(record: &TrainingRecord) -> Self {
        Self {
            desarrollo: record.desarrollo.clone(),
            nombre: record.nombre.clone(),
            segmento: record.segmento.clone(),
            cantidad: record.cantidad.clone(),
            estado: record.estado.clone(),
            observaciones: record.observaciones.clone(),
            row_index: record.row_index,
        }
    }

    /// Mirror a field edit into the displayed entry. Header fields are not
    /// part of the detail view and fall through untouched.
    pub fn apply_field(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Desarrollo => self.desarrollo = value,
            Field::Nombre => self.nombre = value,
            Field::Segmento => self.segmento = value,
            Field::Cantidad => self.cantidad = value,
            Field::Estado => self.estado = value,
            Field::Observaciones => self.observaciones = value,
            _ => {}
        }
    }
}

// ============================================================================
// Master data
// ============================================================================

/// A holiday: calendar date plus label. Loaded once per session; read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FestivoRecord {
    /// Holiday date in storage form (`DD/MM/YYYY`)
    pub festivo: Option<String>,
    /// Holiday label, e.g. "Año Nuevo"
    pub festividad: Option<String>,
}

/// A developer-scoped absence or note window. Read-only, loaded once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NovedadesRecord {
    pub desarrollador: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    /// Free-text reason
    pub novedad: Option<String>,
}

/// Option lists for form dropdowns plus the holiday list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterData {
    pub festivos: Vec<FestivoRecord>,
    pub desarrolladores: Vec<String>,
    pub coordinadores: Vec<String>,
    pub clientes: Vec<String>,
    pub tipos_desarrollo: Vec<String>,
    pub estados: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
