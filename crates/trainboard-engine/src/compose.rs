//! New-record composer: build flat records from a campaign's shared header
//! plus user-entered development fields.
//!
//! Two creation paths exist. [`compose`] adds one development to an already
//! displayed campaign group; [`compose_batch`] backs the guided form that
//! creates a whole campaign header with several development rows at once.
//! Composed records carry no `row_index`, which routes them through the
//! store's create path rather than update.

use chrono::NaiveDate;
use thiserror::Error;
use trainboard_core::dates;
use trainboard_core::{GroupedEvent, TrainingRecord};

/// Status given to a development when the form leaves it unset.
pub const DEFAULT_ESTADO: &str = "Pendiente";

/// User-entered fields for one development row. Anything left `None`
/// composes as an empty string (estado excepted, see [`DEFAULT_ESTADO`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DevelopmentForm {
    pub desarrollo: Option<String>,
    pub nombre: Option<String>,
    pub cantidad: Option<String>,
    pub fecha_material: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub estado: Option<String>,
    pub observaciones: Option<String>,
}

/// Shared header block for the guided multi-row creation form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderForm {
    pub coordinador: String,
    pub cliente: String,
    pub segmento: String,
    pub desarrollador: String,
    pub segmento_menu: String,
    pub observaciones: String,
    pub campana: String,
    pub formador: String,
    /// Request date as the form supplies it (ISO); today when blank.
    pub fecha_solicitud: String,
}

/// Why a submission was refused before reaching the store. The form state is
/// untouched so the user can correct and resubmit.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("client and campaign are required header fields")]
    MissingRequiredHeader,
}

/// Merge a group's header with one development form into a new record.
///
/// Header fields are copied verbatim; `fecha_solicitud` falls back to
/// `today` when the group carries none. Form dates are canonicalized to
/// storage form; omitted text fields become empty strings.
pub fn compose(group: &GroupedEvent, form: &DevelopmentForm, today: NaiveDate) -> TrainingRecord {
    TrainingRecord {
        coordinador: group.coordinador.clone(),
        cliente: group.cliente.clone(),
        segmento: group.segmento.clone(),
        desarrollador: group.desarrollador.clone(),
        segmento_menu: group.segmento_menu.clone(),
        formador: group.formador.clone(),
        campana: Some(group.campana.clone()),
        fecha_solicitud: group
            .fecha_solicitud
            .clone()
            .or_else(|| Some(dates::format_dmy(today))),

        desarrollo: Some(form.desarrollo.clone().unwrap_or_default()),
        nombre: Some(form.nombre.clone().unwrap_or_default()),
        cantidad: Some(form.cantidad.clone().unwrap_or_default()),
        fecha_material: Some(canonical_or_empty(form.fecha_material.as_deref())),
        fecha_inicio: Some(canonical_or_empty(form.fecha_inicio.as_deref())),
        fecha_fin: Some(canonical_or_empty(form.fecha_fin.as_deref())),
        estado: Some(
            form.estado
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_ESTADO.to_string()),
        ),
        observaciones: Some(form.observaciones.clone().unwrap_or_default()),

        row_index: None,
    }
}

/// Build the bulk-create payload records for the guided form: the shared
/// header merged with each development row.
///
/// Validation gate: `cliente` and `campana` must be present before anything
/// is composed (submission aborts, nothing partial is produced).
pub fn compose_batch(
    header: &HeaderForm,
    rows: &[DevelopmentForm],
    today: NaiveDate,
) -> Result<Vec<TrainingRecord>, ValidationError> {
    if header.cliente.trim().is_empty() || header.campana.trim().is_empty() {
        return Err(ValidationError::MissingRequiredHeader);
    }

    let fecha_solicitud = if header.fecha_solicitud.trim().is_empty() {
        dates::format_dmy(today)
    } else {
        canonical_or_empty(Some(&header.fecha_solicitud))
    };

    Ok(rows
        .iter()
        .map(|row| TrainingRecord {
            coordinador: Some(header.coordinador.clone()),
            cliente: Some(header.cliente.clone()),
            segmento: Some(header.segmento.clone()),
            desarrollador: Some(header.desarrollador.clone()),
            segmento_menu: Some(header.segmento_menu.clone()),
            formador: Some(header.formador.clone()),
            campana: Some(header.campana.clone()),
            fecha_solicitud: Some(fecha_solicitud.clone()),
            // Observations are captured once, on the header.
            observaciones: Some(header.observaciones.clone()),

            desarrollo: Some(row.desarrollo.clone().unwrap_or_default()),
            nombre: Some(row.nombre.clone().unwrap_or_default()),
            cantidad: Some(row.cantidad.clone().unwrap_or_default()),
            fecha_material: Some(canonical_or_empty(row.fecha_material.as_deref())),
            fecha_inicio: Some(canonical_or_empty(row.fecha_inicio.as_deref())),
            fecha_fin: Some(canonical_or_empty(row.fecha_fin.as_deref())),
            estado: Some(
                row.estado
                    .clone()
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DEFAULT_ESTADO.to_string()),
            ),

            row_index: None,
        })
        .collect())
}

fn canonical_or_empty(raw: Option<&str>) -> String {
    dates::normalize(raw).unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
