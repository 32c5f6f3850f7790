//! # trainboard-engine
//!
//! Calendar aggregation and inline-edit reconciliation for the trainboard
//! scheduling board.
//!
//! This crate provides:
//! - Record grouping: per-day active records, campaign aggregates,
//!   month-wide campaign sets ([`grouping`])
//! - Deterministic color/identity assignment ([`color`])
//! - The calendar grid: visible day range and per-day overlays ([`grid`])
//! - The inline edit buffer and its detail session ([`buffer`])
//! - The new-record composer ([`compose`])
//!
//! Everything except [`buffer::DetailSession::commit`] is pure and
//! synchronous: safe to recompute per render, O(records) per call, no
//! caching. The only suspending operation is the commit's store call.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use trainboard_core::TrainingRecord;
//! use trainboard_engine::grouping::{events_for_date, group_by_campaign};
//!
//! let records = vec![TrainingRecord::new()
//!     .cliente("Acme")
//!     .segmento("Retail")
//!     .campana("Acme Retail")
//!     .fechas("01/03/2024", "05/03/2024")];
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
//! let active = events_for_date(&records, day);
//! let groups = group_by_campaign(&active);
//! assert_eq!(groups[0].campana, "Acme Retail");
//! ```

pub mod buffer;
pub mod color;
pub mod compose;
pub mod grid;
pub mod grouping;

pub use buffer::{DetailSession, EditBuffer, EditError};
pub use compose::{DevelopmentForm, HeaderForm, ValidationError};
pub use grid::{DayMarkers, DayOverlay};
