//! Calendar grid: the visible day range for a month and per-day overlays.
//!
//! The board renders a 6-day week: weeks start on Monday and the week's
//! last day (Sunday) is excluded from the grid entirely. That is deliberate
//! business behavior (no Sunday workday), not a calendar default; keep it.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use trainboard_core::dates::{self, YearMonth};
use trainboard_core::{FestivoRecord, GroupedEvent, NovedadesRecord, TrainingRecord};

use crate::grouping;

/// Groups displayed per lane before the "+N more" overflow kicks in.
pub const LANE_CAP: usize = 6;

/// The Monday-aligned day sequence covering `month`, Sundays removed.
///
/// Includes the leading/trailing days of adjacent months needed to complete
/// the first and last week, so the length is always a multiple of 6.
pub fn visible_days(month: YearMonth) -> Vec<NaiveDate> {
    let first = month.first_day();
    let last = month.last_day();

    let start = first - Days::new(u64::from(first.weekday().num_days_from_monday()));
    let end = last + Days::new(u64::from(6 - last.weekday().num_days_from_monday()));

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| day.weekday() != Weekday::Sun)
        .collect()
}

/// First holiday whose date matches `date` exactly. One holiday per date is
/// assumed, so first match wins.
pub fn holiday_for(festivos: &[FestivoRecord], date: NaiveDate) -> Option<&FestivoRecord> {
    festivos
        .iter()
        .find(|f| dates::parse(f.festivo.as_deref()) == Some(date))
}

/// Everything one day cell renders.
///
/// Grouped events are partitioned into three disjoint display lanes; a group
/// appears in exactly one. A holiday suppresses all event lanes for the day;
/// anomaly markers are independent of campaigns and stay visible regardless.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DayOverlay {
    /// Holiday label when the day matches a festivo.
    pub holiday: Option<String>,
    /// Ordinary campaign groups.
    pub base: Vec<GroupedEvent>,
    /// Groups with an "actualizacion" development and no incumplimiento.
    pub updates: Vec<GroupedEvent>,
    /// Groups with any "incumplimiento" estado; takes precedence over the
    /// update lane.
    pub anomalies: Vec<GroupedEvent>,
    /// "+N more": total grouped events across all lanes beyond [`LANE_CAP`].
    pub overflow: usize,
    /// Developer absence windows covering the day.
    pub novedades: Vec<NovedadesRecord>,
}

impl DayOverlay {
    pub fn is_holiday(&self) -> bool {
        self.holiday.is_some()
    }
}

/// Compute the overlay for one day cell.
pub fn day_overlay(
    date: NaiveDate,
    records: &[TrainingRecord],
    festivos: &[FestivoRecord],
    novedades: &[NovedadesRecord],
) -> DayOverlay {
    let novedades = grouping::novedades_for_date(novedades, date)
        .into_iter()
        .cloned()
        .collect();

    if let Some(festivo) = holiday_for(festivos, date) {
        return DayOverlay {
            holiday: Some(
                festivo
                    .festividad
                    .clone()
                    .unwrap_or_else(|| "Festivo".to_string()),
            ),
            novedades,
            ..DayOverlay::default()
        };
    }

    let active = grouping::events_for_date(records, date);
    let groups = grouping::group_by_campaign(&active);
    let total = groups.len();

    let mut overlay = DayOverlay {
        overflow: total.saturating_sub(LANE_CAP),
        novedades,
        ..DayOverlay::default()
    };

    for group in groups {
        let lane = if has_incumplimiento(&group) {
            &mut overlay.anomalies
        } else if has_actualizacion(&group) {
            &mut overlay.updates
        } else {
            &mut overlay.base
        };
        if lane.len() < LANE_CAP {
            lane.push(group);
        }
    }

    overlay
}

fn has_incumplimiento(group: &GroupedEvent) -> bool {
    group
        .desarrollos
        .iter()
        .any(|d| matches_ignore_case(d.estado.as_deref(), "incumplimiento"))
}

fn has_actualizacion(group: &GroupedEvent) -> bool {
    group
        .desarrollos
        .iter()
        .any(|d| matches_ignore_case(d.desarrollo.as_deref(), "actualizacion"))
}

fn matches_ignore_case(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case(expected))
}

/// Start/end markers for a group on a given day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayMarkers {
    pub is_start: bool,
    pub is_end: bool,
}

/// A day marks a group's start iff `fecha_inicio` falls exactly on it, and
/// its end iff `fecha_fin` does; a single-day event marks both.
pub fn day_markers(date: NaiveDate, group: &GroupedEvent) -> DayMarkers {
    DayMarkers {
        is_start: dates::parse(group.fecha_inicio.as_deref()) == Some(date),
        is_end: dates::parse(group.fecha_fin.as_deref()) == Some(date),
    }
}

/// The status driving a group's badge color.
///
/// Precedence: any "en proceso" detail, then "finalizado", then "entregado";
/// otherwise the first detail's raw estado (which may be absent).
pub fn aggregate_status(group: &GroupedEvent) -> Option<String> {
    let any = |status: &str| {
        group
            .desarrollos
            .iter()
            .any(|d| matches_ignore_case(d.estado.as_deref(), status))
    };

    if any("en proceso") {
        Some("En Proceso".to_string())
    } else if any("finalizado") {
        Some("Finalizado".to_string())
    } else if any("entregado") {
        Some("Entregado".to_string())
    } else {
        group.desarrollos.first().and_then(|d| d.estado.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    #[test]
    fn march_2024_grid_shape() {
        // March 2024: Fri 1st to Sun 31st; Monday-aligned cover runs
        // Mon 26 Feb .. Sun 31 Mar, minus Sundays.
        let days = visible_days(month(2024, 3));

        assert_eq!(days.first(), Some(&ymd(2024, 2, 26)));
        assert_eq!(days.last(), Some(&ymd(2024, 3, 30)));
        assert_eq!(days.len() % 6, 0);
        assert!(days.iter().all(|d| d.weekday() != Weekday::Sun));
    }

    #[test]
    fn holiday_suppresses_event_lanes() {
        let records = vec![TrainingRecord::new()
            .campana("Acme Retail")
            .fechas("01/03/2024", "05/03/2024")];
        let festivos = vec![FestivoRecord {
            festivo: Some("04/03/2024".into()),
            festividad: Some("Fiesta local".into()),
        }];

        let overlay = day_overlay(ymd(2024, 3, 4), &records, &festivos, &[]);
        assert_eq!(overlay.holiday.as_deref(), Some("Fiesta local"));
        assert!(overlay.base.is_empty());
        assert!(overlay.updates.is_empty());
        assert!(overlay.anomalies.is_empty());

        // The day before is a working day with the event visible.
        let overlay = day_overlay(ymd(2024, 3, 3), &records, &festivos, &[]);
        assert!(overlay.holiday.is_none());
        assert_eq!(overlay.base.len(), 1);
    }

    #[test]
    fn lanes_are_disjoint_with_anomaly_precedence() {
        let base = TrainingRecord::new()
            .campana("Plain")
            .estado("Pendiente")
            .fechas("01/03/2024", "05/03/2024");
        let update = TrainingRecord::new()
            .campana("Upd")
            .desarrollo("Actualizacion")
            .estado("Pendiente")
            .fechas("01/03/2024", "05/03/2024");
        // An update-typed development whose estado flags a missed
        // commitment lands in the anomaly lane only.
        let breached = TrainingRecord::new()
            .campana("Breach")
            .desarrollo("ACTUALIZACION")
            .estado("Incumplimiento")
            .fechas("01/03/2024", "05/03/2024");

        let overlay = day_overlay(ymd(2024, 3, 2), &[base, update, breached], &[], &[]);

        let names = |lane: &[GroupedEvent]| {
            lane.iter().map(|g| g.campana.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&overlay.base), ["Plain"]);
        assert_eq!(names(&overlay.updates), ["Upd"]);
        assert_eq!(names(&overlay.anomalies), ["Breach"]);
        assert_eq!(overlay.overflow, 0);
    }

    #[test]
    fn overflow_counts_total_groups_beyond_cap() {
        let records: Vec<TrainingRecord> = (0..9)
            .map(|i| {
                TrainingRecord::new()
                    .campana(format!("Campaña {i}"))
                    .fechas("01/03/2024", "05/03/2024")
            })
            .collect();

        let overlay = day_overlay(ymd(2024, 3, 2), &records, &[], &[]);
        assert_eq!(overlay.base.len(), LANE_CAP);
        assert_eq!(overlay.overflow, 3);
    }

    #[test]
    fn single_day_event_marks_start_and_end() {
        let record = TrainingRecord::new()
            .campana("Acme Retail")
            .fechas("03/03/2024", "03/03/2024");
        let group = GroupedEvent::seeded_from("Acme Retail", &record);

        let markers = day_markers(ymd(2024, 3, 3), &group);
        assert!(markers.is_start && markers.is_end);

        let elsewhere = day_markers(ymd(2024, 3, 4), &group);
        assert_eq!(elsewhere, DayMarkers::default());
    }

    #[test]
    fn aggregate_status_precedence() {
        let mk = |estados: &[Option<&str>]| {
            let record = TrainingRecord::new().campana("X");
            let mut group = GroupedEvent::seeded_from("X", &record);
            for estado in estados {
                let r = match estado {
                    Some(e) => record.clone().estado(*e),
                    None => record.clone(),
                };
                group
                    .desarrollos
                    .push(trainboard_core::DevelopmentEntry::from_record(&r));
            }
            group
        };

        let g = mk(&[Some("Entregado"), Some("en proceso"), Some("Finalizado")]);
        assert_eq!(aggregate_status(&g).as_deref(), Some("En Proceso"));

        let g = mk(&[Some("Entregado"), Some("FINALIZADO")]);
        assert_eq!(aggregate_status(&g).as_deref(), Some("Finalizado"));

        let g = mk(&[Some("Cancelado"), Some("Entregado")]);
        assert_eq!(aggregate_status(&g).as_deref(), Some("Entregado"));

        // No preferred status: first detail's raw estado, even when absent.
        let g = mk(&[Some("Cancelado"), Some("Proyectado")]);
        assert_eq!(aggregate_status(&g).as_deref(), Some("Cancelado"));
        let g = mk(&[None, Some("Cancelado")]);
        assert_eq!(aggregate_status(&g), None);
    }
}
