//! Line-oriented text rendering of a month board.
//!
//! One line per day, grouped by week, with the three display lanes marked
//! `-` (base), `^` (actualizaciones) and `!` (incumplimientos). Start/end
//! days carry `[inicio]`/`[fin]` markers; holidays replace the day's lanes.

use chrono::NaiveDate;
use trainboard_core::dates::{self, YearMonth};
use trainboard_core::{FestivoRecord, GroupedEvent, NovedadesRecord, TrainingRecord};
use trainboard_engine::grid::{self, DayOverlay};
use trainboard_engine::grouping;

pub fn render_board(
    month: YearMonth,
    records: &[TrainingRecord],
    festivos: &[FestivoRecord],
    novedades: &[NovedadesRecord],
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("== Tablero {month} ==\n"));

    let campaigns = grouping::active_campaigns_for_month(records, month);
    if !campaigns.is_empty() {
        out.push_str(&format!("Campañas activas: {}\n", campaigns.join(", ")));
    }

    let days = grid::visible_days(month);
    for week in days.chunks(6) {
        out.push_str(&format!(
            "--- Semana del {} ---\n",
            dates::format_dmy(week[0])
        ));
        for &day in week {
            let overlay = grid::day_overlay(day, records, festivos, novedades);
            render_day(&mut out, day, month, today, &overlay);
        }
    }

    out
}

fn render_day(
    out: &mut String,
    day: NaiveDate,
    month: YearMonth,
    today: NaiveDate,
    overlay: &DayOverlay,
) {
    let day_mark = if day == today {
        '*'
    } else if month.contains(day) {
        ' '
    } else {
        '.'
    };
    out.push_str(&format!("{day_mark}{}\n", dates::format_dmy(day)));

    for novedad in &overlay.novedades {
        out.push_str(&format!(
            "    ~ {}: {}\n",
            novedad.desarrollador.as_deref().unwrap_or("(sin desarrollador)"),
            novedad.novedad.as_deref().unwrap_or("(sin descripción)")
        ));
    }

    if let Some(name) = &overlay.holiday {
        out.push_str(&format!("    FESTIVO: {name}\n"));
        return;
    }

    for group in &overlay.base {
        render_group(out, '-', day, group);
    }
    for group in &overlay.updates {
        render_group(out, '^', day, group);
    }
    for group in &overlay.anomalies {
        render_group(out, '!', day, group);
    }
    if overlay.overflow > 0 {
        out.push_str(&format!("    +{} más\n", overlay.overflow));
    }
}

fn render_group(out: &mut String, lane: char, day: NaiveDate, group: &GroupedEvent) {
    let markers = grid::day_markers(day, group);
    let mut line = format!(
        "    {lane} {} ({} desarrollo{})",
        group.campana,
        group.desarrollos.len(),
        if group.desarrollos.len() == 1 { "" } else { "s" }
    );
    if let Some(status) = grid::aggregate_status(group) {
        line.push_str(&format!(" [{status}]"));
    }
    if markers.is_start {
        line.push_str(" [inicio]");
    }
    if markers.is_end {
        line.push_str(" [fin]");
    }
    line.push('\n');
    out.push_str(&line);
}

/// One line per active campaign with its stable board color.
pub fn render_campaigns(month: YearMonth, records: &[TrainingRecord]) -> String {
    let campaigns = grouping::active_campaigns_for_month(records, month);
    if campaigns.is_empty() {
        return format!("No hay campañas activas en {month}\n");
    }

    let mut out = String::new();
    for campaign in campaigns {
        let color =
            trainboard_engine::color::color_for(Some(&campaign), trainboard_engine::color::CAMPAIGN_PALETTE);
        out.push_str(&format!("{color}  {campaign}\n"));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
