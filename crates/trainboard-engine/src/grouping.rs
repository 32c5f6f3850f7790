//! Record grouping: which records are active on a day, how a day's records
//! aggregate into campaigns, and which campaigns touch a month.
//!
//! All functions are pure filters/folds over the flat record list. Records
//! with missing, unparseable or inverted interval bounds are treated as
//! having no active interval and drop out of date-driven views; bad data is
//! never an error here.

use std::collections::HashMap;

use chrono::NaiveDate;
use trainboard_core::dates::{self, YearMonth};
use trainboard_core::{
    DevelopmentEntry, GroupedEvent, NovedadesRecord, TrainingRecord, UNASSIGNED_CAMPAIGN,
};

/// The closed interval `[start, end]` a record is active on.
///
/// `None` when either bound is missing or unparseable, and also when the
/// bounds are inverted (`start > end`): malformed data means "no active
/// interval", not an error.
fn active_interval(inicio: Option<&str>, fin: Option<&str>) -> Option<(NaiveDate, NaiveDate)> {
    let start = dates::parse(inicio)?;
    let end = dates::parse(fin)?;
    (start <= end).then_some((start, end))
}

/// Records active on `date`: both bounds parse and `date` lies within the
/// closed interval.
pub fn events_for_date(records: &[TrainingRecord], date: NaiveDate) -> Vec<&TrainingRecord> {
    records
        .iter()
        .filter(|r| {
            active_interval(r.fecha_inicio.as_deref(), r.fecha_fin.as_deref())
                .is_some_and(|(start, end)| start <= date && date <= end)
        })
        .collect()
}

/// Anomaly windows covering `date`, with the same interval rules as events.
pub fn novedades_for_date(novedades: &[NovedadesRecord], date: NaiveDate) -> Vec<&NovedadesRecord> {
    novedades
        .iter()
        .filter(|n| {
            active_interval(n.fecha_inicio.as_deref(), n.fecha_fin.as_deref())
                .is_some_and(|(start, end)| start <= date && date <= end)
        })
        .collect()
}

/// Fold a day's records into per-campaign aggregates.
///
/// Groups are keyed by `campana`; records with a missing or empty campaign
/// all land in one [`UNASSIGNED_CAMPAIGN`] group. Grouping is stable: groups
/// appear in first-seen order, the first record seeds the hoisted header
/// fields, and later records only contribute detail entries — their
/// differing header values are silently ignored (lossy by design, headers
/// are assumed consistent within a campaign).
pub fn group_by_campaign(events: &[&TrainingRecord]) -> Vec<GroupedEvent> {
    let mut groups: Vec<GroupedEvent> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in events {
        let campana = match record.campana.as_deref() {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => UNASSIGNED_CAMPAIGN.to_string(),
        };

        let slot = *index.entry(campana.clone()).or_insert_with(|| {
            groups.push(GroupedEvent::seeded_from(campana, record));
            groups.len() - 1
        });

        groups[slot].desarrollos.push(DevelopmentEntry::from_record(record));
    }

    groups
}

/// Campaign names with at least one record whose interval overlaps `month`.
///
/// Overlap is `start <= month_end && end >= month_start`. Records with no
/// active interval or an empty campaign are excluded. The result is sorted
/// lexicographically and deduplicated.
pub fn active_campaigns_for_month(records: &[TrainingRecord], month: YearMonth) -> Vec<String> {
    let (month_start, month_end) = (month.first_day(), month.last_day());

    let mut campaigns: Vec<String> = records
        .iter()
        .filter(|r| {
            active_interval(r.fecha_inicio.as_deref(), r.fecha_fin.as_deref())
                .is_some_and(|(start, end)| start <= month_end && end >= month_start)
        })
        .filter_map(|r| r.campana.clone())
        .filter(|c| !c.trim().is_empty())
        .collect();

    campaigns.sort();
    campaigns.dedup();
    campaigns
}

// ============================================================================
// Tests
// ============================================================================
