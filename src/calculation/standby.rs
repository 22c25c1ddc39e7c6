//! On-call (reperibilità) breakdown calculation.
//!
//! Each intervention contributes up to four segments: outbound travel, two
//! work sub-shifts and return travel. Every minute of a segment falls in one of
//! four time bands, decided by its hour against the night window and by
//! whether the entry day is a Sunday or holiday. Minutes past midnight keep
//! the entry day's holiday status.
//!
//! [`classify_segment`] splits a segment at band boundaries directly.
//! [`classify_segment_by_minute`] walks minute by minute and is kept as the
//! reference the splitter is tested against.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{NightWindow, Settings, StandbyRates};
use crate::models::{
    AuditStep, AuditWarning, BandValues, Intervention, StandbyBreakdown, TimeBand, TimeSpan,
    WorkEntry,
};

use super::{
    DayClassification, MAX_WORK_SHIFTS, MINUTES_PER_DAY, is_incomplete, is_night_hour,
    minutes_to_hours, span_bounds,
};

/// Whether a segment is intervention work or intervention travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// On-site work.
    Work,
    /// Travel to or from the site.
    Travel,
}

/// A contiguous piece of an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandbySegment {
    /// Work or travel.
    pub kind: SegmentKind,
    /// Start, in minutes since midnight.
    pub start_minute: u32,
    /// Length in minutes. May run past midnight.
    pub duration_minutes: u32,
}

/// Minute counts per time band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMinutes {
    /// Ordinary band.
    pub ordinary: u32,
    /// Night band.
    pub night: u32,
    /// Holiday band.
    pub holiday: u32,
    /// Night-holiday band.
    pub night_holiday: u32,
}

impl BandMinutes {
    /// Minutes in one band.
    pub fn get(&self, band: TimeBand) -> u32 {
        match band {
            TimeBand::Ordinary => self.ordinary,
            TimeBand::Night => self.night,
            TimeBand::Holiday => self.holiday,
            TimeBand::NightHoliday => self.night_holiday,
        }
    }

    /// Adds minutes to one band.
    pub fn add(&mut self, band: TimeBand, minutes: u32) {
        match band {
            TimeBand::Ordinary => self.ordinary += minutes,
            TimeBand::Night => self.night += minutes,
            TimeBand::Holiday => self.holiday += minutes,
            TimeBand::NightHoliday => self.night_holiday += minutes,
        }
    }

    /// Adds `other` band by band.
    pub fn accumulate(&mut self, other: &BandMinutes) {
        for band in TimeBand::ALL {
            self.add(band, other.get(band));
        }
    }

    /// Minutes across all bands.
    pub fn total(&self) -> u32 {
        self.ordinary + self.night + self.holiday + self.night_holiday
    }

    /// Converts each band to hours.
    pub fn to_hours(&self) -> BandValues {
        BandValues {
            ordinary: minutes_to_hours(self.ordinary),
            night: minutes_to_hours(self.night),
            holiday: minutes_to_hours(self.holiday),
            night_holiday: minutes_to_hours(self.night_holiday),
        }
    }
}

fn intervention_spans(
    intervention: &Intervention,
) -> impl Iterator<Item = (SegmentKind, &TimeSpan)> {
    let outbound = intervention
        .outbound_travel
        .iter()
        .map(|span| (SegmentKind::Travel, span));
    let work = intervention
        .work_shifts
        .iter()
        .take(MAX_WORK_SHIFTS)
        .map(|span| (SegmentKind::Work, span));
    let inbound = intervention
        .return_travel
        .iter()
        .map(|span| (SegmentKind::Travel, span));
    outbound.chain(work).chain(inbound)
}

/// Extracts the usable segments of the interventions, in order.
///
/// Spans with a missing or malformed time are skipped.
pub fn extract_segments(interventions: &[Intervention]) -> Vec<StandbySegment> {
    interventions
        .iter()
        .flat_map(intervention_spans)
        .filter_map(|(kind, span)| {
            span_bounds(span).map(|(start_minute, duration_minutes)| StandbySegment {
                kind,
                start_minute,
                duration_minutes,
            })
        })
        .collect()
}

fn minutes_to_next_boundary(minute: u32, window: &NightWindow) -> Option<u32> {
    if window.start_hour == window.end_hour {
        return None;
    }
    let distance = |hour: u32| {
        let d = (hour * 60 + MINUTES_PER_DAY - minute) % MINUTES_PER_DAY;
        if d == 0 { MINUTES_PER_DAY } else { d }
    };
    Some(distance(window.start_hour).min(distance(window.end_hour)))
}

/// Splits a segment into band minutes at the night-window boundaries.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::{classify_segment, SegmentKind, StandbySegment};
/// use ccnl_earnings_engine::config::NightWindow;
///
/// // 21:55-22:05 on a weekday
/// let segment = StandbySegment { kind: SegmentKind::Work, start_minute: 1315, duration_minutes: 10 };
/// let minutes = classify_segment(&segment, false, &NightWindow::default());
/// assert_eq!((minutes.ordinary, minutes.night), (5, 5));
/// ```
pub fn classify_segment(
    segment: &StandbySegment,
    is_festive: bool,
    window: &NightWindow,
) -> BandMinutes {
    let mut minutes = BandMinutes::default();
    let mut remaining = segment.duration_minutes;
    let mut minute = segment.start_minute % MINUTES_PER_DAY;

    while remaining > 0 {
        let chunk = minutes_to_next_boundary(minute, window).map_or(remaining, |d| d.min(remaining));
        let band = TimeBand::classify(is_night_hour(minute / 60, window), is_festive);
        minutes.add(band, chunk);
        remaining -= chunk;
        minute = (minute + chunk) % MINUTES_PER_DAY;
    }
    minutes
}

/// Classifies a segment one minute at a time.
pub fn classify_segment_by_minute(
    segment: &StandbySegment,
    is_festive: bool,
    window: &NightWindow,
) -> BandMinutes {
    let mut minutes = BandMinutes::default();
    for offset in 0..segment.duration_minutes {
        let minute = (segment.start_minute + offset) % MINUTES_PER_DAY;
        let band = TimeBand::classify(is_night_hour(minute / 60, window), is_festive);
        minutes.add(band, 1);
    }
    minutes
}

/// Whether the entry counts as an on-call day.
///
/// An explicit flag on the entry wins. Otherwise the settings calendar decides,
/// which needs a valid date.
pub fn is_standby_day(entry: &WorkEntry, date: Option<NaiveDate>, settings: &Settings) -> bool {
    match entry.standby {
        Some(flag) => flag,
        None => date.is_some_and(|date| settings.standby_settings.is_calendar_standby(date)),
    }
}

/// Multiplier of a time band.
pub fn band_multiplier(band: TimeBand, rates: &StandbyRates) -> Decimal {
    match band {
        TimeBand::Ordinary => Decimal::ONE,
        TimeBand::Night => rates.night,
        TimeBand::Holiday => rates.holiday,
        TimeBand::NightHoliday => rates.night_holiday,
    }
}

/// The result of an on-call breakdown calculation.
#[derive(Debug, Clone, Default)]
pub struct StandbyResult {
    /// Hours, earnings and indemnity per band.
    pub breakdown: StandbyBreakdown,
    /// Work minutes per band.
    pub work_minutes: BandMinutes,
    /// Travel minutes per band.
    pub travel_minutes: BandMinutes,
    /// The audit steps recording this calculation.
    pub audit_steps: Vec<AuditStep>,
    /// Unreadable spans and skipped classification.
    pub warnings: Vec<AuditWarning>,
}

/// Computes the on-call component of a standby day.
///
/// # Arguments
///
/// * `interventions` - The interventions of the day, in order
/// * `day` - Calendar facts of the day; `None` when the date is invalid, in
///   which case band classification is skipped and the interventions pay nothing
/// * `indemnity` - Daily indemnity to include, zero when not applicable
/// * `settings` - The contract and policy settings
/// * `step_number` - The step number of the first audit step
pub fn calculate_standby_breakdown(
    interventions: &[Intervention],
    day: Option<DayClassification>,
    indemnity: Decimal,
    settings: &Settings,
    step_number: u32,
) -> StandbyResult {
    let mut result = StandbyResult::default();

    for (kind, span) in interventions.iter().flat_map(intervention_spans) {
        if is_incomplete(span) {
            let label = match kind {
                SegmentKind::Work => "intervention work",
                SegmentKind::Travel => "intervention travel",
            };
            result.warnings.push(AuditWarning::new(
                "MALFORMED_TIME",
                format!(
                    "{} {:?}-{:?} is incomplete and counts as zero",
                    label, span.start, span.end
                ),
                "low",
            ));
        }
    }

    match day {
        Some(day) => {
            for segment in extract_segments(interventions) {
                let minutes = classify_segment(&segment, day.is_festive(), &settings.night_window);
                match segment.kind {
                    SegmentKind::Work => result.work_minutes.accumulate(&minutes),
                    SegmentKind::Travel => result.travel_minutes.accumulate(&minutes),
                }
            }
        }
        None if !interventions.is_empty() => {
            result.warnings.push(AuditWarning::new(
                "BAND_CLASSIFICATION_SKIPPED",
                "entry date is invalid; interventions contribute nothing",
                "medium",
            ));
        }
        None => {}
    }

    let base_rate = settings.base_rate();
    let rates = &settings.contract.standby_rates;
    let work_hours = result.work_minutes.to_hours();
    let travel_hours = result.travel_minutes.to_hours();
    let mut work_earnings = BandValues::default();
    let mut travel_earnings = BandValues::default();
    for band in TimeBand::ALL {
        let multiplier = band_multiplier(band, rates);
        *work_earnings.get_mut(band) = work_hours.get(band) * base_rate * multiplier;
        *travel_earnings.get_mut(band) =
            travel_hours.get(band) * base_rate * settings.travel_compensation_rate * multiplier;
    }

    result.audit_steps.push(AuditStep::new(
        step_number,
        "standby_bands",
        "On-Call Time Bands",
        serde_json::json!({
            "interventions": interventions.len(),
            "is_festive": day.is_some_and(|d| d.is_festive()),
            "night_window": settings.night_window,
        }),
        serde_json::json!({
            "work_minutes": result.work_minutes,
            "travel_minutes": result.travel_minutes,
        }),
        format!(
            "{} work and {} travel minutes classified into time bands",
            result.work_minutes.total(),
            result.travel_minutes.total()
        ),
    ));

    let total_earnings = work_earnings.total() + travel_earnings.total() + indemnity;
    result.audit_steps.push(AuditStep::new(
        step_number + 1,
        "standby_earnings",
        "On-Call Earnings",
        serde_json::json!({
            "base_rate": base_rate.normalize().to_string(),
            "travel_compensation_rate": settings.travel_compensation_rate.normalize().to_string(),
            "daily_indemnity": indemnity.normalize().to_string(),
        }),
        serde_json::json!({
            "work_earnings": work_earnings.total().normalize().to_string(),
            "travel_earnings": travel_earnings.total().normalize().to_string(),
            "total": total_earnings.normalize().to_string(),
        }),
        "Band hours priced at the band multiplier; travel also at the travel compensation rate",
    ));

    result.breakdown = StandbyBreakdown {
        work_hours,
        travel_hours,
        work_earnings,
        travel_earnings,
        daily_indemnity: indemnity,
        total_earnings,
    };
    result
}
