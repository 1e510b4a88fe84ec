//! Calendar arithmetic over appointments: day buckets, month grids and
//! per-day totals.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use models::appointment::{Appointment, AppointmentStatus};

use crate::errors::ServiceError;

/// Bucket appointments by date; each day sorted by start time.
pub fn group_by_day(appointments: &[Appointment]) -> BTreeMap<NaiveDate, Vec<Appointment>> {
    let mut days: BTreeMap<NaiveDate, Vec<Appointment>> = BTreeMap::new();
    for a in appointments {
        days.entry(a.date).or_default().push(a.clone());
    }
    for list in days.values_mut() {
        list.sort_by_key(|a| (a.time, a.created_at));
    }
    days
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub appointment_count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[GridDay; 7]>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &GridDay> {
        self.weeks.iter().flat_map(|w| w.iter())
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, ServiceError> {
    if !(1..=12).contains(&month) {
        return Err(ServiceError::Validation(format!("invalid month {year}-{month}")));
    }
    let next = if month == 12 { year.checked_add(1).map(|y| (y, 1)) } else { Some((year, month + 1)) };
    next.and_then(|(ny, nm)| NaiveDate::from_ymd_opt(ny, nm, 1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| ServiceError::Validation(format!("invalid month {year}-{month}")))
}

/// Whole weeks covering the month, starting on `week_start`. Days from the
/// adjacent months pad the first and last week. Cancelled appointments are
/// not counted.
pub fn month_grid(year: i32, month: u32, week_start: Weekday, appointments: &[Appointment]) -> Result<MonthGrid, ServiceError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ServiceError::Validation(format!("invalid month {year}-{month}")))?;
    let last = last_day_of_month(year, month)?;

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for a in appointments.iter().filter(|a| a.status != AppointmentStatus::Cancelled) {
        *counts.entry(a.date).or_default() += 1;
    }

    let out_of_range = || ServiceError::Validation(format!("month {year}-{month} out of supported range"));
    let lead = (first.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    let mut cursor = first.checked_sub_signed(Duration::days(i64::from(lead))).ok_or_else(out_of_range)?;
    let mut weeks = Vec::with_capacity(6);
    while cursor <= last {
        let mut dates = [cursor; 7];
        for (i, slot) in dates.iter_mut().enumerate().skip(1) {
            *slot = cursor.checked_add_signed(Duration::days(i as i64)).ok_or_else(out_of_range)?;
        }
        weeks.push(dates.map(|date| GridDay {
            date,
            in_month: date.month() == month && date.year() == year,
            appointment_count: counts.get(&date).copied().unwrap_or(0),
        }));
        cursor = match cursor.checked_add_signed(Duration::days(7)) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(MonthGrid { year, month, weeks })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub count: usize,
    pub booked_minutes: u32,
    pub expected_revenue_cents: i64,
}

/// Totals for one day, ignoring cancelled appointments. Totals saturate
/// instead of wrapping.
pub fn day_summary(appointments: &[Appointment], date: NaiveDate) -> DaySummary {
    let active: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.date == date && a.status != AppointmentStatus::Cancelled)
        .collect();
    DaySummary {
        date,
        count: active.len(),
        booked_minutes: active.iter().fold(0u32, |acc, a| acc.saturating_add(a.duration_minutes)),
        expected_revenue_cents: active
            .iter()
            .filter_map(|a| a.price_cents)
            .fold(0i64, |acc, p| acc.saturating_add(p)),
    }
}
