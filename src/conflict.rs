use chrono::{NaiveDate, NaiveTime, Timelike};
use tracing::debug;

use crate::models::{Appointment, AppointmentStatus};

/// Half-open `[start, end)` span in minutes from midnight.
///
/// `end` may pass 1440 for appointments that run past midnight; both sides of a
/// comparison always share the same calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(time: NaiveTime, duration: u32) -> Self {
        let start = time.num_seconds_from_midnight() / 60;
        Self {
            start,
            end: start.saturating_add(duration),
        }
    }

    /// Back-to-back intervals (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub doctor_name: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: u32,
}

/// Existing, non-cancelled appointments for the same doctor and date whose interval
/// overlaps `slot`. `exclude_id` skips one record (the one being rescheduled).
pub fn find_conflicts<'a, I>(existing: I, slot: Slot<'_>, exclude_id: Option<&str>) -> Vec<&'a Appointment>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let wanted = Interval::new(slot.time, slot.duration);

    let conflicts: Vec<&Appointment> = existing
        .into_iter()
        .filter(|a| exclude_id != Some(a.id.as_str()))
        .filter(|a| a.doctor_name == slot.doctor_name && a.date == slot.date)
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .filter(|a| Interval::new(a.time, a.duration).overlaps(&wanted))
        .collect();

    if !conflicts.is_empty() {
        debug!(
            "{} conflicting appointment(s) for {} on {} at {}",
            conflicts.len(),
            slot.doctor_name,
            slot.date,
            slot.time.format("%H:%M")
        );
    }

    conflicts
}
