use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};

use crate::models::{Appointment, AppointmentMode, AppointmentStatus};

/// Load an initial dataset from a JSON array of appointments.
pub fn load_seed_file(path: &Path) -> anyhow::Result<Vec<Appointment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let appointments: Vec<Appointment> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;
    Ok(appointments)
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    patient_name: &str,
    (y, mo, d): (i32, u32, u32),
    (h, mi): (u32, u32),
    duration: u32,
    doctor_name: &str,
    status: AppointmentStatus,
    mode: AppointmentMode,
) -> Option<Appointment> {
    Some(Appointment {
        id: id.to_string(),
        patient_name: patient_name.to_string(),
        date: NaiveDate::from_ymd_opt(y, mo, d)?,
        time: NaiveTime::from_hms_opt(h, mi, 0)?,
        duration,
        doctor_name: doctor_name.to_string(),
        status,
        mode,
    })
}

/// Fixed demo schedule loaded at startup.
pub fn mock_appointments() -> Vec<Appointment> {
    use AppointmentMode::*;
    use AppointmentStatus::*;

    const SARAH: &str = "Dr. Sarah Johnson";
    const MICHAEL: &str = "Dr. Michael Chen";
    const JAMES: &str = "Dr. James Rodriguez";

    [
        entry("apt_001", "John Smith", (2024, 12, 27), (9, 0), 30, SARAH, Confirmed, InPerson),
        entry("apt_002", "Emily Davis", (2024, 12, 27), (10, 30), 45, MICHAEL, Scheduled, Virtual),
        entry("apt_003", "Robert Wilson", (2024, 12, 28), (14, 0), 60, SARAH, Upcoming, InPerson),
        entry("apt_004", "Lisa Anderson", (2024, 12, 26), (11, 15), 30, JAMES, Confirmed, Phone),
        entry("apt_005", "David Brown", (2024, 12, 29), (8, 30), 45, MICHAEL, Scheduled, Virtual),
        entry("apt_006", "Jennifer Taylor", (2024, 12, 26), (15, 45), 30, SARAH, Cancelled, InPerson),
        entry("apt_007", "Mark Thompson", (2024, 12, 30), (13, 0), 60, JAMES, Upcoming, InPerson),
        entry("apt_008", "Amanda White", (2024, 12, 27), (16, 30), 30, MICHAEL, Confirmed, Virtual),
        entry("apt_009", "Christopher Lee", (2024, 12, 25), (10, 0), 45, SARAH, Confirmed, Phone),
        entry("apt_010", "Michelle Garcia", (2024, 12, 28), (9, 15), 30, JAMES, Scheduled, InPerson),
        entry("apt_011", "Kevin Martinez", (2024, 12, 31), (11, 0), 60, MICHAEL, Upcoming, Virtual),
        entry("apt_012", "Rachel Clark", (2024, 12, 26), (14, 30), 45, SARAH, Confirmed, InPerson),
    ]
    .into_iter()
    .flatten()
    .collect()
}
