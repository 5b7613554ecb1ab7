use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::{AppointmentMode, AppointmentStatus, NewAppointment};

pub const MAX_DURATION_MINUTES: i64 = 480;

const REQUIRED_FIELDS: [&str; 6] = ["patient_name", "date", "time", "duration", "doctor_name", "mode"];

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static TIME_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid time regex"));

/// Look up a payload field. `doctor_name` may also arrive as `provider_name`.
fn field<'a>(data: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    match data.get(name) {
        Some(v) => Some(v),
        None if name == "doctor_name" => data.get("provider_name"),
        None => None,
    }
}

fn value_of<'a>(data: &'a Map<String, Value>, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    field(data, name).unwrap_or(&NULL)
}

/// JSON falsiness: null, "", 0, false, [] and {} all count as "not provided".
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    if !TIME_SHAPE.is_match(raw) {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

fn parse_name(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    (trimmed.chars().count() >= 2).then(|| trimmed.to_string())
}

fn parse_duration(value: &Value) -> Option<u32> {
    // Only JSON integers; 30.0 or "30" are rejected.
    let minutes = match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => n.as_i64()?,
        _ => return None,
    };
    if (1..=MAX_DURATION_MINUTES).contains(&minutes) {
        u32::try_from(minutes).ok()
    } else {
        None
    }
}

fn raw_status(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Validate a raw creation payload.
///
/// Missing required fields short-circuit: only those errors are reported. Otherwise every
/// format violation is collected.
pub fn validate_appointment_data(data: &Map<String, Value>) -> Result<NewAppointment, Vec<String>> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|name| is_blank(field(data, name)))
        .map(|name| format!("Missing required field: {name}"))
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    let mut errors = Vec::new();
    let value = |name: &str| value_of(data, name);

    let patient_name = parse_name(value("patient_name"));
    if patient_name.is_none() {
        errors.push("Patient name must be at least 2 characters long".to_string());
    }

    let date = value("date").as_str().and_then(parse_date);
    if date.is_none() {
        errors.push("Date must be in YYYY-MM-DD format".to_string());
    }

    let time = value("time").as_str().and_then(parse_time);
    if time.is_none() {
        errors.push("Time must be in HH:MM format".to_string());
    }

    let duration = parse_duration(value("duration"));
    if duration.is_none() {
        errors.push(format!(
            "Duration must be a positive integer between 1 and {MAX_DURATION_MINUTES} minutes"
        ));
    }

    let doctor_name = parse_name(value("doctor_name"));
    if doctor_name.is_none() {
        errors.push("Doctor name must be at least 2 characters long".to_string());
    }

    let mode = value("mode").as_str().and_then(AppointmentMode::parse);
    if mode.is_none() {
        errors.push(format!(
            "Mode must be one of: {}",
            AppointmentMode::names().join(", ")
        ));
    }

    let status = data.get("status").map(raw_status);
    if !is_blank(data.get("status")) {
        let known = data
            .get("status")
            .and_then(Value::as_str)
            .and_then(AppointmentStatus::parse)
            .is_some();
        if !known {
            errors.push(format!(
                "Status must be one of: {}",
                AppointmentStatus::names().join(", ")
            ));
        }
    }

    match (patient_name, date, time, duration, doctor_name, mode) {
        (Some(patient_name), Some(date), Some(time), Some(duration), Some(doctor_name), Some(mode))
            if errors.is_empty() =>
        {
            Ok(NewAppointment {
                patient_name,
                date,
                time,
                duration,
                doctor_name,
                mode,
                status,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_status_value(raw: &str) -> Option<AppointmentStatus> {
    AppointmentStatus::parse(raw)
}
