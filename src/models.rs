use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::store::AppointmentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<AppointmentStore>>,
}

impl AppState {
    pub fn new(store: AppointmentStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

/* -------------------------
   Domain
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: u32,
    #[serde(alias = "provider_name")]
    pub doctor_name: String,
    pub status: AppointmentStatus,
    pub mode: AppointmentMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Confirmed,
    Scheduled,
    Upcoming,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Confirmed,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Upcoming,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Upcoming => "Upcoming",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentMode {
    #[serde(rename = "In-person")]
    InPerson,
    Virtual,
    Phone,
}

impl AppointmentMode {
    pub const ALL: [AppointmentMode; 3] = [
        AppointmentMode::InPerson,
        AppointmentMode::Virtual,
        AppointmentMode::Phone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentMode::InPerson => "In-person",
            AppointmentMode::Virtual => "Virtual",
            AppointmentMode::Phone => "Phone",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }
}

impl fmt::Display for AppointmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A creation payload that has passed field validation.
///
/// Names are already trimmed. `status` keeps the raw submitted value (if the key was
/// present at all) because the store re-checks it against the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration: u32,
    pub doctor_name: String,
    pub mode: AppointmentMode,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilters {
    pub date: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "provider_name")]
    pub doctor_name: Option<String>,
}

impl ListFilters {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        fn accepts(filter: &Option<String>, value: &str) -> bool {
            match filter.as_deref() {
                None | Some("") => true,
                Some(wanted) => wanted == value,
            }
        }

        accepts(&self.date, &appointment.date.format("%Y-%m-%d").to_string())
            && accepts(&self.status, appointment.status.as_str())
            && accepts(&self.doctor_name, &appointment.doctor_name)
    }
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiOk<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub data: DeleteData,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteData {
    pub deleted: bool,
}

/// `HH:MM` (24h) representation for appointment start times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        crate::validation::parse_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("time {raw:?} is not HH:MM")))
    }
}
