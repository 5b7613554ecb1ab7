use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::conflict::{find_conflicts, Slot};
use crate::error::{AppointmentError, ConflictSummary};
use crate::models::{Appointment, AppointmentStatus, ListFilters};
use crate::validation::{validate_appointment_data, validate_status_value, MAX_DURATION_MINUTES};

pub const ID_PREFIX: &str = "apt_";

/// In-memory appointment collection, keyed by id with insertion order kept for listing.
#[derive(Debug, Default)]
pub struct AppointmentStore {
    by_id: HashMap<String, Appointment>,
    order: Vec<String>,
}

impl AppointmentStore {
    pub fn new(initial: Vec<Appointment>) -> Self {
        let mut store = Self::default();
        for appointment in initial {
            if store.by_id.contains_key(&appointment.id) {
                warn!("duplicate seed appointment {} ignored", appointment.id);
                continue;
            }
            if let Some(problem) = store.seed_problem(&appointment) {
                warn!("seed appointment {} ignored: {problem}", appointment.id);
                continue;
            }
            store.insert(appointment);
        }
        store
    }

    /// Seed records must satisfy the same rules as created ones.
    fn seed_problem(&self, appointment: &Appointment) -> Option<String> {
        if appointment.patient_name.trim().chars().count() < 2 {
            return Some("patient name shorter than 2 characters".into());
        }
        if appointment.doctor_name.trim().chars().count() < 2 {
            return Some("doctor name shorter than 2 characters".into());
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&i64::from(appointment.duration)) {
            return Some(format!("duration {} out of range", appointment.duration));
        }
        if appointment.status == AppointmentStatus::Cancelled {
            return None;
        }
        let slot = Slot {
            doctor_name: &appointment.doctor_name,
            date: appointment.date,
            time: appointment.time,
            duration: appointment.duration,
        };
        let overlapping = find_conflicts(self.iter(), slot, None);
        (!overlapping.is_empty()).then(|| format!("overlaps {}", overlapping[0].id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, appointment: Appointment) {
        self.order.push(appointment.id.clone());
        self.by_id.insert(appointment.id.clone(), appointment);
    }

    fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Snapshot of every appointment matching all supplied filters, in insertion order.
    pub fn list(&self, filters: &ListFilters) -> Vec<Appointment> {
        self.iter().filter(|a| filters.matches(a)).cloned().collect()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Appointment, AppointmentError> {
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| AppointmentError::NotFound(id.to_string()))
    }

    fn generate_id(&self) -> String {
        loop {
            let candidate = format!("{ID_PREFIX}{}", &Uuid::new_v4().simple().to_string()[..8]);
            if !self.by_id.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn create(&mut self, payload: &Map<String, Value>) -> Result<Appointment, AppointmentError> {
        let new = validate_appointment_data(payload)
            .map_err(|errors| AppointmentError::InvalidData { errors })?;

        let status = match new.status.as_deref() {
            None => AppointmentStatus::Scheduled,
            Some(raw) => validate_status_value(raw).ok_or_else(|| AppointmentError::InvalidStatus {
                value: raw.to_string(),
            })?,
        };

        let slot = Slot {
            doctor_name: &new.doctor_name,
            date: new.date,
            time: new.time,
            duration: new.duration,
        };
        let conflicts = find_conflicts(self.iter(), slot, None);
        if !conflicts.is_empty() {
            warn!(
                "rejecting booking for {} on {} at {}: {} conflict(s)",
                new.doctor_name,
                new.date,
                new.time.format("%H:%M"),
                conflicts.len()
            );
            return Err(AppointmentError::Conflict {
                doctor_name: new.doctor_name.clone(),
                date: new.date.format("%Y-%m-%d").to_string(),
                conflicting: conflicts
                    .into_iter()
                    .map(|c| ConflictSummary {
                        id: c.id.clone(),
                        patient_name: c.patient_name.clone(),
                        time: c.time.format("%H:%M").to_string(),
                        duration: c.duration,
                    })
                    .collect(),
                requested_time: new.time.format("%H:%M").to_string(),
                requested_duration: new.duration,
            });
        }

        let appointment = Appointment {
            id: self.generate_id(),
            patient_name: new.patient_name,
            date: new.date,
            time: new.time,
            duration: new.duration,
            doctor_name: new.doctor_name,
            status,
            mode: new.mode,
        };
        self.insert(appointment.clone());

        info!(
            "created appointment {} for {} with {} on {}",
            appointment.id, appointment.patient_name, appointment.doctor_name, appointment.date
        );
        Ok(appointment)
    }

    pub fn update_status(&mut self, id: &str, new_status: &str) -> Result<Appointment, AppointmentError> {
        let status = validate_status_value(new_status).ok_or_else(|| AppointmentError::InvalidStatus {
            value: new_status.to_string(),
        })?;

        let Some(appointment) = self.by_id.get_mut(id) else {
            warn!("status update for unknown appointment {id}");
            return Err(AppointmentError::NotFound(id.to_string()));
        };

        let previous = appointment.status;
        appointment.status = status;
        info!("appointment {id} status {previous} -> {status}");
        Ok(appointment.clone())
    }

    /// Hard delete. Returns `false` when nothing matched.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.by_id.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != id);
        info!("deleted appointment {id}");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentMode;
    use crate::seed::mock_appointments;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn booking(patient: &str, time: &str, duration: u32) -> Map<String, Value> {
        payload(json!({
            "patient_name": patient,
            "date": "2025-03-15",
            "time": time,
            "duration": duration,
            "doctor_name": "Dr. X",
            "mode": "In-person"
        }))
    }

    #[test]
    fn scenario_overlap_then_adjacent() {
        let mut store = AppointmentStore::default();

        let first = store.create(&booking("A", "10:00", 60));
        assert!(matches!(
            first,
            Err(AppointmentError::InvalidData { .. })
        ), "single-letter patient name is too short");

        let first = store.create(&booking("Alice", "10:00", 60)).unwrap();
        assert_eq!(first.status, AppointmentStatus::Scheduled);

        let clash = store.create(&booking("Bob", "10:30", 30)).unwrap_err();
        match clash {
            AppointmentError::Conflict {
                conflicting,
                requested_time,
                requested_duration,
                ..
            } => {
                assert_eq!(conflicting.len(), 1);
                assert_eq!(conflicting[0].id, first.id);
                assert_eq!(conflicting[0].time, "10:00");
                assert_eq!(requested_time, "10:30");
                assert_eq!(requested_duration, 30);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let adjacent = store.create(&booking("Bob", "11:00", 30)).unwrap();
        assert_eq!(adjacent.time.format("%H:%M").to_string(), "11:00");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn round_trip_trims_names_and_keeps_fields() {
        let mut store = AppointmentStore::default();
        let mut data = booking("  Carol King  ", "14:15", 45);
        data.insert("doctor_name".into(), json!("  Dr. X "));
        data.insert("status".into(), json!("Confirmed"));
        data.insert("mode".into(), json!("Phone"));

        let created = store.create(&data).unwrap();
        assert!(created.id.starts_with(ID_PREFIX));
        assert_eq!(created.id.len(), ID_PREFIX.len() + 8);
        assert_eq!(created.patient_name, "Carol King");
        assert_eq!(created.doctor_name, "Dr. X");
        assert_eq!(created.duration, 45);
        assert_eq!(created.status, AppointmentStatus::Confirmed);
        assert_eq!(created.mode, AppointmentMode::Phone);
        assert_eq!(store.get_by_id(&created.id).unwrap(), created);
    }

    #[test]
    fn blank_status_fails_revalidation() {
        let mut store = AppointmentStore::default();
        let mut data = booking("Dana", "09:00", 30);
        data.insert("status".into(), json!(""));
        assert_eq!(
            store.create(&data).unwrap_err(),
            AppointmentError::InvalidStatus { value: String::new() }
        );

        data.insert("status".into(), Value::Null);
        assert_eq!(
            store.create(&data).unwrap_err(),
            AppointmentError::InvalidStatus { value: "null".into() }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn cancelled_appointments_never_block() {
        let mut store = AppointmentStore::default();
        let mut data = booking("Erin", "10:00", 60);
        data.insert("status".into(), json!("Cancelled"));
        store.create(&data).unwrap();

        assert!(store.create(&booking("Frank", "10:15", 30)).is_ok());
    }

    #[test]
    fn cancelling_frees_the_slot() {
        let mut store = AppointmentStore::default();
        let first = store.create(&booking("Gina", "10:00", 60)).unwrap();
        assert!(store.create(&booking("Hank", "10:00", 60)).is_err());

        store.update_status(&first.id, "Cancelled").unwrap();
        assert!(store.create(&booking("Hank", "10:00", 60)).is_ok());
    }

    #[test]
    fn failed_creation_does_not_write() {
        let mut store = AppointmentStore::new(mock_appointments());
        let before = store.len();
        let mut conflicting = booking("Ivy", "09:00", 30);
        conflicting.insert("date".into(), json!("2024-12-27"));
        conflicting.insert("doctor_name".into(), json!("Dr. Sarah Johnson"));
        assert!(matches!(
            store.create(&conflicting),
            Err(AppointmentError::Conflict { .. })
        ));
        assert!(store.create(&payload(json!({}))).is_err());
        assert_eq!(store.len(), before);
    }

    #[test]
    fn ids_are_unique_across_many_creations() {
        let mut store = AppointmentStore::default();
        let mut ids = std::collections::HashSet::new();
        for i in 0..200u32 {
            let mut data = booking("Jack Doe", "00:00", 1);
            // Each booking gets its own doctor so none of them collide.
            data.insert("doctor_name".into(), json!(format!("Dr. {i}")));
            let created = store.create(&data).unwrap();
            assert!(created.id.starts_with(ID_PREFIX));
            assert!(ids.insert(created.id));
        }
        assert_eq!(store.len(), 200);
    }

    #[test]
    fn list_filters_and_snapshots() {
        let mut store = AppointmentStore::new(mock_appointments());

        let all = store.list(&ListFilters::default());
        assert_eq!(all.len(), 12);
        assert_eq!(all[0].id, "apt_001");

        let filters = ListFilters {
            date: Some("2024-12-27".into()),
            status: None,
            doctor_name: Some("Dr. Michael Chen".into()),
        };
        let ids: Vec<String> = store.list(&filters).into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["apt_002", "apt_008"]);

        let snapshot = store.list(&ListFilters::default());
        store.update_status("apt_001", "Cancelled").unwrap();
        store.delete("apt_002");
        assert_eq!(snapshot[0].status, AppointmentStatus::Confirmed);
        assert_eq!(snapshot.len(), 12);

        let unknown = ListFilters {
            status: Some("Done".into()),
            ..ListFilters::default()
        };
        assert!(store.list(&unknown).is_empty());
    }

    #[test]
    fn status_update_changes_only_status() {
        let mut store = AppointmentStore::new(mock_appointments());
        let before = store.get_by_id("apt_003").unwrap();
        let after = store.update_status("apt_003", "Confirmed").unwrap();

        assert_eq!(after.status, AppointmentStatus::Confirmed);
        assert_eq!(
            Appointment {
                status: before.status,
                ..after.clone()
            },
            before
        );
        let order: Vec<String> = store
            .list(&ListFilters::default())
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(order[2], "apt_003");
    }

    #[test]
    fn status_update_errors() {
        let mut store = AppointmentStore::new(mock_appointments());
        assert_eq!(
            store.update_status("apt_001", "Done").unwrap_err(),
            AppointmentError::InvalidStatus { value: "Done".into() }
        );
        assert_eq!(
            store.update_status("apt_999", "Confirmed").unwrap_err(),
            AppointmentError::NotFound("apt_999".into())
        );
        // Status is checked before existence.
        assert!(matches!(
            store.update_status("apt_999", "Done"),
            Err(AppointmentError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = AppointmentStore::new(mock_appointments());
        assert!(store.delete("apt_005"));
        assert_eq!(store.len(), 11);
        assert!(!store.delete("apt_005"));
        assert!(!store.delete("apt_missing"));
        assert_eq!(store.len(), 11);
        assert!(store.get_by_id("apt_005").is_err());
    }

    #[test]
    fn uncancelling_does_not_recheck_conflicts() {
        let mut store = AppointmentStore::default();
        let first = store.create(&booking("Alice", "10:00", 60)).unwrap();
        store.update_status(&first.id, "Cancelled").unwrap();
        let second = store.create(&booking("Bob", "10:00", 60)).unwrap();

        let restored = store.update_status(&first.id, "Scheduled").unwrap();
        assert_eq!(restored.status, AppointmentStatus::Scheduled);
        let active = store
            .list(&ListFilters::default())
            .into_iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .count();
        assert_eq!(active, 2);
        assert_eq!(store.get_by_id(&second.id).unwrap().status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn invalid_seed_records_are_skipped() {
        let mut seed = mock_appointments();
        seed[0].duration = u32::MAX;
        seed[1].duration = 0;
        seed[2].patient_name = " R ".into();
        seed[3].doctor_name = "J".into();
        // apt_012 (14:30, 45 min) already exists for Dr. Sarah Johnson on 2024-12-26.
        let mut overlapping = seed[11].clone();
        overlapping.id = "apt_013".into();
        overlapping.time = chrono::NaiveTime::from_hms_opt(15, 0, 0).unwrap();
        seed.push(overlapping);

        let mut store = AppointmentStore::new(seed);
        assert_eq!(store.len(), 8);
        for id in ["apt_001", "apt_002", "apt_003", "apt_004", "apt_013"] {
            assert!(store.get_by_id(id).is_err(), "{id} should have been skipped");
        }

        let mut data = booking("Later Patient", "09:00", 30);
        data.insert("date".into(), json!("2024-12-27"));
        data.insert("doctor_name".into(), json!("Dr. Sarah Johnson"));
        assert!(store.create(&data).is_ok());
    }

    #[test]
    fn cancelled_seed_records_may_overlap() {
        let mut seed = mock_appointments();
        let mut cancelled = seed[11].clone();
        cancelled.id = "apt_013".into();
        cancelled.status = AppointmentStatus::Cancelled;
        seed.push(cancelled);

        let store = AppointmentStore::new(seed);
        assert_eq!(store.len(), 13);
    }

    #[test]
    fn duplicate_seed_ids_keep_the_first() {
        let mut seed = mock_appointments();
        let mut dup = seed[0].clone();
        dup.patient_name = "Someone Else".into();
        seed.push(dup);

        let store = AppointmentStore::new(seed);
        assert_eq!(store.len(), 12);
        assert_eq!(store.get_by_id("apt_001").unwrap().patient_name, "John Smith");
    }
}
