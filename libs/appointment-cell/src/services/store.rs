// libs/appointment-cell/src/services/store.rs
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_database::{DbError, SupabaseClient};

use crate::models::{Appointment, AppointmentError, NewAppointment};

const TABLE_PATH: &str = "/rest/v1/appointments";
const RETURN_ROWS: Option<&str> = Some("return=representation");

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    reference_number: String,
}

/// Typed access to the appointments table. The table enforces a UNIQUE
/// constraint on `reference_number`; a violated insert comes back as
/// `AppointmentError::DuplicateReference` so the caller can re-allocate.
#[derive(Clone)]
pub struct AppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl AppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn insert(&self, record: &NewAppointment) -> Result<Appointment, AppointmentError> {
        debug!("Inserting appointment {}", record.reference_number);

        let body = serde_json::to_value(record)
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::POST, TABLE_PATH, Some(body), RETURN_ROWS)
            .await
            .map_err(map_db_error)?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppointmentError::DatabaseError("insert returned no rows".to_string()))
    }

    /// Highest reference number already stored for a calendar date, if any.
    /// References share the date prefix, so lexicographic order matches
    /// numeric suffix order.
    pub async fn highest_reference_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<String>, AppointmentError> {
        let path = format!(
            "{}?appointment_date=eq.{}&select=reference_number&order=reference_number.desc&limit=1",
            TABLE_PATH, date
        );

        let rows: Vec<ReferenceRow> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().next().map(|row| row.reference_number))
    }

    pub async fn find_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "{}?patient_id=eq.{}&order=created_at.asc",
            TABLE_PATH, patient_id
        );

        self.supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(map_db_error)
    }

    /// All appointments on a calendar day. `appointment_date` is stored
    /// date-only, so a day query is a plain equality filter.
    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "{}?appointment_date=eq.{}&order=reference_number.asc",
            TABLE_PATH, date
        );

        self.supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(map_db_error)
    }

    pub async fn find_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!("{}?order=appointment_date.asc", TABLE_PATH);

        self.supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(map_db_error)
    }

    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("{}?reference_number=eq.{}", TABLE_PATH, reference);

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().next())
    }

    pub async fn update_by_reference(
        &self,
        reference: &str,
        changes: Value,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("{}?reference_number=eq.{}", TABLE_PATH, reference);

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::PATCH, &path, Some(changes), RETURN_ROWS)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().next())
    }

    pub async fn update_date_by_id(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("{}?id=eq.{}", TABLE_PATH, id);
        let changes = serde_json::json!({ "appointment_date": date });

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::PATCH, &path, Some(changes), RETURN_ROWS)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().next())
    }

    pub async fn delete_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("{}?reference_number=eq.{}", TABLE_PATH, reference);

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::DELETE, &path, None, RETURN_ROWS)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().next())
    }

    /// End-of-day purge. Returns how many rows were removed; zero is a
    /// normal outcome for a quiet day.
    pub async fn delete_by_date(&self, date: NaiveDate) -> Result<u64, AppointmentError> {
        let path = format!("{}?appointment_date=eq.{}", TABLE_PATH, date);

        let rows: Vec<Appointment> = self
            .supabase
            .request(Method::DELETE, &path, None, RETURN_ROWS)
            .await
            .map_err(map_db_error)?;

        Ok(rows.len() as u64)
    }
}

fn map_db_error(error: DbError) -> AppointmentError {
    match error {
        DbError::Conflict(_) => AppointmentError::DuplicateReference,
        other => AppointmentError::DatabaseError(other.to_string()),
    }
}
