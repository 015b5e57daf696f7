use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the config at a mock PostgREST server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            supabase_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned PostgREST rows for the appointments table.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    /// A full appointment row as PostgREST would return it. Tests tweak
    /// individual fields on the returned value where needed.
    pub fn appointment_row(
        reference: &str,
        appointment_date: NaiveDate,
        patient_id: Option<Uuid>,
    ) -> Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "reference_number": reference,
            "patient_id": patient_id.map(|id| id.to_string()),
            "first_name": "Test",
            "last_name": "Patient",
            "date_of_birth": "1990-01-01",
            "gender": "female",
            "marital_state": "single",
            "phone_number": "0771234567",
            "alternative_phone_number": null,
            "email": "patient@example.com",
            "address": "12 Clinic Road",
            "appointment_date": appointment_date.to_string(),
            "payment_status": "pay_later",
            "created_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339()
        })
    }

    /// The projected row returned by the allocator's highest-reference query.
    pub fn reference_row(reference: &str) -> Value {
        json!({ "reference_number": reference })
    }
}
