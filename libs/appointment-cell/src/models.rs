// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booked clinic visit. `reference_number` is the human-readable,
/// date-encoded identifier handed to the patient; `id` is the internal
/// address used for direct updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub reference_number: String,
    pub patient_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub marital_state: Option<MaritalState>,
    pub phone_number: String,
    pub alternative_phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub appointment_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether this booking grants staff access to the patient's vitals.
    /// Walk-in bookings carry no patient link and therefore no access.
    pub fn grants_vitals_access(&self) -> bool {
        self.patient_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    PreferNotToState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaritalState {
    Married,
    Single,
    Widowed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    PayNow,
    PayLater,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::PayLater
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Booking request submitted by a logged-in patient. Carrying `patient_id`
/// links the visit to the patient record and unlocks vitals access for staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAppointmentRequest {
    pub patient_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub marital_state: Option<MaritalState>,
    pub phone_number: String,
    pub alternative_phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub appointment_date: NaiveDate,
    pub payment_status: Option<PaymentStatus>,
}

/// Walk-in / phone booking taken at the front desk. No patient link, no
/// vitals access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAppointmentRequest {
    pub first_name: String,
    pub phone_number: String,
    pub appointment_date: NaiveDate,
}

/// Full reschedule addressed by reference number. Replaces the mutable
/// demographic fields and the appointment date; the reference number itself
/// stays stable so printed receipts remain valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub marital_state: Option<MaritalState>,
    pub phone_number: String,
    pub alternative_phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub appointment_date: NaiveDate,
    pub payment_status: Option<PaymentStatus>,
}

/// Date-only reschedule addressed by internal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleDateRequest {
    pub appointment_date: NaiveDate,
}

// ==============================================================================
// PERSISTENCE PAYLOAD
// ==============================================================================

/// Insert payload for the appointments table. `id`, `created_at` and
/// `updated_at` are generated by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub reference_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_state: Option<MaritalState>,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub appointment_date: NaiveDate,
    pub payment_status: PaymentStatus,
}

impl NewAppointment {
    pub fn from_patient_request(request: PatientAppointmentRequest) -> Self {
        Self {
            reference_number: String::new(),
            patient_id: request.patient_id,
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: Some(request.date_of_birth),
            gender: request.gender,
            marital_state: request.marital_state,
            phone_number: request.phone_number,
            alternative_phone_number: request.alternative_phone_number,
            email: request.email,
            address: request.address,
            appointment_date: request.appointment_date,
            payment_status: request.payment_status.unwrap_or_default(),
        }
    }

    pub fn from_staff_request(request: StaffAppointmentRequest) -> Self {
        Self {
            reference_number: String::new(),
            patient_id: None,
            first_name: request.first_name,
            last_name: None,
            date_of_birth: None,
            gender: None,
            marital_state: None,
            phone_number: request.phone_number,
            alternative_phone_number: None,
            email: None,
            address: None,
            appointment_date: request.appointment_date,
            payment_status: PaymentStatus::default(),
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Reference number already allocated")]
    DuplicateReference,

    #[error("Could not allocate a unique reference number")]
    SchedulingConflict,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
