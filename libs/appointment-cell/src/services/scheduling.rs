// libs/appointment-cell/src/services/scheduling.rs
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, NewAppointment, PatientAppointmentRequest,
    RescheduleAppointmentRequest, StaffAppointmentRequest,
};
use crate::services::reference::ReferenceAllocator;
use crate::services::store::AppointmentStore;

/// Allocation is count-free but not atomic: two concurrent bookings for one
/// date can compute the same suffix. The unique constraint rejects the
/// loser, which re-reads and retries up to this bound.
const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

const MIN_PHONE_DIGITS: usize = 10;
const MIN_ADDRESS_LENGTH: usize = 5;

pub struct AppointmentSchedulingService {
    store: AppointmentStore,
    allocator: ReferenceAllocator,
    email_pattern: Regex,
}

impl AppointmentSchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let store = AppointmentStore::new(Arc::clone(&supabase));
        let allocator = ReferenceAllocator::new(store.clone());

        Self {
            store,
            allocator,
            email_pattern: Regex::new(r"^\S+@\S+\.\S+$").unwrap(),
        }
    }

    // ==========================================================================
    // CREATION
    // ==========================================================================

    /// Book a visit on behalf of a logged-in patient. A supplied
    /// `patient_id` links the record to the patient identity and unlocks
    /// vitals access for the visit.
    pub async fn create_patient_appointment(
        &self,
        request: PatientAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking patient appointment for {} on {}",
            request.first_name, request.appointment_date
        );

        self.validate_contact_fields(
            &request.first_name,
            &request.phone_number,
            request.alternative_phone_number.as_deref(),
            request.email.as_deref(),
            request.address.as_deref(),
        )?;

        let record = NewAppointment::from_patient_request(request);
        self.create_with_reference(record).await
    }

    /// Book a walk-in / phone visit at the front desk. Only name, phone and
    /// date are taken; the record carries no patient link.
    pub async fn create_staff_appointment(
        &self,
        request: StaffAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking staff appointment for {} on {}",
            request.first_name, request.appointment_date
        );

        self.validate_contact_fields(&request.first_name, &request.phone_number, None, None, None)?;

        let record = NewAppointment::from_staff_request(request);
        self.create_with_reference(record).await
    }

    async fn create_with_reference(
        &self,
        mut record: NewAppointment,
    ) -> Result<Appointment, AppointmentError> {
        let date = record.appointment_date;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let reference = self.allocator.next_reference(date).await?;
            record.reference_number = reference.clone();

            match self.store.insert(&record).await {
                Ok(appointment) => {
                    info!(
                        "Appointment {} booked with reference {}",
                        appointment.id, appointment.reference_number
                    );
                    return Ok(appointment);
                }
                Err(AppointmentError::DuplicateReference) => {
                    warn!(
                        "Reference {} lost an allocation race (attempt {}/{})",
                        reference, attempt, MAX_ALLOCATION_ATTEMPTS
                    );
                }
                Err(other) => return Err(other),
            }
        }

        warn!("Reference allocation for {} exhausted retries", date);
        Err(AppointmentError::SchedulingConflict)
    }

    // ==========================================================================
    // LOOKUP
    // ==========================================================================

    pub async fn get_all_by_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching appointments for patient {}", patient_id);
        self.store.find_by_patient(patient_id).await
    }

    pub async fn get_all_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching appointments for {}", date);
        self.store.find_by_date(date).await
    }

    pub async fn get_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching all appointments");
        self.store.find_all().await
    }

    /// Absence is an expected outcome here, so a missing reference is
    /// `Ok(None)` rather than an error.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Appointment>, AppointmentError> {
        debug!("Looking up appointment by reference {}", reference);
        self.store.find_by_reference(reference).await
    }

    /// The vitals-access gate. `Ok(None)` means the reference exists but the
    /// booking carries no patient link (a walk-in) and grants no access;
    /// an unknown reference is `NotFound`.
    pub async fn patient_id_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Uuid>, AppointmentError> {
        let appointment = self
            .store
            .find_by_reference(reference)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        Ok(appointment.patient_id)
    }

    // ==========================================================================
    // MUTATION
    // ==========================================================================

    /// Replace the mutable fields of an appointment addressed by reference
    /// number. The reference number is deliberately preserved: patients hold
    /// it as a printed receipt, so a reschedule must not invalidate it.
    pub async fn reschedule_by_reference(
        &self,
        reference: &str,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!("Rescheduling appointment {}", reference);

        self.validate_contact_fields(
            &request.first_name,
            &request.phone_number,
            request.alternative_phone_number.as_deref(),
            request.email.as_deref(),
            request.address.as_deref(),
        )?;

        let changes = json!({
            "first_name": request.first_name,
            "last_name": request.last_name,
            "date_of_birth": request.date_of_birth,
            "gender": request.gender,
            "marital_state": request.marital_state,
            "phone_number": request.phone_number,
            "alternative_phone_number": request.alternative_phone_number,
            "email": request.email,
            "address": request.address,
            "appointment_date": request.appointment_date,
            "payment_status": request.payment_status.unwrap_or_default(),
        });

        self.store
            .update_by_reference(reference, changes)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Move an appointment to a new date without touching anything else.
    pub async fn reschedule_by_id(
        &self,
        id: Uuid,
        new_date: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        info!("Rescheduling appointment {} to {}", id, new_date);

        self.store
            .update_date_by_id(id, new_date)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    // ==========================================================================
    // DELETION
    // ==========================================================================

    pub async fn delete_by_reference(
        &self,
        reference: &str,
    ) -> Result<Appointment, AppointmentError> {
        info!("Deleting appointment {}", reference);

        self.store
            .delete_by_reference(reference)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// End-of-day sweep: removes every appointment on the given day and
    /// reports how many went. Destructive; there is no soft-delete.
    pub async fn delete_all_by_date(&self, date: NaiveDate) -> Result<u64, AppointmentError> {
        let deleted = self.store.delete_by_date(date).await?;
        info!("Purged {} appointments for {}", deleted, date);
        Ok(deleted)
    }

    // ==========================================================================
    // VALIDATION
    // ==========================================================================

    fn validate_contact_fields(
        &self,
        first_name: &str,
        phone_number: &str,
        alternative_phone_number: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
    ) -> Result<(), AppointmentError> {
        if first_name.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "First name is required".to_string(),
            ));
        }

        self.validate_phone(phone_number, "Phone number")?;

        if let Some(alternative) = alternative_phone_number {
            self.validate_phone(alternative, "Alternative phone number")?;
        }

        if let Some(email) = email {
            if !self.email_pattern.is_match(email) {
                return Err(AppointmentError::ValidationError(
                    "Please enter a valid email address".to_string(),
                ));
            }
        }

        if let Some(address) = address {
            if address.trim().len() < MIN_ADDRESS_LENGTH {
                return Err(AppointmentError::ValidationError(format!(
                    "Address must be at least {} characters",
                    MIN_ADDRESS_LENGTH
                )));
            }
        }

        Ok(())
    }

    fn validate_phone(&self, phone: &str, field: &str) -> Result<(), AppointmentError> {
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < MIN_PHONE_DIGITS {
            return Err(AppointmentError::ValidationError(format!(
                "{} must contain at least {} digits",
                field, MIN_PHONE_DIGITS
            )));
        }
        Ok(())
    }
}
