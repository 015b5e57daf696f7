// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    AppointmentError, PatientAppointmentRequest, RescheduleAppointmentRequest,
    RescheduleDateRequest, StaffAppointmentRequest,
};
use crate::services::scheduling::AppointmentSchedulingService;

// ==============================================================================
// CREATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_patient_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<PatientAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service
        .create_patient_appointment(request)
        .await
        .map_err(map_appointment_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment
        })),
    ))
}

#[axum::debug_handler]
pub async fn create_staff_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<StaffAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service
        .create_staff_appointment(request)
        .await
        .map_err(map_appointment_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment
        })),
    ))
}

// ==============================================================================
// LISTING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_all_appointments(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointments = service.get_all().await.map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn get_appointments_by_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointments = service
        .get_all_by_patient(patient_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn get_appointments_by_date(
    State(state): State<Arc<AppConfig>>,
    Path(date): Path<String>,
) -> Result<Json<Value>, AppError> {
    let date = parse_date_param(&date)?;
    let service = AppointmentSchedulingService::new(&state);

    let appointments = service
        .get_all_by_date(date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

// ==============================================================================
// REFERENCE NUMBER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn find_by_reference(
    State(state): State<Arc<AppConfig>>,
    Path(ref_no): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service
        .find_by_reference(&ref_no)
        .await
        .map_err(map_appointment_error)?
        .ok_or_else(|| AppError::NotFound("Appointment not found.".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

/// Vitals-access gate: resolves a reference number to the linked patient id.
/// Walk-in bookings have no link and answer 403, not 500 - no access is a
/// normal outcome.
#[axum::debug_handler]
pub async fn get_patient_id_by_reference(
    State(state): State<Arc<AppConfig>>,
    Path(ref_no): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let patient_id = service
        .patient_id_by_reference(&ref_no)
        .await
        .map_err(map_appointment_error)?
        .ok_or_else(|| AppError::Forbidden("No access to vitals.".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "patient_id": patient_id
    })))
}

#[axum::debug_handler]
pub async fn delete_by_reference(
    State(state): State<Arc<AppConfig>>,
    Path(ref_no): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    service
        .delete_by_reference(&ref_no)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully."
    })))
}

#[axum::debug_handler]
pub async fn reschedule_by_reference(
    State(state): State<Arc<AppConfig>>,
    Path(ref_no): Path<String>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let updated = service
        .reschedule_by_reference(&ref_no, request)
        .await
        .map_err(|e| match e {
            AppointmentError::NotFound => AppError::NotFound(
                "Appointment not found or could not be rescheduled.".to_string(),
            ),
            other => map_appointment_error(other),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment successfully rescheduled.",
        "appointment": updated
    })))
}

// ==============================================================================
// DATE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn delete_appointments_by_date(
    State(state): State<Arc<AppConfig>>,
    Path(date): Path<String>,
) -> Result<Json<Value>, AppError> {
    let date = parse_date_param(&date)?;
    let service = AppointmentSchedulingService::new(&state);

    let deleted = service
        .delete_all_by_date(date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointments deleted successfully.",
        "deleted_count": deleted
    })))
}

#[axum::debug_handler]
pub async fn reschedule_by_id(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleDateRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let updated = service
        .reschedule_by_id(id, request.appointment_date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment successfully rescheduled.",
        "appointment": updated
    })))
}

// ==============================================================================
// HELPERS
// ==============================================================================

fn parse_date_param(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

fn map_appointment_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found.".to_string()),
        AppointmentError::ValidationError(msg) => AppError::BadRequest(msg),
        AppointmentError::SchedulingConflict => AppError::Conflict(
            "Could not allocate a reference number, please retry the booking".to_string(),
        ),
        AppointmentError::DuplicateReference => {
            AppError::Conflict("Reference number already allocated".to_string())
        }
        // Driver detail stays in the logs; clients get a stable message.
        AppointmentError::DatabaseError(_) => {
            AppError::Database("Storage request failed".to_string())
        }
    }
}
