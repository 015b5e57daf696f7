// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        // Booking
        .route(
            "/patientAppointments",
            post(handlers::create_patient_appointment),
        )
        .route(
            "/doctorAppointments",
            post(handlers::create_staff_appointment).get(handlers::get_all_appointments),
        )
        // Listings
        .route(
            "/patient/{patient_id}",
            get(handlers::get_appointments_by_patient),
        )
        .route(
            "/date/{date}",
            get(handlers::get_appointments_by_date)
                .delete(handlers::delete_appointments_by_date),
        )
        // Reference number operations
        .route(
            "/refNo/{ref_no}",
            get(handlers::find_by_reference)
                .delete(handlers::delete_by_reference)
                .put(handlers::reschedule_by_reference),
        )
        .route(
            "/patientIdByRefNo/{ref_no}",
            get(handlers::get_patient_id_by_reference),
        )
        // Date-only reschedule by internal id
        .route("/reschedule/{id}", post(handlers::reschedule_by_id))
        .with_state(state)
}
