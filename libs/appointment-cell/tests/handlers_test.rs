use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers;
use appointment_cell::models::{PatientAppointmentRequest, StaffAppointmentRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";

fn april_15() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
}

fn patient_request(patient_id: Option<Uuid>) -> PatientAppointmentRequest {
    PatientAppointmentRequest {
        patient_id,
        first_name: "Amali".to_string(),
        last_name: None,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        gender: None,
        marital_state: None,
        phone_number: "0771234567".to_string(),
        alternative_phone_number: None,
        email: None,
        address: None,
        appointment_date: april_15(),
        payment_status: None,
    }
}

#[tokio::test]
async fn create_patient_appointment_answers_created_with_the_booking() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(APPOINTMENTS_PATH))
        .and(query_param("select", "reference_number"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(APPOINTMENTS_PATH))
        .and(body_partial_json(json!({ "reference_number": "1504250001" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_row("1504250001", april_15(), Some(patient_id))
        ])))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_base_url(&mock_server.uri()).to_arc();
    let (status, Json(body)) = handlers::create_patient_appointment(
        State(state),
        Json(patient_request(Some(patient_id))),
    )
    .await
    .expect("handler should succeed");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["reference_number"], json!("1504250001"));
}

#[tokio::test]
async fn create_staff_appointment_with_bad_phone_is_a_bad_request() {
    let state = TestConfig::default().to_arc();

    let request = StaffAppointmentRequest {
        first_name: "Walk-in".to_string(),
        phone_number: "123".to_string(),
        appointment_date: april_15(),
    };

    let result = handlers::create_staff_appointment(State(state), Json(request)).await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn find_by_reference_missing_appointment_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(APPOINTMENTS_PATH))
        .and(query_param("reference_number", "eq.9999990001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_base_url(&mock_server.uri()).to_arc();
    let result =
        handlers::find_by_reference(State(state), Path("9999990001".to_string())).await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn vitals_gate_answers_forbidden_for_walk_in_bookings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(APPOINTMENTS_PATH))
        .and(query_param("reference_number", "eq.1504250002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row("1504250002", april_15(), None)
        ])))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_base_url(&mock_server.uri()).to_arc();
    let result =
        handlers::get_patient_id_by_reference(State(state), Path("1504250002".to_string()))
            .await;

    match result {
        Err(AppError::Forbidden(message)) => assert_eq!(message, "No access to vitals."),
        other => panic!("expected Forbidden, got {:?}", other.map(|Json(v)| v)),
    }
}

#[tokio::test]
async fn vitals_gate_answers_with_the_linked_patient_id() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(APPOINTMENTS_PATH))
        .and(query_param("reference_number", "eq.1504250001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row("1504250001", april_15(), Some(patient_id))
        ])))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_base_url(&mock_server.uri()).to_arc();
    let Json(body) =
        handlers::get_patient_id_by_reference(State(state), Path("1504250001".to_string()))
            .await
            .expect("gate should grant access");

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["patient_id"], json!(patient_id.to_string()));
}

#[tokio::test]
async fn malformed_date_parameter_is_a_bad_request() {
    let state = TestConfig::default().to_arc();

    let result =
        handlers::get_appointments_by_date(State(state), Path("not-a-date".to_string())).await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn day_purge_answers_with_the_deleted_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(APPOINTMENTS_PATH))
        .and(query_param("appointment_date", "eq.2025-04-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row("1504250001", april_15(), None)
        ])))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_base_url(&mock_server.uri()).to_arc();
    let Json(body) =
        handlers::delete_appointments_by_date(State(state), Path("2025-04-15".to_string()))
            .await
            .expect("purge should succeed");

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["deleted_count"], json!(1));
}
