pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentError, PatientAppointmentRequest, RescheduleAppointmentRequest,
    RescheduleDateRequest, StaffAppointmentRequest,
};
pub use router::appointment_routes;
