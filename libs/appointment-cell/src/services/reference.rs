// libs/appointment-cell/src/services/reference.rs
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::models::AppointmentError;
use crate::services::store::AppointmentStore;

/// `DDMMYY` date prefix plus a 4-digit per-day sequence.
pub const REFERENCE_LENGTH: usize = 10;

const SEQUENCE_DIGITS: usize = 4;
const MAX_SEQUENCE: u32 = 9999;

/// Allocates date-encoded sequential reference numbers, e.g. the first
/// booking for 2025-04-15 gets `1504250001`.
///
/// The next suffix is derived from the highest one already stored for the
/// date, not from a row count: deletions then leave gaps instead of causing
/// an already-issued suffix to be handed out again. Concurrent allocations
/// can still collide; the store's unique constraint turns the loser into a
/// `DuplicateReference` error and the caller re-allocates.
pub struct ReferenceAllocator {
    store: AppointmentStore,
}

impl ReferenceAllocator {
    pub fn new(store: AppointmentStore) -> Self {
        Self { store }
    }

    pub async fn next_reference(&self, date: NaiveDate) -> Result<String, AppointmentError> {
        let highest = self.store.highest_reference_for_date(date).await?;
        let sequence = next_sequence(highest.as_deref());

        if sequence > MAX_SEQUENCE {
            // The 4-digit suffix caps same-day volume at 9999; past that the
            // reference grows a digit and stops sorting lexicographically.
            warn!(
                "Daily sequence for {} exceeded {}, reference format overflow",
                date, MAX_SEQUENCE
            );
        }

        let reference = format_reference(date, sequence);
        debug!("Allocated reference {} for {}", reference, date);
        Ok(reference)
    }
}

pub fn format_reference(date: NaiveDate, sequence: u32) -> String {
    format!(
        "{:02}{:02}{:02}{:04}",
        date.day(),
        date.month(),
        date.year().rem_euclid(100),
        sequence
    )
}

/// Numeric suffix of a well-formed reference number.
pub fn parse_sequence(reference: &str) -> Option<u32> {
    if reference.len() < REFERENCE_LENGTH {
        return None;
    }
    reference
        .get(REFERENCE_LENGTH - SEQUENCE_DIGITS..)?
        .parse()
        .ok()
}

fn next_sequence(highest: Option<&str>) -> u32 {
    highest
        .and_then(parse_sequence)
        .map(|sequence| sequence + 1)
        .unwrap_or(1)
}
