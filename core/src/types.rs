//! Domain DTOs for the booking API.
//!
//! # Design
//! Request payloads mirror what the backend accepts; result types mirror what
//! it returns today. Parse methods are generic, so callers that prefer to treat
//! a response as opaque can decode into `serde_json::Value` instead. The
//! mock-server crate defines its own copies of these shapes; integration tests
//! catch drift between the two.

use serde::{Deserialize, Serialize};

/// Query for `GET /slots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    pub event_type_id: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Uid of a booking being moved; its current slot is then reported free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_uid_to_reschedule: Option<String>,
}

impl SlotQuery {
    pub fn new(event_type_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            event_type_id: event_type_id.into(),
            date: date.into(),
            booking_uid_to_reschedule: None,
        }
    }

    pub fn rescheduling(mut self, booking_uid: impl Into<String>) -> Self {
        self.booking_uid_to_reschedule = Some(booking_uid.into());
        self
    }
}

/// Payload for `POST /book`, in the backend's field naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub event_type_id: i64,
    pub start: String,
    pub end: String,
    pub name: String,
    pub email: String,
}

/// Payload for `POST /reschedule-booking/{uid}`. Fields left as `None` are
/// omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    /// New start time, ISO 8601.
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduling_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescheduled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_code: Option<String>,
}

impl RescheduleRequest {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVerificationRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyEmailCode {
    pub email: String,
    pub code: String,
}

/// A bookable meeting category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    /// Duration in minutes.
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeList {
    pub status: String,
    pub events: Vec<EventType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: String,
    pub end: String,
}

/// Result of `GET /slots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotList {
    pub status: String,
    pub event_type_id: i64,
    pub date: String,
    pub duration_minutes: u32,
    pub timezone: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_uid: String,
    pub event_type_id: i64,
    pub start: String,
    pub end: String,
    pub name: String,
    pub email: String,
}

/// Result of `POST /book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub status: String,
    #[serde(flatten)]
    pub booking: Booking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationResult {
    pub status: String,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleResult {
    pub status: String,
    pub rescheduled: bool,
    #[serde(default)]
    pub booking: Option<Booking>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationAck {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub status: String,
    pub verified: bool,
}
