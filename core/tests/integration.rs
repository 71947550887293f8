//! Full booking lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every facade
//! operation over real HTTP through `ReqwestTransport`. Validates that request
//! building, dispatch and response parsing agree with the actual server.

use std::time::Duration;

use booking_core::{
    ApiError, BookingApi, BookingConfirmation, BookingRequest, CancellationResult, ClientConfig,
    EventTypeList, RescheduleRequest, RescheduleResult, SlotList, SlotQuery, VerificationAck,
    VerificationResult,
};
use mock_server::Db;
use serde_json::Value;

async fn start_server() -> (String, Db) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let db = mock_server::new_db();
    tokio::spawn(mock_server::run_with_db(listener, db.clone()));
    (format!("http://{addr}"), db)
}

fn api(base_url: &str) -> BookingApi<booking_core::ReqwestTransport> {
    BookingApi::new(ClientConfig::new(base_url).with_timeout(Duration::from_secs(5)))
}

#[tokio::test]
async fn booking_lifecycle() {
    let (base_url, db) = start_server().await;
    let api = api(&base_url);

    // Step 1: event types.
    let events: EventTypeList = api.event_types().await.unwrap();
    assert_eq!(events.status, "success");
    let consultation = events.events.iter().find(|e| e.length == 30).unwrap();
    let event_type_id = consultation.id;

    // Step 2: slots for an empty day.
    let query = SlotQuery::new(event_type_id.to_string(), "2030-01-07");
    let slots: SlotList = api.slots(&query).await.unwrap();
    assert_eq!(slots.duration_minutes, 30);
    assert_eq!(slots.slots.len(), 14);
    let first = slots.slots[0].clone();

    // Step 3: book the first slot.
    let request = BookingRequest {
        event_type_id,
        start: first.start.clone(),
        end: first.end.clone(),
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
    };
    let confirmation: BookingConfirmation = api.book(&request).await.unwrap();
    assert_eq!(confirmation.status, "success");
    assert_eq!(confirmation.booking.start, first.start);
    let uid = confirmation.booking.booking_uid.clone();

    // Step 4: the slot is gone, booking it again conflicts.
    let slots: SlotList = api.slots(&query).await.unwrap();
    assert_eq!(slots.slots.len(), 13);
    let err = api.book::<_, Value>(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 409, .. }));

    // Step 5: legacy availability sees the same booking.
    let legacy: Value = api
        .availability([
            ("event_type_id", event_type_id.to_string()),
            ("date", "2030-01-07".to_string()),
        ])
        .await
        .unwrap();
    assert_eq!(legacy["slots"].as_array().unwrap().len(), 13);

    // Step 6: slots while rescheduling include the booking's own slot.
    let slots: SlotList = api.slots(&query.clone().rescheduling(&uid)).await.unwrap();
    assert_eq!(slots.slots.len(), 14);

    // Step 7: verify the patient's email.
    let ack: VerificationAck = api
        .request_email_verification("asha@example.com")
        .await
        .unwrap();
    assert_eq!(ack.status, "success");
    let err = api
        .verify_email_code::<VerificationResult>("asha@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 400, .. }));
    let code = db.read().await.verification_code("asha@example.com").unwrap();
    let verified: VerificationResult = api
        .verify_email_code("asha@example.com", &code)
        .await
        .unwrap();
    assert!(verified.verified);

    // Step 8: reschedule with the verified code.
    let reschedule = RescheduleRequest {
        start: "2030-01-07T11:00:00+05:30".to_string(),
        rescheduling_reason: Some("Running late".to_string()),
        rescheduled_by: Some("patient".to_string()),
        email_verification_code: Some(code),
    };
    let result: RescheduleResult = api.reschedule_booking(&uid, &reschedule).await.unwrap();
    assert!(result.rescheduled);
    let moved = result.booking.unwrap();
    assert_eq!(moved.start, "2030-01-07T11:00:00+05:30");
    assert_eq!(moved.end, "2030-01-07T11:30:00+05:30");

    // Step 9: cancel.
    let cancelled: CancellationResult = api.cancel_booking(&uid).await.unwrap();
    assert!(cancelled.cancelled);

    // Step 10: cancel again, now NotFound.
    let err = api.cancel_booking::<Value>(&uid).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));

    // Step 11: the day is empty again.
    let slots: SlotList = api.slots(&query).await.unwrap();
    assert_eq!(slots.slots.len(), 14);
}

#[tokio::test]
async fn unknown_event_type_is_not_found() {
    let (base_url, _db) = start_server().await;
    let err = api(&base_url)
        .slots::<SlotList>(&SlotQuery::new("1", "2030-01-07"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api(&format!("http://{addr}"))
        .event_types::<Value>()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }), "{err:?}");
    assert!(err.is_retryable());
}
