//! API client core for the clinic booking service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! booking operation (event types, slots, booking, cancellation, reschedule,
//! email verification). `BookingApi` wires those builders to a `Transport`
//! and exposes one async method per operation.
//!
//! # Design
//! - `ClientConfig` (base URL, default headers, default timeout) is fixed at
//!   construction and shared read-only.
//! - Each operation is split into `build_*` and `parse_*` on `BookingClient`,
//!   so the I/O boundary is explicit and every request shape is testable
//!   without a network.
//! - Validation happens in `build_*`; a request that fails it is never sent.
//! - No retries, no caching: each facade call dispatches exactly once.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::BookingApi;
pub use client::BookingClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use types::{
    Booking, BookingConfirmation, BookingRequest, CancellationResult, EmailVerificationRequest,
    EventType, EventTypeList, RescheduleRequest, RescheduleResult, Slot, SlotList, SlotQuery,
    VerificationAck, VerificationResult, VerifyEmailCode,
};
