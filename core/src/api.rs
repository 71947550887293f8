//! Async facade over `BookingClient` and a `Transport`.
//!
//! Every method validates and builds one request, dispatches it exactly once
//! and parses the response. There are no retries and no local recovery: any
//! failure is handed back to the caller as an `ApiError`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::client::BookingClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{RescheduleRequest, SlotQuery};

#[cfg(feature = "reqwest")]
use crate::transport::ReqwestTransport;

/// Booking API bound to one configuration and one transport.
///
/// Cheap to share: wrap it in an `Arc` or clone it when the transport is
/// `Clone`. Result types are chosen by the caller, e.g.
/// `api.slots::<SlotList>(&query)` or `api.event_types::<serde_json::Value>()`.
#[derive(Debug, Clone)]
pub struct BookingApi<T> {
    client: BookingClient,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl BookingApi<ReqwestTransport> {
    /// Facade over a fresh `ReqwestTransport`.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> BookingApi<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: BookingClient::with_config(config),
            transport,
        }
    }

    /// The underlying request builder, for callers that want to adjust a
    /// request (e.g. its timeout) before passing it to `execute`.
    pub fn client(&self) -> &BookingClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch a prepared request without interpreting the response.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.send(request).await
    }

    #[instrument(skip(self))]
    pub async fn event_types<R: DeserializeOwned>(&self) -> Result<R, ApiError> {
        let request = self.client.build_event_types();
        let response = self.execute(request).await?;
        self.client.parse_event_types(response)
    }

    /// Legacy `/availability` lookup; see `slots` for the canonical form.
    #[instrument(skip(self, params))]
    pub async fn availability<R, I, K, V>(&self, params: I) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        I: IntoIterator<Item = (K, V)> + Send,
        K: Into<String>,
        V: Into<String>,
    {
        let request = self.client.build_availability(params);
        let response = self.execute(request).await?;
        self.client.parse_availability(response)
    }

    #[instrument(skip(self, query), fields(event_type_id = %query.event_type_id, date = %query.date))]
    pub async fn slots<R: DeserializeOwned>(&self, query: &SlotQuery) -> Result<R, ApiError> {
        let request = self.client.build_slots(query)?;
        let response = self.execute(request).await?;
        self.client.parse_slots(response)
    }

    #[instrument(skip_all)]
    pub async fn book<P, R>(&self, payload: &P) -> Result<R, ApiError>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.build_book(payload)?;
        let response = self.execute(request).await?;
        self.client.parse_book(response)
    }

    #[instrument(skip(self))]
    pub async fn cancel_booking<R: DeserializeOwned>(&self, booking_uid: &str) -> Result<R, ApiError> {
        let request = self.client.build_cancel_booking(booking_uid)?;
        let response = self.execute(request).await?;
        self.client.parse_cancel_booking(response)
    }

    #[instrument(skip(self, input))]
    pub async fn reschedule_booking<R: DeserializeOwned>(
        &self,
        booking_uid: &str,
        input: &RescheduleRequest,
    ) -> Result<R, ApiError> {
        let request = self.client.build_reschedule_booking(booking_uid, input)?;
        let response = self.execute(request).await?;
        self.client.parse_reschedule_booking(response)
    }

    #[instrument(skip_all)]
    pub async fn request_email_verification<R: DeserializeOwned>(&self, email: &str) -> Result<R, ApiError> {
        let request = self.client.build_request_email_verification(email)?;
        let response = self.execute(request).await?;
        self.client.parse_request_email_verification(response)
    }

    #[instrument(skip_all)]
    pub async fn verify_email_code<R: DeserializeOwned>(
        &self,
        email: &str,
        code: &str,
    ) -> Result<R, ApiError> {
        let request = self.client.build_verify_email_code(email, code)?;
        let response = self.execute(request).await?;
        self.client.parse_verify_email_code(response)
    }
}
