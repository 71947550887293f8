//! Stateless HTTP request builder and response parser for the booking API.
//!
//! # Design
//! `BookingClient` holds only the immutable `ClientConfig` and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that validates its arguments and produces an `HttpRequest`, and a
//! `parse_*` method that consumes an `HttpResponse`. `BookingApi` glues the two
//! together around a `Transport`; callers that want to own the I/O can use
//! this type directly.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use urlencoding::encode;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{EmailVerificationRequest, RescheduleRequest, SlotQuery, VerifyEmailCode};

/// Synchronous, stateless client for the booking API.
#[derive(Debug, Clone)]
pub struct BookingClient {
    config: ClientConfig,
}

impl BookingClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_event_types(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/event-types", Vec::new(), None)
    }

    /// Legacy availability lookup. The query mapping is forwarded verbatim;
    /// prefer `build_slots`, which checks its fields before dispatch.
    pub fn build_availability<I, K, V>(&self, params: I) -> HttpRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let query = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.request(HttpMethod::Get, "/availability", query, None)
    }

    pub fn build_slots(&self, query: &SlotQuery) -> Result<HttpRequest, ApiError> {
        require("eventTypeId", &query.event_type_id)?;
        validate_date(&query.date)?;

        let mut params = vec![
            ("eventTypeId".to_string(), query.event_type_id.clone()),
            ("date".to_string(), query.date.clone()),
        ];
        if let Some(uid) = &query.booking_uid_to_reschedule {
            require("bookingUidToReschedule", uid)?;
            params.push(("bookingUidToReschedule".to_string(), uid.clone()));
        }
        Ok(self.request(HttpMethod::Get, "/slots", params, None))
    }

    /// The payload is forwarded as-is; any serializable value is accepted.
    pub fn build_book<P>(&self, payload: &P) -> Result<HttpRequest, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let body = to_json(payload)?;
        Ok(self.request(HttpMethod::Post, "/book", Vec::new(), Some(body)))
    }

    pub fn build_cancel_booking(&self, booking_uid: &str) -> Result<HttpRequest, ApiError> {
        require("bookingUid", booking_uid)?;
        let path = format!("/cancel-booking/{}", encode(booking_uid));
        Ok(self.request(HttpMethod::Delete, &path, Vec::new(), None))
    }

    pub fn build_reschedule_booking(
        &self,
        booking_uid: &str,
        input: &RescheduleRequest,
    ) -> Result<HttpRequest, ApiError> {
        require("bookingUid", booking_uid)?;
        require("start", &input.start)?;
        let body = to_json(input)?;
        let path = format!("/reschedule-booking/{}", encode(booking_uid));
        Ok(self.request(HttpMethod::Post, &path, Vec::new(), Some(body)))
    }

    pub fn build_request_email_verification(&self, email: &str) -> Result<HttpRequest, ApiError> {
        require("email", email)?;
        let body = to_json(&EmailVerificationRequest {
            email: email.to_string(),
        })?;
        Ok(self.request(
            HttpMethod::Post,
            "/request-email-verification",
            Vec::new(),
            Some(body),
        ))
    }

    pub fn build_verify_email_code(&self, email: &str, code: &str) -> Result<HttpRequest, ApiError> {
        require("email", email)?;
        require("code", code)?;
        let body = to_json(&VerifyEmailCode {
            email: email.to_string(),
            code: code.to_string(),
        })?;
        Ok(self.request(HttpMethod::Post, "/verify-email-code", Vec::new(), Some(body)))
    }

    pub fn parse_event_types<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_availability<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_slots<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_book<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_cancel_booking<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_reschedule_booking<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_request_email_verification<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        parse_json(response)
    }

    pub fn parse_verify_email_code<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<T, ApiError> {
        parse_json(response)
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = self.config.default_headers.clone();
        if body.is_some() && !headers.iter().any(|(name, _)| name == "content-type") {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        let request = HttpRequest {
            method,
            path: format!("{}{path}", self.config.base_url),
            query,
            headers,
            body,
            timeout: self.config.timeout,
        };
        debug!(method = %request.method, url = %request.url(), "built request");
        request
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Strict `YYYY-MM-DD`: chrono alone accepts signs, padding and short fields.
fn validate_date(date: &str) -> Result<(), ApiError> {
    let shaped = date.len() == 10
        && date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    let well_formed = shaped && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();
    if !well_formed {
        return Err(ApiError::Validation(format!(
            "date must be YYYY-MM-DD, got {date:?}"
        )));
    }
    Ok(())
}

fn to_json<P: Serialize + ?Sized>(payload: &P) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            body: response.body.clone(),
        });
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
