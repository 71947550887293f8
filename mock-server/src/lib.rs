use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

pub mod slots;

use slots::{Interval, Slot, TIMEZONE_NAME};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub length: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub booking_uid: String,
    pub event_type_id: i64,
    pub start: String,
    pub end: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateBooking {
    pub event_type_id: i64,
    pub start: String,
    pub end: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBooking {
    pub start: String,
    #[serde(default = "default_reason")]
    pub rescheduling_reason: String,
    pub rescheduled_by: Option<String>,
    pub email_verification_code: Option<String>,
}

fn default_reason() -> String {
    "User requested reschedule".to_string()
}

#[derive(Deserialize)]
pub struct EmailOnly {
    pub email: String,
}

#[derive(Deserialize)]
pub struct EmailCode {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub event_type_id: i64,
    pub date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotParams {
    pub event_type_id: i64,
    pub date: String,
    pub booking_uid_to_reschedule: Option<String>,
}

#[derive(Clone, Debug)]
struct Verification {
    code: String,
    verified: bool,
}

/// In-memory backend state.
#[derive(Debug)]
pub struct Store {
    event_types: Vec<EventType>,
    bookings: HashMap<String, Booking>,
    verifications: HashMap<String, Verification>,
}

impl Default for Store {
    fn default() -> Self {
        let seed = [
            (4136379, "consultation", "Consultation", 30),
            (4136388, "quick-check", "Quick check", 15),
            (4136397, "follow-up", "Follow-up", 45),
            (4136398, "full-assessment", "Full assessment", 60),
        ];
        Self {
            event_types: seed
                .into_iter()
                .map(|(id, slug, title, length)| EventType {
                    id,
                    slug: slug.to_string(),
                    title: title.to_string(),
                    length,
                })
                .collect(),
            bookings: HashMap::new(),
            verifications: HashMap::new(),
        }
    }
}

impl Store {
    pub fn booking(&self, uid: &str) -> Option<&Booking> {
        self.bookings.get(uid)
    }

    /// Last code issued for `email`, verified or not.
    pub fn verification_code(&self, email: &str) -> Option<String> {
        self.verifications.get(email).map(|v| v.code.clone())
    }

    fn event_type(&self, id: i64) -> Option<&EventType> {
        self.event_types.iter().find(|e| e.id == id)
    }

    fn busy_except(&self, skip: Option<&str>) -> Vec<Interval> {
        self.bookings
            .values()
            .filter(|b| Some(b.booking_uid.as_str()) != skip)
            .filter_map(|b| Some((slots::parse_time(&b.start)?, slots::parse_time(&b.end)?)))
            .collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"status": "error", "message": message})))
}

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Store::default()))
}

pub fn app() -> Router {
    app_with_db(new_db())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/event-types", get(list_event_types))
        .route("/availability", get(availability))
        .route("/slots", get(list_slots))
        .route("/book", post(book))
        .route("/cancel-booking/{uid}", delete(cancel_booking))
        .route("/reschedule-booking/{uid}", post(reschedule_booking))
        .route("/request-email-verification", post(request_email_verification))
        .route("/verify-email-code", post(verify_email_code))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

async fn root() -> Json<Value> {
    Json(json!({"status": "running", "message": "Backend OK"}))
}

async fn list_event_types(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({"status": "success", "events": store.event_types}))
}

/// Duration and free slots for one event type on one day.
async fn open_slots(
    db: &Db,
    event_type_id: i64,
    date: &str,
    reschedule_uid: Option<&str>,
) -> ApiResult<(u32, Vec<Slot>)> {
    let day = slots::parse_date(date)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "date must be YYYY-MM-DD"))?;
    let store = db.read().await;
    let event = store
        .event_type(event_type_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Invalid event type"))?;
    let busy = store.busy_except(reschedule_uid);
    Ok((event.length, slots::generate(day, event.length, &busy)))
}

async fn availability(
    State(db): State<Db>,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<Json<Value>> {
    let (duration, slots) = open_slots(&db, params.event_type_id, &params.date, None).await?;
    Ok(Json(json!({
        "status": "success",
        "event_type_id": params.event_type_id,
        "date": params.date,
        "duration_minutes": duration,
        "timezone": TIMEZONE_NAME,
        "slots": slots,
    })))
}

async fn list_slots(
    State(db): State<Db>,
    Query(params): Query<SlotParams>,
) -> ApiResult<Json<Value>> {
    let (duration, slots) = open_slots(
        &db,
        params.event_type_id,
        &params.date,
        params.booking_uid_to_reschedule.as_deref(),
    )
    .await?;
    Ok(Json(json!({
        "status": "success",
        "eventTypeId": params.event_type_id,
        "date": params.date,
        "durationMinutes": duration,
        "timezone": TIMEZONE_NAME,
        "slots": slots,
    })))
}

async fn book(
    State(db): State<Db>,
    Json(input): Json<CreateBooking>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (Some(start), Some(end)) = (slots::parse_time(&input.start), slots::parse_time(&input.end))
    else {
        return Err(error(StatusCode::UNPROCESSABLE_ENTITY, "start and end must be ISO 8601"));
    };
    if end <= start {
        return Err(error(StatusCode::UNPROCESSABLE_ENTITY, "end must be after start"));
    }

    let mut store = db.write().await;
    if store.event_type(input.event_type_id).is_none() {
        return Err(error(StatusCode::NOT_FOUND, "Invalid event type"));
    }
    if slots::overlaps(start, end, &store.busy_except(None)) {
        return Err(error(StatusCode::CONFLICT, "Slot already booked"));
    }

    let booking = Booking {
        booking_uid: Uuid::new_v4().to_string(),
        event_type_id: input.event_type_id,
        start: start.to_rfc3339(),
        end: end.to_rfc3339(),
        name: input.name,
        email: input.email,
    };
    info!(uid = %booking.booking_uid, start = %booking.start, "booking created");
    store
        .bookings
        .insert(booking.booking_uid.clone(), booking.clone());

    let mut body = json!(booking);
    body["status"] = json!("success");
    Ok((StatusCode::CREATED, Json(body)))
}

async fn cancel_booking(
    State(db): State<Db>,
    Path(uid): Path<String>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .bookings
        .remove(&uid)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Booking not found"))?;
    info!(%uid, "booking cancelled");
    Ok(Json(json!({"status": "success", "cancelled": true})))
}

async fn reschedule_booking(
    State(db): State<Db>,
    Path(uid): Path<String>,
    Json(input): Json<RescheduleBooking>,
) -> ApiResult<Json<Value>> {
    let new_start = slots::parse_time(&input.start)
        .ok_or_else(|| error(StatusCode::UNPROCESSABLE_ENTITY, "start must be ISO 8601"))?;

    let mut store = db.write().await;
    let current = store
        .booking(&uid)
        .cloned()
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Booking not found"))?;

    if let Some(code) = &input.email_verification_code {
        let verified = store
            .verifications
            .get(&current.email)
            .is_some_and(|v| v.verified && &v.code == code);
        if !verified {
            return Err(error(StatusCode::FORBIDDEN, "Email verification required"));
        }
    }

    let (Some(old_start), Some(old_end)) = (
        slots::parse_time(&current.start),
        slots::parse_time(&current.end),
    ) else {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Stored booking is corrupt"));
    };
    let new_end = new_start + (old_end - old_start);
    if slots::overlaps(new_start, new_end, &store.busy_except(Some(&uid))) {
        return Err(error(StatusCode::CONFLICT, "Slot already booked"));
    }

    let updated = Booking {
        start: new_start.to_rfc3339(),
        end: new_end.to_rfc3339(),
        ..current
    };
    info!(
        %uid,
        start = %updated.start,
        reason = %input.rescheduling_reason,
        by = input.rescheduled_by.as_deref().unwrap_or("unknown"),
        "booking rescheduled"
    );
    store.bookings.insert(uid, updated.clone());

    Ok(Json(json!({"status": "success", "rescheduled": true, "booking": updated})))
}

/// Six random digits, zero padded.
fn new_verification_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

async fn request_email_verification(
    State(db): State<Db>,
    Json(input): Json<EmailOnly>,
) -> ApiResult<Json<Value>> {
    let email = input.email.trim().to_string();
    if email.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "email must not be empty"));
    }
    let code = new_verification_code();
    info!(%email, %code, "verification code issued");
    db.write().await.verifications.insert(
        email,
        Verification {
            code,
            verified: false,
        },
    );
    Ok(Json(json!({"status": "success", "message": "Verification code sent"})))
}

async fn verify_email_code(
    State(db): State<Db>,
    Json(input): Json<EmailCode>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    match store.verifications.get_mut(input.email.trim()) {
        Some(v) if v.code == input.code => {
            v.verified = true;
            Ok(Json(json!({"status": "success", "verified": true})))
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": "error",
                "verified": false,
                "message": "Invalid verification code",
            })),
        )),
    }
}
