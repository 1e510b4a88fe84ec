use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};
use service::calendar::{self, DaySummary, MonthGrid};
use service::reminders::ScheduledReminder;

use crate::auth::{CurrentUser, ServerState};
use crate::errors::ApiError;

#[derive(Deserialize)]
pub struct ListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub client_id: Option<Uuid>,
    /// Only not-yet-started active appointments, at most this many.
    pub upcoming: Option<usize>,
}

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: AppointmentStatus,
}

#[derive(Deserialize)]
pub struct MonthQuery {
    pub week_start: Option<String>,
}

#[derive(Serialize)]
pub struct DayView {
    pub summary: DaySummary,
    pub appointments: Vec<Appointment>,
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let scope = user.scope(&state);
    let svc = &state.app.appointments;
    let items = match (q.upcoming, q.client_id, q.from, q.to) {
        (Some(limit), _, _, _) => svc.upcoming(&scope, state.app.now_local(), limit).await?,
        (None, Some(client_id), _, _) => svc.list_for_client(&scope, client_id).await?,
        (None, None, Some(from), Some(to)) => svc.list_between(&scope, from, to).await?,
        (None, None, None, None) => svc.list(&scope).await?,
        _ => return Err(ApiError::BadRequest("both `from` and `to` are required".into())),
    };
    Ok(Json(items))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appt = state.app.appointments.create(&user.scope(&state), input).await?;
    Ok((StatusCode::CREATED, Json(appt)))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(state.app.appointments.require(&user.scope(&state), id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(state.app.appointments.update(&user.scope(&state), id, patch).await?))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(state.app.appointments.set_status(&user.scope(&state), id, input.status).await?))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.app.appointments.delete(&user.scope(&state), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(service::ServiceError::not_found("appointment").into())
    }
}

pub async fn day(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DayView>, ApiError> {
    let appointments = state.app.appointments.list_for_day(&user.scope(&state), date).await?;
    let summary = calendar::day_summary(&appointments, date);
    Ok(Json(DayView { summary, appointments }))
}

pub async fn month(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path((year, month)): Path<(i32, u32)>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<MonthGrid>, ApiError> {
    let week_start = match q.week_start.as_deref() {
        None => Weekday::Mon,
        Some(s) => Weekday::from_str(s).map_err(|_| ApiError::BadRequest(format!("invalid week_start: {s}")))?,
    };
    let appointments = state.app.appointments.list(&user.scope(&state)).await?;
    Ok(Json(calendar::month_grid(year, month, week_start, &appointments)?))
}

pub async fn reminders(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<ScheduledReminder>>, ApiError> {
    Ok(Json(state.app.reminders.list(&user.scope(&state)).await?))
}
