use axum::{extract::State, routing::post, Json, Router};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    attendance::dto::MarkAttendanceRequest,
    error::{ApiError, MessageResponse},
    extract::ApiJson,
    state::AppState,
    store::StoreError,
};

pub fn attendance_routes() -> Router<AppState> {
    Router::new().route("/mark-attendance", post(mark_attendance))
}

#[instrument(skip(state, payload))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MarkAttendanceRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let check_in = payload.validate()?;

    // Server clock decides the day; clients cannot backdate.
    let now = OffsetDateTime::now_utc().to_offset(state.config.utc_offset);
    let (date, time) = (now.date(), now.time().replace_nanosecond(0).unwrap_or(now.time()));

    match state
        .store
        .mark_attendance(check_in.user_id, check_in.course_id, date, time)
        .await
    {
        Ok(record) => {
            info!(
                user_id = record.user_id,
                course_id = record.course_id,
                date = %record.attendance_date,
                time = %record.check_in_time,
                "attendance marked"
            );
            Ok(Json(MessageResponse::ok("Attendance marked successfully")))
        }
        Err(StoreError::AttendanceExists { .. }) => {
            warn!(
                user_id = check_in.user_id,
                course_id = check_in.course_id,
                %date,
                "attendance already marked"
            );
            Err(ApiError::AlreadyMarked)
        }
        Err(e) => Err(ApiError::internal("Error marking attendance", e)),
    }
}
