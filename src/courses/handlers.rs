use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    courses::dto::{CourseListResponse, CoursesQuery, CreateCourseRequest, CreateCourseResponse},
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

pub fn course_routes() -> Router<AppState> {
    Router::new().route("/courses", get(list_courses).post(create_course))
}

/// POST /courses: create the course if its code is new, then enroll the user.
#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CreateCourseResponse>), ApiError> {
    let req = payload.validate()?;

    let enrollment = state
        .store
        .enroll_by_code(req.user_id, &req.course_code, &req.course_name)
        .await
        .map_err(|e| ApiError::internal("Error adding course", e))?;

    info!(
        user_id = req.user_id,
        course_id = enrollment.course_id,
        course_code = %req.course_code,
        newly_enrolled = enrollment.newly_enrolled,
        "course linked"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateCourseResponse {
            success: true,
            message: "Course added and linked successfully".into(),
            course_id: enrollment.course_id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CoursesQuery>,
) -> Result<Json<CourseListResponse>, ApiError> {
    let user_id = query.user_id()?;

    let courses = state
        .store
        .courses_for_user(user_id)
        .await
        .map_err(|e| ApiError::internal("Error fetching courses", e))?;

    info!(user_id, count = courses.len(), "courses fetched");
    Ok(Json(CourseListResponse {
        success: true,
        message: format!("Found {} courses", courses.len()),
        courses,
    }))
}
