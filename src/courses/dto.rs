use serde::{Deserialize, Serialize};

use crate::{
    courses::repo_types::Course,
    error::ApiError,
    extract::{present, IdInput},
};

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub course_name: Option<String>,
    pub course_code: Option<String>,
    pub user_id: Option<IdInput>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NewEnrollment {
    pub user_id: i64,
    pub course_code: String,
    pub course_name: String,
}

impl CreateCourseRequest {
    pub fn validate(self) -> Result<NewEnrollment, ApiError> {
        let (Some(course_name), Some(course_code), Some(user_id)) =
            (present(self.course_name), present(self.course_code), self.user_id)
        else {
            return Err(ApiError::validation(
                "Missing required fields (course_name, course_code, user_id)",
            ));
        };
        let user_id = user_id
            .parse()
            .ok_or_else(|| ApiError::validation("Invalid user_id format"))?;
        Ok(NewEnrollment {
            user_id,
            course_code,
            course_name,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCourseResponse {
    pub success: bool,
    pub message: String,
    pub course_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CoursesQuery {
    pub user_id: Option<String>,
}

impl CoursesQuery {
    pub fn user_id(&self) -> Result<i64, ApiError> {
        let raw = self
            .user_id
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ApiError::validation("Missing user_id query parameter"))?;
        raw.trim()
            .parse()
            .map_err(|_| ApiError::validation("Invalid user_id format"))
    }
}

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub success: bool,
    pub message: String,
    pub courses: Vec<Course>,
}
