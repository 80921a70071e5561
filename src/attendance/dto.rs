use serde::Deserialize;

use crate::{error::ApiError, extract::IdInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub user_id: Option<IdInput>,
    pub course_id: Option<IdInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckIn {
    pub user_id: i64,
    pub course_id: i64,
}

impl MarkAttendanceRequest {
    pub fn validate(self) -> Result<CheckIn, ApiError> {
        let missing = || ApiError::validation("Missing required data");
        let user_id = self.user_id.as_ref().and_then(IdInput::parse).ok_or_else(missing)?;
        let course_id = self.course_id.as_ref().and_then(IdInput::parse).ok_or_else(missing)?;
        Ok(CheckIn { user_id, course_id })
    }
}
