use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use time::{Date, OffsetDateTime, Time};

use super::{Store, StoreError};
use crate::{
    attendance::repo_types::AttendanceRecord,
    auth::repo_types::{NewUser, User},
    courses::repo_types::{Course, Enrollment},
};

/// In-process `Store` with the same uniqueness rules as the SQL schema.
///
/// A single mutex around all tables makes every call atomic, which stands in
/// for the transaction a database would open.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    courses: BTreeMap<i64, Course>,
    course_by_code: HashMap<String, i64>,
    enrollments: BTreeSet<(i64, i64)>,
    attendance: BTreeMap<(i64, i64, Date), AttendanceRecord>,
    next_user_id: i64,
    next_course_id: i64,
    next_attendance_id: i64,
}

impl Tables {
    fn upsert_course_by_code(&mut self, code: &str, name: &str) -> i64 {
        if let Some(&id) = self.course_by_code.get(code) {
            return id;
        }
        self.next_course_id += 1;
        let id = self.next_course_id;
        self.courses.insert(
            id,
            Course {
                id,
                course_code: code.to_string(),
                course_name: name.to_string(),
            },
        );
        self.course_by_code.insert(code.to_string(), id);
        id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enrollment_count(&self) -> usize {
        self.tables().enrollments.len()
    }

    pub fn course_count(&self) -> usize {
        self.tables().courses.len()
    }

    pub fn attendance_count(&self) -> usize {
        self.tables().attendance.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        let mut t = self.tables();
        let taken = t
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(StoreError::DuplicateUser);
        }

        t.next_user_id += 1;
        let id = t.next_user_id;
        t.users.insert(
            id,
            User {
                id,
                username: user.username,
                email: user.email,
                password: user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            },
        );
        Ok(id)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn enroll_by_code(
        &self,
        user_id: i64,
        course_code: &str,
        course_name: &str,
    ) -> Result<Enrollment, StoreError> {
        let mut t = self.tables();
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        let course_id = t.upsert_course_by_code(course_code, course_name);
        let newly_enrolled = t.enrollments.insert((user_id, course_id));
        Ok(Enrollment {
            course_id,
            newly_enrolled,
        })
    }

    async fn courses_for_user(&self, user_id: i64) -> Result<Vec<Course>, StoreError> {
        let t = self.tables();
        Ok(t.enrollments
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .filter_map(|(_, course_id)| t.courses.get(course_id).cloned())
            .collect())
    }

    async fn mark_attendance(
        &self,
        user_id: i64,
        course_id: i64,
        date: Date,
        time: Time,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut t = self.tables();
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        if !t.courses.contains_key(&course_id) {
            return Err(StoreError::UnknownCourse(course_id));
        }
        let key = (user_id, course_id, date);
        if t.attendance.contains_key(&key) {
            return Err(StoreError::AttendanceExists {
                user_id,
                course_id,
                date,
            });
        }

        t.next_attendance_id += 1;
        let record = AttendanceRecord {
            id: t.next_attendance_id,
            user_id,
            course_id,
            attendance_date: date,
            check_in_time: time,
        };
        t.attendance.insert(key, record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
