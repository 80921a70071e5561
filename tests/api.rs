use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rollcall::{app::build_app, state::AppState, store::MemoryStore};

fn memory_app() -> Router {
    build_app(AppState::in_memory())
}

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = build_app(AppState::with_store(store.clone()));
    (app, store)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

/// Register and log in; returns the user id.
async fn sign_up(app: &Router, username: &str) -> i64 {
    let (status, _) = post_json(
        app,
        "/register",
        json!({ "username": username, "email": format!("{username}@x.com"), "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        app,
        "/login",
        json!({ "username": username, "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["user"]["id"].as_i64().expect("user id")
}

#[tokio::test]
async fn register_twice_conflicts() {
    let app = memory_app();
    let alice = json!({ "username": "alice", "email": "a@x.com", "password": "p1" });

    let (status, body) = post_json(&app, "/register", alice.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "success": true, "message": "User registered successfully" })
    );

    let (status, body) = post_json(&app, "/register", alice).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Username or email already exists" })
    );
}

#[tokio::test]
async fn register_same_email_other_username_conflicts() {
    let app = memory_app();
    post_json(
        &app,
        "/register",
        json!({ "username": "alice", "email": "a@x.com", "password": "p1" }),
    )
    .await;

    let (status, _) = post_json(
        &app,
        "/register",
        json!({ "username": "alicia", "email": "a@x.com", "password": "p2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_missing_field_is_bad_request() {
    let app = memory_app();
    let (status, body) = post_json(
        &app,
        "/register",
        json!({ "username": "alice", "password": "p1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required fields");
}

#[tokio::test]
async fn malformed_json_gets_json_error() {
    let app = memory_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = memory_app();
    sign_up(&app, "alice").await;

    let wrong_password =
        post_json(&app, "/login", json!({ "username": "alice", "password": "nope" })).await;
    let unknown_user =
        post_json(&app, "/login", json!({ "username": "nobody", "password": "p1" })).await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password.1["message"], "Invalid username or password");
}

#[tokio::test]
async fn login_returns_id_and_username_only() {
    let app = memory_app();
    post_json(
        &app,
        "/register",
        json!({ "username": "alice", "email": "a@x.com", "password": "p1" }),
    )
    .await;

    let (status, body) =
        post_json(&app, "/login", json!({ "username": "alice", "password": "p1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"], json!({ "id": 1, "username": "alice" }));
}

#[tokio::test]
async fn existing_course_code_is_reused() {
    let (app, store) = test_app();
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;

    let (status, first) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101", "user_id": alice }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["message"], "Course added and linked successfully");

    let (status, second) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro to CS", "course_code": "CS101", "user_id": bob.to_string() }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["course_id"], second["course_id"]);
    assert_eq!(store.course_count(), 1);
}

#[tokio::test]
async fn enrolling_twice_is_idempotent() {
    let (app, store) = test_app();
    let alice = sign_up(&app, "alice").await;
    let course = json!({ "course_name": "Intro", "course_code": "CS101", "user_id": alice });

    let (s1, b1) = post_json(&app, "/courses", course.clone()).await;
    let (s2, b2) = post_json(&app, "/courses", course).await;
    assert_eq!(s1, StatusCode::CREATED);
    assert_eq!(s2, StatusCode::CREATED);
    assert_eq!(b1["course_id"], b2["course_id"]);
    assert_eq!(store.enrollment_count(), 1);
}

#[tokio::test]
async fn create_course_validates_input() {
    let app = memory_app();
    let (status, body) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Missing required fields (course_name, course_code, user_id)"
    );

    let (status, body) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101", "user_id": "me" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user_id format");
}

#[tokio::test]
async fn enrolling_unknown_user_is_internal_error() {
    let (app, store) = test_app();
    let (status, body) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101", "user_id": 99 }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Error adding course"));
    assert_eq!(store.course_count(), 0);
}

#[tokio::test]
async fn list_courses_for_user() {
    let app = memory_app();
    let alice = sign_up(&app, "alice").await;

    let (status, body) = get(&app, &format!("/courses?user_id={alice}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["courses"], json!([]));

    post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101", "user_id": alice }),
    )
    .await;
    let (_, body) = get(&app, &format!("/courses?user_id={alice}")).await;
    assert_eq!(
        body["courses"],
        json!([{ "id": 1, "course_code": "CS101", "course_name": "Intro" }])
    );
}

#[tokio::test]
async fn list_courses_rejects_bad_user_id() {
    let app = memory_app();

    let (status, body) = get(&app, "/courses").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing user_id query parameter");

    let (status, body) = get(&app, "/courses?user_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user_id format");
}

#[tokio::test]
async fn attendance_only_once_per_day() {
    let (app, store) = test_app();
    let alice = sign_up(&app, "alice").await;
    let (_, course) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101", "user_id": alice }),
    )
    .await;
    let check_in = json!({ "userId": alice, "courseId": course["course_id"] });

    let (status, body) = post_json(&app, "/mark-attendance", check_in.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Attendance marked successfully" })
    );

    let (status, body) = post_json(&app, "/mark-attendance", check_in).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Attendance already marked for today" })
    );
    assert_eq!(store.attendance_count(), 1);
}

#[tokio::test]
async fn attendance_requires_both_ids() {
    let app = memory_app();
    let (status, body) = post_json(&app, "/mark-attendance", json!({ "userId": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required data");
}

#[tokio::test]
async fn landing_page_and_health() {
    let app = memory_app();

    let res = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "ok" }));
}

#[tokio::test]
async fn non_integer_ids_get_field_messages() {
    let app = memory_app();
    let alice = sign_up(&app, "alice").await;

    let (status, body) = post_json(
        &app,
        "/courses",
        json!({ "course_name": "Intro", "course_code": "CS101", "user_id": 1.5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user_id format");

    let (status, body) = post_json(
        &app,
        "/mark-attendance",
        json!({ "userId": alice, "courseId": true }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Missing required data" })
    );
}
