//! Shared helpers for the API integration tests.
//!
//! Each test binary uses a different subset of these.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio_util::task::TaskTracker;
use tower::ServiceExt;

use workout_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_ACCESS_EXPIRY_MINS};
use workout_api::auth::password::hash_password;
use workout_api::config::ServerConfig;
use workout_api::router::build_app_router;
use workout_api::state::AppState;
use workout_api::ws::TrackingHub;
use workout_core::types::DbId;
use workout_db::models::exercise::CreateExercise;
use workout_db::models::tracking::CreateTrackingData;
use workout_db::models::user::CreateUser;
use workout_db::models::workout::CreateWorkout;
use workout_db::repositories::{ExerciseRepo, TrackingDataRepo, UserRepo, WorkoutRepo};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";
pub const TEST_PASSWORD: &str = "correct-horse-42";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: DEFAULT_ACCESS_EXPIRY_MINS,
        },
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        hub: Arc::new(TrackingHub::new()),
        sessions: TaskTracker::new(),
    }
}

/// The production router and middleware stack over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config())
}

/// Like [`build_test_app`] but over caller-owned state, so a test can
/// inspect the hub afterwards.
pub fn build_test_app_with_state(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Pull `data` out of a 201 create response.
pub async fn created_id(response: Response<Body>) -> DbId {
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], true);
    json["data"].as_i64().expect("data should be the new id")
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

/// Insert a user whose password is [`TEST_PASSWORD`].
pub async fn seed_user(pool: &PgPool, username: &str) -> DbId {
    let input = CreateUser {
        name: format!("{username} name"),
        age: 30,
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
        .id
}

pub async fn seed_workout(pool: &PgPool, user_id: DbId) -> DbId {
    let input = CreateWorkout {
        workout_type: "cardio".to_string(),
        duration: 60,
        calories: 400,
        schedule_date: None,
    };
    WorkoutRepo::create(pool, user_id, &input, Utc::now())
        .await
        .expect("workout creation should succeed")
        .id
}

pub async fn seed_exercise(pool: &PgPool, workout_id: DbId) -> DbId {
    let input = CreateExercise {
        workout_id,
        name: "Run".to_string(),
        exercise_type: "cardio".to_string(),
        duration: 45,
        calories: 300,
    };
    ExerciseRepo::create(pool, &input, Utc::now())
        .await
        .expect("exercise creation should succeed")
        .id
}

pub async fn seed_room(pool: &PgPool, exercise_id: DbId) -> DbId {
    let input = CreateTrackingData {
        duration: 45,
        description: "test".to_string(),
    };
    TrackingDataRepo::create(pool, exercise_id, &input, Utc::now())
        .await
        .expect("room creation should succeed")
        .id
}

/// Ids along one owned chain: user -> workout -> exercise -> room.
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    pub user_id: DbId,
    pub workout_id: DbId,
    pub exercise_id: DbId,
    pub room_id: DbId,
}

pub async fn seed_chain(pool: &PgPool, username: &str) -> Chain {
    let user_id = seed_user(pool, username).await;
    let workout_id = seed_workout(pool, user_id).await;
    let exercise_id = seed_exercise(pool, workout_id).await;
    let room_id = seed_room(pool, exercise_id).await;
    Chain {
        user_id,
        workout_id,
        exercise_id,
        room_id,
    }
}
