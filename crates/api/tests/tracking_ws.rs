//! End-to-end live tracking over a real socket.
//!
//! The app is served on an ephemeral port and driven with a
//! `tokio-tungstenite` client. HTTP setup steps go through the same router
//! and state via `oneshot`.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app_with_state, created_id, get_auth, post_json, post_json_auth,
    seed_chain, test_state, token_for,
};
use futures::{SinkExt, StreamExt};
use sqlx::PgPool;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use workout_api::state::AppState;
use workout_api::ws::drain_sessions;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn serve(pool: PgPool) -> (SocketAddr, AppState) {
    let state = test_state(pool);
    let app = build_test_app_with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn ws_url(addr: SocketAddr, room_id: i64, token: &str) -> String {
    format!("ws://{addr}/api/v1/exercise/ws/tracking/{room_id}?token={token}")
}

async fn connect(addr: SocketAddr, room_id: i64, token: &str) -> Client {
    let (client, _response) = connect_async(ws_url(addr, room_id, token))
        .await
        .expect("upgrade should succeed");
    client
}

/// Status code of a refused upgrade.
async fn refused_status(url: String) -> u16 {
    match connect_async(url).await {
        Err(WsError::Http(response)) => response.status().as_u16(),
        Err(other) => panic!("expected HTTP refusal, got {other:?}"),
        Ok(_) => panic!("upgrade should have been refused"),
    }
}

/// Next non-control frame.
async fn next_frame(client: &mut Client) -> WsMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("frame should arrive")
            .expect("stream should be open")
            .expect("frame should be readable");
        if !matches!(frame, WsMessage::Ping(_) | WsMessage::Pong(_)) {
            return frame;
        }
    }
}

async fn next_json(client: &mut Client) -> serde_json::Value {
    match next_frame(client).await {
        WsMessage::Text(text) => serde_json::from_str(&text).expect("frame should be JSON"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn ping(latitude: f64, longitude: f64) -> WsMessage {
    WsMessage::Text(
        serde_json::json!({
            "map_point": { "latitude": latitude, "longitude": longitude },
            "update_tracking_data": false,
        })
        .to_string(),
    )
}

async fn wait_for_empty_hub(state: &AppState) {
    for _ in 0..50 {
        if state.hub.connection_count().await == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("hub still has registered connections");
}

// ---------------------------------------------------------------------------
// Full scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_track_three_points_and_read_back(pool: PgPool) {
    let (addr, state) = serve(pool).await;
    let app = || build_test_app_with_state(state.clone());

    // Register + login.
    let response = post_json(
        app(),
        "/api/v1/users/register",
        serde_json::json!({
            "name": "Una", "age": 28, "username": "una",
            "email": "una@test.com", "password": "long-enough-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app(),
        "/api/v1/login",
        serde_json::json!({ "username": "una", "password": "long-enough-password" }),
    )
    .await;
    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    // Workout -> exercise -> room.
    let workout_id = created_id(
        post_json_auth(
            app(),
            "/api/v1/workout/create",
            serde_json::json!({ "workout_type": "cardio", "duration": 60, "calories": 400 }),
            &token,
        )
        .await,
    )
    .await;
    let exercise_id = created_id(
        post_json_auth(
            app(),
            "/api/v1/exercise/create",
            serde_json::json!({
                "workout_id": workout_id, "name": "Run", "exercise_type": "cardio",
                "duration": 45, "calories": 300,
            }),
            &token,
        )
        .await,
    )
    .await;
    let room_id = created_id(
        post_json_auth(
            app(),
            &format!("/api/v1/exercise/tracking/{exercise_id}"),
            serde_json::json!({ "duration": 45, "description": "test" }),
            &token,
        )
        .await,
    )
    .await;

    // Live session.
    let mut client = connect(addr, room_id, &token).await;
    let started = next_json(&mut client).await;
    assert_eq!(started["status"], true);
    assert_eq!(started["message"], "tracking has started");

    let points = [(40.7128, -74.0060), (40.7130, -74.0055), (40.7135, -74.0049)];
    for (i, (latitude, longitude)) in points.into_iter().enumerate() {
        client.send(ping(latitude, longitude)).await.unwrap();

        let notice = next_json(&mut client).await;
        assert_eq!(notice["message"], "tracking data updated");
        let snapshot = next_json(&mut client).await;
        assert_eq!(snapshot["route"].as_array().unwrap().len(), i + 1);
    }

    client.close(None).await.unwrap();
    wait_for_empty_hub(&state).await;

    // Read back over HTTP.
    let response = get_auth(
        app(),
        &format!("/api/v1/exercise/tracking/list/{exercise_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rooms = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"], room_id);

    let response = get_auth(
        app(),
        &format!("/api/v1/exercise/tracking/room/{room_id}"),
        &token,
    )
    .await;
    let route = body_json(response).await["data"]["route"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(route.len(), 3);
    assert!(route.iter().all(|p| p["tracking_data_id"] == room_id));
    let ids: Vec<i64> = route.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    for (entry, (latitude, longitude)) in route.iter().zip(points) {
        assert_eq!(entry["latitude"], latitude);
        assert_eq!(entry["longitude"], longitude);
    }
}

// ---------------------------------------------------------------------------
// Upgrade refusals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upgrade_without_token_is_unauthorized(pool: PgPool) {
    let a = seed_chain(&pool, "tokenless").await;
    let (addr, state) = serve(pool).await;

    let url = format!("ws://{addr}/api/v1/exercise/ws/tracking/{}", a.room_id);
    assert_eq!(refused_status(url).await, 401);
    assert_eq!(state.hub.connection_count().await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upgrade_on_foreign_room_is_forbidden(pool: PgPool) {
    let a = seed_chain(&pool, "owner").await;
    let b = seed_chain(&pool, "stranger").await;
    let (addr, state) = serve(pool).await;

    let url = ws_url(addr, a.room_id, &token_for(b.user_id));
    assert_eq!(refused_status(url).await, 403);
    assert_eq!(state.hub.connection_count().await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upgrade_on_missing_room_is_not_found(pool: PgPool) {
    let a = seed_chain(&pool, "hopeful").await;
    let (addr, _state) = serve(pool).await;

    let url = ws_url(addr, 987_654, &token_for(a.user_id));
    assert_eq!(refused_status(url).await, 404);
}

// ---------------------------------------------------------------------------
// Session behaviour over the wire
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn binary_frame_closes_the_session(pool: PgPool) {
    let a = seed_chain(&pool, "binary").await;
    let (addr, state) = serve(pool).await;

    let mut client = connect(addr, a.room_id, &token_for(a.user_id)).await;
    assert_eq!(next_json(&mut client).await["message"], "tracking has started");

    client.send(WsMessage::Binary(vec![1, 2, 3])).await.unwrap();

    let stopped = next_json(&mut client).await;
    assert_eq!(stopped["status"], false);
    assert_eq!(stopped["message"], "tracking has stopped");
    assert!(matches!(next_frame(&mut client).await, WsMessage::Close(_)));

    wait_for_empty_hub(&state).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_text_keeps_the_session_open(pool: PgPool) {
    let a = seed_chain(&pool, "typo").await;
    let (addr, _state) = serve(pool).await;

    let mut client = connect(addr, a.room_id, &token_for(a.user_id)).await;
    assert_eq!(next_json(&mut client).await["message"], "tracking has started");

    client
        .send(WsMessage::Text("definitely not json".to_string()))
        .await
        .unwrap();
    let notice = next_json(&mut client).await;
    assert_eq!(notice["status"], false);
    assert_eq!(notice["message"], "tracking data not updated");

    client.send(ping(1.0, 2.0)).await.unwrap();
    assert_eq!(next_json(&mut client).await["message"], "tracking data updated");

    client.close(None).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listeners_on_the_same_room_see_each_others_updates(pool: PgPool) {
    let a = seed_chain(&pool, "pair").await;
    let other = seed_chain(&pool, "elsewhere").await;
    let (addr, _state) = serve(pool).await;
    let token = token_for(a.user_id);

    let mut sender = connect(addr, a.room_id, &token).await;
    assert_eq!(next_json(&mut sender).await["message"], "tracking has started");

    let mut watcher = connect(addr, a.room_id, &token).await;
    assert_eq!(next_json(&mut watcher).await["message"], "tracking has started");
    // The sender hears the watcher arrive.
    assert_eq!(next_json(&mut sender).await["message"], "tracking has started");

    let mut outsider = connect(addr, other.room_id, &token_for(other.user_id)).await;
    assert_eq!(next_json(&mut outsider).await["message"], "tracking has started");

    sender.send(ping(7.0, 8.0)).await.unwrap();

    for client in [&mut sender, &mut watcher] {
        assert_eq!(next_json(client).await["message"], "tracking data updated");
        assert_eq!(next_json(client).await["id"], a.room_id);
    }

    // The outsider's next frame is its own update, not room A's traffic.
    outsider.send(ping(0.5, 0.5)).await.unwrap();
    assert_eq!(next_json(&mut outsider).await["message"], "tracking data updated");
    assert_eq!(next_json(&mut outsider).await["id"], other.room_id);

    sender.close(None).await.unwrap();
    let stopped = next_json(&mut watcher).await;
    assert_eq!(stopped["message"], "tracking has stopped");
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn shutdown_waits_for_live_sessions_to_close(pool: PgPool) {
    let a = seed_chain(&pool, "draining").await;
    let (addr, state) = serve(pool).await;

    let mut client = connect(addr, a.room_id, &token_for(a.user_id)).await;
    assert_eq!(next_json(&mut client).await["message"], "tracking has started");
    assert_eq!(state.sessions.len(), 1);

    let drain = tokio::spawn({
        let state = state.clone();
        async move { drain_sessions(&state.hub, &state.sessions, Duration::from_secs(5)).await }
    });

    // The server's Close reaches the client, which completes the handshake.
    assert!(matches!(next_frame(&mut client).await, WsMessage::Close(_)));
    let _ = client.close(None).await;

    assert!(drain.await.unwrap(), "session should finish within the drain window");
    assert!(state.sessions.is_empty());
    assert_eq!(state.hub.connection_count().await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shutdown_gives_up_on_unresponsive_clients(pool: PgPool) {
    let a = seed_chain(&pool, "silent").await;
    let (addr, state) = serve(pool).await;

    let mut client = connect(addr, a.room_id, &token_for(a.user_id)).await;
    assert_eq!(next_json(&mut client).await["message"], "tracking has started");

    // The client never answers the close handshake.
    let drained = drain_sessions(&state.hub, &state.sessions, Duration::from_millis(200)).await;
    assert!(!drained);
    assert_eq!(state.sessions.len(), 1);

    drop(client);
}
