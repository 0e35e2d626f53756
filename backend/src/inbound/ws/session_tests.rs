//! WebSocket session handler tests.

use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, http::header, web};
use awc::ws::{Codec, Frame, Message as WsMessage};
use awc::BoxedSocket;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};

use super::CLIENT_TIMEOUT;
use crate::domain::ports::{NoopPushGateway, PushTokenRegistry};
use crate::domain::{AuthService, NoticeService, Profile, Role};
use crate::inbound::ws;
use crate::inbound::ws::hub::NoticeHub;
use crate::inbound::ws::state::WsState;
use crate::outbound::persistence::{
    InMemoryNoticeRepository, InMemoryPushTokenRegistry, InMemoryTokenStore, InMemoryUserRepository,
};

type TestSocket = actix_codec::Framed<BoxedSocket, Codec>;

fn teacher_profile() -> Profile {
    Profile {
        name: "Priya Nair".to_owned(),
        age: 34,
        role: Role::Teacher,
        batch: None,
        phone: "555-0101".to_owned(),
        emergency_contact: None,
        address: "4 Staff Lane".to_owned(),
        username: "priya".to_owned(),
        email: "priya@example.edu".to_owned(),
    }
}

async fn start_server() -> (String, ServerHandle, WsState) {
    let hub = NoticeHub::new();
    let push_tokens: Arc<dyn PushTokenRegistry> = Arc::new(InMemoryPushTokenRegistry::new());
    let notices = Arc::new(NoticeService::new(
        Arc::new(InMemoryNoticeRepository::new()),
        Arc::new(hub.clone()),
        push_tokens.clone(),
        Arc::new(NoopPushGateway),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTokenStore::new()),
    ));
    let state = WsState::new(notices, auth, push_tokens, hub);

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let app_state = web::Data::new(state.clone());
    let origins = web::Data::new(ws::AllowedOrigins::default());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(origins.clone())
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{addr}"), handle, state)
}

async fn connect(url: &str, token: Option<&str>) -> TestSocket {
    let mut request = awc::Client::default()
        .ws(format!("{url}/ws"))
        .set_header(header::ORIGIN, "http://localhost:8081");
    if let Some(token) = token {
        request = request.set_header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let (_resp, socket) = request.connect().await.expect("websocket connect");
    socket
}

/// Next text frame, answering server pings along the way.
async fn next_text_frame(socket: &mut TestSocket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => {
                return serde_json::from_slice(&bytes).expect("json frame");
            }
            Frame::Ping(payload) => {
                socket
                    .send(WsMessage::Pong(payload))
                    .await
                    .expect("send pong");
            }
            Frame::Pong(_) => {}
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

async fn send_json(socket: &mut TestSocket, value: Value) {
    socket
        .send(WsMessage::Text(value.to_string().into()))
        .await
        .expect("send text");
}

fn draft_json() -> Value {
    json!({
        "title": "Exam",
        "notice": "Hall 3",
        "date": "2024-09-20T00:00:00Z",
        "time": "9:00 AM",
        "user": "u1"
    })
}

#[actix_rt::test]
async fn fetch_notices_answers_with_the_full_board() {
    let (url, _handle, state) = start_server().await;
    state
        .notices
        .create(serde_json::from_value(draft_json()).expect("draft parses"))
        .await
        .expect("seed notice");

    let mut socket = connect(&url, None).await;
    send_json(&mut socket, json!({ "event": "fetch_notices" })).await;

    let value = next_text_frame(&mut socket).await;
    assert_eq!(value.get("event").and_then(Value::as_str), Some("notices"));
    let data = value.get("data").and_then(Value::as_array).expect("array");
    assert_eq!(data.len(), 1);
    assert_eq!(
        data[0].get("title").and_then(Value::as_str),
        Some("Exam")
    );
}

#[actix_rt::test]
async fn teacher_mutations_broadcast_to_every_connected_client() {
    let (url, _handle, state) = start_server().await;
    let (token, _user) = state
        .auth
        .register(teacher_profile(), "correct horse")
        .await
        .expect("register teacher");

    let mut teacher = connect(&url, Some(token.as_ref())).await;
    let mut observer = connect(&url, None).await;

    send_json(
        &mut teacher,
        json!({ "event": "add_notice", "data": draft_json() }),
    )
    .await;

    // Both channels receive the broadcast, the observer included.
    let event = next_text_frame(&mut observer).await;
    assert_eq!(
        event.get("event").and_then(Value::as_str),
        Some("notice_added")
    );
    assert_eq!(
        event.pointer("/data/title").and_then(Value::as_str),
        Some("Exam")
    );
    let echoed = next_text_frame(&mut teacher).await;
    assert_eq!(
        echoed.get("event").and_then(Value::as_str),
        Some("notice_added")
    );

    let stored = state.notices.list().await.expect("list");
    assert_eq!(stored.len(), 1);
    assert_eq!(
        event.pointer("/data/id").and_then(Value::as_str),
        Some(stored[0].id.as_str())
    );
}

#[actix_rt::test]
async fn unauthenticated_mutations_are_dropped_silently() {
    let (url, _handle, state) = start_server().await;
    let mut socket = connect(&url, None).await;

    send_json(
        &mut socket,
        json!({ "event": "add_notice", "data": draft_json() }),
    )
    .await;
    send_json(&mut socket, json!({ "event": "fetch_notices" })).await;

    // Commands are handled sequentially, so the board answer proves the
    // mutation was dropped rather than still in flight.
    let value = next_text_frame(&mut socket).await;
    assert_eq!(value.get("event").and_then(Value::as_str), Some("notices"));
    assert_eq!(
        value.get("data").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
    assert!(state.notices.list().await.expect("list").is_empty());
}

#[actix_rt::test]
async fn register_push_token_records_the_device() {
    let (url, _handle, state) = start_server().await;
    let mut socket = connect(&url, None).await;

    send_json(
        &mut socket,
        json!({ "event": "register_push_token", "data": "ExponentPushToken[abc]" }),
    )
    .await;
    send_json(&mut socket, json!({ "event": "fetch_notices" })).await;
    next_text_frame(&mut socket).await;

    let tokens = state.push_tokens.all().await.expect("registry");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].as_ref(), "ExponentPushToken[abc]");
}

#[actix_rt::test]
async fn malformed_json_closes_with_policy_code() {
    let (url, _handle, _state) = start_server().await;
    let mut socket = connect(&url, None).await;

    socket
        .send(WsMessage::Text("not-json".into()))
        .await
        .expect("send text");

    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Close(reason) => {
                assert_eq!(
                    reason.expect("close reason").code,
                    actix_ws::CloseCode::Policy
                );
                break;
            }
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected close frame, got {other:?}"),
        }
    }
}

#[actix_rt::test]
async fn idle_clients_are_disconnected_after_the_timeout() {
    let (url, _handle, _state) = start_server().await;
    let mut socket = connect(&url, None).await;

    tokio::time::sleep(CLIENT_TIMEOUT * 3).await;

    let observed = tokio::time::timeout(std::time::Duration::from_secs(2), async {
        loop {
            match socket.next().await.expect("frame").expect("frame") {
                Frame::Ping(_) | Frame::Pong(_) => continue,
                Frame::Close(reason) => break reason,
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
    })
    .await
    .expect("close frame within timeout")
    .expect("close carries a reason");

    assert_eq!(observed.code, actix_ws::CloseCode::Normal);
    assert_eq!(observed.description.as_deref(), Some("heartbeat timeout"));
}
