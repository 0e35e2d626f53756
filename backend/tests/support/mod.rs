//! Shared harness for integration tests.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! the full-app spawn helper lives here to avoid copy/paste drift. The
//! harness wires the same app shape as `main`, over in-memory stores.

use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};

use backend::Trace;
use backend::domain::ports::{NoopPushGateway, PushTokenRegistry};
use backend::domain::{AuthService, Batch, NoticeService, Profile, Role};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{auth, notices};
use backend::inbound::ws;
use backend::inbound::ws::hub::NoticeHub;
use backend::inbound::ws::state::WsState;
use backend::outbound::persistence::{
    InMemoryNoticeRepository, InMemoryPushTokenRegistry, InMemoryTokenStore, InMemoryUserRepository,
};

/// A running backend bound to an ephemeral port.
pub struct TestBackend {
    pub base_url: String,
    pub notices: Arc<NoticeService>,
    pub auth: Arc<AuthService>,
    handle: ServerHandle,
}

impl TestBackend {
    /// Spawn the full REST + channel surface over in-memory stores.
    pub async fn spawn() -> Self {
        let hub = NoticeHub::new();
        let push_tokens: Arc<dyn PushTokenRegistry> = Arc::new(InMemoryPushTokenRegistry::new());
        let notices_service = Arc::new(NoticeService::new(
            Arc::new(InMemoryNoticeRepository::new()),
            Arc::new(hub.clone()),
            push_tokens.clone(),
            Arc::new(NoopPushGateway),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTokenStore::new()),
        ));

        let http_state = web::Data::new(HttpState::new(
            notices_service.clone(),
            auth_service.clone(),
        ));
        let ws_state = web::Data::new(WsState::new(
            notices_service.clone(),
            auth_service.clone(),
            push_tokens,
            hub,
        ));
        let origins = web::Data::new(ws::AllowedOrigins::default());

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let server = HttpServer::new(move || {
            App::new()
                .app_data(http_state.clone())
                .app_data(ws_state.clone())
                .app_data(origins.clone())
                .wrap(Trace)
                .service(
                    web::scope("/api")
                        .service(notices::list_notices)
                        .service(notices::create_notice)
                        .service(notices::update_notice)
                        .service(notices::delete_notice)
                        .service(auth::register)
                        .service(auth::login),
                )
                .service(ws::ws_entry)
        })
        .listen(listener)
        .expect("bind test server")
        .disable_signals()
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            notices: notices_service,
            auth: auth_service,
            handle,
        }
    }

    /// Register a teacher account and return a bearer token for it.
    pub async fn teacher_token(&self) -> String {
        let profile = Profile {
            name: "Priya Nair".to_owned(),
            age: 34,
            role: Role::Teacher,
            batch: None,
            phone: "555-0101".to_owned(),
            emergency_contact: None,
            address: "4 Staff Lane".to_owned(),
            username: "priya".to_owned(),
            email: "priya@example.edu".to_owned(),
        };
        let (token, _user) = self
            .auth
            .register(profile, "correct horse")
            .await
            .expect("register test teacher");
        token.to_string()
    }

    /// Register a student account and return a bearer token for it.
    pub async fn student_token(&self) -> String {
        let profile = Profile {
            name: "Sam Iyer".to_owned(),
            age: 16,
            role: Role::Student,
            batch: Some(Batch::Morning),
            phone: "555-0102".to_owned(),
            emergency_contact: None,
            address: "9 Hostel Road".to_owned(),
            username: "sam".to_owned(),
            email: "sam@example.edu".to_owned(),
        };
        let (token, _user) = self
            .auth
            .register(profile, "correct horse")
            .await
            .expect("register test student");
        token.to_string()
    }

    /// Stop the server.
    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
