//! Shared helpers for HTTP handler tests.

use std::sync::Arc;

use actix_web::{App, web};

use crate::domain::ports::{NoopEventPublisher, NoopPushGateway};
use crate::domain::{AuthService, Batch, NoticeService, Profile, Role};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, notices};
use crate::outbound::persistence::{
    InMemoryNoticeRepository, InMemoryPushTokenRegistry, InMemoryTokenStore, InMemoryUserRepository,
};

/// State wired against in-memory adapters and a silent event publisher.
pub fn test_state() -> HttpState {
    let notices = Arc::new(NoticeService::new(
        Arc::new(InMemoryNoticeRepository::new()),
        Arc::new(NoopEventPublisher),
        Arc::new(InMemoryPushTokenRegistry::new()),
        Arc::new(NoopPushGateway),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTokenStore::new()),
    ));
    HttpState::new(notices, auth)
}

/// An app exposing the full `/api` surface over the given state.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api")
            .service(notices::list_notices)
            .service(notices::create_notice)
            .service(notices::update_notice)
            .service(notices::delete_notice)
            .service(auth::register)
            .service(auth::login),
    )
}

/// A profile for the authoring role.
pub fn teacher_profile(username: &str, email: &str) -> Profile {
    Profile {
        name: "Priya Nair".to_owned(),
        age: 34,
        role: Role::Teacher,
        batch: None,
        phone: "555-0101".to_owned(),
        emergency_contact: None,
        address: "4 Staff Lane".to_owned(),
        username: username.to_owned(),
        email: email.to_owned(),
    }
}

/// A student profile, for role-guard tests.
pub fn student_profile(username: &str, email: &str) -> Profile {
    Profile {
        role: Role::Student,
        batch: Some(Batch::Morning),
        ..teacher_profile(username, email)
    }
}

/// Register a teacher and return a bearer token for them.
pub async fn teacher_token(state: &HttpState) -> String {
    let (token, _user) = state
        .auth
        .register(teacher_profile("test-teacher", "teacher@example.edu"), "correct horse")
        .await
        .expect("register test teacher");
    token.to_string()
}
