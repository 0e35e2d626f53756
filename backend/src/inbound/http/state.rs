//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain services and stay testable with in-memory adapters.

use std::sync::Arc;

use crate::domain::{AuthService, NoticeService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notices: Arc<NoticeService>,
    pub auth: Arc<AuthService>,
}

impl HttpState {
    /// Construct state from the domain services.
    pub fn new(notices: Arc<NoticeService>, auth: Arc<AuthService>) -> Self {
        Self { notices, auth }
    }
}
