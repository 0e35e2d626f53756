//! Domain primitives, services, and ports.
//!
//! Everything in this module is transport agnostic: inbound adapters (REST,
//! WebSocket) call the services, and outbound adapters (persistence, push)
//! implement the ports.

pub mod auth;
pub mod error;
pub mod notice;
pub mod ports;
pub mod user;

mod auth_service;
mod notice_service;

pub use auth::{AuthToken, CredentialsError, LoginCredentials, PasswordDigest};
pub use auth_service::{AuthService, PASSWORD_MIN};
pub use error::{DomainError, ErrorCode};
pub use notice::{
    Notice, NoticeDraft, NoticeId, NoticeTitle, NoticeUpdate, NoticeValidationError, TITLE_MAX,
};
pub use notice_service::NoticeService;
pub use user::{Batch, Profile, Role, User, UserId, UserValidationError};
