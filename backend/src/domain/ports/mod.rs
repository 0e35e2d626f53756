//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod event_publisher;
mod notice_repository;
mod push;
mod token_store;
mod user_repository;

pub use event_publisher::{EventPublisher, NoopEventPublisher};
#[cfg(test)]
pub use notice_repository::MockNoticeRepository;
pub use notice_repository::{NoticeRepository, NoticeStoreError};
#[cfg(test)]
pub use push::{MockPushGateway, MockPushTokenRegistry};
pub use push::{
    NoopPushGateway, PushGateway, PushGatewayError, PushMessage, PushRegistryError, PushToken,
    PushTokenRegistry,
};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{TokenStore, TokenStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserStoreError};
