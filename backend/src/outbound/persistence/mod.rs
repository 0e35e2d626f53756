//! Outbound persistence adapters.

pub mod memory;
pub mod mongo;

pub use memory::{
    InMemoryNoticeRepository, InMemoryPushTokenRegistry, InMemoryTokenStore, InMemoryUserRepository,
};
pub use mongo::{
    MongoNoticeRepository, MongoPersistence, MongoPushTokenRegistry, MongoTokenStore,
    MongoUserRepository,
};
