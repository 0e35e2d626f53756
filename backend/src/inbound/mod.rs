//! Inbound adapters: REST endpoints and the realtime channel.

pub mod http;
pub mod ws;
