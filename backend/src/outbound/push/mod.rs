//! Outbound push delivery adapters.

mod http_gateway;

pub use http_gateway::HttpPushGateway;
