//! School-Connect notice service library modules.

pub mod config;
pub mod doc;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::trace::Trace;
