//! HTTP API for the inspection service

mod health;
mod inspection;
mod sse;

pub use health::health_routes;
pub use inspection::inspection_routes;
pub use sse::event_stream;
