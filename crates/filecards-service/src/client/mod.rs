//! Remote API clients.

pub mod http;

pub use http::HttpMoveApi;
