//! Query service implementations.

pub mod http;

pub use http::HttpQueryService;
