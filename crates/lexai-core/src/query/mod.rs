//! Question-answering service abstraction.
//!
//! `QueryService` is the port the request lifecycle talks to;
//! `BoxQueryService` erases the concrete backend for runtime selection.

pub mod box_service;
pub mod service;
