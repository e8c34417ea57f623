//! Core traits for service lifecycles.

mod service;

pub use service::ServiceBase;
