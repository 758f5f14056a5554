//! HTTP adapter for bot control endpoints.

pub mod transport;

pub use transport::HttpBotTransport;
