//! Sign-up relay library.
//!
//! Forwards sign-up form submissions to an upstream webhook and mirrors the
//! upstream's answer back to the caller.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::SignupRelay;
