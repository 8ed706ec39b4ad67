//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, the single signup route)
//!     → request.rs (request ID assigned and propagated)
//!     → relay::SignupRelay::handle
//!     → response.rs (RelayResponse → JSON response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{HttpServer, SIGNUP_PATH};
