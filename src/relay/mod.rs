//! Sign-up forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! inbound (method, body)
//!     → forward.rs (method gate, POST to upstream raced against deadline)
//!     → envelope.rs (opportunistic JSON parse, or { raw } / error envelope)
//!     → RelayResponse (status + JSON body) handed back to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - No retries: one inbound request produces at most one upstream call
//! - Upstream status is mirrored verbatim, including 4xx/5xx
//! - Every transport failure collapses into a single 502 envelope

pub mod envelope;
pub mod error;
pub mod forward;

pub use envelope::{InboundBody, RelayResponse, UpstreamReply};
pub use error::RelayError;
pub use forward::SignupRelay;
