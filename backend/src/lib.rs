//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Tracing middleware attaching a per-request trace identifier.
pub use middleware::trace::Trace;
