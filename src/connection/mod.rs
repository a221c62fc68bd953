//! Self-healing connections for message-queue service clients
//!
//! A [`ConnectionManager`] owns one client handle built by a
//! [`ClientFactory`]. It builds the client on first use, runs the connect
//! handshake once per build, and rebuilds on any failure, reporting every
//! transition through the [`Logger`](crate::Logger).

pub mod error;
pub mod manager;
pub mod service;
pub mod transport;

pub use error::{BoxError, ConnectionError};
pub use manager::{ClientFactory, ConnectionManager, ConnectionState, ServiceClient};
pub use service::MicroserviceClient;
pub use transport::{RetryPolicy, TransportConfig};
