//! Connection lifecycle state machine
//!
//! ```text
//!            build ok                 handshake ok
//! Unbuilt ───────────▶ Connected* ──────────────▶ Connected
//!    ▲                    │  handshake / use failure
//!    │ build failed       ▼
//!    └────────────── NeedsRebuild ──▶ rebuild
//! ```
//!
//! `Connected*` is the optimistic state right after a build: the handle exists
//! but the connect handshake has not run yet.

use super::error::{BoxError, ConnectionError};
use super::transport::{RetryPolicy, TransportConfig};
use crate::core::Logger;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No client handle exists
    Unbuilt,
    /// A handle exists and is believed usable
    Connected,
    /// The handle failed and must be rebuilt before the next use
    NeedsRebuild,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Unbuilt => "unbuilt",
            ConnectionState::Connected => "connected",
            ConnectionState::NeedsRebuild => "needs-rebuild",
        };
        f.write_str(name)
    }
}

/// A message-queue client handle
#[async_trait]
pub trait ServiceClient: Send + Sync + 'static {
    /// Explicit connect handshake, run once after every (re)build
    async fn connect(&self) -> Result<(), BoxError>;
}

/// Builds client handles for one service
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use rust_service_logger::connection::{BoxError, ClientFactory, ServiceClient, TransportConfig};
///
/// struct QueueClient {
///     address: String,
/// }
///
/// #[async_trait]
/// impl ServiceClient for QueueClient {
///     async fn connect(&self) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
///
/// struct Billing;
///
/// #[async_trait]
/// impl ClientFactory for Billing {
///     type Client = QueueClient;
///
///     fn service_name(&self) -> &str {
///         "billing"
///     }
///
///     fn app_name(&self) -> &str {
///         "storefront"
///     }
///
///     async fn build_client(&self, transport: &TransportConfig) -> Result<QueueClient, BoxError> {
///         Ok(QueueClient { address: transport.address() })
///     }
/// }
/// ```
#[async_trait]
pub trait ClientFactory: Send + Sync + 'static {
    type Client: ServiceClient;

    fn service_name(&self) -> &str;

    fn app_name(&self) -> &str;

    async fn build_client(&self, transport: &TransportConfig) -> Result<Self::Client, BoxError>;
}

struct Slot<C> {
    client: Option<Arc<C>>,
    state: ConnectionState,
    first_connection: bool,
}

/// Hands out a live client, rebuilding it transparently after failures
///
/// Concurrent `acquire` calls are serialized, so at most one build or
/// handshake is in flight.
pub struct ConnectionManager<F: ClientFactory> {
    factory: F,
    transport: TransportConfig,
    retry: RetryPolicy,
    logger: Logger,
    slot: Mutex<Slot<F::Client>>,
}

impl<F: ClientFactory> ConnectionManager<F> {
    /// The manager logs through a scope of `logger` whose context is
    /// `<app>|<service>`.
    pub fn new(factory: F, transport: TransportConfig, logger: &Logger) -> Self {
        let context = format!("{}|{}", factory.app_name(), factory.service_name());
        let logger = logger.scoped(context, logger.identity().external_source.as_deref());

        Self {
            factory,
            transport,
            retry: RetryPolicy::default(),
            logger,
            slot: Mutex::new(Slot {
                client: None,
                state: ConnectionState::Unbuilt,
                first_connection: true,
            }),
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn service_name(&self) -> &str {
        self.factory.service_name()
    }

    pub fn app_name(&self) -> &str {
        self.factory.app_name()
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub async fn state(&self) -> ConnectionState {
        self.slot.lock().await.state
    }

    /// Report that the current handle failed while in use; the next
    /// `acquire` rebuilds it.
    pub async fn mark_broken(&self) {
        let mut slot = self.slot.lock().await;
        if slot.client.is_some() {
            slot.state = ConnectionState::NeedsRebuild;
            self.logger
                .verbose(format!("{} client marked for rebuild", self.service_name()));
        }
    }

    /// Return a live client handle.
    ///
    /// Builds the client if none exists, runs the connect handshake on first
    /// use after a build, and rebuilds on any failure. With the default
    /// [`RetryPolicy`] this retries until it succeeds.
    pub async fn acquire(&self) -> Result<Arc<F::Client>, ConnectionError> {
        let mut slot = self.slot.lock().await;
        // only failed builds and handshakes count; a missing client does not
        let mut failed_attempts: u32 = 0;

        if slot.state == ConnectionState::NeedsRebuild && !self.rebuild(&mut slot).await {
            self.record_failure(&mut failed_attempts).await?;
        }

        loop {
            match self.try_use(&mut slot).await {
                Ok(client) => return Ok(client),
                Err(err) if err.is_not_built() => {
                    self.logger
                        .verbose(format!("{} client needs to be built", self.service_name()));
                }
                Err(err) => {
                    slot.state = ConnectionState::NeedsRebuild;
                    self.logger.error(format!(
                        "Connection to {} failed: {}",
                        self.service_name(),
                        err
                    ));
                    self.record_failure(&mut failed_attempts).await?;
                }
            }

            if !self.rebuild(&mut slot).await {
                self.record_failure(&mut failed_attempts).await?;
            }
        }
    }

    /// Count one failed attempt, then give up or wait out the backoff.
    async fn record_failure(&self, failed_attempts: &mut u32) -> Result<(), ConnectionError> {
        *failed_attempts = failed_attempts.saturating_add(1);
        if self.retry.is_exhausted(*failed_attempts) {
            return Err(ConnectionError::RetriesExhausted {
                attempts: *failed_attempts,
            });
        }
        if !self.retry.backoff.is_zero() {
            tokio::time::sleep(self.retry.backoff).await;
        }
        Ok(())
    }

    async fn try_use(&self, slot: &mut Slot<F::Client>) -> Result<Arc<F::Client>, ConnectionError> {
        let client = slot.client.clone().ok_or(ConnectionError::ClientNotBuilt)?;

        if slot.first_connection {
            client.connect().await.map_err(ConnectionError::Handshake)?;
            self.logger
                .verbose(format!("Connected to {}", self.service_name()));
            slot.first_connection = false;
            slot.state = ConnectionState::Connected;
        }

        Ok(client)
    }

    /// Replace the client; returns whether the factory produced one.
    async fn rebuild(&self, slot: &mut Slot<F::Client>) -> bool {
        self.logger
            .verbose(format!("Building {} client", self.service_name()));

        match self.factory.build_client(&self.transport).await {
            Ok(client) => {
                slot.client = Some(Arc::new(client));
                slot.state = ConnectionState::Connected;
                slot.first_connection = true;
                self.logger
                    .verbose(format!("{} client built successfully", self.service_name()));
                true
            }
            Err(source) => {
                slot.client = None;
                slot.state = ConnectionState::Unbuilt;
                let err = ConnectionError::Build(source);
                self.logger.error(format!(
                    "Failed to build {} client: {}",
                    self.service_name(),
                    err
                ));
                false
            }
        }
    }
}

impl<F: ClientFactory> fmt::Debug for ConnectionManager<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("service", &self.service_name())
            .field("app", &self.app_name())
            .field("transport", &self.transport)
            .field("retry", &self.retry)
            .finish()
    }
}
